use std::collections::{HashMap, VecDeque};

use crate::geometry::{Distance, Extent, Offset, NEIGHBOURHOOD_4};

/// A multi-source Dijkstra goal map with unit edge weights: every cell
/// holds either `None` (unreachable) or the number of steps to the nearest
/// goal. Expansion always walks the 4-way cardinal neighbourhood, so a
/// cell's value is its Manhattan step count from the nearest goal — spec
/// §4.F/§8 scenario 5 fixes this concretely (`field.at((3,4)) == 7` from a
/// goal at `(0,0)`, `3+4`, not the Chebyshev `4` an 8-way expansion would
/// give). `metric` is kept only to label the field; it does not change
/// which neighbours are walked.
#[derive(Clone, Debug)]
pub struct Field {
    extent: Extent,
    distances: Vec<Option<u32>>,
    metric: Distance,
}

impl Field {
    /// Builds a field from `goals`, expanding over the 4-way cardinal
    /// neighbourhood through cells for which `passable` holds and which are
    /// not in `blocked`. `metric` is recorded on the field for callers but
    /// does not affect the expansion (see struct doc comment).
    pub fn build(
        extent: Extent,
        goals: &[Offset],
        metric: Distance,
        passable: impl Fn(Offset) -> bool,
        blocked: impl Fn(Offset) -> bool,
    ) -> Field {
        let mut distances: HashMap<Offset, u32> = HashMap::new();
        let mut queue = VecDeque::new();

        for &goal in goals {
            if !extent.contains(&goal) {
                continue;
            }
            if distances.insert(goal, 0).is_none() {
                queue.push_back(goal);
            }
        }

        while let Some(pos) = queue.pop_front() {
            let here = *distances.get(&pos).expect("queued position has a distance");
            for offset in &NEIGHBOURHOOD_4 {
                let next = pos + *offset;
                if !extent.contains(&next) || !passable(next) || blocked(next) {
                    continue;
                }
                let candidate = here + 1;
                let improves = match distances.get(&next) {
                    Some(&existing) => candidate < existing,
                    None => true,
                };
                if improves {
                    distances.insert(next, candidate);
                    queue.push_back(next);
                }
            }
        }

        let mut packed = vec![None; extent.area() as usize];
        for (pos, dist) in distances {
            if let Some(i) = extent.index_of(&pos) {
                packed[i] = Some(dist);
            }
        }

        Field {
            extent,
            distances: packed,
            metric,
        }
    }

    /// Distance to the nearest goal, or `None` if unreachable.
    pub fn at(&self, pos: Offset) -> Option<u32> {
        self.extent.index_of(&pos).and_then(|i| self.distances[i])
    }

    /// An adjacent cell with strictly lower value than `pos`, ties broken
    /// by the canonical cardinal neighbourhood order. `None` if `pos` is a
    /// local minimum (no neighbour improves) or unreachable itself.
    pub fn descend(&self, pos: Offset, blocked: impl Fn(Offset) -> bool) -> Option<Offset> {
        let here = self.at(pos)?;
        for offset in &NEIGHBOURHOOD_4 {
            let next = pos + *offset;
            if blocked(next) {
                continue;
            }
            if let Some(value) = self.at(next) {
                if value < here {
                    return Some(next);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_map_descent_from_scenario() {
        let extent = Extent::new(10, 10);
        let field = Field::build(extent, &[Offset::new(0, 0)], Distance::Octile, |_| true, |_| false);
        assert_eq!(field.at(Offset::new(3, 4)), Some(7));
        let down = field.descend(Offset::new(3, 4), |_| false).unwrap();
        assert_eq!(field.at(down), Some(6));
    }

    #[test]
    fn goals_are_zero_and_unreachable_cells_are_none() {
        let extent = Extent::new(5, 5);
        let field = Field::build(extent, &[Offset::new(2, 2)], Distance::Chebyshev, |o| o != Offset::new(2, 1), |_| false);
        assert_eq!(field.at(Offset::new(2, 2)), Some(0));
        // fully walled off goal except the one forbidden neighbour still
        // reaches everywhere else via the remaining neighbourhood.
        assert!(field.at(Offset::new(0, 0)).is_some());
    }

    #[test]
    fn local_minimum_has_no_descent() {
        let extent = Extent::new(3, 3);
        let field = Field::build(extent, &[Offset::new(1, 1)], Distance::Manhattan, |_| true, |_| false);
        assert!(field.descend(Offset::new(1, 1), |_| false).is_none());
    }
}
