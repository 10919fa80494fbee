use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::geometry::{Distance, Offset};

/// A frontier record in the A* search: the result of expanding `prev_position`.
#[derive(Clone, Copy, Debug)]
struct Creeper {
    position: Offset,
    g: f64,
    f: f64,
}

impl PartialEq for Creeper {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.g == other.g
    }
}
impl Eq for Creeper {}

impl PartialOrd for Creeper {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Creeper {
    /// `BinaryHeap` is a max-heap; we want the lowest `f`, with ties broken
    /// towards the *higher* `g` (prefer the deeper frontier), so this
    /// reverses `f` and keeps `g` direct.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.g.partial_cmp(&other.g).unwrap_or(Ordering::Equal))
    }
}

/// Searches from `origin` to `destination` under `metric`, expanding only
/// cells for which `passable` holds and which are not present in `blocked`.
/// Returns the path including both endpoints, or an empty vector if
/// `destination` is unreachable.
pub fn astar(
    origin: Offset,
    destination: Offset,
    metric: Distance,
    passable: impl Fn(Offset) -> bool,
    blocked: impl Fn(Offset) -> bool,
) -> Vec<Offset> {
    if origin == destination {
        return vec![origin];
    }

    let mut open = BinaryHeap::new();
    let mut best_g: HashMap<Offset, f64> = HashMap::new();
    let mut came_from: HashMap<Offset, Offset> = HashMap::new();

    best_g.insert(origin, 0.0);
    open.push(Creeper {
        position: origin,
        g: 0.0,
        f: metric.between(&origin, &destination),
    });

    while let Some(current) = open.pop() {
        if current.position == destination {
            return reconstruct(&came_from, origin, destination);
        }

        if current.g > *best_g.get(&current.position).unwrap_or(&f64::INFINITY) {
            continue;
        }

        for offset in metric.neighbourhood() {
            let next = current.position + *offset;
            if next != destination {
                if !passable(next) || blocked(next) {
                    continue;
                }
            }

            let tentative_g = current.g + metric.step_cost(&current.position, &next);
            let better = tentative_g < *best_g.get(&next).unwrap_or(&f64::INFINITY);
            if better {
                best_g.insert(next, tentative_g);
                came_from.insert(next, current.position);
                open.push(Creeper {
                    position: next,
                    g: tentative_g,
                    f: tentative_g + metric.between(&next, &destination),
                });
            }
        }
    }

    Vec::new()
}

fn reconstruct(came_from: &HashMap<Offset, Offset>, origin: Offset, destination: Offset) -> Vec<Offset> {
    let mut path = vec![destination];
    let mut current = destination;
    while current != origin {
        match came_from.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_endpoints_is_single_cell_path() {
        let p = astar(Offset::new(1, 1), Offset::new(1, 1), Distance::Octile, |_| true, |_| false);
        assert_eq!(p, vec![Offset::new(1, 1)]);
    }

    #[test]
    fn unreachable_destination_returns_empty() {
        let p = astar(
            Offset::new(0, 0),
            Offset::new(5, 5),
            Distance::Octile,
            |_| false,
            |_| false,
        );
        assert!(p.is_empty());
    }

    #[test]
    fn detour_around_a_solid_column_routes_through_the_gap() {
        // 5x5 open field, column x=2 solid except (2,4).
        let passable = |o: Offset| {
            if o.x < 0 || o.y < 0 || o.x > 4 || o.y > 4 {
                return false;
            }
            if o.x == 2 && o.y != 4 {
                return false;
            }
            true
        };
        let path = astar(Offset::new(0, 0), Offset::new(4, 0), Distance::Octile, passable, |_| false);
        assert!(!path.is_empty());
        assert_eq!(*path.first().unwrap(), Offset::new(0, 0));
        assert_eq!(*path.last().unwrap(), Offset::new(4, 0));
        assert!(path.contains(&Offset::new(2, 4)));
        assert_eq!(path.len(), 9);
    }

    #[test]
    fn every_consecutive_pair_is_a_unit_neighbour() {
        let passable = |o: Offset| (0..6).contains(&o.x) && (0..6).contains(&o.y);
        let path = astar(Offset::new(0, 0), Offset::new(5, 5), Distance::Chebyshev, passable, |_| false);
        for pair in path.windows(2) {
            let d = pair[0].chebyshev(&pair[1]);
            assert_eq!(d, 1);
        }
    }
}
