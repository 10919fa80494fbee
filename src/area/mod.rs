//! `Area`: an unordered set of offsets with fast membership, built either
//! by flood-filling a zone on value equality or by selecting every tile
//! matching a trait. Used to carve rooms apart and to apply bulk trait
//! writes across a connected region.

use std::collections::HashSet;

use crate::geometry::{Offset, NEIGHBOURHOOD_8};
use crate::zone::{Region, Zone};

/// A set of offsets, typically a connected component or a trait-matching
/// selection over a zone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Area(HashSet<Offset>);

impl Area {
    pub fn empty() -> Area {
        Area(HashSet::new())
    }

    pub fn from_offsets(offsets: impl IntoIterator<Item = Offset>) -> Area {
        Area(offsets.into_iter().collect())
    }

    pub fn contains(&self, pos: Offset) -> bool {
        self.0.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Offset> + '_ {
        self.0.iter().copied()
    }

    pub fn insert(&mut self, pos: Offset) -> bool {
        self.0.insert(pos)
    }

    /// Flood-fills from `start` over `region`, Moore-connected, collecting
    /// every reachable tile whose value equals the value at `start`.
    /// Returns an empty area if `start` itself is outside `region`.
    pub fn flood_fill<T: Copy + PartialEq>(zone: &Zone<T>, region: Region, start: Offset) -> Area {
        if !zone.within(region, start) {
            return Area::empty();
        }
        let target = zone.get(start);
        let mut visited = HashSet::new();
        let mut stack = vec![start];
        visited.insert(start);
        while let Some(pos) = stack.pop() {
            for offset in NEIGHBOURHOOD_8 {
                let next = pos + offset;
                if visited.contains(&next) || !zone.within(region, next) {
                    continue;
                }
                if zone.get(next) == target {
                    visited.insert(next);
                    stack.push(next);
                }
            }
        }
        Area(visited)
    }

    /// Every tile in `region` for which `matches` holds, regardless of
    /// connectivity.
    pub fn select<T: Copy>(zone: &Zone<T>, region: Region, matches: impl Fn(T) -> bool) -> Area {
        Area(
            zone.iter_region(region)
                .filter(|(_, tile)| matches(*tile))
                .map(|(pos, _)| pos)
                .collect(),
        )
    }

    /// Partitions `region` into its Moore-connected components restricted
    /// to tiles matching `matches`, largest first. Tiles not matching
    /// `matches` never appear in any returned area.
    pub fn partition<T: Copy>(zone: &Zone<T>, region: Region, matches: impl Fn(T) -> bool) -> Vec<Area> {
        let mut visited: HashSet<Offset> = HashSet::new();
        let mut components: Vec<Area> = Vec::new();

        for (pos, tile) in zone.iter_region(region) {
            if visited.contains(&pos) || !matches(tile) {
                continue;
            }
            let mut component = HashSet::new();
            let mut stack = vec![pos];
            visited.insert(pos);
            while let Some(p) = stack.pop() {
                component.insert(p);
                for offset in NEIGHBOURHOOD_8 {
                    let next = p + offset;
                    if visited.contains(&next) || !zone.within(region, next) {
                        continue;
                    }
                    if matches(zone.get(next)) {
                        visited.insert(next);
                        stack.push(next);
                    }
                }
            }
            components.push(Area(component));
        }

        components.sort_by(|a, b| b.len().cmp(&a.len()));
        components
    }

    /// Writes `value` to every tile in this area. Idempotent: applying the
    /// same area and value twice leaves the zone identical to applying it
    /// once.
    pub fn set<T: Copy>(&self, zone: &mut Zone<T>, value: T) {
        for pos in self.iter() {
            zone.set(pos, value);
        }
    }

    /// Rewrites every tile in this area through `f(current)`.
    pub fn apply<T: Copy>(&self, zone: &mut Zone<T>, f: impl Fn(T) -> T) {
        for pos in self.iter() {
            let current = zone.get(pos);
            zone.set(pos, f(current));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Cell, Trait};
    use crate::geometry::Extent;

    #[test]
    fn flood_fill_stays_within_matching_values() {
        let mut z: Zone<Cell> = Zone::new(Extent::new(6, 6), 1, Cell::OPEN, Cell::CLOSED);
        z.set(Offset::new(3, 3), Cell::OPEN.with(Trait::Solid, true));
        let area = Area::flood_fill(&z, Region::Interior, Offset::new(1, 1));
        assert!(area.contains(Offset::new(1, 1)));
        assert!(!area.contains(Offset::new(3, 3)));
    }

    #[test]
    fn select_matches_trait_regardless_of_connectivity() {
        let mut z: Zone<Cell> = Zone::new(Extent::new(6, 6), 1, Cell::OPEN, Cell::CLOSED);
        z.set(Offset::new(1, 1), Cell::OPEN.with(Trait::Damp, true));
        z.set(Offset::new(4, 4), Cell::OPEN.with(Trait::Damp, true));
        let area = Area::select(&z, Region::Interior, |c| c.has(Trait::Damp));
        assert_eq!(area.len(), 2);
    }

    #[test]
    fn partition_orders_components_largest_first() {
        let mut z: Zone<Cell> = Zone::new(Extent::new(9, 9), 1, Cell::OPEN, Cell::CLOSED);
        // A lone solid cell and a 2x2 solid block: two disjoint components.
        z.set(Offset::new(1, 1), Cell::OPEN.with(Trait::Solid, true));
        for (x, y) in [(5, 5), (6, 5), (5, 6), (6, 6)] {
            z.set(Offset::new(x, y), Cell::OPEN.with(Trait::Solid, true));
        }
        let parts = Area::partition(&z, Region::Interior, |c| c.has(Trait::Solid));
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 4);
        assert_eq!(parts[1].len(), 1);
    }

    #[test]
    fn applying_set_twice_equals_applying_once() {
        let mut a: Zone<Cell> = Zone::new(Extent::new(5, 5), 1, Cell::OPEN, Cell::CLOSED);
        let mut b = a.clone();
        let area = Area::from_offsets([Offset::new(2, 2), Offset::new(2, 3)]);

        area.set(&mut a, Cell::OPEN.with(Trait::Bloodied, true));
        area.set(&mut a, Cell::OPEN.with(Trait::Bloodied, true));
        area.set(&mut b, Cell::OPEN.with(Trait::Bloodied, true));

        for pos in [Offset::new(2, 2), Offset::new(2, 3)] {
            assert_eq!(a.get(pos), b.get(pos));
        }
    }
}
