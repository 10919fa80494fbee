use rand::{Rng, RngCore};

use crate::cell::{marching_squares, melded, moore, NeighbourhoodIndex, Solver};
use crate::geometry::{Extent, Offset, NEIGHBOURHOOD_8};

use super::region::Region;

/// A dense `Size.w × Size.h` grid of tiles, split into a `Border` strip and
/// an `Interior` region. Out-of-bounds reads return `sentinel` by value;
/// out-of-bounds writes are silently ignored, so neighbourhood scans never
/// need a bounds check at the call site.
#[derive(Clone, Debug)]
pub struct Zone<T> {
    extent: Extent,
    border: u32,
    sentinel: T,
    cells: Vec<T>,
}

impl<T: Copy> Zone<T> {
    pub fn new(extent: Extent, border: u32, fill: T, sentinel: T) -> Zone<T> {
        Zone {
            extent,
            border,
            sentinel,
            cells: vec![fill; extent.area() as usize],
        }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn border_width(&self) -> u32 {
        self.border
    }

    pub fn within(&self, region: Region, pos: Offset) -> bool {
        region.contains(&self.extent, self.border, pos)
    }

    /// Reads the tile at `pos`, returning the sentinel if out of bounds.
    pub fn get(&self, pos: Offset) -> T {
        match self.extent.index_of(&pos) {
            Some(i) => self.cells[i],
            None => self.sentinel,
        }
    }

    /// Writes `value` at `pos`. A no-op if `pos` is out of bounds.
    pub fn set(&mut self, pos: Offset, value: T) {
        if let Some(i) = self.extent.index_of(&pos) {
            self.cells[i] = value;
        }
    }

    /// Sets every tile in `region` to `value`.
    pub fn set_region(&mut self, region: Region, value: T) {
        self.apply(region, |_, _| value);
    }

    /// Rewrites every tile in `region` through `f(pos, current)`.
    pub fn apply(&mut self, region: Region, mut f: impl FnMut(Offset, T) -> T) {
        for y in 0..self.extent.h as i32 {
            for x in 0..self.extent.w as i32 {
                let pos = Offset::new(x, y);
                if region.contains(&self.extent, self.border, pos) {
                    let i = self.extent.index_of(&pos).expect("pos is within extent");
                    self.cells[i] = f(pos, self.cells[i]);
                }
            }
        }
    }

    /// Iterates `(pos, tile)` over every offset in `region`, in row-major
    /// order.
    pub fn iter_region(&self, region: Region) -> impl Iterator<Item = (Offset, T)> + '_ {
        (0..self.extent.h as i32).flat_map(move |y| {
            (0..self.extent.w as i32).filter_map(move |x| {
                let pos = Offset::new(x, y);
                if region.contains(&self.extent, self.border, pos) {
                    Some((pos, self.get(pos)))
                } else {
                    None
                }
            })
        })
    }

    /// Computes a neighbourhood index at `pos` using `matches` to test each
    /// neighbour tile. `MarchingSquares`/`Melded` read the four diagonal
    /// corners (NW, NE, SE, SW); `Melded` additionally takes the
    /// `smooth`/`protrudes` flags from the centre tile itself.
    pub fn calculate_index(
        &self,
        pos: Offset,
        solver: Solver,
        matches: impl Fn(T) -> bool,
    ) -> NeighbourhoodIndex {
        match solver {
            Solver::Moore => moore(|i| matches(self.get(pos + NEIGHBOURHOOD_8[i]))),
            Solver::MarchingSquares => {
                let corners = [
                    Offset::new(-1, -1), // NW
                    Offset::new(1, -1),  // NE
                    Offset::new(1, 1),   // SE
                    Offset::new(-1, 1),  // SW
                ];
                marching_squares(|i| matches(self.get(pos + corners[i])))
            }
            Solver::Melded => {
                let corners = [
                    Offset::new(-1, -1),
                    Offset::new(1, -1),
                    Offset::new(1, 1),
                    Offset::new(-1, 1),
                ];
                let mask = marching_squares(|i| matches(self.get(pos + corners[i])));
                melded(mask, false, false)
            }
        }
    }

    /// Cellular-automata generation over `region`: seeds each cell active
    /// with probability `fill`, then runs `iterations` deterministic passes
    /// where a cell becomes active iff its Moore-neighbour active count is
    /// at least `threshold`. Every pass reads from the previous pass's
    /// snapshot, so results never depend on scan order.
    pub fn generate(
        &mut self,
        region: Region,
        rng: &mut impl RngCore,
        fill: f64,
        iterations: u32,
        threshold: u8,
        is_active: impl Fn(T) -> bool,
        make: impl Fn(bool) -> T,
    ) {
        self.apply(region, |_, _| make(rng.random_bool(fill.clamp(0.0, 1.0))));

        for _ in 0..iterations {
            let snapshot = self.cells.clone();
            let snapshot_extent = self.extent;
            let read = |pos: Offset| -> T {
                match snapshot_extent.index_of(&pos) {
                    Some(i) => snapshot[i],
                    None => self.sentinel,
                }
            };
            self.apply(region, |pos, _| {
                let count = NEIGHBOURHOOD_8
                    .iter()
                    .filter(|&&o| is_active(read(pos + o)))
                    .count() as u8;
                make(count >= threshold)
            });
        }
    }

    /// Rewrites any Moore-connected component matching `target` smaller
    /// than `minimum_count` tiles to `replacement`.
    pub fn collapse(
        &mut self,
        region: Region,
        target: impl Fn(T) -> bool,
        minimum_count: usize,
        replacement: T,
    ) {
        let mut visited = vec![false; self.cells.len()];
        let mut components: Vec<Vec<Offset>> = Vec::new();

        for (pos, tile) in self.iter_region(region) {
            let idx = self.extent.index_of(&pos).expect("pos is within extent");
            if visited[idx] || !target(tile) {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![pos];
            visited[idx] = true;
            while let Some(p) = stack.pop() {
                component.push(p);
                for offset in NEIGHBOURHOOD_8 {
                    let neighbour = p + offset;
                    if !region.contains(&self.extent, self.border, neighbour) {
                        continue;
                    }
                    let Some(ni) = self.extent.index_of(&neighbour) else {
                        continue;
                    };
                    if visited[ni] || !target(self.cells[ni]) {
                        continue;
                    }
                    visited[ni] = true;
                    stack.push(neighbour);
                }
            }
            components.push(component);
        }

        for component in components {
            if component.len() < minimum_count {
                for pos in component {
                    self.set(pos, replacement);
                }
            }
        }
    }

    /// Applies a per-cell mutation (Bernoulli/categorical draws on
    /// secondary traits) across `region`.
    pub fn randomize(
        &mut self,
        region: Region,
        rng: &mut dyn RngCore,
        mut mutate: impl FnMut(&mut dyn RngCore, Offset, T) -> T,
    ) {
        self.apply(region, |pos, tile| mutate(rng, pos, tile));
    }

    /// Picks a uniformly random offset in `region` matching `predicate`, or
    /// `None` if no such offset exists.
    pub fn find_random(
        &self,
        region: Region,
        rng: &mut impl RngCore,
        predicate: impl Fn(T) -> bool,
    ) -> Option<Offset> {
        let candidates: Vec<Offset> = self
            .iter_region(region)
            .filter(|(_, tile)| predicate(*tile))
            .map(|(pos, _)| pos)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let i = rng.random_range(0..candidates.len());
        Some(candidates[i])
    }
}

impl<T> std::ops::Index<Offset> for Zone<T>
where
    T: Copy,
{
    type Output = T;

    /// Panics on out-of-bounds; prefer `get` for sentinel-on-OOB reads.
    /// Kept for ergonomic `zone[pos]` access from code that has already
    /// bounds-checked via `within`.
    fn index(&self, pos: Offset) -> &T {
        let i = self.extent.index_of(&pos).expect("pos out of zone bounds");
        &self.cells[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Cell, Trait};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn oob_read_returns_sentinel() {
        let z: Zone<Cell> = Zone::new(Extent::new(4, 4), 1, Cell::OPEN, Cell::CLOSED);
        assert_eq!(z.get(Offset::new(-1, 0)), Cell::CLOSED);
        assert_eq!(z.get(Offset::new(100, 0)), Cell::CLOSED);
    }

    #[test]
    fn oob_write_is_silently_ignored() {
        let mut z: Zone<Cell> = Zone::new(Extent::new(4, 4), 1, Cell::OPEN, Cell::CLOSED);
        z.set(Offset::new(-1, -1), Cell::CLOSED);
        // no panic, and in-bounds state is untouched
        assert_eq!(z.get(Offset::new(0, 0)), Cell::OPEN);
    }

    #[test]
    fn border_set_closed_makes_perimeter_solid_and_opaque() {
        let mut z: Zone<Cell> = Zone::new(Extent::new(6, 6), 1, Cell::OPEN, Cell::CLOSED);
        z.set_region(Region::Border, Cell::CLOSED);
        for (_, tile) in z.iter_region(Region::Border) {
            assert!(tile.has(Trait::Solid));
            assert!(tile.has(Trait::Opaque));
        }
    }

    #[test]
    fn generation_is_deterministic_for_a_fixed_seed() {
        let build = || {
            let mut z: Zone<Cell> = Zone::new(Extent::new(12, 12), 1, Cell::OPEN, Cell::CLOSED);
            z.set_region(Region::Border, Cell::CLOSED);
            let mut r = rng(42);
            z.generate(
                Region::Interior,
                &mut r,
                0.45,
                3,
                5,
                |c| c.has(Trait::Solid),
                |solid| Cell::OPEN.with(Trait::Solid, solid),
            );
            z
        };
        let a = build();
        let b = build();
        for (pos, _) in a.iter_region(Region::All) {
            assert_eq!(a.get(pos), b.get(pos));
        }
    }

    #[test]
    fn collapse_rewrites_small_components_only() {
        // A 5x5 interior where only (1,1) is solid: a component of size 1
        // should be collapsed away under a minimum of 2.
        let mut z: Zone<Cell> = Zone::new(Extent::new(7, 7), 1, Cell::OPEN, Cell::CLOSED);
        z.set(Offset::new(1, 1), Cell::OPEN.with(Trait::Solid, true));
        z.collapse(
            Region::Interior,
            |c| c.has(Trait::Solid),
            2,
            Cell::OPEN,
        );
        assert!(!z.get(Offset::new(1, 1)).has(Trait::Solid));
    }

    #[test]
    fn find_random_only_returns_matching_offsets() {
        let mut z: Zone<Cell> = Zone::new(Extent::new(5, 5), 1, Cell::OPEN, Cell::CLOSED);
        z.set(Offset::new(2, 2), Cell::OPEN.with(Trait::Damp, true));
        let mut r = rng(7);
        let found = z
            .find_random(Region::Interior, &mut r, |c| c.has(Trait::Damp))
            .unwrap();
        assert_eq!(found, Offset::new(2, 2));
    }
}
