//! Tiles several same-shaped zones into one larger map in row-major order,
//! then keeps only the largest connected component of open space and
//! collapses the rest — the "region composer" of spec §4.C, named
//! `composer` here to avoid colliding with `zone::Region`'s Border/
//! Interior/All distinction.

use crate::area::Area;
use crate::cell::{Cell, Trait};
use crate::geometry::{Extent, Offset};
use crate::zone::{Region, Zone};

/// Copies each `zone_w × zone_h` sub-zone into its row-major slab of
/// `out`, which must have extent `zone_size * (cols, rows)`.
pub fn compile(out: &mut Zone<Cell>, tiles: &[Zone<Cell>], cols: u32, zone_size: Extent) {
    for (i, tile) in tiles.iter().enumerate() {
        let col = (i as u32) % cols;
        let row = (i as u32) / cols;
        let base = Offset::new((col * zone_size.w) as i32, (row * zone_size.h) as i32);
        for (local, value) in tile.iter_region(Region::All) {
            out.set(base + local, value);
        }
    }
}

/// Partitions `region` of `zone` into connected open components and keeps
/// only the largest, rewriting every other component's cells to `closed`.
/// Returns the surviving component as an `Area` — empty if the zone has no
/// open cell at all (the generation-failure condition of spec §7).
pub fn keep_largest_component(zone: &mut Zone<Cell>, region: Region, closed: Cell) -> Area {
    let components = Area::partition(zone, region, |c| !c.has(Trait::Solid));
    let Some((largest, rest)) = components.split_first() else {
        return Area::empty();
    };
    for component in rest {
        component.set(zone, closed);
    }
    largest.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_places_sub_zones_in_row_major_slabs() {
        let zone_size = Extent::new(3, 3);
        let mut a: Zone<Cell> = Zone::new(zone_size, 0, Cell::OPEN, Cell::CLOSED);
        let mut b: Zone<Cell> = Zone::new(zone_size, 0, Cell::OPEN, Cell::CLOSED);
        a.set(Offset::new(1, 1), Cell::OPEN.with(Trait::Damp, true));
        b.set(Offset::new(1, 1), Cell::OPEN.with(Trait::Warm, true));

        let mut out: Zone<Cell> = Zone::new(Extent::new(6, 3), 0, Cell::OPEN, Cell::CLOSED);
        compile(&mut out, &[a, b], 2, zone_size);

        assert!(out.get(Offset::new(1, 1)).has(Trait::Damp));
        assert!(out.get(Offset::new(4, 1)).has(Trait::Warm));
    }

    #[test]
    fn keep_largest_component_collapses_smaller_rooms() {
        let mut zone: Zone<Cell> = Zone::new(Extent::new(9, 5), 1, Cell::CLOSED, Cell::CLOSED);
        // A 3x3 open room and a single open cell, disjoint.
        for y in 1..4 {
            for x in 1..4 {
                zone.set(Offset::new(x, y), Cell::OPEN);
            }
        }
        zone.set(Offset::new(7, 1), Cell::OPEN);

        let kept = keep_largest_component(&mut zone, Region::Interior, Cell::CLOSED);
        assert_eq!(kept.len(), 9);
        assert!(zone.get(Offset::new(7, 1)).has(Trait::Solid));
    }

    #[test]
    fn fully_solid_zone_yields_an_empty_area() {
        let mut zone: Zone<Cell> = Zone::new(Extent::new(5, 5), 1, Cell::CLOSED, Cell::CLOSED);
        let kept = keep_largest_component(&mut zone, Region::Interior, Cell::CLOSED);
        assert!(kept.is_empty());
    }
}
