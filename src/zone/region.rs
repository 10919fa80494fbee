use crate::geometry::{Extent, Offset};

/// Which part of a zone an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    /// The fixed-width strip around the outside of the zone.
    Border,
    /// Everything inside the border strip.
    Interior,
    /// Border ∪ Interior — every offset in the zone's extent.
    All,
}

impl Region {
    /// Whether `pos` belongs to this region, given the zone's overall
    /// extent and border thickness.
    pub fn contains(&self, extent: &Extent, border: u32, pos: Offset) -> bool {
        if !extent.contains(&pos) {
            return false;
        }
        let interior = pos.x >= border as i32
            && pos.y >= border as i32
            && (pos.x as u32) < extent.w.saturating_sub(border)
            && (pos.y as u32) < extent.h.saturating_sub(border);
        match self {
            Region::All => true,
            Region::Interior => interior,
            Region::Border => !interior,
        }
    }
}
