//! Packed per-tile state: a handful of boolean traits plus two small
//! material tags, together with the neighbourhood-index calculations used
//! to pick a render glyph.

mod neighbourhood;

pub use neighbourhood::{marching_squares, melded, moore, NeighbourhoodIndex, Solver};

use std::fmt;

/// A mutually-exclusive trait toggled by `Cell::set`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trait {
    Solid,
    Opaque,
    Seen,
    Explored,
    Damp,
    Warm,
    Smooth,
    Protrudes,
    Smelly,
    Toxic,
    Bloodied,
}

const BIT_SOLID: u32 = 1 << 0;
const BIT_OPAQUE: u32 = 1 << 1;
const BIT_SEEN: u32 = 1 << 2;
const BIT_EXPLORED: u32 = 1 << 3;
const BIT_DAMP: u32 = 1 << 4;
const BIT_WARM: u32 = 1 << 5;
const BIT_SMOOTH: u32 = 1 << 6;
const BIT_PROTRUDES: u32 = 1 << 7;
const BIT_SMELLY: u32 = 1 << 8;
const BIT_TOXIC: u32 = 1 << 9;
const BIT_BLOODIED: u32 = 1 << 10;

const ROCK_SHIFT: u32 = 11;
const ROCK_MASK: u32 = 0b11 << ROCK_SHIFT;

const MINERAL_SHIFT: u32 = 13;
const MINERAL_MASK: u32 = 0b1111 << MINERAL_SHIFT;

fn bit_of(t: Trait) -> u32 {
    match t {
        Trait::Solid => BIT_SOLID,
        Trait::Opaque => BIT_OPAQUE,
        Trait::Seen => BIT_SEEN,
        Trait::Explored => BIT_EXPLORED,
        Trait::Damp => BIT_DAMP,
        Trait::Warm => BIT_WARM,
        Trait::Smooth => BIT_SMOOTH,
        Trait::Protrudes => BIT_PROTRUDES,
        Trait::Smelly => BIT_SMELLY,
        Trait::Toxic => BIT_TOXIC,
        Trait::Bloodied => BIT_BLOODIED,
    }
}

/// Two-bit rock classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RockType {
    #[default]
    Limestone = 0,
    Granite = 1,
    Basalt = 2,
    Marble = 3,
}

impl RockType {
    fn from_bits(bits: u32) -> RockType {
        match bits & 0b11 {
            0 => RockType::Limestone,
            1 => RockType::Granite,
            2 => RockType::Basalt,
            _ => RockType::Marble,
        }
    }
}

/// Four-bit mineral tag; `None` is the absence of any vein.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MineralType {
    #[default]
    None = 0,
    Lignite = 1,
    Anthracite = 2,
    Hematite = 3,
    Galena = 4,
    Cinnabar = 5,
    Orpiment = 6,
    Cassiterite = 7,
}

impl MineralType {
    fn from_bits(bits: u32) -> MineralType {
        match bits & 0b1111 {
            1 => MineralType::Lignite,
            2 => MineralType::Anthracite,
            3 => MineralType::Hematite,
            4 => MineralType::Galena,
            5 => MineralType::Cinnabar,
            6 => MineralType::Orpiment,
            7 => MineralType::Cassiterite,
            _ => MineralType::None,
        }
    }
}

/// A packed tile record. Logically a 16-bit record per the trait table, but
/// stored in a `u32` since 11 booleans plus a 2-bit and a 4-bit field is 17
/// bits of live state — one more than fits a `u16`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell(u32);

impl Cell {
    /// The sentinel returned for out-of-bounds reads: solid and opaque,
    /// matching freshly generated border tiles.
    pub const CLOSED: Cell = Cell(BIT_SOLID | BIT_OPAQUE);

    pub const OPEN: Cell = Cell(0);

    pub fn new() -> Cell {
        Cell::OPEN
    }

    pub fn has(&self, t: Trait) -> bool {
        self.0 & bit_of(t) != 0
    }

    /// Sets or clears `t`. `Solid` and `Opaque` are independent bits here —
    /// the spec does not require `solid ⇒ opaque` — so this never touches
    /// more than the one requested bit.
    pub fn set(&mut self, t: Trait, value: bool) {
        let bit = bit_of(t);
        if value {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }

    pub fn with(mut self, t: Trait, value: bool) -> Cell {
        self.set(t, value);
        self
    }

    pub fn rock_type(&self) -> RockType {
        RockType::from_bits((self.0 & ROCK_MASK) >> ROCK_SHIFT)
    }

    pub fn set_rock_type(&mut self, rock: RockType) {
        self.0 = (self.0 & !ROCK_MASK) | ((rock as u32) << ROCK_SHIFT);
    }

    pub fn mineral_type(&self) -> MineralType {
        MineralType::from_bits((self.0 & MINERAL_MASK) >> MINERAL_SHIFT)
    }

    pub fn set_mineral_type(&mut self, mineral: MineralType) {
        self.0 = (self.0 & !MINERAL_MASK) | ((mineral as u32) << MINERAL_SHIFT);
    }

    /// A human-readable description assembled from whichever traits are set.
    pub fn to_tooltip(&self) -> String {
        let mut parts = Vec::new();
        if self.has(Trait::Solid) {
            parts.push("solid");
        } else {
            parts.push("open");
        }
        if self.has(Trait::Opaque) {
            parts.push("opaque");
        }
        if self.has(Trait::Damp) {
            parts.push("damp");
        }
        if self.has(Trait::Warm) {
            parts.push("warm");
        }
        if self.has(Trait::Smooth) {
            parts.push("smooth");
        }
        if self.has(Trait::Protrudes) {
            parts.push("protruding");
        }
        if self.has(Trait::Smelly) {
            parts.push("smelly");
        }
        if self.has(Trait::Toxic) {
            parts.push("toxic");
        }
        if self.has(Trait::Bloodied) {
            parts.push("bloodied");
        }
        let mut tooltip = format!("{:?} {}", self.rock_type(), parts.join(", "));
        if self.mineral_type() != MineralType::None {
            tooltip.push_str(&format!(" ({:?} vein)", self.mineral_type()));
        }
        tooltip
    }
}

impl Default for Cell {
    fn default() -> Cell {
        Cell::OPEN
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("solid", &self.has(Trait::Solid))
            .field("opaque", &self.has(Trait::Opaque))
            .field("rock_type", &self.rock_type())
            .field("mineral_type", &self.mineral_type())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_one_trait_does_not_touch_others() {
        let mut c = Cell::new();
        c.set(Trait::Solid, true);
        assert!(c.has(Trait::Solid));
        assert!(!c.has(Trait::Opaque));
    }

    #[test]
    fn solid_does_not_force_opaque() {
        let c = Cell::new().with(Trait::Solid, true);
        assert!(c.has(Trait::Solid));
        assert!(!c.has(Trait::Opaque));
    }

    #[test]
    fn closed_sentinel_is_solid_and_opaque() {
        assert!(Cell::CLOSED.has(Trait::Solid));
        assert!(Cell::CLOSED.has(Trait::Opaque));
    }

    #[test]
    fn rock_and_mineral_round_trip_through_packed_bits() {
        let mut c = Cell::new();
        c.set_rock_type(RockType::Basalt);
        c.set_mineral_type(MineralType::Cinnabar);
        c.set(Trait::Damp, true);
        assert_eq!(c.rock_type(), RockType::Basalt);
        assert_eq!(c.mineral_type(), MineralType::Cinnabar);
        assert!(c.has(Trait::Damp));
    }

    #[test]
    fn tooltip_reflects_live_traits() {
        let c = Cell::new().with(Trait::Solid, true).with(Trait::Damp, true);
        let tooltip = c.to_tooltip();
        assert!(tooltip.contains("solid"));
        assert!(tooltip.contains("damp"));
    }
}
