//! Pure geometric primitives shared by every grid-based subsystem: signed
//! offsets, cardinal directions, unsigned extents, rectangles, line
//! rasterization and distance metrics. Nothing in this module touches game
//! state — it is the vocabulary the rest of the engine is built from.

mod cardinal;
mod extent;
mod line;
mod metric;
mod offset;
mod rect;

pub use cardinal::Cardinal;
pub use extent::Extent;
pub use line::{line, line_with};
pub use metric::Distance;
pub use offset::{Offset, NEIGHBOURHOOD_4, NEIGHBOURHOOD_8};
pub use rect::Rect;
