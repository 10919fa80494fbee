//! The dense per-map tile grid: a `Zone<T>` split into `Border` and
//! `Interior` regions, with cellular-automata generation, connected-
//! component collapse, and the neighbourhood-index calculations `cell`
//! glyphs are picked from.

mod grid;
mod region;

pub use grid::Zone;
pub use region::Region;
