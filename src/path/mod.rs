//! Point-to-point pathing (Bresenham line rasterization reused from
//! `geometry`, plus A*) and the multi-source Dijkstra goal map NPCs
//! descend for their "think()" movement.

mod astar;
mod field;

pub use astar::astar;
pub use field::Field;
