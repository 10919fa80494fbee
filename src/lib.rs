#![allow(dead_code)]

pub mod area;
pub mod cell;
pub mod composer;
pub mod config;
pub mod entity;
pub mod fov;
pub mod geometry;
pub mod path;
pub mod registry;
pub mod rng;
pub mod timers;
pub mod turn;
pub mod worker;
pub mod zone;

pub mod prelude {
    pub use super::area::Area;
    pub use super::cell::{Cell, MineralType, RockType, Trait};
    pub use super::config::EngineOptions;
    pub use super::entity::*;
    pub use super::fov::shadow_cast;
    pub use super::geometry::{Cardinal, Distance, Extent, Offset, Rect};
    pub use super::path::{astar, Field};
    pub use super::registry::Registry;
    pub use super::rng::{BinaryApplicator, Generator, NumericApplicator, TernaryApplicator};
    pub use super::timers::{Clock, Timer, Wave, Waveform};
    pub use super::turn::{Engine, GenerationOptions, Phase, PlayerIntent};
    pub use super::worker::{StopFlag, Worker};
    pub use super::zone::{Region, Zone};

    pub use anyhow::{anyhow, Context, Error};
    pub type Result<T> = anyhow::Result<T, Error>;
}
