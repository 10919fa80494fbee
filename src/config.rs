//! Command-line configuration for the `warren` binary, grounded on the
//! teacher's `LTPServerOptions`: a flat `clap::Parser` struct the binary
//! parses once at startup and never mutates.

use clap::Parser;

use crate::geometry::Extent;
use crate::turn::GenerationOptions;

#[derive(Clone, Debug, Parser)]
#[command(name = "warren", about = "Necrowarp world-simulation engine, headless demo")]
pub struct EngineOptions {
    /// Overrides the non-deterministic RNG seed for reproducible runs.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 48)]
    pub width: u32,

    #[arg(long, default_value_t = 32)]
    pub height: u32,

    #[arg(long, default_value_t = 1)]
    pub border: u32,

    #[arg(long)]
    pub log_level: Option<String>,

    /// Cellular-automata initial fill probability.
    #[arg(long, default_value_t = 0.45)]
    pub fill: f64,

    /// Cellular-automata smoothing passes.
    #[arg(long, default_value_t = 4)]
    pub iterations: u32,

    /// Cellular-automata neighbour-count threshold.
    #[arg(long, default_value_t = 5)]
    pub threshold: u8,

    /// Minimum connected-component size a CA pass keeps before collapse.
    #[arg(long, default_value_t = 4)]
    pub min_component: usize,

    /// Target number of live good NPCs the reinforcement top-up maintains.
    #[arg(long, default_value_t = 4)]
    pub wave_size: u32,
}

impl EngineOptions {
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            extent: Extent::new(self.width, self.height),
            border: self.border,
            fill: self.fill,
            iterations: self.iterations,
            threshold: self.threshold,
            min_component: self.min_component,
            wave_size: self.wave_size,
        }
    }
}
