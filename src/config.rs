//! Command-line surface, grounded in `original_source/src/main.cpp`'s flag
//! table (`""`, `seed`, `size`, `render`).

use clap::Parser;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// A declarative procedural map generator.
#[derive(Debug, Parser)]
#[command(name = "mapforge", version, about)]
pub struct Cli {
    /// Path to a RON-encoded generator tree.
    pub input: PathBuf,

    /// Random seed. Defaults to the current Unix time in seconds.
    #[arg(long)]
    pub seed: Option<i64>,

    /// Square map side length.
    #[arg(long, default_value_t = 10)]
    pub size: u32,

    /// Path to a glyph-definition file for ASCII rendering. If omitted, each
    /// cell's token set is printed as a plain comma-joined line instead.
    #[arg(long)]
    pub render: Option<PathBuf>,
}

impl Cli {
    /// Resolve the effective seed, falling back to the current Unix time.
    #[must_use]
    pub fn resolved_seed(&self) -> i64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0)
        })
    }
}
