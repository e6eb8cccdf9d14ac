//! Configuration for the `tile-matrix` binary.
//!
//! Options come from command-line arguments, with environment variable
//! fallbacks under the `TILE_MATRIX_` prefix:
//!
//! - `TILE_MATRIX_ROOT` - Directory to catalog
//! - `TILE_MATRIX_DESCENDING_X` - Merge rows from high X to low X (default: false)
//! - `TILE_MATRIX_DESCENDING_Y` - Merge columns from high Y to low Y (default: false)
//! - `TILE_MATRIX_SLICE_RULE` - `enclosure` or `overlap` (default: enclosure)
//! - `TILE_MATRIX_FORMAT` - Report format, `text` or `json` (default: text)
//!
//! `RUST_LOG` overrides the log filter chosen by `--verbose`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::layout::SliceRule;

// =============================================================================
// Default Values
// =============================================================================

/// Log filter used without `--verbose`.
pub const DEFAULT_LOG_FILTER: &str = "tile_matrix=info";

/// Log filter used with `--verbose`.
pub const VERBOSE_LOG_FILTER: &str = "tile_matrix=debug";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,

    /// Machine-readable JSON document
    Json,
}

/// Tile Matrix - catalog a directory of 3-D tiles and report their layout.
///
/// Finds every tile whose name carries stage coordinates, reads its
/// dimensions, and prints the depth slices, the merge groups along X and Y,
/// and the estimated mosaic size.
#[derive(Parser, Debug, Clone)]
#[command(name = "tile-matrix")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Directory to search for tiles, recursively.
    #[arg(env = "TILE_MATRIX_ROOT")]
    pub root: PathBuf,

    // =========================================================================
    // Traversal
    // =========================================================================
    /// Walk rows from the highest X coordinate to the lowest.
    #[arg(long, default_value_t = false, env = "TILE_MATRIX_DESCENDING_X")]
    pub descending_x: bool,

    /// Walk columns from the highest Y coordinate to the lowest.
    #[arg(long, default_value_t = false, env = "TILE_MATRIX_DESCENDING_Y")]
    pub descending_y: bool,

    /// How tiles are linked into depth slices.
    ///
    /// `enclosure` links a tile with the tiles whose depth range covers it;
    /// `overlap` links any two tiles whose depth ranges intersect.
    #[arg(long, value_enum, default_value_t = SliceRule::Enclosure, env = "TILE_MATRIX_SLICE_RULE")]
    pub slice_rule: SliceRule,

    // =========================================================================
    // Output
    // =========================================================================
    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "TILE_MATRIX_FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.root.as_os_str().is_empty() {
            return Err("A root directory is required. Pass <ROOT> or set TILE_MATRIX_ROOT".to_string());
        }

        if !self.root.is_dir() {
            return Err(format!("{} is not a directory", self.root.display()));
        }

        Ok(())
    }

    /// Traversal direction for rows merged along X.
    pub fn ascending_tiles_x(&self) -> bool {
        !self.descending_x
    }

    /// Traversal direction for columns merged along Y.
    pub fn ascending_tiles_y(&self) -> bool {
        !self.descending_y
    }

    /// Default log filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
