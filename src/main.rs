//! Tile Matrix - catalog a directory of tiles and print their layout.

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tile_matrix::{
    Axis, Config, OutputFormat, SkippedCandidate, Slice, SliceRule, TileCatalog, TileGroup,
    TileId, TileRecord,
};

fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(config.log_filter());

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut catalog = match TileCatalog::load(&config.root) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    catalog.set_ascending_tiles_x(config.ascending_tiles_x());
    catalog.set_ascending_tiles_y(config.ascending_tiles_y());
    catalog.set_slice_rule(config.slice_rule);

    if let Err(e) = catalog.require_tiles() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    let report = Report::build(&catalog);
    match config.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Report
// =============================================================================

#[derive(Debug, Serialize)]
struct Report<'a> {
    root: &'a std::path::Path,
    slice_rule: SliceRule,
    ascending_tiles_x: bool,
    ascending_tiles_y: bool,
    tiles: &'a [TileRecord],
    skipped: &'a [SkippedCandidate],
    slices: Vec<Slice>,
    tiles_along_x: Vec<GroupReport>,
    tiles_along_y: Vec<GroupReport>,
    full_width: Option<i64>,
    full_height: Option<i64>,
}

#[derive(Debug, Serialize)]
struct GroupReport {
    slice: usize,
    axis: Axis,
    key: i64,
    tiles: Vec<TileId>,
}

impl From<TileGroup<'_>> for GroupReport {
    fn from(group: TileGroup<'_>) -> Self {
        Self {
            slice: group.slice,
            axis: group.axis,
            key: group.key,
            tiles: group.ids,
        }
    }
}

impl<'a> Report<'a> {
    fn build(catalog: &'a TileCatalog) -> Self {
        Self {
            root: catalog.root(),
            slice_rule: catalog.slice_rule(),
            ascending_tiles_x: catalog.ascending_tiles_x(),
            ascending_tiles_y: catalog.ascending_tiles_y(),
            tiles: catalog.tiles(),
            skipped: catalog.skipped(),
            slices: catalog.slices(),
            tiles_along_x: catalog.tiles_along_x().map(GroupReport::from).collect(),
            tiles_along_y: catalog.tiles_along_y().map(GroupReport::from).collect(),
            full_width: catalog.full_width(),
            full_height: catalog.full_height(),
        }
    }
}

fn print_text(report: &Report<'_>) {
    println!("Tile catalog: {}", report.root.display());
    println!("═════════════════════════════════");
    println!();

    println!("Tiles ({}):", report.tiles.len());
    println!(
        "  {:>4}  {:>8} {:>8} {:>8} {:>8}  {:>6} {:>6} {:>6}  file",
        "#", "X", "Y", "Z", "Z_end", "nfrms", "xsize", "ysize"
    );
    for (i, t) in report.tiles.iter().enumerate() {
        println!(
            "  {:>4}  {:>8} {:>8} {:>8} {:>8}  {:>6} {:>6} {:>6}  {}",
            i,
            t.x,
            t.y,
            t.z,
            t.z_end,
            t.nfrms,
            t.xsize,
            t.ysize,
            t.filename.display()
        );
    }

    if !report.skipped.is_empty() {
        println!();
        println!("Skipped ({}):", report.skipped.len());
        for s in report.skipped {
            println!("  {}", s.reason);
        }
    }

    println!();
    println!("Slices ({:?} rule):", report.slice_rule);
    for (i, slice) in report.slices.iter().enumerate() {
        println!("  [{}] {}", i, join_ids(slice.tiles()));
    }

    print_groups("Along X", report.ascending_tiles_x, &report.tiles_along_x);
    print_groups("Along Y", report.ascending_tiles_y, &report.tiles_along_y);

    println!();
    println!("─────────────────────────────────");
    println!("  Full width:  {}", format_extent(report.full_width));
    println!("  Full height: {}", format_extent(report.full_height));
}

fn print_groups(title: &str, ascending: bool, groups: &[GroupReport]) {
    let direction = if ascending { "ascending" } else { "descending" };
    println!();
    println!("{} ({}):", title, direction);
    for g in groups {
        println!("  slice {}  {}={:<8} {}", g.slice, g.axis, g.key, join_ids(&g.tiles));
    }
}

fn join_ids(ids: &[TileId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_extent(extent: Option<i64>) -> String {
    extent.map_or_else(|| "-".to_string(), |e| format!("{} px", e))
}
