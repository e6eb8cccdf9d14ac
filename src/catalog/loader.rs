//! Recursive tile discovery.
//!
//! Directories are visited depth-first with entries in file-name order, so
//! two loads of an unchanged tree produce the same records in the same
//! order. Within a directory, files are tried before subdirectories.
//!
//! A directory whose own name carries coordinates is one tile and its
//! files are the frames. Its subdirectories are still visited, so tiles
//! nested inside a tile directory are found too. If the directory cannot
//! be sized as a tile, its files are tried one by one instead. Symbolic
//! links to directories are not followed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::format::MetadataReader;

use super::name::parse_coordinates;
use super::record::TileRecord;

/// A candidate path that was not added to the catalog, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCandidate {
    pub path: PathBuf,
    pub reason: String,
}

/// Records and rejects gathered during one traversal, in visit order.
#[derive(Debug, Default)]
pub(crate) struct Discovery {
    pub records: Vec<TileRecord>,
    pub skipped: Vec<SkippedCandidate>,
}

impl Discovery {
    fn skip(&mut self, path: &Path, reason: String) {
        warn!("{}", reason);
        self.skipped.push(SkippedCandidate {
            path: path.to_path_buf(),
            reason,
        });
    }
}

/// Walk `root` and collect every tile `reader` can size.
pub(crate) fn discover<M: MetadataReader>(root: &Path, reader: &M) -> Discovery {
    let mut found = Discovery::default();
    visit(root, reader, &mut found);
    found
}

fn visit<M: MetadataReader>(dir: &Path, reader: &M, found: &mut Discovery) {
    let is_tile = dir.file_name().is_some()
        && parse_coordinates(dir).is_ok()
        && try_candidate(dir, reader, found);

    let Some((files, subdirs)) = list_dir(dir, found) else {
        return;
    };

    // Files of a cataloged tile directory are its frames
    if !is_tile {
        for file in &files {
            try_candidate(file, reader, found);
        }
    }
    for subdir in &subdirs {
        visit(subdir, reader, found);
    }
}

/// Split the entries of `dir` into sorted files and subdirectories.
fn list_dir(dir: &Path, found: &mut Discovery) -> Option<(Vec<PathBuf>, Vec<PathBuf>)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            found.skip(dir, format!("Cannot read directory {}: {}", dir.display(), e));
            return None;
        }
    };

    let mut files = Vec::new();
    let mut subdirs = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                found.skip(dir, format!("Cannot list {}: {}", dir.display(), e));
                continue;
            }
        };
        let path = entry.path();
        match entry.file_type() {
            Ok(ft) if ft.is_dir() => subdirs.push(path),
            Ok(ft) if ft.is_file() => files.push(path),
            // Symlinks count as files only when they resolve to one
            Ok(_) if path.is_file() => files.push(path),
            Ok(_) => debug!(path = %path.display(), "Skipping special file"),
            Err(e) => found.skip(&path, format!("Cannot stat {}: {}", path.display(), e)),
        }
    }
    files.sort();
    subdirs.sort();

    Some((files, subdirs))
}

/// Parse and size one candidate. Returns whether it was cataloged.
fn try_candidate<M: MetadataReader>(path: &Path, reader: &M, found: &mut Discovery) -> bool {
    let coordinates = match parse_coordinates(path) {
        Ok(c) => c,
        Err(e) => {
            found.skip(path, e.to_string());
            return false;
        }
    };

    match reader.read_metadata(path) {
        Ok(metadata) => {
            debug!(
                path = %path.display(),
                x = coordinates.0,
                y = coordinates.1,
                z = coordinates.2,
                nfrms = metadata.nfrms,
                ysize = metadata.ysize,
                xsize = metadata.xsize,
                "Found tile"
            );
            found.records.push(TileRecord::new(coordinates, metadata, path));
            true
        }
        Err(e) => {
            found.skip(path, e.to_string());
            false
        }
    }
}
