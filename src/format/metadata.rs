//! Tile dimension extraction.
//!
//! The catalog only needs three numbers per tile: how many Z frames it has
//! and the pixel size of a frame. A tile is either
//!
//! - a single file: a multi-page TIFF stack (one page per frame), or any
//!   other image the `image` crate can size, counted as one frame; or
//! - a directory of 2-D frames, one file per Z plane, sorted by name.
//!
//! [`InputFile`] is the scoped handle over one tile. Opening it acquires the
//! file; dropping it releases the file, whichever way the read ended.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{IoError, MetadataError};
use crate::io::{FileRangeReader, RangeReader};

use super::tiff::{ByteOrder, TiffStack, TIFF_HEADER_SIZE};

/// File extensions accepted as frames inside a tile directory.
pub const FRAME_EXTENSIONS: &[&str] = &["tif", "tiff", "png", "jpg", "jpeg"];

// =============================================================================
// TileMetadata
// =============================================================================

/// Dimensions of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileMetadata {
    /// Number of Z frames
    pub nfrms: u32,

    /// Frame height in pixels
    pub ysize: u32,

    /// Frame width in pixels
    pub xsize: u32,
}

// =============================================================================
// MetadataReader Trait
// =============================================================================

/// Source of tile dimensions.
///
/// The catalog asks the reader once per candidate path. Implementations must
/// release any resource they acquire before returning, on success or error.
pub trait MetadataReader {
    fn read_metadata(&self, path: &Path) -> Result<TileMetadata, MetadataError>;
}

/// Default reader: TIFF stacks, single images and frame directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackMetadataReader;

impl MetadataReader for StackMetadataReader {
    fn read_metadata(&self, path: &Path) -> Result<TileMetadata, MetadataError> {
        let input = InputFile::open(path)?;
        input.metadata()
    }
}

// =============================================================================
// InputFile
// =============================================================================

/// An opened tile.
#[derive(Debug)]
pub enum InputFile {
    /// A TIFF file, held open while it is inspected
    Stack {
        reader: FileRangeReader,
        stack: TiffStack,
    },

    /// A non-TIFF image file, one frame
    Image { path: PathBuf, width: u32, height: u32 },

    /// A directory of frame files, sorted by name
    Frames { dir: PathBuf, frames: Vec<PathBuf> },
}

impl InputFile {
    /// Open the tile at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        if path.is_dir() {
            let frames = list_frames(path)?;
            if frames.is_empty() {
                return Err(MetadataError::EmptyFrameDirectory(path.to_path_buf()));
            }
            return Ok(InputFile::Frames {
                dir: path.to_path_buf(),
                frames,
            });
        }

        let reader = FileRangeReader::open(path)?;
        let head_len = reader.size().min(TIFF_HEADER_SIZE as u64) as usize;
        let head = reader.read_exact_at(0, head_len)?;

        if is_tiff_header(&head) {
            let stack = TiffStack::parse(&reader).map_err(|source| MetadataError::Tiff {
                path: path.to_path_buf(),
                source,
            })?;
            return Ok(InputFile::Stack { reader, stack });
        }

        // Not a TIFF: let the image crate try to size it as a single frame
        drop(reader);
        let (width, height) = image_dimensions(path)?;
        Ok(InputFile::Image {
            path: path.to_path_buf(),
            width,
            height,
        })
    }

    /// Path of the tile.
    pub fn path(&self) -> &Path {
        match self {
            InputFile::Stack { reader, .. } => reader.path(),
            InputFile::Image { path, .. } => path,
            InputFile::Frames { dir, .. } => dir,
        }
    }

    /// Read the tile's frame count and frame size.
    pub fn metadata(&self) -> Result<TileMetadata, MetadataError> {
        match self {
            InputFile::Stack { stack, .. } => Ok(TileMetadata {
                nfrms: frame_count(self.path(), stack.frame_count())?,
                ysize: stack.height,
                xsize: stack.width,
            }),
            InputFile::Image { width, height, .. } => Ok(TileMetadata {
                nfrms: 1,
                ysize: *height,
                xsize: *width,
            }),
            InputFile::Frames { dir, frames } => {
                let first = frames
                    .first()
                    .ok_or_else(|| MetadataError::EmptyFrameDirectory(dir.clone()))?;
                let (xsize, ysize) = frame_dimensions(first)?;
                Ok(TileMetadata {
                    nfrms: frame_count(dir, frames.len())?,
                    ysize,
                    xsize,
                })
            }
        }
    }
}

/// Check if bytes start with a TIFF or BigTIFF header.
pub fn is_tiff_header(bytes: &[u8]) -> bool {
    if bytes.len() < TIFF_HEADER_SIZE {
        return false;
    }

    let byte_order = match &bytes[0..2] {
        b"II" => ByteOrder::LittleEndian,
        b"MM" => ByteOrder::BigEndian,
        _ => return false,
    };

    matches!(byte_order.read_u16(&bytes[2..4]), 42 | 43)
}

fn frame_count(path: &Path, count: usize) -> Result<u32, MetadataError> {
    u32::try_from(count).map_err(|_| MetadataError::Unsupported {
        path: path.to_path_buf(),
        reason: format!("{} frames is more than supported", count),
    })
}

/// List the frame files of a tile directory in name order.
fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, MetadataError> {
    let entries = fs::read_dir(dir).map_err(|e| IoError::Open {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    collect_frames(dir, entries.map(|entry| entry.map(|e| e.path())))
}

/// Keep the frame files among `entries`. An unreadable entry fails the
/// whole directory.
fn collect_frames<I>(dir: &Path, entries: I) -> Result<Vec<PathBuf>, MetadataError>
where
    I: IntoIterator<Item = std::io::Result<PathBuf>>,
{
    let mut frames = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| IoError::Read {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if path.is_file() && has_frame_extension(&path) {
            frames.push(path);
        }
    }
    frames.sort();

    Ok(frames)
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            FRAME_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Size of a single frame file as (width, height).
fn frame_dimensions(path: &Path) -> Result<(u32, u32), MetadataError> {
    let reader = FileRangeReader::open(path)?;
    let head_len = reader.size().min(TIFF_HEADER_SIZE as u64) as usize;
    let head = reader.read_exact_at(0, head_len)?;

    if is_tiff_header(&head) {
        let stack = TiffStack::parse(&reader).map_err(|source| MetadataError::Tiff {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok((stack.width, stack.height));
    }

    drop(reader);
    image_dimensions(path)
}

fn image_dimensions(path: &Path) -> Result<(u32, u32), MetadataError> {
    image::image_dimensions(path).map_err(|e| match e {
        image::ImageError::Unsupported(_) => MetadataError::Unsupported {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
        _ => MetadataError::Image {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })
}
