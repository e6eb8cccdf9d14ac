use std::path::PathBuf;

use thiserror::Error;

/// I/O errors that can occur when reading tile files from disk
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// The file could not be opened or inspected
    #[error("Cannot open {path}: {message}")]
    Open { path: PathBuf, message: String },

    /// A read failed part way through
    #[error("Read error in {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Requested range exceeds resource bounds
    #[error("Range out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    RangeOutOfBounds {
        offset: u64,
        requested: u64,
        size: u64,
    },
}

/// Errors that can occur when parsing TIFF files
#[derive(Debug, Clone, Error)]
pub enum TiffError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Invalid TIFF magic bytes (not II or MM)
    #[error("Invalid TIFF magic bytes: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidMagic(u16),

    /// Invalid TIFF version number
    #[error("Invalid TIFF version: expected 42 (TIFF) or 43 (BigTIFF), got {0}")]
    InvalidVersion(u16),

    /// Invalid BigTIFF offset byte size (must be 8)
    #[error("Invalid BigTIFF offset byte size: expected 8, got {0}")]
    InvalidBigTiffOffsetSize(u16),

    /// File is too small to contain a valid TIFF header
    #[error("File too small: need at least {required} bytes, got {actual}")]
    FileTooSmall { required: u64, actual: u64 },

    /// Invalid IFD offset (points outside file or to invalid location)
    #[error("Invalid IFD offset: {0}")]
    InvalidIfdOffset(u64),

    /// The IFD chain points back to an IFD that was already visited
    #[error("IFD chain loops back to offset {0}")]
    IfdLoop(u64),

    /// The IFD chain is longer than the safety limit
    #[error("Too many IFDs: more than {0}")]
    TooManyIfds(usize),

    /// Required tag is missing from IFD
    #[error("Missing required tag: {0}")]
    MissingTag(&'static str),

    /// Tag has unexpected type or count
    #[error("Invalid tag value for {tag}: {message}")]
    InvalidTagValue { tag: &'static str, message: String },

    /// Unknown field type in IFD entry
    #[error("Unknown field type: {0}")]
    UnknownFieldType(u16),
}

/// Errors raised while reading the dimensions of a tile
#[derive(Debug, Clone, Error)]
pub enum MetadataError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// TIFF parsing error
    #[error("TIFF error in {path}: {source}")]
    Tiff {
        path: PathBuf,
        #[source]
        source: TiffError,
    },

    /// Error reported by the `image` crate for non-TIFF frames
    #[error("Image error in {path}: {message}")]
    Image { path: PathBuf, message: String },

    /// A tile directory with no image frames in it
    #[error("No image frames in {0}")]
    EmptyFrameDirectory(PathBuf),

    /// File is not a format the reader understands
    #[error("Unsupported tile {path}: {reason}")]
    Unsupported { path: PathBuf, reason: String },
}

/// A file or directory name that carries no stage coordinates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid name {name}")]
pub struct ParseError {
    /// The offending base name
    pub name: String,
}

impl ParseError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Errors that abort catalog construction or a consumer of the catalog
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The catalog root is missing or not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The catalog holds no tiles but the caller needs at least one
    #[error("No tiles found in {0}")]
    Empty(PathBuf),
}
