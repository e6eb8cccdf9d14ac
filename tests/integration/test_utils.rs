//! Test utilities for integration tests.
//!
//! Provides builders for multi-page TIFF stacks, frame images and tile
//! directory trees, plus a metadata reader with fixed answers.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::GrayImage;
use tile_matrix::error::MetadataError;
use tile_matrix::format::{MetadataReader, TileMetadata};

// =============================================================================
// TIFF Stack Builder
// =============================================================================

#[derive(Clone, Copy, Debug)]
pub enum ByteOrderType {
    LittleEndian,
    BigEndian,
}

/// One page (IFD) of a test stack.
#[derive(Clone, Debug)]
pub struct PageSpec {
    pub width: u32,
    pub height: u32,
    pub reduced_resolution: bool,
    pub description: Option<String>,
}

impl PageSpec {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            reduced_resolution: false,
            description: None,
        }
    }

    pub fn reduced(mut self) -> Self {
        self.reduced_resolution = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Builder for multi-page TIFF files holding directories only, no pixels.
pub struct StackBuilder {
    byte_order: ByteOrderType,
    is_bigtiff: bool,
    pages: Vec<PageSpec>,
}

struct Entry {
    tag: u16,
    field_type: u16,
    count: u64,
    /// Value bytes already encoded in the file's byte order
    value: Vec<u8>,
}

impl StackBuilder {
    pub fn new() -> Self {
        Self {
            byte_order: ByteOrderType::LittleEndian,
            is_bigtiff: false,
            pages: Vec::new(),
        }
    }

    /// A stack of `frames` identical pages.
    pub fn uniform(frames: usize, width: u32, height: u32) -> Self {
        let mut builder = Self::new();
        for _ in 0..frames {
            builder = builder.add_page(PageSpec::new(width, height));
        }
        builder
    }

    pub fn with_byte_order(mut self, order: ByteOrderType) -> Self {
        self.byte_order = order;
        self
    }

    pub fn with_bigtiff(mut self, is_bigtiff: bool) -> Self {
        self.is_bigtiff = is_bigtiff;
        self
    }

    pub fn add_page(mut self, page: PageSpec) -> Self {
        self.pages.push(page);
        self
    }

    /// Build the TIFF file data.
    ///
    /// Each IFD is immediately followed by its out-of-line values.
    pub fn build(self) -> Vec<u8> {
        let header_size: usize = if self.is_bigtiff { 16 } else { 8 };
        let count_size: usize = if self.is_bigtiff { 8 } else { 2 };
        let entry_size: usize = if self.is_bigtiff { 20 } else { 12 };
        let offset_size: usize = if self.is_bigtiff { 8 } else { 4 };

        let pages: Vec<Vec<Entry>> = self.pages.iter().map(|p| self.entries(p)).collect();

        // Lay out every IFD before writing so next-IFD offsets are known
        let mut ifd_offsets = Vec::with_capacity(pages.len());
        let mut offset = header_size;
        for entries in &pages {
            ifd_offsets.push(offset);
            let external: usize = entries
                .iter()
                .filter(|e| e.value.len() > offset_size)
                .map(|e| pad_even(e.value.len()))
                .sum();
            offset += count_size + entries.len() * entry_size + offset_size + external;
        }

        let mut data = Vec::new();
        match self.byte_order {
            ByteOrderType::LittleEndian => data.extend_from_slice(b"II"),
            ByteOrderType::BigEndian => data.extend_from_slice(b"MM"),
        }
        if self.is_bigtiff {
            self.write(&mut data, 43, 2);
            self.write(&mut data, 8, 2);
            self.write(&mut data, 0, 2);
        } else {
            self.write(&mut data, 42, 2);
        }
        let first = ifd_offsets.first().copied().unwrap_or(0) as u64;
        self.write(&mut data, first, offset_size);

        for (i, entries) in pages.iter().enumerate() {
            assert_eq!(data.len(), ifd_offsets[i]);

            self.write(&mut data, entries.len() as u64, count_size);
            let mut external_at =
                ifd_offsets[i] + count_size + entries.len() * entry_size + offset_size;
            let mut external = Vec::new();

            for entry in entries {
                self.write(&mut data, entry.tag as u64, 2);
                self.write(&mut data, entry.field_type as u64, 2);
                self.write(&mut data, entry.count, if self.is_bigtiff { 8 } else { 4 });

                if entry.value.len() <= offset_size {
                    // Inline values are left-justified
                    let mut field = entry.value.clone();
                    field.resize(offset_size, 0);
                    data.extend_from_slice(&field);
                } else {
                    self.write(&mut data, external_at as u64, offset_size);
                    external.extend_from_slice(&entry.value);
                    if entry.value.len() % 2 == 1 {
                        external.push(0);
                    }
                    external_at += pad_even(entry.value.len());
                }
            }

            let next = ifd_offsets.get(i + 1).copied().unwrap_or(0) as u64;
            self.write(&mut data, next, offset_size);
            data.extend_from_slice(&external);
        }

        data
    }

    fn entries(&self, page: &PageSpec) -> Vec<Entry> {
        let mut entries = Vec::new();
        if page.reduced_resolution {
            entries.push(Entry {
                tag: 254,
                field_type: 4,
                count: 1,
                value: self.encode(1, 4),
            });
        }
        entries.push(Entry {
            tag: 256,
            field_type: 4,
            count: 1,
            value: self.encode(page.width as u64, 4),
        });
        entries.push(Entry {
            tag: 257,
            field_type: 4,
            count: 1,
            value: self.encode(page.height as u64, 4),
        });
        entries.push(Entry {
            tag: 258,
            field_type: 3,
            count: 1,
            value: self.encode(8, 2),
        });
        if let Some(description) = &page.description {
            let mut value = description.as_bytes().to_vec();
            value.push(0);
            entries.push(Entry {
                tag: 270,
                field_type: 2,
                count: value.len() as u64,
                value,
            });
        }
        entries.push(Entry {
            tag: 277,
            field_type: 3,
            count: 1,
            value: self.encode(1, 2),
        });
        entries
    }

    fn encode(&self, value: u64, size: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(size);
        self.write(&mut out, value, size);
        out
    }

    fn write(&self, data: &mut Vec<u8>, value: u64, size: usize) {
        match (self.byte_order, size) {
            (ByteOrderType::LittleEndian, 2) => data.extend(&(value as u16).to_le_bytes()),
            (ByteOrderType::LittleEndian, 4) => data.extend(&(value as u32).to_le_bytes()),
            (ByteOrderType::LittleEndian, 8) => data.extend(&value.to_le_bytes()),
            (ByteOrderType::BigEndian, 2) => data.extend(&(value as u16).to_be_bytes()),
            (ByteOrderType::BigEndian, 4) => data.extend(&(value as u32).to_be_bytes()),
            (ByteOrderType::BigEndian, 8) => data.extend(&value.to_be_bytes()),
            (_, size) => panic!("unsupported field size {}", size),
        }
    }
}

impl Default for StackBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn pad_even(len: usize) -> usize {
    len + len % 2
}

// =============================================================================
// Files on disk
// =============================================================================

/// Write a uniform little-endian stack to `dir/name`.
pub fn write_stack(dir: &Path, name: &str, frames: usize, width: u32, height: u32) -> PathBuf {
    write_bytes(dir, name, &StackBuilder::uniform(frames, width, height).build())
}

pub fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, bytes).unwrap();
    path
}

/// Write a blank grayscale image; the format follows the extension.
pub fn write_frame(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    GrayImage::new(width, height).save(path).unwrap();
}

/// Create empty files for each name, for use with [`FixedMetadataReader`].
pub fn touch_all(dir: &Path, names: &[&str]) {
    for name in names {
        write_bytes(dir, name, b"");
    }
}

// =============================================================================
// Metadata Reader
// =============================================================================

/// Metadata reader that answers from a table keyed by file name.
///
/// Names without an entry get `default`; names listed in `failing` error.
pub struct FixedMetadataReader {
    pub default: TileMetadata,
    pub by_name: HashMap<String, TileMetadata>,
    pub failing: Vec<String>,
}

impl FixedMetadataReader {
    pub fn new(nfrms: u32, ysize: u32, xsize: u32) -> Self {
        Self {
            default: TileMetadata {
                nfrms,
                ysize,
                xsize,
            },
            by_name: HashMap::new(),
            failing: Vec::new(),
        }
    }

    pub fn with(mut self, name: &str, nfrms: u32, ysize: u32, xsize: u32) -> Self {
        self.by_name.insert(
            name.to_string(),
            TileMetadata {
                nfrms,
                ysize,
                xsize,
            },
        );
        self
    }

    pub fn failing(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }
}

impl MetadataReader for FixedMetadataReader {
    fn read_metadata(&self, path: &Path) -> Result<TileMetadata, MetadataError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.failing.contains(&name) {
            return Err(MetadataError::Unsupported {
                path: path.to_path_buf(),
                reason: "refused by test reader".to_string(),
            });
        }
        Ok(self.by_name.get(&name).copied().unwrap_or(self.default))
    }
}
