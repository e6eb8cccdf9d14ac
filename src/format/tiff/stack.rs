//! Multi-page TIFF stacks.
//!
//! A tile volume is stored as one TIFF page per Z frame. Sizing a tile only
//! needs the geometry of the first page and the number of full-resolution
//! pages, so pixel data is never touched: the walker follows the IFD chain
//! reading nothing but directories.
//!
//! Two writer conventions are recognised on top of plain page counting:
//!
//! - pages flagged as reduced-resolution (`NewSubfileType` bit 0) are
//!   previews of another page and are not frames;
//! - ImageJ writes stacks larger than 4 GB as a single IFD followed by
//!   contiguous frames, recording the real count as `images=N` in the
//!   first page's ImageDescription.

use std::collections::HashSet;

use crate::error::TiffError;
use crate::io::RangeReader;

use super::parser::{Ifd, TiffHeader, BIGTIFF_HEADER_SIZE};
use super::tags::TiffTag;
use super::values::ValueReader;

/// Maximum number of IFDs to follow (safety limit against corrupt chains)
pub const MAX_IFDS: usize = 100_000;

/// Prefix ImageJ writes at the start of its ImageDescription
const IMAGEJ_MARKER: &str = "ImageJ=";

/// Geometry of a multi-page TIFF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiffStack {
    /// Parsed file header
    pub header: TiffHeader,

    /// Width of the first page in pixels
    pub width: u32,

    /// Height of the first page in pixels
    pub height: u32,

    /// Number of IFDs in the chain, previews included
    pub ifd_count: usize,

    /// Number of full-resolution pages
    pub page_count: usize,

    /// ImageDescription of the first page, if any
    pub description: Option<String>,
}

impl TiffStack {
    /// Walk the IFD chain of `reader` and collect the stack geometry.
    pub fn parse<R: RangeReader>(reader: &R) -> Result<Self, TiffError> {
        let header_len = reader.size().min(BIGTIFF_HEADER_SIZE as u64) as usize;
        let header_bytes = reader.read_exact_at(0, header_len)?;
        let header = TiffHeader::parse(&header_bytes, reader.size())?;

        let first = read_ifd(reader, &header, header.first_ifd_offset)?;
        let values = ValueReader::new(reader, &header);

        let width = read_dimension(&values, &first, TiffTag::ImageWidth)?;
        let height = read_dimension(&values, &first, TiffTag::ImageLength)?;

        // The description is optional; an unreadable one is ignored
        let description = match first.get_entry_by_tag(TiffTag::ImageDescription) {
            Some(entry) => match values.read_string(TiffTag::ImageDescription, entry) {
                Ok(s) => Some(s),
                Err(e) => {
                    tracing::debug!(
                        file = reader.identifier(),
                        error = %e,
                        "Ignoring unreadable ImageDescription"
                    );
                    None
                }
            },
            None => None,
        };

        let byte_order = header.byte_order;
        let mut ifd_count = 1;
        let mut page_count = usize::from(!first.is_reduced_resolution(byte_order));

        let mut visited = HashSet::from([header.first_ifd_offset]);
        let mut offset = first.next_ifd_offset;

        while offset != 0 {
            if !visited.insert(offset) {
                return Err(TiffError::IfdLoop(offset));
            }
            if ifd_count >= MAX_IFDS {
                return Err(TiffError::TooManyIfds(MAX_IFDS));
            }

            let ifd = read_ifd(reader, &header, offset)?;
            ifd_count += 1;
            if !ifd.is_reduced_resolution(byte_order) {
                page_count += 1;
            }
            offset = ifd.next_ifd_offset;
        }

        tracing::trace!(
            file = reader.identifier(),
            width,
            height,
            ifd_count,
            page_count,
            "Parsed TIFF stack"
        );

        Ok(TiffStack {
            header,
            width,
            height,
            ifd_count,
            page_count,
            description,
        })
    }

    /// Number of Z frames in the stack.
    ///
    /// This is the number of full-resolution pages, unless the file is a
    /// single-IFD ImageJ stack that declares more images in its description.
    pub fn frame_count(&self) -> usize {
        if self.page_count == 1 {
            if let Some(images) = self.description.as_deref().and_then(imagej_image_count) {
                return images;
            }
        }
        self.page_count
    }
}

/// Read the IFD starting at `offset`.
fn read_ifd<R: RangeReader>(
    reader: &R,
    header: &TiffHeader,
    offset: u64,
) -> Result<Ifd, TiffError> {
    if offset >= reader.size() {
        return Err(TiffError::InvalidIfdOffset(offset));
    }

    let count_bytes = reader.read_exact_at(offset, header.ifd_count_size())?;
    let entry_count = header.read_entry_count(&count_bytes)?;

    let ifd_size =
        Ifd::calculate_size(entry_count, header).ok_or(TiffError::InvalidIfdOffset(offset))?;
    let ifd_bytes = reader.read_exact_at(offset, ifd_size)?;
    Ifd::parse(&ifd_bytes, header)
}

fn read_dimension<R: RangeReader>(
    values: &ValueReader<'_, R>,
    ifd: &Ifd,
    tag: TiffTag,
) -> Result<u32, TiffError> {
    let entry = ifd.get_entry_by_tag(tag).ok_or(TiffError::MissingTag(tag.name()))?;
    let value = values.read_u64(tag, entry)?;
    u32::try_from(value).map_err(|_| TiffError::InvalidTagValue {
        tag: tag.name(),
        message: format!("{} does not fit in 32 bits", value),
    })
}

/// Extract `images=N` from an ImageJ description.
fn imagej_image_count(description: &str) -> Option<usize> {
    if !description.starts_with(IMAGEJ_MARKER) {
        return None;
    }
    description
        .lines()
        .find_map(|line| line.trim().strip_prefix("images="))
        .and_then(|n| n.trim().parse().ok())
}
