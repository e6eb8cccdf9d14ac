//! TIFF tag value reading.
//!
//! Values are stored either inline in the IFD entry (small values) or at an
//! offset in the file. `ValueReader` hides the difference.

use bytes::Bytes;

use crate::error::TiffError;
use crate::io::RangeReader;

use super::parser::{IfdEntry, TiffHeader};
use super::tags::{FieldType, TiffTag};

/// Longest string value we are willing to fetch. Stack descriptions written
/// by ImageJ or OME are a few kilobytes at most.
const MAX_STRING_BYTES: u64 = 1 << 20;

/// Reads tag values from a TIFF file.
pub struct ValueReader<'a, R: RangeReader> {
    reader: &'a R,
    header: &'a TiffHeader,
}

impl<'a, R: RangeReader> ValueReader<'a, R> {
    pub fn new(reader: &'a R, header: &'a TiffHeader) -> Self {
        Self { reader, header }
    }

    /// Read raw bytes for an IFD entry's value, inline or at an offset.
    pub fn read_bytes(&self, entry: &IfdEntry) -> Result<Bytes, TiffError> {
        let size = entry
            .value_byte_size()
            .ok_or(TiffError::UnknownFieldType(entry.field_type_raw))?;

        if entry.is_inline {
            return Ok(Bytes::copy_from_slice(
                &entry.value_offset_bytes[..size as usize],
            ));
        }

        let len = usize::try_from(size).map_err(|_| TiffError::InvalidTagValue {
            tag: "unknown",
            message: format!("value of {} bytes is too large", size),
        })?;
        let offset = entry.value_offset(self.header);
        Ok(self.reader.read_exact_at(offset, len)?)
    }

    /// Read a single unsigned integer value for `tag`.
    ///
    /// Handles Byte, Short, Long and Long8 field types.
    pub fn read_u64(&self, tag: TiffTag, entry: &IfdEntry) -> Result<u64, TiffError> {
        if let Some(value) = entry.inline_u64(self.header.byte_order) {
            return Ok(value);
        }

        let field_type = entry
            .field_type
            .ok_or(TiffError::UnknownFieldType(entry.field_type_raw))?;

        if !field_type.is_integer() {
            return Err(TiffError::InvalidTagValue {
                tag: tag.name(),
                message: format!("expected an integer type, got {:?}", field_type),
            });
        }
        if entry.count != 1 {
            return Err(TiffError::InvalidTagValue {
                tag: tag.name(),
                message: format!("expected count 1, got {}", entry.count),
            });
        }

        // Long8 stored out of line in a classic file
        let bytes = self.read_bytes(entry)?;
        let order = self.header.byte_order;
        Ok(match field_type {
            FieldType::Byte => bytes[0] as u64,
            FieldType::Short => order.read_u16(&bytes) as u64,
            FieldType::Long => order.read_u32(&bytes) as u64,
            _ => order.read_u64(&bytes),
        })
    }

    /// Read an ASCII value, stopping at the first NUL.
    pub fn read_string(&self, tag: TiffTag, entry: &IfdEntry) -> Result<String, TiffError> {
        let field_type = entry
            .field_type
            .ok_or(TiffError::UnknownFieldType(entry.field_type_raw))?;

        if field_type != FieldType::Ascii {
            return Err(TiffError::InvalidTagValue {
                tag: tag.name(),
                message: format!("expected Ascii type for string, got {:?}", field_type),
            });
        }
        if entry.count > MAX_STRING_BYTES {
            return Err(TiffError::InvalidTagValue {
                tag: tag.name(),
                message: format!("string of {} bytes is too long", entry.count),
            });
        }

        let bytes = self.read_bytes(entry)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }
}
