//! TIFF header and IFD structure parsing.
//!
//! # TIFF Header Structure
//!
//! ## Classic TIFF (8 bytes)
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Version (42 = 0x002A)
//! Bytes 4-7: Offset to first IFD (4 bytes)
//! ```
//!
//! ## BigTIFF (16 bytes)
//! ```text
//! Bytes 0-1: Byte order
//! Bytes 2-3: Version (43 = 0x002B)
//! Bytes 4-5: Offset byte size (must be 8)
//! Bytes 6-7: Reserved
//! Bytes 8-15: Offset to first IFD (8 bytes)
//! ```
//!
//! # IFD Structure
//!
//! ```text
//! entry count          (2 bytes classic, 8 bytes BigTIFF)
//! entries              (12 bytes each classic, 20 bytes each BigTIFF)
//! next IFD offset      (4 bytes classic, 8 bytes BigTIFF; 0 ends the chain)
//! ```

use crate::error::TiffError;
use crate::io::{read_u16_be, read_u16_le, read_u32_be, read_u32_le, read_u64_be, read_u64_le};

use super::tags::{FieldType, TiffTag};

// =============================================================================
// Constants
// =============================================================================

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// Version number for classic TIFF
const VERSION_TIFF: u16 = 42;

/// Version number for BigTIFF
const VERSION_BIGTIFF: u16 = 43;

/// Size of classic TIFF header in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

/// Size of BigTIFF header in bytes
pub const BIGTIFF_HEADER_SIZE: usize = 16;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of a TIFF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    #[inline]
    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        match self {
            ByteOrder::LittleEndian => read_u16_le(bytes),
            ByteOrder::BigEndian => read_u16_be(bytes),
        }
    }

    #[inline]
    pub fn read_u32(self, bytes: &[u8]) -> u32 {
        match self {
            ByteOrder::LittleEndian => read_u32_le(bytes),
            ByteOrder::BigEndian => read_u32_be(bytes),
        }
    }

    #[inline]
    pub fn read_u64(self, bytes: &[u8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => read_u64_le(bytes),
            ByteOrder::BigEndian => read_u64_be(bytes),
        }
    }
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the file
    pub byte_order: ByteOrder,

    /// Whether this is a BigTIFF file (64-bit offsets)
    pub is_bigtiff: bool,

    /// Offset to the first IFD in the file
    pub first_ifd_offset: u64,
}

impl TiffHeader {
    /// Parse a TIFF header from raw bytes.
    ///
    /// `bytes` must hold at least 8 bytes, or 16 for BigTIFF. `file_size`
    /// is used to reject a first IFD offset that points past the end.
    ///
    /// # Errors
    /// - `FileTooSmall` if there aren't enough bytes for the header
    /// - `InvalidMagic` if byte order bytes are not II or MM
    /// - `InvalidVersion` if version is not 42 or 43
    /// - `InvalidBigTiffOffsetSize` if BigTIFF offset size is not 8
    /// - `InvalidIfdOffset` if the first IFD offset is outside the file
    pub fn parse(bytes: &[u8], file_size: u64) -> Result<Self, TiffError> {
        require_len(bytes, TIFF_HEADER_SIZE)?;

        // The order marker is a symmetric byte pair, so either order reads it
        let magic = u16::from_le_bytes([bytes[0], bytes[1]]);
        let byte_order = match magic {
            BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
            _ => return Err(TiffError::InvalidMagic(magic)),
        };

        let (is_bigtiff, first_ifd_offset) = match byte_order.read_u16(&bytes[2..4]) {
            VERSION_TIFF => (false, byte_order.read_u32(&bytes[4..8]) as u64),
            VERSION_BIGTIFF => {
                require_len(bytes, BIGTIFF_HEADER_SIZE)?;
                let offset_size = byte_order.read_u16(&bytes[4..6]);
                if offset_size != 8 {
                    return Err(TiffError::InvalidBigTiffOffsetSize(offset_size));
                }
                (true, byte_order.read_u64(&bytes[8..16]))
            }
            version => return Err(TiffError::InvalidVersion(version)),
        };

        if first_ifd_offset == 0 || first_ifd_offset >= file_size {
            return Err(TiffError::InvalidIfdOffset(first_ifd_offset));
        }

        Ok(TiffHeader {
            byte_order,
            is_bigtiff,
            first_ifd_offset,
        })
    }

    /// Size of an IFD entry in bytes (12 classic, 20 BigTIFF).
    #[inline]
    pub const fn ifd_entry_size(&self) -> usize {
        if self.is_bigtiff {
            20
        } else {
            12
        }
    }

    /// Size of the entry count field at the start of an IFD.
    #[inline]
    pub const fn ifd_count_size(&self) -> usize {
        if self.is_bigtiff {
            8
        } else {
            2
        }
    }

    /// Size of the next-IFD offset field, which is also the size of an
    /// entry's value/offset field.
    #[inline]
    pub const fn offset_size(&self) -> usize {
        if self.is_bigtiff {
            8
        } else {
            4
        }
    }

    /// Decode an entry count read from the start of an IFD.
    pub fn read_entry_count(&self, bytes: &[u8]) -> Result<u64, TiffError> {
        require_len(bytes, self.ifd_count_size())?;
        Ok(if self.is_bigtiff {
            self.byte_order.read_u64(bytes)
        } else {
            self.byte_order.read_u16(bytes) as u64
        })
    }

    /// Decode an offset-sized field.
    pub fn read_offset(&self, bytes: &[u8]) -> Result<u64, TiffError> {
        require_len(bytes, self.offset_size())?;
        Ok(if self.is_bigtiff {
            self.byte_order.read_u64(bytes)
        } else {
            self.byte_order.read_u32(bytes) as u64
        })
    }
}

fn require_len(bytes: &[u8], required: usize) -> Result<(), TiffError> {
    if bytes.len() < required {
        return Err(TiffError::FileTooSmall {
            required: required as u64,
            actual: bytes.len() as u64,
        });
    }
    Ok(())
}

// =============================================================================
// IfdEntry
// =============================================================================

/// A single tag entry of an IFD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfdEntry {
    /// Numeric tag ID
    pub tag: u16,

    /// Decoded field type, `None` when the type code is not one we read
    pub field_type: Option<FieldType>,

    /// Raw field type code as stored in the file
    pub field_type_raw: u16,

    /// Number of values
    pub count: u64,

    /// The raw value/offset field, zero-padded to 8 bytes
    pub value_offset_bytes: [u8; 8],

    /// Whether the value is stored in `value_offset_bytes` itself
    pub is_inline: bool,
}

impl IfdEntry {
    fn parse(bytes: &[u8], header: &TiffHeader) -> Self {
        let order = header.byte_order;
        let tag = order.read_u16(&bytes[0..2]);
        let field_type_raw = order.read_u16(&bytes[2..4]);
        let field_type = FieldType::from_u16(field_type_raw);

        let (count, value_start) = if header.is_bigtiff {
            (order.read_u64(&bytes[4..12]), 12)
        } else {
            (order.read_u32(&bytes[4..8]) as u64, 8)
        };

        let mut value_offset_bytes = [0u8; 8];
        let value_len = header.offset_size();
        value_offset_bytes[..value_len].copy_from_slice(&bytes[value_start..value_start + value_len]);

        let is_inline = field_type.is_some_and(|ft| ft.fits_inline(count, header.is_bigtiff));

        IfdEntry {
            tag,
            field_type,
            field_type_raw,
            count,
            value_offset_bytes,
            is_inline,
        }
    }

    /// Total size of the entry's value in bytes.
    ///
    /// Returns `None` for unknown field types or sizes that overflow.
    pub fn value_byte_size(&self) -> Option<u64> {
        let ft = self.field_type?;
        (ft.size_in_bytes() as u64).checked_mul(self.count)
    }

    /// Interpret the value field as an offset into the file.
    pub fn value_offset(&self, header: &TiffHeader) -> u64 {
        if header.is_bigtiff {
            header.byte_order.read_u64(&self.value_offset_bytes)
        } else {
            header.byte_order.read_u32(&self.value_offset_bytes[..4]) as u64
        }
    }

    /// Read a single inline integer value.
    ///
    /// Returns `None` if the value is not inline, is not a single value, or
    /// is not of an integer type.
    pub fn inline_u64(&self, byte_order: ByteOrder) -> Option<u64> {
        if !self.is_inline || self.count != 1 {
            return None;
        }
        let bytes = &self.value_offset_bytes;
        match self.field_type? {
            FieldType::Byte => Some(bytes[0] as u64),
            FieldType::Short => Some(byte_order.read_u16(bytes) as u64),
            FieldType::Long => Some(byte_order.read_u32(bytes) as u64),
            FieldType::Long8 => Some(byte_order.read_u64(bytes)),
            _ => None,
        }
    }
}

// =============================================================================
// Ifd
// =============================================================================

/// A parsed Image File Directory: one page of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ifd {
    /// Entries in file order
    pub entries: Vec<IfdEntry>,

    /// Offset of the next IFD, 0 for the last one
    pub next_ifd_offset: u64,
}

impl Ifd {
    /// Total byte size of an IFD holding `entry_count` entries.
    pub fn calculate_size(entry_count: u64, header: &TiffHeader) -> Option<usize> {
        let entries = usize::try_from(entry_count)
            .ok()?
            .checked_mul(header.ifd_entry_size())?;
        entries
            .checked_add(header.ifd_count_size())?
            .checked_add(header.offset_size())
    }

    /// Parse a complete IFD (count, entries and next offset) from `bytes`.
    pub fn parse(bytes: &[u8], header: &TiffHeader) -> Result<Self, TiffError> {
        let entry_count = header.read_entry_count(bytes)?;
        let size = Ifd::calculate_size(entry_count, header).ok_or(TiffError::InvalidTagValue {
            tag: "IFD",
            message: format!("entry count {} is too large", entry_count),
        })?;
        require_len(bytes, size)?;

        let entry_size = header.ifd_entry_size();
        let first = header.ifd_count_size();
        let entries_end = first + entry_count as usize * entry_size;

        let entries = bytes[first..entries_end]
            .chunks_exact(entry_size)
            .map(|chunk| IfdEntry::parse(chunk, header))
            .collect();

        let next_ifd_offset = header.read_offset(&bytes[entries_end..])?;

        Ok(Ifd {
            entries,
            next_ifd_offset,
        })
    }

    /// Find the entry for `tag`, if present.
    pub fn get_entry_by_tag(&self, tag: TiffTag) -> Option<&IfdEntry> {
        self.entries.iter().find(|e| e.tag == tag.as_u16())
    }

    /// Whether this page is a reduced-resolution copy of another page.
    pub fn is_reduced_resolution(&self, byte_order: ByteOrder) -> bool {
        self.get_entry_by_tag(TiffTag::NewSubfileType)
            .and_then(|e| e.inline_u64(byte_order))
            .is_some_and(|v| v & 1 == 1)
    }
}

// =============================================================================
// Tests
// =============================================================================
