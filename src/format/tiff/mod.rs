//! TIFF parser for tile stacks.
//!
//! Handles classic TIFF and BigTIFF in either byte order. Only directory
//! structure is parsed: enough to learn how many Z frames a stack holds and
//! the size of each frame.
//!
//! # Key Concepts
//!
//! - **Byte order**: TIFF files declare their endianness (II = little-endian,
//!   MM = big-endian) in the header.
//! - **IFD (Image File Directory)**: one per page. A Z stack stores one page
//!   per frame, chained through each IFD's next offset.
//! - **Inline vs offset values**: small values live in the IFD entry itself,
//!   larger ones at an offset the entry points to.

mod parser;
mod stack;
mod tags;
mod values;

pub use parser::{ByteOrder, Ifd, IfdEntry, TiffHeader, BIGTIFF_HEADER_SIZE, TIFF_HEADER_SIZE};
pub use stack::{TiffStack, MAX_IFDS};
pub use tags::{FieldType, TiffTag};
pub use values::ValueReader;
