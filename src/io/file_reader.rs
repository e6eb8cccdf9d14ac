use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::Bytes;

use super::RangeReader;
use crate::error::IoError;

/// Local-file implementation of RangeReader.
///
/// The file handle is held for the lifetime of the reader and closed when
/// the reader is dropped. The file size is read once on creation.
#[derive(Debug)]
pub struct FileRangeReader {
    file: File,
    path: PathBuf,
    size: u64,
    identifier: String,
}

impl FileRangeReader {
    /// Open `path` for range reads.
    ///
    /// Returns an error if the file does not exist, is a directory, or
    /// cannot be inspected.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref().to_path_buf();
        let open_error = |e: std::io::Error| IoError::Open {
            path: path.clone(),
            message: e.to_string(),
        };

        let file = File::open(&path).map_err(open_error)?;
        let meta = file.metadata().map_err(open_error)?;
        if !meta.is_file() {
            return Err(IoError::Open {
                path,
                message: "not a regular file".to_string(),
            });
        }

        let identifier = path.display().to_string();
        Ok(Self {
            file,
            path,
            size: meta.len(),
            identifier,
        })
    }

    /// Get the path this reader was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RangeReader for FileRangeReader {
    fn read_exact_at(&self, offset: u64, len: usize) -> Result<Bytes, IoError> {
        self.check_range(offset, len)?;

        if len == 0 {
            return Ok(Bytes::new());
        }

        let read_error = |e: std::io::Error| IoError::Read {
            path: self.path.clone(),
            message: e.to_string(),
        };

        // `&File` implements Read + Seek
        let mut handle = &self.file;
        handle.seek(SeekFrom::Start(offset)).map_err(read_error)?;

        let mut buf = vec![0u8; len];
        handle.read_exact(&mut buf).map_err(read_error)?;

        Ok(Bytes::from(buf))
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
