//! Random-access, in-memory view over a savegame file
//!
//! The id Tech 1 saves are decoded through this view instead of the file
//! directly. The whole file is loaded up front so that `seek`, `tell` and
//! `eof` are plain offset arithmetic.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Error, Result};

/// Seekable stream over the bytes of a file
#[derive(Debug)]
pub struct SaveStream {
    inner: Cursor<Vec<u8>>,
}

impl SaveStream {
    /// Load `path`
    ///
    /// The file handle is released before this returns.
    ///
    /// # Errors
    /// Returns [`Error::FileOpen`] if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| Error::open(path, e))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(Self::from_bytes(data))
    }

    #[must_use]
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            inner: Cursor::new(data),
        }
    }

    /// Current offset
    pub fn tell(&self) -> u64 {
        self.inner.position()
    }

    /// True once every byte has been consumed
    pub fn eof(&self) -> bool {
        self.inner.position() >= self.inner.get_ref().len() as u64
    }

    /// The complete contents, independent of the read offset
    pub fn contents(&self) -> &[u8] {
        self.inner.get_ref()
    }
}

impl Read for SaveStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for SaveStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
