//! Sequential, seekable little-endian reader over a savegame file
//!
//! Both translators decode through [`ByteCursor`]. The native translator reads
//! the file directly ([`FileCursor`]); the id Tech 1 translator reads through
//! the in-memory view of [`SaveStream`] ([`StreamCursor`]).

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::SaveStream;
use crate::error::{Error, Result};

/// Cursor reading directly from a file on disk.
pub type FileCursor = ByteCursor<BufReader<File>>;

/// Cursor reading through the in-memory stream.
pub type StreamCursor = ByteCursor<SaveStream>;

/// Little-endian primitive decoder over any `Read + Seek` source
pub struct ByteCursor<R: Read + Seek> {
    reader: R,
    len: u64,
}

impl FileCursor {
    /// Open `path` for direct reading
    ///
    /// # Errors
    /// Returns [`Error::FileOpen`] if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::open(path, e))?;
        Self::new(BufReader::new(file))
    }
}

impl StreamCursor {
    /// Load `path` into memory and read it through [`SaveStream`]
    ///
    /// # Errors
    /// Returns [`Error::FileOpen`] if the file cannot be opened.
    pub fn open_stream<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(SaveStream::open(path)?)
    }

    /// The complete file contents
    pub fn contents(&self) -> &[u8] {
        self.reader.contents()
    }
}

impl<R: Read + Seek> ByteCursor<R> {
    /// Wrap a reader, positioned at the start of the data
    pub fn new(mut reader: R) -> Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self { reader, len })
    }

    /// Total length of the underlying data in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current read offset
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.reader.stream_position()?)
    }

    /// Move to an absolute offset
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.reader.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// True once every byte has been consumed
    pub fn eof(&mut self) -> Result<bool> {
        Ok(self.position()? >= self.len)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.reader.read_u8().map_err(read_error)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.reader.read_i8().map_err(read_error)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.reader.read_i16::<LittleEndian>().map_err(read_error)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.reader.read_i32::<LittleEndian>().map_err(read_error)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.reader.read_f32::<LittleEndian>().map_err(read_error)
    }

    /// Read a byte and interpret any non-zero value as `true`
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Read exactly `n` bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; n];
        self.reader.read_exact(&mut buffer).map_err(read_error)?;
        Ok(buffer)
    }

    /// Advance `n` bytes without reading them
    ///
    /// Fails with [`Error::UnexpectedEof`] if fewer than `n` bytes remain.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        let target = self.position()? + n;
        if target > self.len {
            return Err(Error::UnexpectedEof);
        }
        self.seek(target)
    }

    /// Read a fixed-size text field, dropping NUL padding and trailing spaces
    pub fn read_fixed_string(&mut self, n: usize) -> Result<String> {
        let bytes = self.read_bytes(n)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let text = String::from_utf8_lossy(&bytes[..end]);
        Ok(text.trim_end().to_string())
    }

    /// Read a 4-byte length followed by that many bytes of text
    pub fn read_prefixed_string(&mut self) -> Result<String> {
        let len = self.read_i32()?;
        let len = usize::try_from(len).map_err(|_| Error::UnexpectedEof)?;
        let remaining = self.len.saturating_sub(self.position()?);
        if len as u64 > remaining {
            return Err(Error::UnexpectedEof);
        }
        let bytes = self.read_bytes(len)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    /// Read everything from the current offset to the end
    pub fn read_remaining(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.reader.read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}

fn read_error(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::UnexpectedEof
    } else {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn cursor(bytes: &[u8]) -> ByteCursor<Cursor<Vec<u8>>> {
        ByteCursor::new(Cursor::new(bytes.to_vec())).unwrap()
    }

    #[test]
    fn test_little_endian_primitives() {
        let mut data = Vec::new();
        data.extend_from_slice(&0x1DEAD666_i32.to_le_bytes());
        data.extend_from_slice(&(-2_i16).to_le_bytes());
        data.push(0xFF);
        data.extend_from_slice(&1.5_f32.to_le_bytes());

        let mut c = cursor(&data);
        assert_eq!(c.read_i32().unwrap(), 0x1DEAD666);
        assert_eq!(c.read_i16().unwrap(), -2);
        assert_eq!(c.read_i8().unwrap(), -1);
        assert!((c.read_f32().unwrap() - 1.5).abs() < f32::EPSILON);
        assert!(c.eof().unwrap());
    }

    #[test]
    fn test_short_read_is_eof_error() {
        let mut c = cursor(&[1, 2]);
        assert!(matches!(c.read_i32(), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_skip_discards_without_reading() {
        let mut c = cursor(&[0, 0, 7]);
        c.skip(2).unwrap();
        assert_eq!(c.read_u8().unwrap(), 7);
        assert!(matches!(c.skip(1), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_fixed_string_trims_padding() {
        let mut field = b"Hub 2 checkpoint".to_vec();
        field.resize(24, 0);
        let mut c = cursor(&field);
        assert_eq!(c.read_fixed_string(24).unwrap(), "Hub 2 checkpoint");
        assert_eq!(c.position().unwrap(), 24);
    }

    #[test]
    fn test_prefixed_string() {
        let mut data = 5_i32.to_le_bytes().to_vec();
        data.extend_from_slice(b"hello");
        let mut c = cursor(&data);
        assert_eq!(c.read_prefixed_string().unwrap(), "hello");

        let mut c = cursor(&100_i32.to_le_bytes());
        assert!(matches!(c.read_prefixed_string(), Err(Error::UnexpectedEof)));
    }
}
