//! Offset-addressed big-endian reads over a font file (made by FontLab https://www.fontlab.com/)

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{FontError, Result};

/// A fixed-size big-endian record that can be decoded from raw bytes.
///
/// `decode` is only ever handed a slice of at least `SIZE` bytes.
pub trait BeStruct: Sized {
    const SIZE: usize;

    fn decode(buf: &[u8]) -> Self;
}

/// Random-access reader over a seekable byte source.
///
/// Every read names its absolute offset, so callers never observe a cursor.
/// The reader owns its source; dropping it closes the file.
#[derive(Debug)]
pub struct FontReader<R> {
    source: RefCell<R>,
    len: u64,
}

impl FontReader<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| FontError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(file)
    }
}

impl<R: Read + Seek> FontReader<R> {
    pub fn new(mut source: R) -> Result<Self> {
        let len = source
            .seek(SeekFrom::End(0))
            .map_err(|err| io_error(0, 0, err))?;
        Ok(Self {
            source: RefCell::new(source),
            len,
        })
    }

    /// Total size of the underlying source in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read exactly `length` bytes starting at `offset`.
    pub fn read(&self, offset: u64, length: usize) -> Result<Vec<u8>> {
        let in_bounds = offset
            .checked_add(length as u64)
            .is_some_and(|end| end <= self.len);
        if !in_bounds {
            return Err(FontError::Read {
                offset,
                length: length as u64,
                reason: format!("range exceeds {}-byte source", self.len),
            });
        }

        let mut source = self.source.borrow_mut();
        source
            .seek(SeekFrom::Start(offset))
            .map_err(|err| io_error(offset, length, err))?;
        let mut buf = vec![0; length];
        source
            .read_exact(&mut buf)
            .map_err(|err| io_error(offset, length, err))?;
        Ok(buf)
    }

    pub fn read_struct<T: BeStruct>(&self, offset: u64) -> Result<T> {
        let buf = self.read(offset, T::SIZE)?;
        Ok(T::decode(&buf))
    }

    pub fn read_u16(&self, offset: u64) -> Result<u16> {
        let buf = self.read(offset, 2)?;
        Ok(BigEndian::read_u16(&buf))
    }
}

/// Decode `buf` as a packed array of `T` records; a trailing partial record is ignored.
pub fn decode_array<T: BeStruct>(buf: &[u8]) -> Vec<T> {
    buf.chunks_exact(T::SIZE).map(T::decode).collect()
}

fn io_error(offset: u64, length: usize, err: io::Error) -> FontError {
    FontError::Read {
        offset,
        length: length as u64,
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct Pair {
        tag: [u8; 2],
        value: u32,
    }

    impl BeStruct for Pair {
        const SIZE: usize = 6;

        fn decode(buf: &[u8]) -> Self {
            Pair {
                tag: [buf[0], buf[1]],
                value: BigEndian::read_u32(&buf[2..6]),
            }
        }
    }

    fn reader(bytes: &[u8]) -> FontReader<Cursor<Vec<u8>>> {
        FontReader::new(Cursor::new(bytes.to_vec())).expect("reader")
    }

    #[test]
    fn reads_are_addressed_by_absolute_offset() {
        let r = reader(&[0, 1, 2, 3, 4, 5]);
        assert_eq!(r.read(4, 2).unwrap(), vec![4, 5]);
        assert_eq!(r.read(0, 2).unwrap(), vec![0, 1]);
        assert_eq!(r.read(4, 2).unwrap(), vec![4, 5]);
        assert_eq!(r.len(), 6);
    }

    #[test]
    fn integers_are_big_endian() {
        let r = reader(&[0x12, 0x34, b'a', b'b', 0, 0, 1, 0]);
        assert_eq!(r.read_u16(0).unwrap(), 0x1234);

        let pair: Pair = r.read_struct(2).unwrap();
        assert_eq!(&pair.tag, b"ab");
        assert_eq!(pair.value, 0x100);
    }

    #[test]
    fn reading_past_the_end_is_a_read_error() {
        let r = reader(&[0, 1, 2]);
        assert!(matches!(r.read(2, 2), Err(FontError::Read { offset: 2, .. })));
        assert!(matches!(r.read(u64::MAX, 1), Err(FontError::Read { .. })));
        assert!(r.read(3, 0).unwrap().is_empty());
    }

    #[test]
    fn decode_array_drops_partial_tail() {
        let bytes = [b'x', b'y', 0, 0, 0, 7, b'z', b'w', 0, 0, 0, 9, 1, 2];
        let pairs: Vec<Pair> = decode_array(&bytes);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].value, 9);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = FontReader::open(Path::new("/nonexistent/fontpath/missing.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Open { .. }));
    }
}
