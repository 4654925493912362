use std::io::{Cursor, Error, ErrorKind, Read, Result};

#[derive(Clone, Copy, Debug, Default)]
pub enum Endianness {
    Big,
    #[default]
    Little,
}

/// Byte order aware cursor over a borrowed buffer.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    endian: Endianness,
    inner: Cursor<&'a [u8]>,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8], endian: Endianness) -> Self {
        Self {
            endian,
            inner: Cursor::new(data),
        }
    }

    pub fn new_big_endian(data: &'a [u8]) -> Self {
        Self::new(data, Endianness::Big)
    }

    pub fn new_little_endian(data: &'a [u8]) -> Self {
        Self::new(data, Endianness::Little)
    }

    pub fn get_length(&self) -> u64 {
        self.inner.get_ref().len() as u64
    }

    pub fn get_position(&self) -> u64 {
        self.inner.position()
    }

    pub fn seek(&mut self, position: u64) -> Result<()> {
        if position > self.get_length() {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                "Reader seeks out of buffer bounds.",
            ));
        }

        self.inner.set_position(position);
        Ok(())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let buf = self.read_array::<4>()?;

        match self.endian {
            Endianness::Big => Ok(u32::from_be_bytes(buf)),
            Endianness::Little => Ok(u32::from_le_bytes(buf)),
        }
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_bytes(&mut self, bytes: usize) -> Result<&'a [u8]> {
        let data: &'a [u8] = *self.inner.get_ref();
        let start = self.get_position() as usize;
        let end = start
            .checked_add(bytes)
            .filter(|x| *x <= data.len())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::UnexpectedEof,
                    "Reader reads out of buffer bounds.",
                )
            })?;

        self.inner.set_position(end as u64);
        Ok(&data[start..end])
    }
}
