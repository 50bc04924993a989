//! Forward-seekable little-endian byte cursor used by every record decoder.

use byteorder::{LittleEndian, ReadBytesExt};
use crate::arsc::types::error::{ArscError, Result};

/// A read cursor over an in-memory block of table bytes.
///
/// Records peek ahead at fixed offsets before committing to a layout,
/// so the cursor exposes both relative peeks and an absolute `seek`.
#[derive(Debug, Clone)]
pub struct BlockReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BlockReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves to an absolute position. Seeking to the end is allowed.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(ArscError::Truncated {
                context: "seek",
                expected: position as u64,
                found: self.data.len() as u64,
            });
        }
        self.position = position;
        Ok(())
    }

    /// Number of bytes between the position and the end of the block.
    pub fn available(&self) -> usize {
        self.data.len() - self.position
    }

    fn require(&self, len: usize, context: &'static str) -> Result<()> {
        if self.available() < len {
            return Err(ArscError::Truncated {
                context,
                expected: len as u64,
                found: self.available() as u64,
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.require(1, "u8")?;
        let value = self.data[self.position];
        self.position += 1;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.require(2, "u16")?;
        let mut slice = &self.data[self.position..];
        let value = slice.read_u16::<LittleEndian>()?;
        self.position += 2;
        Ok(value)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.require(4, "i32")?;
        let mut slice = &self.data[self.position..];
        let value = slice.read_i32::<LittleEndian>()?;
        self.position += 4;
        Ok(value)
    }

    /// Reads a u16 at `offset` bytes past the position without moving.
    pub fn peek_u16(&self, offset: usize) -> Result<u16> {
        self.require(offset + 2, "peeked u16")?;
        let mut slice = &self.data[self.position + offset..];
        Ok(slice.read_u16::<LittleEndian>()?)
    }

    /// Fills `buf` entirely or fails without moving.
    pub fn read_fully(&mut self, buf: &mut [u8], context: &'static str) -> Result<()> {
        self.require(buf.len(), context)?;
        buf.copy_from_slice(&self.data[self.position..self.position + buf.len()]);
        self.position += buf.len();
        Ok(())
    }

    /// Borrows the next `len` bytes and advances past them.
    pub fn read_bytes(&mut self, len: usize, context: &'static str) -> Result<&'a [u8]> {
        self.require(len, context)?;
        let bytes = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }
}
