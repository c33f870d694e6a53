use bytes::Buf;

use crate::error::{FrameError, Result};

/// Reads fixed-width little-endian values from a byte slice at increasing
/// offsets.
///
/// Every read is bounds-checked; running past the end yields
/// [`FrameError::Truncated`] rather than padding or panicking.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Start reading at `offset`. Offsets past the end leave nothing to read.
    pub fn at(buf: &'a [u8], offset: usize) -> Self {
        Self {
            buf,
            pos: offset.min(buf.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let mut window = self.window(1)?;
        Ok(window.get_u8())
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        let mut window = self.window(2)?;
        Ok(window.get_u16_le())
    }

    pub fn read_i16_le(&mut self) -> Result<i16> {
        let mut window = self.window(2)?;
        Ok(window.get_i16_le())
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        let mut window = self.window(4)?;
        Ok(window.get_u32_le())
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        let mut window = self.window(4)?;
        Ok(window.get_i32_le())
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        let mut window = self.window(8)?;
        Ok(window.get_u64_le())
    }

    pub fn read_f64_le(&mut self) -> Result<f64> {
        let mut window = self.window(8)?;
        Ok(window.get_f64_le())
    }

    /// Copy out the next `N` bytes verbatim.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let window = self.window(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(window);
        Ok(out)
    }

    /// Borrow the next `len` bytes.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        self.window(len)
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.window(len).map(|_| ())
    }

    fn window(&mut self, len: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if available < len {
            return Err(FrameError::Truncated {
                offset: self.pos,
                needed: len,
                available,
            });
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..start + len])
    }
}
