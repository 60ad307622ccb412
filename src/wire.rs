//! Fixed-offset little-endian field access.
//!
//! Every MFI structure is a packed C struct. Instead of casting byte slices
//! to `#[repr(packed)]` types, structures are read and written one field at
//! a time at their documented byte offset, so there is no hidden padding and
//! byte order is always explicit.

use crate::error::{MfiError, Result};

/// Read-only view over a buffer already checked to hold a whole structure.
#[derive(Clone, Copy)]
pub struct LeReader<'a> {
    buf: &'a [u8],
}

impl<'a> LeReader<'a> {
    /// Wraps `buf`, failing if it is shorter than `size` bytes.
    pub fn new(structure: &'static str, buf: &'a [u8], size: usize) -> Result<Self> {
        MfiError::ensure_len(structure, size, buf)?;
        Ok(Self { buf: &buf[..size] })
    }

    pub fn u8(&self, offset: usize) -> u8 {
        self.buf[offset]
    }

    pub fn u16(&self, offset: usize) -> u16 {
        u16::from_le_bytes(self.array(offset))
    }

    pub fn u32(&self, offset: usize) -> u32 {
        u32::from_le_bytes(self.array(offset))
    }

    pub fn u64(&self, offset: usize) -> u64 {
        u64::from_le_bytes(self.array(offset))
    }

    /// `N` consecutive little-endian `u32` words starting at `offset`.
    pub fn u32s<const N: usize>(&self, offset: usize) -> [u32; N] {
        std::array::from_fn(|i| self.u32(offset + i * 4))
    }

    pub fn u64s<const N: usize>(&self, offset: usize) -> [u64; N] {
        std::array::from_fn(|i| self.u64(offset + i * 8))
    }

    pub fn array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0; N];
        out.copy_from_slice(&self.buf[offset..offset + N]);
        out
    }

    pub fn bytes(&self, offset: usize, len: usize) -> &'a [u8] {
        &self.buf[offset..offset + len]
    }

    /// A sub-reader over `len` bytes at `offset`, for nested structures.
    pub fn sub(&self, offset: usize, len: usize) -> LeReader<'a> {
        LeReader {
            buf: self.bytes(offset, len),
        }
    }
}

/// Writer over a fixed-size output buffer.
pub struct LeWriter<'a> {
    buf: &'a mut [u8],
}

impl<'a> LeWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf }
    }

    pub fn u8(&mut self, offset: usize, value: u8) {
        self.buf[offset] = value;
    }

    pub fn u16(&mut self, offset: usize, value: u16) {
        self.bytes(offset, &value.to_le_bytes());
    }

    pub fn u32(&mut self, offset: usize, value: u32) {
        self.bytes(offset, &value.to_le_bytes());
    }

    pub fn u64(&mut self, offset: usize, value: u64) {
        self.bytes(offset, &value.to_le_bytes());
    }

    pub fn bytes(&mut self, offset: usize, value: &[u8]) {
        self.buf[offset..offset + value.len()].copy_from_slice(value);
    }
}

/// A structure with a fixed little-endian wire layout.
///
/// `SIZE` is the exact byte size of the layout, which is also the size of
/// the response buffer a query for this structure must supply.
pub trait Decode: Sized {
    const NAME: &'static str;
    const SIZE: usize;

    /// Reads the structure from a reader spanning exactly `SIZE` bytes.
    fn read(r: LeReader<'_>) -> Result<Self>;

    fn decode(buf: &[u8]) -> Result<Self> {
        Self::read(LeReader::new(Self::NAME, buf, Self::SIZE)?)
    }
}

/// Interprets a fixed, NUL padded firmware string.
///
/// Everything from the first NUL is dropped, then trailing whitespace.
pub fn c_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}
