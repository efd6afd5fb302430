//! Little-endian cursor reader/writer and the [`WireLayout`] trait.
//!
//! Every struct in [`crate::packets`] implements [`WireLayout`]; the decoder
//! derives each packet's expected length from [`WireLayout::wire_size`], so
//! the size table and the field order live in one place.

use thiserror::Error;

use crate::PacketFormat;

/// A read ran past the end of the buffer.
///
/// The decoder validates lengths before reading a payload, so this only
/// surfaces from the lower-level reader API.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("out of bounds: {width}-byte read at offset {offset} of a {len}-byte buffer")]
pub struct OutOfBounds {
    pub offset: usize,
    pub width: usize,
    pub len: usize,
}

/// Fixed binary layout of one wire struct under a given packet format.
pub trait WireLayout: Sized {
    /// Decode one value starting at the reader's position.
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds>;

    /// Append the value's bytes. Fields absent from `format` are skipped;
    /// fields required by `format` but `None` are written as zero.
    fn write(&self, w: &mut ByteWriter, format: PacketFormat);

    /// Exact encoded length under `format`.
    fn wire_size(format: PacketFormat) -> usize;
}

/// Cursor-style byte reader for little-endian binary data.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], OutOfBounds> {
        let oob = OutOfBounds {
            offset: self.pos,
            width: N,
            len: self.data.len(),
        };
        let end = self.pos.checked_add(N).ok_or(oob)?;
        let bytes = self.data.get(self.pos..end).ok_or(oob)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.pos = end;
        Ok(out)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, OutOfBounds> {
        self.take::<1>().map(|[b]| b)
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8, OutOfBounds> {
        self.take::<1>().map(i8::from_le_bytes)
    }

    #[inline]
    pub fn u16_le(&mut self) -> Result<u16, OutOfBounds> {
        self.take().map(u16::from_le_bytes)
    }

    #[inline]
    pub fn i16_le(&mut self) -> Result<i16, OutOfBounds> {
        self.take().map(i16::from_le_bytes)
    }

    #[inline]
    pub fn u32_le(&mut self) -> Result<u32, OutOfBounds> {
        self.take().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn u64_le(&mut self) -> Result<u64, OutOfBounds> {
        self.take().map(u64::from_le_bytes)
    }

    /// IEEE-754 single, bit-exact (NaN and infinities pass through).
    #[inline]
    pub fn f32_le(&mut self) -> Result<f32, OutOfBounds> {
        self.take().map(f32::from_le_bytes)
    }

    #[inline]
    pub fn f64_le(&mut self) -> Result<f64, OutOfBounds> {
        self.take().map(f64::from_le_bytes)
    }

    pub fn u8_array<const N: usize>(&mut self) -> Result<[u8; N], OutOfBounds> {
        self.take()
    }

    pub fn u16_le_array<const N: usize>(&mut self) -> Result<[u16; N], OutOfBounds> {
        self.array(Self::u16_le)
    }

    pub fn f32_le_array<const N: usize>(&mut self) -> Result<[f32; N], OutOfBounds> {
        self.array(Self::f32_le)
    }

    /// Read `N` consecutive values with `read`.
    pub fn array<T, const N: usize>(
        &mut self,
        mut read: impl FnMut(&mut Self) -> Result<T, OutOfBounds>,
    ) -> Result<[T; N], OutOfBounds> {
        let offset = self.pos;
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(read(self)?);
        }
        <[T; N]>::try_from(items).map_err(|items: Vec<T>| OutOfBounds {
            offset,
            width: items.len(),
            len: self.data.len(),
        })
    }

    /// Read `N` consecutive [`WireLayout`] values.
    pub fn layouts<T: WireLayout, const N: usize>(
        &mut self,
        format: PacketFormat,
    ) -> Result<[T; N], OutOfBounds> {
        self.array(|r| T::read(r, format))
    }

    /// Read `count` consecutive [`WireLayout`] values into a `Vec`.
    pub fn layout_vec<T: WireLayout>(
        &mut self,
        count: usize,
        format: PacketFormat,
    ) -> Result<Vec<T>, OutOfBounds> {
        (0..count).map(|_| T::read(self, format)).collect()
    }

    /// Read a fixed-width NUL-padded UTF-8 string field.
    ///
    /// Bytes after the first NUL are ignored; invalid UTF-8 is replaced.
    pub fn fixed_str<const N: usize>(&mut self) -> Result<String, OutOfBounds> {
        let raw = self.take::<N>()?;
        let end = raw.iter().position(|b| *b == 0).unwrap_or(N);
        let text = raw.get(..end).unwrap_or_default();
        Ok(String::from_utf8_lossy(text).into_owned())
    }
}

/// Append-only little-endian writer, the inverse of [`ByteReader`].
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn i8(&mut self, v: i8) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn u16_le(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn i16_le(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn u32_le(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn u64_le(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn f32_le(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn f64_le(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn bytes(&mut self, v: &[u8]) {
        self.buf.extend_from_slice(v);
    }

    pub fn u16_le_array(&mut self, v: &[u16]) {
        v.iter().for_each(|x| self.u16_le(*x));
    }

    pub fn f32_le_array(&mut self, v: &[f32]) {
        v.iter().for_each(|x| self.f32_le(*x));
    }

    pub fn layouts<T: WireLayout>(&mut self, items: &[T], format: PacketFormat) {
        for item in items {
            item.write(self, format);
        }
    }

    /// Write `text` into an `N`-byte NUL-padded field, truncating at `N - 1`
    /// bytes so the field stays terminated.
    pub fn fixed_str<const N: usize>(&mut self, text: &str) {
        let mut field = [0u8; N];
        let len = text.len().min(N.saturating_sub(1));
        if let (Some(dst), Some(src)) = (field.get_mut(..len), text.as_bytes().get(..len)) {
            dst.copy_from_slice(src);
        }
        self.buf.extend_from_slice(&field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_reads_little_endian_fields_in_order() -> TestResult {
        let mut w = ByteWriter::new();
        w.u16_le(2022);
        w.i8(-1);
        w.u64_le(0x1122_3344_5566_7788);
        w.f32_le(12.5);
        w.f64_le(5_423.125);
        let raw = w.into_bytes();
        assert_eq!(raw.first().copied(), Some(0xE6));

        let mut r = ByteReader::new(&raw);
        assert_eq!(r.u16_le()?, 2022);
        assert_eq!(r.i8()?, -1);
        assert_eq!(r.u64_le()?, 0x1122_3344_5566_7788);
        assert_eq!(r.f32_le()?.to_bits(), 12.5f32.to_bits());
        assert_eq!(r.f64_le()?.to_bits(), 5_423.125f64.to_bits());
        assert_eq!(r.remaining(), 0);
        Ok(())
    }

    #[test]
    fn test_out_of_bounds_read_reports_position() {
        let mut r = ByteReader::at(&[1, 2, 3], 2);
        assert_eq!(
            r.u16_le(),
            Err(OutOfBounds {
                offset: 2,
                width: 2,
                len: 3
            })
        );
        // position is unchanged after a failed read
        assert_eq!(r.position(), 2);
    }

    #[test]
    fn test_offset_past_end_does_not_panic() {
        let mut r = ByteReader::at(&[0u8; 4], usize::MAX);
        assert!(r.u8().is_err());
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_nan_is_preserved_bit_for_bit() -> TestResult {
        let bits = 0x7FC0_0001u32;
        let raw = bits.to_le_bytes();
        let mut r = ByteReader::new(&raw);
        assert_eq!(r.f32_le()?.to_bits(), bits);
        Ok(())
    }

    #[test]
    fn test_fixed_str_stops_at_nul_and_pads() -> TestResult {
        let mut w = ByteWriter::new();
        w.fixed_str::<8>("VERSTAPPEN");
        let raw = w.into_bytes();
        assert_eq!(raw.len(), 8);
        assert_eq!(raw.last().copied(), Some(0));

        let mut r = ByteReader::new(&raw);
        assert_eq!(r.fixed_str::<8>()?, "VERSTAP");
        Ok(())
    }

    #[test]
    fn test_array_reads_exactly_n_values() -> TestResult {
        let raw = [1u8, 0, 2, 0, 3, 0, 4, 0, 9];
        let mut r = ByteReader::new(&raw);
        assert_eq!(r.u16_le_array::<4>()?, [1, 2, 3, 4]);
        assert_eq!(r.remaining(), 1);
        assert!(r.u16_le_array::<1>().is_err());
        Ok(())
    }
}
