use std::vec;

pub trait ByteWriter: Sized {
    fn write_u8(&mut self, value: u8);
    fn write_u16(&mut self, value: u16) {
        self.write_u8(value as u8);
        self.write_u8((value >> 8) as u8);
    }
    fn write_u32(&mut self, value: u32) {
        self.write_u16(value as u16);
        self.write_u16((value >> 16) as u16);
    }
    fn write_u64(&mut self, value: u64) {
        self.write_u32(value as u32);
        self.write_u32((value >> 32) as u32);
    }
    fn write_i32(&mut self, value: i32) {
        self.write_u32(value as u32);
    }
    fn write_f32(&mut self, value: f32) {
        self.write_u32(value.to_bits());
    }
    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_u8(b);
        }
    }
}

impl ByteWriter for Vec<u8> {
    fn write_u8(&mut self, value: u8) {
        self.push(value);
    }

    fn write_u16(&mut self, value: u16) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn write_u32(&mut self, value: u32) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn write_u64(&mut self, value: u64) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Little-endian reader over a byte source.
/// Every read either consumes exactly the requested bytes or fails with [ReaderErr::NotEnoughData].
pub trait ByteReader {
    fn read_u8(&mut self) -> Result<u8, ReaderErr>;
    fn read_u16(&mut self) -> Result<u16, ReaderErr> {
        let out = [
            self.read_u8()?,
            self.read_u8()?
        ];
        Ok(u16::from_le_bytes(out))
    }
    fn read_u32(&mut self) -> Result<u32, ReaderErr> {
        let out = [
            self.read_u8()?,
            self.read_u8()?,
            self.read_u8()?,
            self.read_u8()?
        ];
        Ok(u32::from_le_bytes(out))
    }
    fn read_u64(&mut self) -> Result<u64, ReaderErr> {
        let lo = self.read_u32()? as u64;
        let hi = self.read_u32()? as u64;
        Ok(lo | (hi << 32))
    }
    fn read_i8(&mut self) -> Result<i8, ReaderErr> {
        Ok(self.read_u8()? as i8)
    }
    fn read_i32(&mut self) -> Result<i32, ReaderErr> {
        Ok(self.read_u32()? as i32)
    }
    fn read_f32(&mut self) -> Result<f32, ReaderErr> {
        Ok(f32::from_bits(self.read_u32()?))
    }
    /// Reads `len` bytes. The output grows as bytes arrive, so a corrupt length
    /// fails on the first missing byte instead of allocating up front.
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ReaderErr> {
        let mut out = Vec::new();
        for _ in 0..len {
            out.push(self.read_u8()?);
        }
        Ok(out)
    }
}

impl ByteReader for vec::IntoIter<u8> {
    fn read_u8(&mut self) -> Result<u8, ReaderErr> {
        self.next().ok_or(ReaderErr::NotEnoughData)
    }
}

/// Reads bit fields least significant bit first.
/// Bytes are pulled from the underlying reader only when the next bit needs them,
/// so a finished bit reader has consumed exactly the bytes its bits occupy.
pub(crate) struct BitReader<'r, R> {
    reader: &'r mut R,
    current: u8,
    num_bits_left: u8,
}

impl<'r, R> BitReader<'r, R>
    where R: ByteReader
{
    pub(crate) fn spown_from(reader: &'r mut R) -> Self {
        Self { reader, current: 0, num_bits_left: 0 }
    }

    /// Reads `size` bits, `size <= 32`, the first bit read landing in the lowest position.
    pub(crate) fn read_bits(&mut self, size: u8) -> Result<u32, ReaderErr> {
        let mut value = 0_u32;
        for i in 0..size {
            if self.num_bits_left == 0 {
                self.current = self.reader.read_u8()?;
                self.num_bits_left = 8;
            }
            value |= ((self.current & 1) as u32) << i;
            self.current >>= 1;
            self.num_bits_left -= 1;
        }
        Ok(value)
    }
}

/// Bit field counterpart of [BitReader].
pub(crate) struct BitWriter<'w, W> {
    writer: &'w mut W,
    current: u8,
    num_bits: u8,
}

impl<'w, W> BitWriter<'w, W>
    where W: ByteWriter
{
    pub(crate) fn spown_from(writer: &'w mut W) -> Self {
        Self { writer, current: 0, num_bits: 0 }
    }

    pub(crate) fn write_bits(&mut self, size: u8, value: u32) {
        for i in 0..size {
            self.current |= (((value >> i) & 1) as u8) << self.num_bits;
            self.num_bits += 1;
            if self.num_bits == 8 {
                self.writer.write_u8(self.current);
                self.current = 0;
                self.num_bits = 0;
            }
        }
    }

    /// Writes the pending partial byte, padded with zeros.
    pub(crate) fn flush(self) {
        if self.num_bits > 0 {
            self.writer.write_u8(self.current);
        }
    }
}

#[remain::sorted]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderErr {
    #[error("Not enough data to read")]
    NotEnoughData,
    #[error("Varint does not fit in 64 bits")]
    VarintOverflow,
}
