use super::bit_coder::{ByteReader, ReaderErr};

/// Read cursor over an encoded Draco buffer.
/// Cloning gives an independent cursor at the same position, which is how the
/// header is peeked without consuming it.
#[derive(Debug, Clone)]
pub struct DecoderBuffer<'data> {
    data: &'data [u8],
    pos: usize,
}

impl<'data> DecoderBuffer<'data> {
    pub fn new(data: &'data [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn data_size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn remaining_size(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl ByteReader for DecoderBuffer<'_> {
    fn read_u8(&mut self) -> Result<u8, ReaderErr> {
        let byte = *self.data.get(self.pos).ok_or(ReaderErr::NotEnoughData)?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ReaderErr> {
        let end = self.pos.checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(ReaderErr::NotEnoughData)?;
        let out = self.data[self.pos..end].to_vec();
        self.pos = end;
        Ok(out)
    }
}
