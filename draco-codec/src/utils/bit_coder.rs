use crate::core::bit_coder::{ByteReader, ByteWriter, ReaderErr};

/// Reads an unsigned LEB128 varint. Counts, sizes, and unique ids in the bitstream use this form.
pub(crate) fn leb128_read<R>(reader: &mut R) -> Result<u64, ReaderErr>
    where R: ByteReader,
{
    let mut value = 0_u64;
    for shift in (0..64).step_by(7) {
        let byte = reader.read_u8()?;
        // the tenth byte may only carry the top bit
        if shift == 63 && byte > 1 {
            return Err(ReaderErr::VarintOverflow);
        }
        value |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(ReaderErr::VarintOverflow)
}

pub(crate) fn leb128_write<W>(mut value: u64, writer: &mut W)
    where W: ByteWriter,
{
    while value >= 0x80 {
        writer.write_u8(value as u8 | 0x80);
        value >>= 7;
    }
    writer.write_u8(value as u8);
}
