use crate::core::bit_coder::{ByteReader, ByteWriter, ReaderErr};
use crate::utils::bit_coder::{leb128_read, leb128_write};

/// Connectivity encoding selected by the method byte of a sequential mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SequentialMethod {
    /// Entropy coded indices.
    Compressed,
    /// Plain indices, sized by the number of points.
    Raw,
}

impl SequentialMethod {
    pub(crate) fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(SequentialMethod::Compressed),
            1 => Some(SequentialMethod::Raw),
            _ => None,
        }
    }

    pub(crate) fn get_id(self) -> u8 {
        match self {
            SequentialMethod::Compressed => 0,
            SequentialMethod::Raw => 1,
        }
    }
}

/// Width of a raw point index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IndexWidth {
    U8,
    U16,
    Varint,
    U32,
}

impl IndexWidth {
    /// Varint indices exist from bitstream 2.2 onwards.
    pub(crate) fn for_point_count(num_points: usize, varint_allowed: bool) -> Self {
        if num_points < 1 << 8 {
            IndexWidth::U8
        } else if num_points < 1 << 16 {
            IndexWidth::U16
        } else if varint_allowed && num_points < 1 << 21 {
            IndexWidth::Varint
        } else {
            IndexWidth::U32
        }
    }

    pub(crate) fn read_index<R>(self, reader: &mut R) -> Result<u64, ReaderErr>
        where R: ByteReader
    {
        Ok(match self {
            IndexWidth::U8 => reader.read_u8()? as u64,
            IndexWidth::U16 => reader.read_u16()? as u64,
            IndexWidth::Varint => leb128_read(reader)?,
            IndexWidth::U32 => reader.read_u32()? as u64,
        })
    }

    pub(crate) fn write_index<W>(self, index: usize, writer: &mut W)
        where W: ByteWriter
    {
        match self {
            IndexWidth::U8 => writer.write_u8(index as u8),
            IndexWidth::U16 => writer.write_u16(index as u16),
            IndexWidth::Varint => leb128_write(index as u64, writer),
            IndexWidth::U32 => writer.write_u32(index as u32),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_width_boundaries() {
        assert_eq!(IndexWidth::for_point_count(0, true), IndexWidth::U8);
        assert_eq!(IndexWidth::for_point_count(255, true), IndexWidth::U8);
        assert_eq!(IndexWidth::for_point_count(256, true), IndexWidth::U16);
        assert_eq!(IndexWidth::for_point_count(65535, true), IndexWidth::U16);
        assert_eq!(IndexWidth::for_point_count(65536, true), IndexWidth::Varint);
        assert_eq!(IndexWidth::for_point_count(65536, false), IndexWidth::U32);
        assert_eq!(IndexWidth::for_point_count(1 << 21, true), IndexWidth::U32);
    }
}
