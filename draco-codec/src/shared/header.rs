use crate::core::bit_coder::{ByteReader, ByteWriter, ReaderErr};

pub(crate) const DRACO_MAGIC: &[u8; 5] = b"DRACO";

/// Latest bitstream version this crate reads and the version it writes.
pub(crate) const VERSION_MAJOR: u8 = 2;
pub(crate) const VERSION_MINOR: u8 = 2;

/// Set in the header flags when a metadata section follows the header.
pub(crate) const METADATA_FLAG_MASK: u16 = 0x8000;

/// Packs a bitstream version so that versions compare in order.
#[inline]
pub(crate) const fn bitstream_version(major: u8, minor: u8) -> u16 {
    ((major as u16) << 8) | minor as u16
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum EncodedGeometryType {
    PointCloud,
    TriangularMesh,
}

impl EncodedGeometryType {
    pub(crate) fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(EncodedGeometryType::PointCloud),
            1 => Some(EncodedGeometryType::TriangularMesh),
            _ => None,
        }
    }

    pub(crate) fn get_id(self) -> u8 {
        match self {
            EncodedGeometryType::PointCloud => 0,
            EncodedGeometryType::TriangularMesh => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum EncoderMethod {
    Sequential,
    Edgebreaker,
}

impl EncoderMethod {
    pub(crate) fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(EncoderMethod::Sequential),
            1 => Some(EncoderMethod::Edgebreaker),
            _ => None,
        }
    }

    pub(crate) fn get_id(self) -> u8 {
        match self {
            EncoderMethod::Sequential => 0,
            EncoderMethod::Edgebreaker => 1,
        }
    }

    /// Reads the method byte. `Ok(Err(id))` carries an id that names no known method.
    pub(crate) fn read_from<R>(reader: &mut R) -> Result<Result<Self, u8>, ReaderErr> 
        where R: ByteReader
    {
        let id = reader.read_u8()?;
        Ok(Self::from_id(id).ok_or(id))
    }

    pub(crate) fn write_to<W>(self, writer: &mut W) 
        where W: ByteWriter
    {
        writer.write_u8(self.get_id());
    }
}
