use crate::prelude::ByteReader;
use crate::core::bit_coder::ReaderErr;
use crate::shared::header::{
    bitstream_version, EncodedGeometryType, EncoderMethod, 
    DRACO_MAGIC, METADATA_FLAG_MASK, VERSION_MAJOR, VERSION_MINOR
};

/// Oldest bitstream this decoder reads. Older streams use fixed-width counts throughout.
const MIN_VERSION_MAJOR: u8 = 2;

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Invalid encoder method id: {0}")]
    InvalidEncoderMethod(u8),
    #[error("Invalid geometry type id: {0}")]
    InvalidGeometryType(u8),
    #[error("Not a Draco file")]
    NotADracoFile,
    #[error("Not enough data: {0}")]
    NotEnoughData(#[from] ReaderErr),
    #[error("Unsupported bitstream version {0}.{1}")]
    UnsupportedVersion(u8, u8),
}

#[derive(Debug, Clone)]
pub(crate) struct Header {
    pub version_major: u8,
    pub version_minor: u8,
    pub geometry_type: EncodedGeometryType,
    pub encoding_method: EncoderMethod,
    pub contains_metadata: bool,
}

impl Header {
    pub fn version(&self) -> u16 {
        bitstream_version(self.version_major, self.version_minor)
    }
}

pub(crate) fn decode_header<W>(reader: &mut W) -> Result<Header, Err>
where
    W: ByteReader,
{
    // Read the draco string
    let magic = reader.read_bytes(DRACO_MAGIC.len())
        .map_err(|_| Err::NotADracoFile)?;
    if magic != DRACO_MAGIC {
        return Err(Err::NotADracoFile)
    };

    // Read the version
    let version_major = reader.read_u8()?;
    let version_minor = reader.read_u8()?;
    let version = bitstream_version(version_major, version_minor);
    if version_major < MIN_VERSION_MAJOR || version > bitstream_version(VERSION_MAJOR, VERSION_MINOR) {
        return Err(Err::UnsupportedVersion(version_major, version_minor));
    }

    // Read the encoder type
    let geometry_type = reader.read_u8()?;
    let geometry_type = EncodedGeometryType::from_id(geometry_type)
        .ok_or(Err::InvalidGeometryType(geometry_type))?;

    // Read the encoding method
    let encoding_method = EncoderMethod::read_from(reader)?
        .map_err(Err::InvalidEncoderMethod)?;

    let flags = reader.read_u16()?;

    let contains_metadata = flags & METADATA_FLAG_MASK != 0;

    Ok (
        Header {
            version_major,
            version_minor,
            geometry_type,
            encoding_method,
            contains_metadata,
        }
    )
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::DecoderBuffer;

    fn header(major: u8, minor: u8, geometry: u8, method: u8, flags: u16) -> Vec<u8> {
        let mut out = b"DRACO".to_vec();
        out.extend_from_slice(&[major, minor, geometry, method]);
        out.extend_from_slice(&flags.to_le_bytes());
        out
    }

    #[test]
    fn decode_valid_header() {
        let data = header(2, 2, 1, 0, 0x8000);
        let header = decode_header(&mut DecoderBuffer::new(&data)).unwrap();
        assert_eq!(header.geometry_type, EncodedGeometryType::TriangularMesh);
        assert_eq!(header.encoding_method, EncoderMethod::Sequential);
        assert!(header.contains_metadata);
        assert_eq!(header.version(), 0x0202);
    }

    #[test]
    fn reject_bad_headers() {
        assert!(matches!(decode_header(&mut DecoderBuffer::new(b"DRAC")), Err(Err::NotADracoFile)));
        assert!(matches!(decode_header(&mut DecoderBuffer::new(b"PLY\n0000000000")), Err(Err::NotADracoFile)));
        assert!(matches!(
            decode_header(&mut DecoderBuffer::new(&header(2, 3, 1, 0, 0))),
            Err(Err::UnsupportedVersion(2, 3))
        ));
        assert!(matches!(
            decode_header(&mut DecoderBuffer::new(&header(1, 3, 1, 0, 0))),
            Err(Err::UnsupportedVersion(1, 3))
        ));
        assert!(matches!(
            decode_header(&mut DecoderBuffer::new(&header(2, 2, 5, 0, 0))),
            Err(Err::InvalidGeometryType(5))
        ));
        assert!(matches!(
            decode_header(&mut DecoderBuffer::new(&header(2, 2, 1, 9, 0))),
            Err(Err::InvalidEncoderMethod(9))
        ));
        let truncated = &header(2, 2, 1, 0, 0)[..10];
        assert!(matches!(decode_header(&mut DecoderBuffer::new(truncated)), Err(Err::NotEnoughData(_))));
    }
}
