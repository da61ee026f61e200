use crate::core::bit_coder::ByteWriter;
use crate::shared::header::{
    EncodedGeometryType, EncoderMethod, 
    DRACO_MAGIC, METADATA_FLAG_MASK, VERSION_MAJOR, VERSION_MINOR
};

pub(crate) fn encode_header<W>(writer: &mut W, contains_metadata: bool) 
    where W: ByteWriter
{
    // Write the draco string
    writer.write_bytes(DRACO_MAGIC);

    // Write the version
    writer.write_u8(VERSION_MAJOR);
    writer.write_u8(VERSION_MINOR);

    // Write the encoder type
    writer.write_u8(EncodedGeometryType::TriangularMesh.get_id());

    // Write the encoding method
    EncoderMethod::Sequential.write_to(writer);

    // Write the flags
    let flags = if contains_metadata { METADATA_FLAG_MASK } else { 0 };
    writer.write_u16(flags);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_bytes() {
        let mut buffer = Vec::new();
        encode_header(&mut buffer, true);
        assert_eq!(buffer, vec![b'D', b'R', b'A', b'C', b'O', 2, 2, 1, 0, 0x00, 0x80]);
    }
}
