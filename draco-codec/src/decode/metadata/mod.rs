use crate::core::attribute::AttributeId;
use crate::core::bit_coder::{ByteReader, ReaderErr};
use crate::core::mesh::metadata::{AttributeMetadata, GeometryMetadata, Metadata};
use crate::utils::bit_coder::leb128_read;

/// Nesting limit for sub-metadata.
const MAX_DEPTH: usize = 64;

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Metadata entry '{0}' is empty")]
    EmptyEntry(String),
    #[error("Metadata name is not valid UTF-8")]
    InvalidName,
    #[error("Not enough data: {0}")]
    NotEnoughData(#[from] ReaderErr),
    #[error("Sub-metadata is nested deeper than {MAX_DEPTH} levels")]
    TooDeep,
}

/// Decodes the metadata section: the attribute metadata first, then the geometry metadata.
pub(crate) fn decode_metadata<R>(reader: &mut R) -> Result<GeometryMetadata, Err>
    where R: ByteReader
{
    let num_att_metadata = leb128_read(reader)?;
    let mut att_metadatas = Vec::new();
    for _ in 0..num_att_metadata {
        let att_unique_id = leb128_read(reader)? as usize;
        let metadata = decode_metadata_block(reader, 0)?;
        att_metadatas.push(AttributeMetadata::new(AttributeId::new(att_unique_id), metadata));
    }

    let mut out = GeometryMetadata::new(decode_metadata_block(reader, 0)?);
    for att_metadata in att_metadatas {
        out.add_attribute_metadata(att_metadata);
    }
    Ok(out)
}

fn decode_metadata_block<R>(reader: &mut R, depth: usize) -> Result<Metadata, Err>
    where R: ByteReader
{
    if depth > MAX_DEPTH {
        return Err(Err::TooDeep);
    }
    let mut metadata = Metadata::new();

    let num_entries = leb128_read(reader)?;
    for _ in 0..num_entries {
        let name = decode_name(reader)?;
        let data_size = leb128_read(reader)?;
        if data_size == 0 {
            return Err(Err::EmptyEntry(name));
        }
        let data_size = usize::try_from(data_size).map_err(|_| ReaderErr::NotEnoughData)?;
        let value = reader.read_bytes(data_size)?;
        metadata.add_entry_binary(&name, value);
    }

    let num_sub_metadata = leb128_read(reader)?;
    for _ in 0..num_sub_metadata {
        let name = decode_name(reader)?;
        let sub_metadata = decode_metadata_block(reader, depth + 1)?;
        metadata.add_sub_metadata(&name, sub_metadata);
    }

    Ok(metadata)
}

fn decode_name<R>(reader: &mut R) -> Result<String, Err>
    where R: ByteReader
{
    let len = reader.read_u8()? as usize;
    let bytes = reader.read_bytes(len)?;
    String::from_utf8(bytes).map_err(|_| Err::InvalidName)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::DecoderBuffer;

    #[test]
    fn decode_nested_metadata() {
        let data = [
            1,                      // one attribute metadata
            2,                      // for unique id 2
            1, 4, b'n', b'a', b'm', b'e', 2, b'u', b'v',
            0,                      // no sub-metadata
            0,                      // geometry: no entries
            1,                      // one sub-metadata
            3, b's', b'u', b'b',
            1, 2, b'i', b'd', 4, 44, 0, 0, 0,
            0,
        ];
        let mut buffer = DecoderBuffer::new(&data);
        let metadata = decode_metadata(&mut buffer).unwrap();
        assert_eq!(buffer.remaining_size(), 0);

        let att = metadata.get_attribute_metadata_by_unique_id(AttributeId::new(2)).unwrap();
        assert_eq!(att.metadata().get_entry_string("name"), Some("uv"));
        let sub = metadata.metadata().get_sub_metadata("sub").unwrap();
        assert_eq!(sub.get_entry_int("id"), Some(44));
    }

    #[test]
    fn reject_empty_entry() {
        let data = [0, 1, 1, b'x', 0, 0];
        assert!(matches!(decode_metadata(&mut DecoderBuffer::new(&data)), Err(Err::EmptyEntry(_))));
    }

    #[test]
    fn reject_huge_sizes_without_allocating() {
        let data = [0, 1, 1, b'x', 0xFF, 0xFF, 0xFF, 0xFF, 0x0F];
        assert!(matches!(decode_metadata(&mut DecoderBuffer::new(&data)), Err(Err::NotEnoughData(_))));
    }
}
