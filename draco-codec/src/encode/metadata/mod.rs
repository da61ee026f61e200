use crate::core::bit_coder::ByteWriter;
use crate::core::mesh::metadata::{GeometryMetadata, Metadata};
use crate::utils::bit_coder::leb128_write;

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Metadata entry '{0}' has an empty value")]
    EmptyEntry(String),
    #[error("Metadata name '{0}' is longer than 255 bytes")]
    NameTooLong(String),
}

pub(crate) fn encode_metadata<W>(metadata: &GeometryMetadata, writer: &mut W) -> Result<(), Err>
    where W: ByteWriter
{
    let att_metadatas = metadata.attribute_metadatas();
    leb128_write(att_metadatas.len() as u64, writer);
    for att_metadata in att_metadatas {
        leb128_write(att_metadata.att_unique_id().as_usize() as u64, writer);
        encode_metadata_block(att_metadata.metadata(), writer)?;
    }
    encode_metadata_block(metadata.metadata(), writer)
}

fn encode_metadata_block<W>(metadata: &Metadata, writer: &mut W) -> Result<(), Err>
    where W: ByteWriter
{
    leb128_write(metadata.num_entries() as u64, writer);
    for (name, value) in metadata.entries() {
        if value.is_empty() {
            return Err(Err::EmptyEntry(name.to_owned()));
        }
        encode_name(name, writer)?;
        leb128_write(value.len() as u64, writer);
        writer.write_bytes(value);
    }

    leb128_write(metadata.num_sub_metadatas() as u64, writer);
    for (name, sub_metadata) in metadata.sub_metadatas() {
        encode_name(name, writer)?;
        encode_metadata_block(sub_metadata, writer)?;
    }
    Ok(())
}

fn encode_name<W>(name: &str, writer: &mut W) -> Result<(), Err>
    where W: ByteWriter
{
    let len = u8::try_from(name.len())
        .map_err(|_| Err::NameTooLong(name.to_owned()))?;
    writer.write_u8(len);
    writer.write_bytes(name.as_bytes());
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attribute::AttributeId;
    use crate::core::mesh::metadata::AttributeMetadata;

    #[test]
    fn entries_are_written_in_name_order() {
        let mut metadata = Metadata::new();
        metadata.add_entry_string("name", "secondaryUvs");
        metadata.add_entry_int("custom_id", 44);
        let mut geometry = GeometryMetadata::default();
        geometry.add_attribute_metadata(AttributeMetadata::new(AttributeId::new(2), metadata));

        let mut buffer = Vec::new();
        encode_metadata(&geometry, &mut buffer).unwrap();

        let mut expected = vec![1, 2, 2];
        expected.extend([9, b'c', b'u', b's', b't', b'o', b'm', b'_', b'i', b'd', 4, 44, 0, 0, 0]);
        expected.extend([4, b'n', b'a', b'm', b'e', 12]);
        expected.extend(b"secondaryUvs");
        expected.extend([0, 0, 0]);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn reject_unencodable_metadata() {
        let mut metadata = Metadata::new();
        metadata.add_entry_binary("empty", Vec::new());
        let geometry = GeometryMetadata::new(metadata);
        assert!(matches!(encode_metadata(&geometry, &mut Vec::new()), Err(Err::EmptyEntry(_))));

        let mut metadata = Metadata::new();
        metadata.add_entry_string(&"x".repeat(256), "value");
        let geometry = GeometryMetadata::new(metadata);
        assert!(matches!(encode_metadata(&geometry, &mut Vec::new()), Err(Err::NameTooLong(_))));
    }
}
