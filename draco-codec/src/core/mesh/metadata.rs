use std::collections::BTreeMap;

use crate::core::attribute::AttributeId;

/// A tree of named binary entries. Entry and sub-metadata names are kept in
/// sorted order, which is also the order they are written in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    entries: BTreeMap<String, Vec<u8>>,
    sub_metadatas: BTreeMap<String, Metadata>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry_string(&mut self, name: &str, value: &str) {
        self.entries.insert(name.to_owned(), value.as_bytes().to_vec());
    }

    /// Stores the value as 4 little-endian bytes.
    pub fn add_entry_int(&mut self, name: &str, value: i32) {
        self.entries.insert(name.to_owned(), value.to_le_bytes().to_vec());
    }

    pub fn add_entry_binary(&mut self, name: &str, value: Vec<u8>) {
        self.entries.insert(name.to_owned(), value);
    }

    /// Returns the entry as a string if it exists and is valid UTF-8.
    pub fn get_entry_string(&self, name: &str) -> Option<&str> {
        self.entries.get(name)
            .and_then(|v| std::str::from_utf8(v).ok())
    }

    pub fn get_entry_int(&self, name: &str) -> Option<i32> {
        let bytes = self.entries.get(name)?;
        let bytes: [u8; 4] = bytes.as_slice().try_into().ok()?;
        Some(i32::from_le_bytes(bytes))
    }

    pub fn get_entry_binary(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(|v| v.as_slice())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn add_sub_metadata(&mut self, name: &str, sub_metadata: Metadata) {
        self.sub_metadatas.insert(name.to_owned(), sub_metadata);
    }

    pub fn get_sub_metadata(&self, name: &str) -> Option<&Metadata> {
        self.sub_metadatas.get(name)
    }

    pub fn sub_metadatas(&self) -> impl Iterator<Item = (&str, &Metadata)> {
        self.sub_metadatas.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn num_sub_metadatas(&self) -> usize {
        self.sub_metadatas.len()
    }
}

/// Metadata attached to one attribute, keyed by the attribute's unique id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMetadata {
    att_unique_id: AttributeId,
    metadata: Metadata,
}

impl AttributeMetadata {
    pub fn new(att_unique_id: AttributeId, metadata: Metadata) -> Self {
        Self { att_unique_id, metadata }
    }

    pub fn att_unique_id(&self) -> AttributeId {
        self.att_unique_id
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeometryMetadata {
    metadata: Metadata,
    attribute_metadatas: Vec<AttributeMetadata>,
}

impl GeometryMetadata {
    pub fn new(metadata: Metadata) -> Self {
        Self { metadata, attribute_metadatas: Vec::new() }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn add_attribute_metadata(&mut self, att_metadata: AttributeMetadata) {
        self.attribute_metadatas.push(att_metadata);
    }

    pub fn attribute_metadatas(&self) -> &[AttributeMetadata] {
        &self.attribute_metadatas
    }

    pub fn get_attribute_metadata_by_unique_id(&self, id: AttributeId) -> Option<&AttributeMetadata> {
        self.attribute_metadatas.iter()
            .find(|m| m.att_unique_id == id)
    }

    /// Returns the first attribute metadata whose entry `name` is the string `value`.
    pub fn get_attribute_metadata_by_string_entry(&self, name: &str, value: &str) -> Option<&AttributeMetadata> {
        self.attribute_metadatas.iter()
            .find(|m| m.metadata.get_entry_string(name) == Some(value))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_entries() {
        let mut metadata = Metadata::new();
        metadata.add_entry_string("name", "secondaryUvs");
        metadata.add_entry_int("custom_id", 44);
        metadata.add_entry_binary("raw", vec![0xFF, 0xFE]);

        assert_eq!(metadata.get_entry_string("name"), Some("secondaryUvs"));
        assert_eq!(metadata.get_entry_int("custom_id"), Some(44));
        assert_eq!(metadata.get_entry_binary("custom_id"), Some(&[44, 0, 0, 0][..]));
        assert_eq!(metadata.get_entry_string("raw"), None);
        assert_eq!(metadata.get_entry_int("name"), None);
        assert_eq!(metadata.get_entry_string("missing"), None);

        let names = metadata.entries().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(names, vec!["custom_id", "name", "raw"]);
    }

    #[test]
    fn lookup_by_string_entry_returns_first_match() {
        let mut first = Metadata::new();
        first.add_entry_string("name", "uv");
        let mut second = Metadata::new();
        second.add_entry_string("name", "uv");

        let mut geometry = GeometryMetadata::default();
        geometry.add_attribute_metadata(AttributeMetadata::new(AttributeId::new(4), first));
        geometry.add_attribute_metadata(AttributeMetadata::new(AttributeId::new(7), second));

        let found = geometry.get_attribute_metadata_by_string_entry("name", "uv").unwrap();
        assert_eq!(found.att_unique_id(), AttributeId::new(4));
        assert!(geometry.get_attribute_metadata_by_string_entry("name", "UV").is_none());
        assert!(geometry.get_attribute_metadata_by_unique_id(AttributeId::new(7)).is_some());
        assert!(geometry.get_attribute_metadata_by_unique_id(AttributeId::new(5)).is_none());
    }
}
