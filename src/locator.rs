use crate::codec::MeshHandle;

/// Scans the attributes in id order and returns the first whose metadata has
/// the string entry `key` equal to `value`.
/// Unlike [MeshHandle::attribute_id_by_metadata_entry], which follows the order of
/// the metadata in the file, this always prefers the lowest attribute id.
pub fn find_attribute_by_metadata<M: MeshHandle>(mesh: &M, key: &str, value: &str) -> Option<usize> {
    (0..mesh.num_attributes()).find(|&att_id| {
        mesh.attribute_metadata(att_id)
            .and_then(|metadata| metadata.get_entry_string(key))
            == Some(value)
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use draco_codec::prelude::*;

    fn mesh_with_named_attributes(names: &[&str]) -> Mesh {
        let mut builder = MeshBuilder::new();
        builder.add_attribute(&[0.0; 3], AttributeType::Position, 3);
        // metadata is attached in reverse order
        let mut ids = Vec::new();
        for _ in names {
            ids.push(builder.add_attribute(&[0.0; 2], AttributeType::TextureCoordinate, 2));
        }
        for (id, name) in ids.into_iter().zip(names).rev() {
            let mut metadata = Metadata::new();
            metadata.add_entry_string("name", name);
            builder.add_attribute_metadata(id, metadata);
        }
        builder.build().unwrap()
    }

    #[test]
    fn lowest_id_wins() {
        let mesh = mesh_with_named_attributes(&["uvs", "secondaryUvs", "secondaryUvs"]);
        assert_eq!(find_attribute_by_metadata(&mesh, "name", "secondaryUvs"), Some(2));
        assert_eq!(find_attribute_by_metadata(&mesh, "name", "uvs"), Some(1));
        // the mesh lookup follows metadata order instead
        assert_eq!(mesh.attribute_id_by_metadata_entry("name", "secondaryUvs"), Some(3));
    }

    #[test]
    fn not_found() {
        let mesh = mesh_with_named_attributes(&["uvs"]);
        assert_eq!(find_attribute_by_metadata(&mesh, "name", "secondaryUvs"), None);
        assert_eq!(find_attribute_by_metadata(&mesh, "label", "uvs"), None);
        assert_eq!(find_attribute_by_metadata(&Mesh::new(), "name", "uvs"), None);
    }
}
