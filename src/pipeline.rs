use draco_codec::prelude::{AttributeType, DecoderBuffer, EncodedGeometryType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::{AttributeSelector, Codec, DecodeStatus, MeshHandle};
use crate::extract::{self, extract, Point2, Point3, PointRecord};
use crate::loader;

/// Metadata entry that marks the secondary texture coordinates.
pub const SECONDARY_UV_KEY: &str = "name";
pub const SECONDARY_UV_VALUE: &str = "secondaryUvs";

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Decoding failed: {0}")]
    DecodingFailed(DecodeStatus),
    #[error("{0}")]
    ExtractError(extract::Err),
    #[error("{0}")]
    LoadError(#[from] loader::Err),
    #[error("No position attribute found.")]
    MissingPosition,
    #[error("No uv attribute found.")]
    MissingUv,
    #[error("No uv2 attribute found.")]
    MissingUv2,
    #[error("The file does not contain a mesh.")]
    NotAMesh,
}

/// Point arrays of a decoded mesh, indexed by point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoData {
    pub positions: Vec<Point3>,
    pub uvs: Vec<Point2>,
    pub uvs2: Vec<Point2>,
}

/// Decodes a compressed mesh and extracts its positions, uvs, and secondary uvs.
/// Every codec object is owned by this call and released on return, on success or failure.
pub fn decode_geo_data<C: Codec>(codec: &C, blob: &[u8]) -> Result<GeoData, Err> {
    let mut buffer = DecoderBuffer::new(blob);

    match codec.encoded_geometry_type(&buffer) {
        Ok(EncodedGeometryType::TriangularMesh) => {},
        Ok(other) => {
            debug!(geometry_type = ?other, "rejecting non-mesh geometry");
            return Err(Err::NotAMesh);
        },
        Err(status) => {
            debug!(%status, "rejecting unreadable header");
            return Err(Err::NotAMesh);
        },
    }

    let mesh = codec.decode_mesh(&mut buffer)
        .map_err(Err::DecodingFailed)?;
    debug!(
        num_points = mesh.num_points(),
        num_attributes = mesh.num_attributes(),
        "decoded mesh"
    );

    let positions = extract_or(&mesh, &AttributeSelector::Semantic(AttributeType::Position), Err::MissingPosition)?;
    let uvs = extract_or(&mesh, &AttributeSelector::Semantic(AttributeType::TextureCoordinate), Err::MissingUv)?;
    let uvs2 = extract_or(
        &mesh,
        &AttributeSelector::metadata_entry(SECONDARY_UV_KEY, SECONDARY_UV_VALUE),
        Err::MissingUv2
    )?;

    Ok(GeoData { positions, uvs, uvs2 })
}

/// Reads the artifact at `path` and decodes it.
pub async fn load_geo_data<C: Codec>(codec: &C, path: &std::path::Path) -> Result<GeoData, Err> {
    let blob = loader::load_mesh(path).await?;
    decode_geo_data(codec, &blob)
}

fn extract_or<P, M>(mesh: &M, selector: &AttributeSelector, missing: Err) -> Result<Vec<P>, Err>
    where 
        P: PointRecord,
        M: MeshHandle,
{
    extract(mesh, selector).map_err(|err| match err {
        extract::Err::NotFound(_) => missing,
        other => Err::ExtractError(other),
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DracoCodec;
    use crate::sample;
    use draco_codec::prelude::*;

    fn encode_mesh(mesh: &Mesh) -> Vec<u8> {
        let mut out = Vec::new();
        encode(mesh, &mut out, encode::Config::default()).unwrap();
        out
    }

    #[test]
    fn sample_geo_data() {
        let blob = sample::sample_artifact(None).unwrap();
        let geo = decode_geo_data(&DracoCodec, &blob).unwrap();
        assert_eq!(geo.positions.len(), 3);
        assert_eq!(geo.uvs.len(), 3);
        assert_eq!(geo.uvs2.len(), 3);
        assert_eq!(geo.positions[1], Point3 { x: 1.0, y: 0.0, z: 0.0 });
        assert_eq!(geo.uvs[1], Point2 { x: 0.5, y: 0.5 });
        assert_eq!(geo.uvs2[0], Point2 { x: 0.1, y: 0.1 });
    }

    #[test]
    fn edgebreaker_sample_geo_data() {
        let blob = include_bytes!("../draco-codec/tests/data/sample_triangle.drc");
        let geo = decode_geo_data(&DracoCodec, blob).unwrap();
        let expected = decode_geo_data(&DracoCodec, &sample::sample_artifact(None).unwrap()).unwrap();
        assert_eq!(geo, expected);
    }

    #[test]
    fn zero_points_give_empty_arrays() {
        let mut builder = MeshBuilder::new();
        builder.add_attribute(&[], AttributeType::Position, 3);
        builder.add_attribute(&[], AttributeType::TextureCoordinate, 2);
        let uv2 = builder.add_attribute(&[], AttributeType::TextureCoordinate, 2);
        let mut metadata = Metadata::new();
        metadata.add_entry_string(SECONDARY_UV_KEY, SECONDARY_UV_VALUE);
        builder.add_attribute_metadata(uv2, metadata);
        let blob = encode_mesh(&builder.build().unwrap());

        let geo = decode_geo_data(&DracoCodec, &blob).unwrap();
        assert_eq!(geo, GeoData { positions: vec![], uvs: vec![], uvs2: vec![] });
    }

    #[test]
    fn missing_attributes_are_named() {
        let mut builder = MeshBuilder::new();
        builder.add_attribute(&[0.0; 6], AttributeType::TextureCoordinate, 2);
        let blob = encode_mesh(&builder.build().unwrap());
        let err = decode_geo_data(&DracoCodec, &blob).unwrap_err();
        assert_eq!(err.to_string(), "No position attribute found.");

        let mut builder = MeshBuilder::new();
        builder.add_attribute(&[0.0; 9], AttributeType::Position, 3);
        let blob = encode_mesh(&builder.build().unwrap());
        let err = decode_geo_data(&DracoCodec, &blob).unwrap_err();
        assert_eq!(err.to_string(), "No uv attribute found.");

        let mut builder = MeshBuilder::new();
        builder.add_attribute(&[0.0; 9], AttributeType::Position, 3);
        builder.add_attribute(&[0.0; 6], AttributeType::TextureCoordinate, 2);
        builder.add_attribute(&[0.0; 6], AttributeType::TextureCoordinate, 2);
        let blob = encode_mesh(&builder.build().unwrap());
        let err = decode_geo_data(&DracoCodec, &blob).unwrap_err();
        assert_eq!(err.to_string(), "No uv2 attribute found.");
    }

    #[test]
    fn non_meshes_are_rejected() {
        let mut blob = sample::sample_artifact(None).unwrap();
        blob[7] = 0;
        let err = decode_geo_data(&DracoCodec, &blob).unwrap_err();
        assert_eq!(err.to_string(), "The file does not contain a mesh.");

        let err = decode_geo_data(&DracoCodec, b"not a draco file").unwrap_err();
        assert!(matches!(err, Err::NotAMesh));
    }

    #[test]
    fn decode_failures_carry_the_status() {
        let mut blob = sample::sample_artifact(None).unwrap();
        blob[8] = 1;
        let err = decode_geo_data(&DracoCodec, &blob).unwrap_err();
        assert!(err.to_string().starts_with("Decoding failed: "), "{err}");

        let blob = sample::sample_artifact(None).unwrap();
        let err = decode_geo_data(&DracoCodec, &blob[..blob.len() - 1]).unwrap_err();
        assert!(matches!(err, Err::DecodingFailed(_)));
    }

    #[test]
    fn repeated_decodes_agree() {
        let blob = sample::sample_artifact(Some(12)).unwrap();
        let first = decode_geo_data(&DracoCodec, &blob).unwrap();
        let second = decode_geo_data(&DracoCodec, &blob).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn camel_case_json() {
        let geo = GeoData { positions: vec![], uvs: vec![Point2 { x: 1.0, y: 0.0 }], uvs2: vec![] };
        let json = serde_json::to_value(&geo).unwrap();
        assert_eq!(json, serde_json::json!({"positions": [], "uvs": [{"x": 1.0, "y": 0.0}], "uvs2": []}));
    }
}
