// lib.rs

/// The seam between the pipeline and the mesh codec.
pub mod codec;

/// Reads the compressed mesh artifact.
pub mod loader;

/// Flattens attribute values into point records.
pub mod extract;

/// Finds attributes by their metadata.
pub mod locator;

/// Runs the decode pipeline from compressed bytes to [pipeline::GeoData].
pub mod pipeline;

/// The HTTP endpoint.
pub mod server;

/// The single-triangle sample artifact.
pub mod sample;

pub use codec::{AttributeSelector, Codec, DracoCodec, MeshHandle};
pub use pipeline::{decode_geo_data, GeoData};
