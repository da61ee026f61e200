// lib.rs

/// Contains the interface between obj files and the `Mesh` object.
pub mod io;

/// Contains definitions shared by the encoder and the decoder.
pub(crate) mod shared;

/// Defines the mesh encoder.
pub mod encode;

/// Defines the mesh decoder.
pub mod decode;

/// Contains the native objects, the byte coders and the decoder buffer.
pub mod core;

pub(crate) mod utils;

pub use crate::core::mesh::Mesh;
pub use crate::shared::header::{EncodedGeometryType, EncoderMethod};

/// Contains the most commonly used traits, types, and objects.
pub mod prelude {
    pub use crate::core::attribute::{Attribute, AttributeId, AttributeType, ComponentDataType};
    pub use crate::core::bit_coder::{ByteReader, ByteWriter};
    pub use crate::core::buffer::DecoderBuffer;
    pub use crate::core::mesh::{Mesh, builder::MeshBuilder};
    pub use crate::core::mesh::metadata::{AttributeMetadata, GeometryMetadata, Metadata};
    pub use crate::core::shared::ConfigType;
    pub use crate::shared::header::{EncodedGeometryType, EncoderMethod};
    pub use crate::decode::{self, decode_mesh, encoded_geometry_type};
    pub use crate::encode::{self, encode};
}
