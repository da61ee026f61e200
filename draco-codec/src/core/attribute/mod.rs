use serde::Serialize;

use crate::prelude::{ByteReader, ByteWriter};
use crate::core::bit_coder::ReaderErr;


#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
	#[error("Invalid attribute type id: {0}")]
	InvalidAttributeTypeId(u8),
	#[error("Invalid DataTypeId: {0}")]
	InvalidDataTypeId(u8),
	/// Reader error
	#[error("Reader error: {0}")]
	ReaderError(#[from] ReaderErr),
}

/// Represents an attribute in a mesh, i.e. one value per point of the mesh.
/// Values are stored as little-endian bytes of `component_type`, so the same struct
/// carries positions, texture coordinates, colors, or integer payloads.
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
	/// unique id of the attribute within its mesh
	id: AttributeId,

	/// attribute type
	att_type: AttributeType,

	/// type of every component
	component_type: ComponentDataType,

	/// number of components per point
	num_components: usize,

	/// whether integer components represent values in [0, 1] (or [-1, 1] when signed)
	normalized: bool,

	/// raw values, `num_components` entries per point
	#[serde(skip)]
	data: Vec<u8>,
}

impl Attribute {
	pub fn new_empty(id: AttributeId, att_type: AttributeType, component_type: ComponentDataType, num_components: usize, normalized: bool) -> Self {
		Self {
			id,
			att_type,
			component_type,
			num_components,
			normalized,
			data: Vec::new(),
		}
	}

	/// Creates a float attribute from flat values, `num_components` per point.
	pub fn from_f32(id: AttributeId, att_type: AttributeType, num_components: usize, values: &[f32]) -> Self {
		let mut out = Self::new_empty(id, att_type, ComponentDataType::F32, num_components, false);
		out.set_from_f32(values);
		out
	}

	#[inline]
	pub fn get_id(&self) -> AttributeId {
		self.id
	}

	#[inline]
	pub fn get_attribute_type(&self) -> AttributeType {
		self.att_type
	}

	#[inline]
	pub fn get_component_type(&self) -> ComponentDataType {
		self.component_type
	}

	#[inline]
	pub fn get_num_components(&self) -> usize {
		self.num_components
	}

	#[inline]
	pub fn is_normalized(&self) -> bool {
		self.normalized
	}

	/// Size of one value (all of its components) in bytes.
	#[inline]
	pub fn byte_stride(&self) -> usize {
		self.num_components * self.component_type.size()
	}

	/// Number of values, i.e. points, stored in the attribute.
	pub fn len(&self) -> usize {
		let stride = self.byte_stride();
		if stride == 0 {
			0
		} else {
			self.data.len() / stride
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	#[inline]
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}

	#[inline]
	pub(crate) fn set_bytes(&mut self, data: Vec<u8>) {
		self.data = data;
	}

	/// Stores integer values, converting each one into the component type.
	pub(crate) fn set_from_i32(&mut self, values: &[i32]) {
		let component_type = self.component_type;
		let mut data = Vec::with_capacity(values.len() * component_type.size());
		for &v in values {
			component_type.write_i64(v as i64, &mut data);
		}
		self.data = data;
	}

	/// Stores float values, converting each one into the component type.
	pub(crate) fn set_from_f32(&mut self, values: &[f32]) {
		let component_type = self.component_type;
		let mut data = Vec::with_capacity(values.len() * component_type.size());
		for &v in values {
			component_type.write_f64(v as f64, &mut data);
		}
		self.data = data;
	}

	/// Replaces the component type together with the data it describes.
	pub(crate) fn set_from_i32_as(&mut self, component_type: ComponentDataType, values: &[i32]) {
		self.component_type = component_type;
		self.set_from_i32(values);
	}

	/// Returns the components of the value at `point_idx` converted to `f32`,
	/// or `None` if the index is out of range.
	pub fn get_f32(&self, point_idx: usize) -> Option<Vec<f32>> {
		let stride = self.byte_stride();
		let start = point_idx.checked_mul(stride)?;
		let bytes = self.data.get(start..start.checked_add(stride)?)?;
		Some(self.convert_to_f32(bytes))
	}

	/// Returns every value of the attribute converted to `f32`, flattened in point order.
	pub fn float_values_for_all_points(&self) -> Vec<f32> {
		self.convert_to_f32(&self.data)
	}

	/// Returns every value of the attribute as integers, flattened in point order.
	/// Returns `None` for float attributes.
	pub fn int_values_for_all_points(&self) -> Option<Vec<i64>> {
		if self.component_type.is_float() {
			return None;
		}
		let size = self.component_type.size();
		Some(self.data.chunks_exact(size)
			.map(|c| self.component_type.read_i64(c))
			.collect())
	}

	fn convert_to_f32(&self, bytes: &[u8]) -> Vec<f32> {
		let ty = self.component_type;
		let size = ty.size();
		bytes.chunks_exact(size)
			.map(|c| {
				if ty.is_float() {
					ty.read_f64(c) as f32
				} else if self.normalized {
					ty.read_i64(c) as f32 / ty.max_integer_value() as f32
				} else {
					ty.read_i64(c) as f32
				}
			})
			.collect()
	}
}


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ComponentDataType {
	I8,
	U8,
	I16,
	U16,
	I32,
	U32,
	I64,
	U64,
	F32,
	F64,
	Bool,
}

impl ComponentDataType {
	/// returns the size of the data type in bytes e.g. 4 for F32
	#[inline]
	pub fn size(self) -> usize {
        match self {
            ComponentDataType::F32 => 4,
            ComponentDataType::F64 => 8,
            ComponentDataType::U8 => 1,
            ComponentDataType::U16 => 2,
            ComponentDataType::U32 => 4,
            ComponentDataType::U64 => 8,
			ComponentDataType::I8 => 1,
			ComponentDataType::I16 => 2,
			ComponentDataType::I32 => 4,
			ComponentDataType::I64 => 8,
			ComponentDataType::Bool => 1,
        }
    }

	#[inline]
	pub fn is_float(self) -> bool {
		matches!(self, ComponentDataType::F32 | ComponentDataType::F64)
	}

	/// Largest value of an integral type, used to map normalized integers into [0, 1].
	fn max_integer_value(self) -> f64 {
		match self {
			ComponentDataType::I8 => i8::MAX as f64,
			ComponentDataType::U8 => u8::MAX as f64,
			ComponentDataType::I16 => i16::MAX as f64,
			ComponentDataType::U16 => u16::MAX as f64,
			ComponentDataType::I32 => i32::MAX as f64,
			ComponentDataType::U32 => u32::MAX as f64,
			ComponentDataType::I64 => i64::MAX as f64,
			ComponentDataType::U64 => u64::MAX as f64,
			ComponentDataType::Bool => 1.0,
			ComponentDataType::F32 | ComponentDataType::F64 => 1.0,
		}
	}
	
	/// returns unique id for the data type.
	#[inline]
	pub fn get_id(self) -> u8 {
        match self {
			ComponentDataType::I8 => 1,
            ComponentDataType::U8 => 2,
			ComponentDataType::I16 => 3,
            ComponentDataType::U16 => 4,
			ComponentDataType::I32 => 5,
            ComponentDataType::U32 => 6,
			ComponentDataType::I64 => 7,
            ComponentDataType::U64 => 8,
            ComponentDataType::F32 => 9,
            ComponentDataType::F64 => 10,
			ComponentDataType::Bool => 11,
        }
	}

	#[inline]
	pub fn write_to<W: ByteWriter>(self, writer: &mut W) {
		writer.write_u8(self.get_id());
	}

	/// returns the data type from the given id.
	#[inline]
	pub fn from_id(id: u8) -> Option<Self> {
		match id {
			1 => Some(ComponentDataType::I8),
			2 => Some(ComponentDataType::U8),
			3 => Some(ComponentDataType::I16),
			4 => Some(ComponentDataType::U16),
			5 => Some(ComponentDataType::I32),
			6 => Some(ComponentDataType::U32),
			7 => Some(ComponentDataType::I64),
			8 => Some(ComponentDataType::U64),
			9 => Some(ComponentDataType::F32),
			10 => Some(ComponentDataType::F64),
			11 => Some(ComponentDataType::Bool),
			_ => None,
		}
	}

	/// Reads the data type from the reader.
	#[inline]
	pub fn read_from<R: ByteReader>(reader: &mut R) -> Result<Self, Err> {
		let id = reader.read_u8()?;
		Self::from_id(id).ok_or(Err::InvalidDataTypeId(id))
	}

	/// Reads one little-endian integral component. `bytes` must hold exactly `self.size()` bytes.
	fn read_i64(self, bytes: &[u8]) -> i64 {
		let mut buf = [0_u8; 8];
		buf[..bytes.len()].copy_from_slice(bytes);
		match self {
			ComponentDataType::I8 => bytes[0] as i8 as i64,
			ComponentDataType::U8 | ComponentDataType::Bool => bytes[0] as i64,
			ComponentDataType::I16 => i16::from_le_bytes([buf[0], buf[1]]) as i64,
			ComponentDataType::U16 => u16::from_le_bytes([buf[0], buf[1]]) as i64,
			ComponentDataType::I32 => i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as i64,
			ComponentDataType::U32 => u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as i64,
			ComponentDataType::I64 | ComponentDataType::U64 => i64::from_le_bytes(buf),
			ComponentDataType::F32 | ComponentDataType::F64 => self.read_f64(bytes) as i64,
		}
	}

	fn read_f64(self, bytes: &[u8]) -> f64 {
		match self {
			ComponentDataType::F32 => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
			ComponentDataType::F64 => {
				let mut buf = [0_u8; 8];
				buf.copy_from_slice(&bytes[..8]);
				f64::from_le_bytes(buf)
			},
			_ => self.read_i64(bytes) as f64,
		}
	}

	fn write_i64(self, value: i64, out: &mut Vec<u8>) {
		match self {
			ComponentDataType::I8 | ComponentDataType::U8 => out.push(value as u8),
			ComponentDataType::Bool => out.push((value != 0) as u8),
			ComponentDataType::I16 | ComponentDataType::U16 => out.write_u16(value as u16),
			ComponentDataType::I32 | ComponentDataType::U32 => out.write_u32(value as u32),
			ComponentDataType::I64 | ComponentDataType::U64 => out.write_u64(value as u64),
			ComponentDataType::F32 => out.write_f32(value as f32),
			ComponentDataType::F64 => out.write_u64((value as f64).to_bits()),
		}
	}

	fn write_f64(self, value: f64, out: &mut Vec<u8>) {
		match self {
			ComponentDataType::F32 => out.write_f32(value as f32),
			ComponentDataType::F64 => out.write_u64(value.to_bits()),
			_ => self.write_i64(value as i64, out),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeType {
	Position,
	Normal,
	Color,
	TextureCoordinate,
	Custom,
	Tangent,
	Material,
	Joint,
	Weight,
}

impl AttributeType {
	/// Returns the id of the attribute type.
	#[inline]
	pub(crate) fn get_id(&self) -> u8 {
		match self {
			Self::Position => 0,
			Self::Normal => 1,
			Self::Color => 2,
			Self::TextureCoordinate => 3,
			Self::Custom => 4,
			Self::Tangent => 5,
			Self::Material => 6,
			Self::Joint => 7,
			Self::Weight => 8,
		}
	}

	#[inline]
	pub fn write_to<W: ByteWriter>(&self, writer: &mut W) {
		writer.write_u8(self.get_id());
	}

	#[inline]
	pub(crate) fn from_id(id: u8) -> Result<Self, Err> {
		match id {
			0 => Ok(Self::Position),
			1 => Ok(Self::Normal),
			2 => Ok(Self::Color),
			3 => Ok(Self::TextureCoordinate),
			4 => Ok(Self::Custom),
			5 => Ok(Self::Tangent),
			6 => Ok(Self::Material),
			7 => Ok(Self::Joint),
			8 => Ok(Self::Weight),
			_ => Err(Err::InvalidAttributeTypeId(id)),
		}
	}

	/// Reads the attribute type from the reader.
	#[inline]
	pub fn read_from<R: ByteReader>(reader: &mut R) -> Result<Self, Err> {
		let id = reader.read_u8()?;
		Self::from_id(id)
	}
}

/// Unique id of an attribute, as written in the bitstream.
/// This is not the position of the attribute in the mesh; see `Mesh::attribute_id_by_unique_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AttributeId(usize);

impl AttributeId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the id of the attribute.
    pub fn as_usize(&self) -> usize {
        self.0
    }
}
