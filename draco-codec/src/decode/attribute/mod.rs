mod integer;
mod quantization;
pub(crate) mod sequencer;

use crate::core::attribute::{Attribute, AttributeId, AttributeType, ComponentDataType};
use crate::core::bit_coder::{ByteReader, ReaderErr};
use crate::core::corner_table::GenericCornerTable;
use crate::core::shared::ConfigType;
use crate::shared::attribute::{MeshAttributeElement, SequentialDecoderType, TraversalMethod};
use crate::utils::bit_coder::leb128_read;
use super::connectivity::{Connectivity, CornerTables};
use quantization::QuantizationTransform;
use sequencer::Sequence;

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub leave_quantized: bool,
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            leave_quantized: false,
        }
    }
}

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Attribute data {0} does not exist")]
    AttributeDataOutOfRange(i8),
    #[error("Attribute data {0} is used by more than one attributes decoder")]
    AttributeDataReused(i8),
    #[error("Per-corner attribute decoders need attribute data")]
    CornerDecoderWithoutData,
    #[error("Attribute descriptor error: {0}")]
    DescriptorError(#[from] crate::core::attribute::Err),
    #[error("Integer value error: {0}")]
    IntegerError(#[from] integer::Err),
    #[error("Invalid sequential decoder type id: {0}")]
    InvalidDecoderType(u8),
    #[error("Invalid mesh attribute element id: {0}")]
    InvalidElement(u8),
    #[error("Invalid traversal method id: {0}")]
    InvalidTraversal(u8),
    #[error("An attributes decoder declares no attributes")]
    NoAttributes,
    #[error("Attribute has no components")]
    NoComponents,
    #[error("Not enough data: {0}")]
    NotEnoughData(#[from] ReaderErr),
    #[error("Quantization error: {0}")]
    QuantizationError(#[from] quantization::Err),
    #[error("Attribute value order error: {0}")]
    SequencerError(#[from] sequencer::Err),
    #[error("Attribute values exceed the addressable size")]
    TooManyValues,
    #[error("Octahedral normal coding is not supported")]
    UnsupportedNormals,
    #[error("Traversal method {0:?} is not supported")]
    UnsupportedTraversal(TraversalMethod),
}

/// Attribute whose descriptor has been read but whose values have not.
struct PendingAttribute {
    attribute: Attribute,
    decoder_type: SequentialDecoderType,
}

/// Corner table an attributes decoder of an edgebreaker mesh traverses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TraversedTable {
    /// Corner table of the vertices, shared by all vertex attributes.
    Base,
    Attribute(usize),
}

enum PortableValues {
    Raw(Vec<u8>),
    Integers(Vec<i32>),
}

/// Decodes every attribute of the mesh.
/// The descriptors of all attribute decoders precede the values of any of them.
pub(crate) fn decode_attributes<R>(reader: &mut R, connectivity: &Connectivity, cfg: &Config) -> Result<Vec<Attribute>, Err>
    where R: ByteReader
{
    let num_decoders = reader.read_u8()?;
    let tables = match &connectivity.corner_tables {
        Some(corner_tables) => Some(decode_traversed_tables(reader, num_decoders, corner_tables)?),
        None => None,
    };

    let mut decoders = Vec::new();
    for _ in 0..num_decoders {
        decoders.push(decode_decoder_data(reader)?);
    }

    let mut out = Vec::new();
    for (i, pending) in decoders.into_iter().enumerate() {
        let sequence = match (&connectivity.corner_tables, &tables) {
            (Some(corner_tables), Some(tables)) => {
                let table: &dyn GenericCornerTable = match tables[i] {
                    TraversedTable::Base => &corner_tables.base,
                    TraversedTable::Attribute(id) => &corner_tables.attributes[id],
                };
                sequencer::depth_first(table, &connectivity.faces, connectivity.num_points)?
            },
            _ => Sequence::linear(connectivity.num_points),
        };
        out.extend(decode_values(reader, pending, &sequence, cfg)?);
    }
    Ok(out)
}

/// Reads which corner table each attributes decoder of an edgebreaker mesh follows.
fn decode_traversed_tables<R>(reader: &mut R, num_decoders: u8, corner_tables: &CornerTables) -> Result<Vec<TraversedTable>, Err>
    where R: ByteReader
{
    let mut position_data_used = false;
    let mut attribute_data_used = vec![false; corner_tables.attributes.len()];
    let mut tables = Vec::new();
    for _ in 0..num_decoders {
        let att_data_id = reader.read_i8()?;
        let element_id = reader.read_u8()?;
        let element = MeshAttributeElement::from_id(element_id)
            .ok_or(Err::InvalidElement(element_id))?;
        let traversal_id = reader.read_u8()?;
        match TraversalMethod::from_id(traversal_id) {
            Some(TraversalMethod::DepthFirst) => {},
            Some(method) => return Err(Err::UnsupportedTraversal(method)),
            None => return Err(Err::InvalidTraversal(traversal_id)),
        }

        // a negative id names the positions, which have no seams of their own
        let used = match usize::try_from(att_data_id) {
            Ok(id) => attribute_data_used.get_mut(id)
                .ok_or(Err::AttributeDataOutOfRange(att_data_id))?,
            Err(_) => &mut position_data_used,
        };
        if *used {
            return Err(Err::AttributeDataReused(att_data_id));
        }
        *used = true;

        let table = match (element, usize::try_from(att_data_id)) {
            (MeshAttributeElement::Vertex, _) => TraversedTable::Base,
            (MeshAttributeElement::Corner, Ok(id)) => TraversedTable::Attribute(id),
            (MeshAttributeElement::Corner, Err(_)) => return Err(Err::CornerDecoderWithoutData),
        };
        tables.push(table);
    }
    Ok(tables)
}

fn decode_decoder_data<R>(reader: &mut R) -> Result<Vec<PendingAttribute>, Err>
    where R: ByteReader
{
    let num_attributes = leb128_read(reader)?;
    if num_attributes == 0 {
        return Err(Err::NoAttributes);
    }

    let mut attributes = Vec::new();
    for _ in 0..num_attributes {
        let att_type = AttributeType::read_from(reader)?;
        let component_type = ComponentDataType::read_from(reader)?;
        let num_components = reader.read_u8()? as usize;
        if num_components == 0 {
            return Err(Err::NoComponents);
        }
        let normalized = reader.read_u8()? > 0;
        let unique_id = leb128_read(reader)? as usize;
        attributes.push(
            Attribute::new_empty(AttributeId::new(unique_id), att_type, component_type, num_components, normalized)
        );
    }

    attributes.into_iter()
        .map(|attribute| -> Result<PendingAttribute, Err> {
            let id = reader.read_u8()?;
            let decoder_type = SequentialDecoderType::from_id(id)
                .ok_or(Err::InvalidDecoderType(id))?;
            Ok(PendingAttribute { attribute, decoder_type })
        })
        .collect()
}

/// Spreads values stored in `sequence` order out to one value per point.
fn values_per_point<T: Copy>(values: Vec<T>, width: usize, sequence: &Sequence<'_>) -> Vec<T> {
    match &sequence.point_to_value {
        Some(point_to_value) => point_to_value.iter()
            .flat_map(|&v| values[v * width..(v + 1) * width].iter().copied())
            .collect(),
        None => values,
    }
}

fn decode_values<R>(reader: &mut R, pending: Vec<PendingAttribute>, sequence: &Sequence<'_>, cfg: &Config) -> Result<Vec<Attribute>, Err>
    where R: ByteReader
{
    let num_values = sequence.num_values;

    // Portable values of every attribute come first.
    let mut portables = Vec::with_capacity(pending.len());
    for p in &pending {
        let num_components = p.attribute.get_num_components();
        let portable = match p.decoder_type {
            SequentialDecoderType::Generic => {
                let stride = p.attribute.byte_stride();
                let len = num_values.checked_mul(stride)
                    .ok_or(Err::TooManyValues)?;
                PortableValues::Raw(values_per_point(reader.read_bytes(len)?, stride, sequence))
            },
            SequentialDecoderType::Integer | SequentialDecoderType::Quantization => {
                let len = num_values.checked_mul(num_components)
                    .ok_or(Err::TooManyValues)?;
                let values = integer::decode_integer_values(reader, len, num_components, sequence.mesh_data.as_ref())?;
                PortableValues::Integers(values_per_point(values, num_components, sequence))
            },
            SequentialDecoderType::Normals => return Err(Err::UnsupportedNormals),
        };
        portables.push(portable);
    }

    // Then the data needed to transform them back.
    let mut transforms = Vec::with_capacity(pending.len());
    for p in &pending {
        let transform = match p.decoder_type {
            SequentialDecoderType::Quantization => {
                Some(QuantizationTransform::read_from(reader, p.attribute.get_num_components())?)
            },
            _ => None,
        };
        transforms.push(transform);
    }

    pending.into_iter()
        .zip(portables)
        .zip(transforms)
        .map(|((p, portable), transform)| -> Result<Attribute, Err> {
            let mut attribute = p.attribute;
            match (portable, transform) {
                (PortableValues::Raw(bytes), _) => attribute.set_bytes(bytes),
                (PortableValues::Integers(values), None) => attribute.set_from_i32(&values),
                (PortableValues::Integers(values), Some(_)) if cfg.leave_quantized => {
                    attribute.set_from_i32_as(ComponentDataType::I32, &values)
                },
                (PortableValues::Integers(values), Some(transform)) => {
                    if !attribute.get_component_type().is_float() {
                        return Err(quantization::Err::NonFloatAttribute(attribute.get_component_type()).into());
                    }
                    attribute.set_from_f32(&transform.dequantize(&values));
                },
            }
            Ok(attribute)
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::DecoderBuffer;
    use crate::core::corner_table::attribute_corner_table::AttributeCornerTable;
    use crate::core::corner_table::tests::quad;

    /// Connectivity of a sequential mesh of `num_points` points.
    fn points(num_points: usize) -> Connectivity {
        Connectivity { faces: Vec::new(), num_points, corner_tables: None }
    }

    fn descriptor(att_type: u8, data_type: u8, num_components: u8, unique_id: u8) -> Vec<u8> {
        vec![att_type, data_type, num_components, 0, unique_id]
    }

    #[test]
    fn generic_and_integer_attributes() {
        let mut data = vec![1, 2];
        data.extend(descriptor(0, 9, 1, 0));
        data.extend(descriptor(4, 3, 1, 1));
        data.extend([0, 1]);
        // generic: two f32 values
        data.extend(1.5_f32.to_le_bytes());
        data.extend((-2.0_f32).to_le_bytes());
        // integer: no prediction, raw, one byte per value
        data.extend([(-2_i8) as u8, 0, 1, 4, 3]);

        let mut buffer = DecoderBuffer::new(&data);
        let attributes = decode_attributes(&mut buffer, &points(2), &Config::default()).unwrap();
        assert_eq!(buffer.remaining_size(), 0);
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].float_values_for_all_points(), vec![1.5, -2.0]);
        assert_eq!(attributes[1].get_component_type(), ComponentDataType::I16);
        assert_eq!(attributes[1].int_values_for_all_points(), Some(vec![2, -2]));
    }

    #[test]
    fn quantized_attribute_with_difference_prediction() {
        let mut data = vec![1, 1];
        data.extend(descriptor(3, 9, 2, 7));
        data.push(2);
        // difference prediction with wrap, raw, one byte per value
        data.extend([0, 1, 0, 1]);
        // corrections 0, 0, +1, +1 as symbols
        data.extend([0, 0, 2, 2]);
        // wrap bounds
        data.extend(0_i32.to_le_bytes());
        data.extend(1_i32.to_le_bytes());
        // quantization: min per component, range, bits
        data.extend(0.0_f32.to_le_bytes());
        data.extend(0.0_f32.to_le_bytes());
        data.extend(1.0_f32.to_le_bytes());
        data.push(1);

        let mut buffer = DecoderBuffer::new(&data);
        let attributes = decode_attributes(&mut buffer, &points(2), &Config::default()).unwrap();
        assert_eq!(buffer.remaining_size(), 0);
        assert_eq!(attributes[0].get_id(), AttributeId::new(7));
        assert_eq!(attributes[0].float_values_for_all_points(), vec![0.0, 0.0, 1.0, 1.0]);

        let mut buffer = DecoderBuffer::new(&data);
        let cfg = Config { leave_quantized: true };
        let attributes = decode_attributes(&mut buffer, &points(2), &cfg).unwrap();
        assert_eq!(attributes[0].get_component_type(), ComponentDataType::I32);
        assert_eq!(attributes[0].int_values_for_all_points(), Some(vec![0, 0, 1, 1]));
    }

    /// Edgebreaker connectivity of two triangles. The attribute data, if any,
    /// has a seam on every edge of the two triangles.
    fn two_triangles(attribute_seams: bool) -> Connectivity {
        let base = quad();
        let (faces, num_points, attributes) = if attribute_seams {
            let table = AttributeCornerTable::new(&base, &[0, 1, 2, 3, 5]).unwrap();
            (vec![[0, 1, 2], [3, 4, 5]], 6, vec![table])
        } else {
            (vec![[0, 1, 2], [1, 3, 2]], 4, Vec::new())
        };
        Connectivity { faces, num_points, corner_tables: Some(CornerTables { base, attributes }) }
    }

    fn float_values(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn vertex_values_follow_the_traversal() {
        // positions, per vertex, depth first
        let mut data = vec![1, (-1_i8) as u8, 0, 0];
        data.push(1);
        data.extend(descriptor(0, 9, 1, 0));
        data.push(0);
        // vertices are reached in the order 1, 2, 0, 3
        data.extend(float_values(&[1.0, 2.0, 0.0, 3.0]));

        let mut buffer = DecoderBuffer::new(&data);
        let attributes = decode_attributes(&mut buffer, &two_triangles(false), &Config::default()).unwrap();
        assert_eq!(buffer.remaining_size(), 0);
        assert_eq!(attributes[0].float_values_for_all_points(), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn corner_values_follow_the_attribute_seams() {
        let mut data = vec![1, 0, 1, 0];
        data.push(1);
        data.extend(descriptor(2, 9, 1, 0));
        data.push(0);
        // the corners of the first face, then those of the second one
        data.extend(float_values(&[1.0, 2.0, 0.0, 4.0, 5.0, 3.0]));

        let mut buffer = DecoderBuffer::new(&data);
        let attributes = decode_attributes(&mut buffer, &two_triangles(true), &Config::default()).unwrap();
        assert_eq!(buffer.remaining_size(), 0);
        assert_eq!(attributes[0].float_values_for_all_points(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn reject_invalid_decoder_identities() {
        let decode = |identities: &[u8], seams: bool| {
            let mut data = vec![(identities.len() / 3) as u8];
            data.extend_from_slice(identities);
            decode_attributes(&mut DecoderBuffer::new(&data), &two_triangles(seams), &Config::default())
        };
        assert!(matches!(decode(&[0, 0, 0], false), Err(Err::AttributeDataOutOfRange(0))));
        assert!(matches!(decode(&[0xFF, 0, 0, 0xFF, 0, 0], false), Err(Err::AttributeDataReused(-1))));
        assert!(matches!(decode(&[0xFF, 1, 0], false), Err(Err::CornerDecoderWithoutData)));
        assert!(matches!(decode(&[0, 2, 0], true), Err(Err::InvalidElement(2))));
        assert!(matches!(
            decode(&[0, 1, 1], true),
            Err(Err::UnsupportedTraversal(TraversalMethod::PredictionDegree))
        ));
        assert!(matches!(decode(&[0, 1, 2], true), Err(Err::InvalidTraversal(2))));
    }

    #[test]
    fn reject_unsupported_attributes() {
        let mut data = vec![1, 1];
        data.extend(descriptor(1, 9, 3, 0));
        data.push(3);
        let result = decode_attributes(&mut DecoderBuffer::new(&data), &points(1), &Config::default());
        assert!(matches!(result, Err(Err::UnsupportedNormals)));

        let data = [1, 0];
        let result = decode_attributes(&mut DecoderBuffer::new(&data), &points(1), &Config::default());
        assert!(matches!(result, Err(Err::NoAttributes)));

        let mut data = vec![1, 1];
        data.extend(descriptor(0, 9, 0, 0));
        let result = decode_attributes(&mut DecoderBuffer::new(&data), &points(1), &Config::default());
        assert!(matches!(result, Err(Err::NoComponents)));

        let mut data = vec![1, 1];
        data.extend(descriptor(0, 9, 3, 0));
        data.push(0);
        data.extend([0; 20]);
        let result = decode_attributes(&mut DecoderBuffer::new(&data), &points(2), &Config::default());
        assert!(matches!(result, Err(Err::NotEnoughData(_))));
    }
}
