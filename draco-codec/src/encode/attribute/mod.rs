mod integer;
mod quantization;

use crate::core::attribute::{Attribute, AttributeId, AttributeType, ComponentDataType};
use crate::core::bit_coder::ByteWriter;
use crate::core::shared::ConfigType;
use crate::shared::attribute::{PredictionMethod, SequentialDecoderType};
use crate::shared::entropy;
use crate::utils::bit_coder::leb128_write;
use quantization::Quantizer;

#[derive(Debug, Clone)]
pub(crate) struct Config {
    /// Quantization bits per attribute type. Float attributes of other types are stored as is.
    pub quantization: Vec<(AttributeType, u8)>,
    pub prediction: PredictionMethod,
    /// Entropy codes the corrections of integer and quantized attributes.
    pub entropy_coding: bool,
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            quantization: Vec::new(),
            prediction: PredictionMethod::Difference,
            entropy_coding: false,
        }
    }
}

impl Config {
    fn quantization_bits(&self, att_type: AttributeType) -> Option<u8> {
        self.quantization.iter()
            .find(|(ty, _)| *ty == att_type)
            .map(|&(_, bits)| bits)
    }
}

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Entropy coding error: {0}")]
    EntropyError(#[from] entropy::Err),
    #[error("Quantization bits must be in 1..=30, got {0}")]
    InvalidQuantizationBits(u8),
    #[error("The attribute {0:?} has no components")]
    NoComponents(AttributeId),
    #[error("The attribute {0:?} has {1} values, but the mesh has {2} points")]
    PointCountMismatch(AttributeId, usize, usize),
    #[error("The attribute {0:?} has {1} components; at most 255 can be encoded")]
    TooManyComponents(AttributeId, usize),
}

/// How one attribute is written.
enum Plan {
    Generic,
    Integer,
    Quantization(Quantizer),
}

impl Plan {
    fn decoder_type(&self) -> SequentialDecoderType {
        match self {
            Plan::Generic => SequentialDecoderType::Generic,
            Plan::Integer => SequentialDecoderType::Integer,
            Plan::Quantization(_) => SequentialDecoderType::Quantization,
        }
    }
}

/// Writes all attributes with a single sequential attributes encoder.
pub(crate) fn encode_attributes<W>(attributes: &[Attribute], num_points: usize, writer: &mut W, cfg: &Config) -> Result<(), Err>
    where W: ByteWriter
{
    if attributes.is_empty() {
        writer.write_u8(0);
        return Ok(());
    }

    let plans = attributes.iter()
        .map(|att| plan_attribute(att, num_points, cfg))
        .collect::<Result<Vec<_>, _>>()?;

    // Encode the attributes decoder data
    writer.write_u8(1);
    leb128_write(attributes.len() as u64, writer);
    for att in attributes {
        att.get_attribute_type().write_to(writer);
        att.get_component_type().write_to(writer);
        writer.write_u8(att.get_num_components() as u8);
        writer.write_u8(att.is_normalized() as u8);
        leb128_write(att.get_id().as_usize() as u64, writer);
    }
    for plan in &plans {
        plan.decoder_type().write_to(writer);
    }

    // Encode the portable values
    for (att, plan) in attributes.iter().zip(&plans) {
        match plan {
            Plan::Generic => writer.write_bytes(att.as_bytes()),
            Plan::Integer => {
                let values = att.int_values_for_all_points()
                    .unwrap_or_default()
                    .into_iter()
                    .map(|v| v as i32)
                    .collect::<Vec<_>>();
                integer::encode_integer_values(&values, att.get_num_components(), cfg.prediction, cfg.entropy_coding, writer)?;
            },
            Plan::Quantization(quantizer) => {
                let values = quantizer.quantize(&att.float_values_for_all_points());
                integer::encode_integer_values(&values, att.get_num_components(), cfg.prediction, cfg.entropy_coding, writer)?;
            },
        }
    }

    // Encode the data needed by the transforms
    for plan in &plans {
        if let Plan::Quantization(quantizer) = plan {
            quantizer.write_to(writer);
        }
    }

    Ok(())
}

fn plan_attribute(att: &Attribute, num_points: usize, cfg: &Config) -> Result<Plan, Err> {
    if att.get_num_components() == 0 {
        return Err(Err::NoComponents(att.get_id()));
    }
    if att.len() != num_points {
        return Err(Err::PointCountMismatch(att.get_id(), att.len(), num_points));
    }
    if att.get_num_components() > u8::MAX as usize {
        return Err(Err::TooManyComponents(att.get_id(), att.get_num_components()));
    }

    let component_type = att.get_component_type();
    let plan = match cfg.quantization_bits(att.get_attribute_type()) {
        Some(bits) if component_type == ComponentDataType::F32 => {
            if !(1..=30).contains(&bits) {
                return Err(Err::InvalidQuantizationBits(bits));
            }
            Plan::Quantization(
                Quantizer::new(&att.float_values_for_all_points(), att.get_num_components(), bits)
            )
        },
        _ => match component_type {
            ComponentDataType::I8 | ComponentDataType::U8 |
            ComponentDataType::I16 | ComponentDataType::U16 |
            ComponentDataType::I32 | ComponentDataType::U32 |
            ComponentDataType::Bool => Plan::Integer,
            ComponentDataType::I64 | ComponentDataType::U64 |
            ComponentDataType::F32 | ComponentDataType::F64 => Plan::Generic,
        },
    };
    Ok(plan)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::DecoderBuffer;
    use crate::decode::attribute as decoder;
    use crate::decode::connectivity::Connectivity;

    fn round_trip(attributes: &[Attribute], num_points: usize, cfg: &Config) -> Vec<Attribute> {
        let mut buffer = Vec::new();
        encode_attributes(attributes, num_points, &mut buffer, cfg).unwrap();
        let mut reader = DecoderBuffer::new(&buffer);
        let connectivity = Connectivity { faces: Vec::new(), num_points, corner_tables: None };
        let out = decoder::decode_attributes(&mut reader, &connectivity, &ConfigType::default()).unwrap();
        assert_eq!(reader.remaining_size(), 0);
        out
    }

    #[test]
    fn unquantized_floats_are_exact() {
        let values = [0.1_f32, -3.75, 1e-7, 12345.678, f32::MAX, 0.0];
        let att = Attribute::from_f32(AttributeId::new(0), AttributeType::Position, 3, &values);
        let out = round_trip(&[att.clone()], 2, &Config::default());
        assert_eq!(out[0].as_bytes(), att.as_bytes());
        assert_eq!(out[0].get_id(), att.get_id());
    }

    #[test]
    fn integer_attributes_keep_their_type() {
        let mut att = Attribute::new_empty(AttributeId::new(5), AttributeType::Color, ComponentDataType::U8, 4, true);
        att.set_from_i32(&[255, 0, 128, 255, 1, 2, 3, 4, 250, 251, 252, 253]);
        for prediction in [PredictionMethod::None, PredictionMethod::Difference, PredictionMethod::Parallelogram] {
            let cfg = Config { prediction, ..Config::default() };
            let out = round_trip(&[att.clone()], 3, &cfg);
            assert_eq!(out[0].get_component_type(), ComponentDataType::U8);
            assert!(out[0].is_normalized());
            assert_eq!(out[0].as_bytes(), att.as_bytes());
        }

        let mut att = Attribute::new_empty(AttributeId::new(0), AttributeType::Custom, ComponentDataType::U32, 1, false);
        att.set_from_i32(&[0, -1, i32::MIN]);
        let out = round_trip(&[att.clone()], 3, &Config::default());
        assert_eq!(out[0].int_values_for_all_points(), Some(vec![0, u32::MAX as i64, 1 << 31]));
    }

    #[test]
    fn quantized_values_stay_within_half_a_step() {
        let values = [0.0_f32, 0.0, 0.3, 0.7, 1.0, 0.25, 0.9, 0.1];
        let att = Attribute::from_f32(AttributeId::new(1), AttributeType::TextureCoordinate, 2, &values);
        let cfg = Config {
            quantization: vec![(AttributeType::TextureCoordinate, 10)],
            ..Config::default()
        };
        let out = round_trip(&[att], 4, &cfg);
        let step = 1.0 / 1023.0;
        for (a, b) in out[0].float_values_for_all_points().iter().zip(values) {
            assert!((a - b).abs() <= step / 2.0 + 1e-6, "{a} vs {b}");
        }
    }

    #[test]
    fn entropy_coded_values_round_trip() {
        let values = (0..40).map(|i| (i as f32 * 0.37).sin()).collect::<Vec<_>>();
        let att = Attribute::from_f32(AttributeId::new(0), AttributeType::Position, 2, &values);
        let mut colors = Attribute::new_empty(AttributeId::new(1), AttributeType::Color, ComponentDataType::I32, 1, false);
        colors.set_from_i32(&(0..20).map(|i| i * i * 1000 - 70_000).collect::<Vec<_>>());
        let cfg = Config {
            quantization: vec![(AttributeType::Position, 14)],
            entropy_coding: true,
            ..Config::default()
        };
        let out = round_trip(&[att, colors.clone()], 20, &cfg);
        for (a, b) in out[0].float_values_for_all_points().iter().zip(&values) {
            assert!((a - b).abs() <= 1e-3, "{a} vs {b}");
        }
        assert_eq!(out[1].as_bytes(), colors.as_bytes());
    }

    #[test]
    fn reject_invalid_input() {
        let att = Attribute::from_f32(AttributeId::new(0), AttributeType::Position, 3, &[0.0; 6]);
        let result = encode_attributes(&[att.clone()], 3, &mut Vec::new(), &Config::default());
        assert!(matches!(result, Err(Err::PointCountMismatch(_, 2, 3))));

        let cfg = Config {
            quantization: vec![(AttributeType::Position, 31)],
            ..Config::default()
        };
        let result = encode_attributes(&[att], 2, &mut Vec::new(), &cfg);
        assert!(matches!(result, Err(Err::InvalidQuantizationBits(31))));
    }
}
