use crate::core::attribute::ComponentDataType;
use crate::core::bit_coder::{ByteReader, ReaderErr};

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Quantization bits must be in 1..=30, got {0}")]
    InvalidBits(u8),
    #[error("Quantized attributes must be floating point, got {0:?}")]
    NonFloatAttribute(ComponentDataType),
    #[error("Not enough data: {0}")]
    NotEnoughData(#[from] ReaderErr),
}

/// Maps quantized integers back into the original bounding box.
#[derive(Debug, Clone)]
pub(super) struct QuantizationTransform {
    min_values: Vec<f32>,
    range: f32,
    quantization_bits: u8,
}

impl QuantizationTransform {
    pub(super) fn read_from<R>(reader: &mut R, num_components: usize) -> Result<Self, Err>
        where R: ByteReader
    {
        let min_values = (0..num_components)
            .map(|_| reader.read_f32())
            .collect::<Result<Vec<_>, _>>()?;
        let range = reader.read_f32()?;
        let quantization_bits = reader.read_u8()?;
        if !(1..=30).contains(&quantization_bits) {
            return Err(Err::InvalidBits(quantization_bits));
        }
        Ok(Self { min_values, range, quantization_bits })
    }

    pub(super) fn dequantize(&self, values: &[i32]) -> Vec<f32> {
        let max_quantized_value = ((1_u32 << self.quantization_bits) - 1) as f32;
        let delta = self.range / max_quantized_value;
        let num_components = self.min_values.len();
        values.iter()
            .enumerate()
            .map(|(i, &q)| q as f32 * delta + self.min_values[i % num_components])
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::DecoderBuffer;

    #[test]
    fn dequantize_into_bounding_box() {
        let mut data = Vec::new();
        data.extend((-1.0_f32).to_le_bytes());
        data.extend(10.0_f32.to_le_bytes());
        data.extend(2.0_f32.to_le_bytes());
        data.push(2);
        let transform = QuantizationTransform::read_from(&mut DecoderBuffer::new(&data), 2).unwrap();
        let values = transform.dequantize(&[0, 0, 3, 3]);
        assert_eq!(values, vec![-1.0, 10.0, 1.0, 12.0]);
    }

    #[test]
    fn reject_invalid_bits() {
        let mut data = Vec::new();
        data.extend(0.0_f32.to_le_bytes());
        data.extend(1.0_f32.to_le_bytes());
        data.push(31);
        assert!(matches!(
            QuantizationTransform::read_from(&mut DecoderBuffer::new(&data), 1),
            Err(Err::InvalidBits(31))
        ));
    }
}
