use crate::core::bit_coder::ByteWriter;

/// Maps float values onto `bits`-bit integers spanning their bounding box.
#[derive(Debug, Clone)]
pub(super) struct Quantizer {
    min_values: Vec<f32>,
    range: f32,
    quantization_bits: u8,
}

impl Quantizer {
    pub(super) fn new(values: &[f32], num_components: usize, quantization_bits: u8) -> Self {
        let mut min_values = vec![f32::MAX; num_components];
        let mut max_values = vec![f32::MIN; num_components];
        for value in values.chunks_exact(num_components) {
            for (c, &v) in value.iter().enumerate() {
                min_values[c] = min_values[c].min(v);
                max_values[c] = max_values[c].max(v);
            }
        }
        if values.is_empty() {
            min_values.fill(0.0);
            max_values.fill(0.0);
        }

        // One range for all components keeps the quantization grid uniform.
        let mut range = min_values.iter().zip(&max_values)
            .map(|(min, max)| max - min)
            .fold(0.0_f32, f32::max);
        if range == 0.0 {
            range = 1.0;
        }

        Self { min_values, range, quantization_bits }
    }

    pub(super) fn quantize(&self, values: &[f32]) -> Vec<i32> {
        let max_quantized_value = ((1_u32 << self.quantization_bits) - 1) as f32;
        let inverse_delta = max_quantized_value / self.range;
        let num_components = self.min_values.len();
        values.iter()
            .enumerate()
            .map(|(i, &v)| ((v - self.min_values[i % num_components]) * inverse_delta + 0.5).floor() as i32)
            .collect()
    }

    pub(super) fn write_to<W>(&self, writer: &mut W)
        where W: ByteWriter
    {
        for &min in &self.min_values {
            writer.write_f32(min);
        }
        writer.write_f32(self.range);
        writer.write_u8(self.quantization_bits);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_range_across_components() {
        let values = [0.0, 10.0, 4.0, 12.0, 2.0, 11.0];
        let quantizer = Quantizer::new(&values, 2, 2);
        assert_eq!(quantizer.min_values, vec![0.0, 10.0]);
        assert_eq!(quantizer.range, 4.0);
        assert_eq!(quantizer.quantize(&values), vec![0, 0, 3, 2, 2, 1]);
    }

    #[test]
    fn constant_values() {
        let quantizer = Quantizer::new(&[3.0, 3.0], 1, 8);
        assert_eq!(quantizer.range, 1.0);
        assert_eq!(quantizer.quantize(&[3.0, 3.0]), vec![0, 0]);
    }
}
