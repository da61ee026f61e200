use crate::core::bit_coder::ByteWriter;
use crate::encode::entropy::symbol_coding::encode_symbols;
use crate::shared::attribute::{to_symbol, PredictionMethod, WrapTransform, PREDICTION_TRANSFORM_WRAP};
use crate::shared::entropy;

/// Writes integer values with the given prediction, either entropy coded or
/// as raw symbols of the smallest sufficient width.
/// Sequential meshes have no corner table, so a parallelogram prediction is
/// written as differences, which is how it is decoded for them.
pub(super) fn encode_integer_values<W>(values: &[i32], num_components: usize, prediction: PredictionMethod, compressed: bool, writer: &mut W)
    -> Result<(), entropy::Err>
    where W: ByteWriter
{
    writer.write_u8(prediction.get_id() as u8);

    let (symbols, wrap) = match prediction {
        PredictionMethod::None => (values.iter().map(|&v| to_symbol(v)).collect::<Vec<_>>(), None),
        PredictionMethod::Difference | PredictionMethod::Parallelogram => {
            writer.write_u8(PREDICTION_TRANSFORM_WRAP as u8);
            let wrap = WrapTransform::from_values(values);
            let symbols = (0..values.len())
                .map(|i| {
                    let predicted = if i < num_components { 0 } else { values[i - num_components] };
                    to_symbol(wrap.compute_correction(values[i], predicted))
                })
                .collect::<Vec<_>>();
            (symbols, Some(wrap))
        },
    };

    writer.write_u8(compressed as u8);
    if compressed {
        encode_symbols(&symbols, num_components, writer)?;
    } else {
        write_raw_symbols(&symbols, writer);
    }

    if let Some(wrap) = wrap {
        wrap.write_to(writer);
    }
    Ok(())
}

fn write_raw_symbols<W>(symbols: &[u32], writer: &mut W)
    where W: ByteWriter
{
    let max_symbol = symbols.iter().copied().max().unwrap_or(0);
    let num_bytes = if max_symbol == 0 { 1 } else { (32 - max_symbol.leading_zeros()).div_ceil(8) };
    writer.write_u8(num_bytes as u8);
    for symbol in symbols {
        for i in 0..num_bytes {
            writer.write_u8((symbol >> (8 * i)) as u8);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smallest_width_is_chosen() {
        let mut buffer = Vec::new();
        encode_integer_values(&[127, -128], 1, PredictionMethod::None, false, &mut buffer).unwrap();
        assert_eq!(buffer, vec![(-2_i8) as u8, 0, 1, 254, 255]);

        let mut buffer = Vec::new();
        encode_integer_values(&[128], 1, PredictionMethod::None, false, &mut buffer).unwrap();
        assert_eq!(buffer, vec![(-2_i8) as u8, 0, 2, 0, 1]);
    }

    #[test]
    fn difference_writes_wrap_bounds() {
        let mut buffer = Vec::new();
        encode_integer_values(&[5, 6, 7], 1, PredictionMethod::Difference, false, &mut buffer).unwrap();
        let mut expected = vec![0, 1, 0, 1, 0, 2, 2];
        expected.extend(5_i32.to_le_bytes());
        expected.extend(7_i32.to_le_bytes());
        assert_eq!(buffer, expected);
    }

    #[test]
    fn entropy_coded_corrections_follow_the_flag() {
        let values = (0..64).map(|i| i * 3).collect::<Vec<_>>();
        let mut raw = Vec::new();
        encode_integer_values(&values, 1, PredictionMethod::Difference, false, &mut raw).unwrap();
        let mut compressed = Vec::new();
        encode_integer_values(&values, 1, PredictionMethod::Difference, true, &mut compressed).unwrap();
        // prediction id, transform id, then the compressed flag
        assert_eq!(compressed[..3], [0, 1, 1]);
        assert!(compressed.len() < raw.len());
    }
}
