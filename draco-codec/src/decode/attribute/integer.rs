use crate::core::bit_coder::{ByteReader, ReaderErr};
use crate::decode::entropy::symbol_coding::{self, decode_symbols};
use crate::shared::attribute::{from_symbol, PredictionMethod, WrapTransform, PREDICTION_TRANSFORM_WRAP};
use super::sequencer::MeshPredictionData;

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Entropy coded values: {0}")]
    EntropyError(#[from] symbol_coding::Err),
    #[error("Invalid number of bytes per value: {0}")]
    InvalidValueWidth(u8),
    #[error("Wrap transform has its minimum above its maximum")]
    InvalidWrapBounds,
    #[error("Not enough data: {0}")]
    NotEnoughData(#[from] ReaderErr),
    #[error("Unsupported prediction method id: {0}")]
    UnsupportedPrediction(i8),
    #[error("Unsupported prediction transform id: {0}")]
    UnsupportedTransform(i8),
}

/// Decodes `num_values` integers, undoing the prediction they were encoded with.
/// `mesh_data` carries the traversal of an edgebreaker mesh, which the parallelogram prediction follows.
pub(super) fn decode_integer_values<R>(reader: &mut R, num_values: usize, num_components: usize, mesh_data: Option<&MeshPredictionData<'_>>)
    -> Result<Vec<i32>, Err>
    where R: ByteReader
{
    let method = reader.read_i8()?;
    let method = PredictionMethod::from_id(method)
        .ok_or(Err::UnsupportedPrediction(method))?;
    if method != PredictionMethod::None {
        let transform = reader.read_i8()?;
        if transform != PREDICTION_TRANSFORM_WRAP {
            return Err(Err::UnsupportedTransform(transform));
        }
    }

    let compressed = reader.read_u8()?;
    let symbols = if compressed > 0 {
        decode_symbols(num_values, num_components, reader)?
    } else {
        read_raw_symbols(reader, num_values)?
    };
    let mut values = symbols.into_iter()
        .map(from_symbol)
        .collect::<Vec<_>>();

    if method == PredictionMethod::None {
        return Ok(values);
    }
    let wrap = WrapTransform::read_from(reader)?
        .ok_or(Err::InvalidWrapBounds)?;
    match (method, mesh_data) {
        (PredictionMethod::Parallelogram, Some(mesh_data)) => {
            undo_parallelogram(&mut values, num_components, &wrap, mesh_data);
        },
        _ => undo_difference(&mut values, num_components, &wrap),
    }
    Ok(values)
}

fn read_raw_symbols<R>(reader: &mut R, num_values: usize) -> Result<Vec<u32>, Err>
    where R: ByteReader
{
    let num_bytes = reader.read_u8()?;
    if num_bytes == 0 || num_bytes > 4 {
        return Err(Err::InvalidValueWidth(num_bytes));
    }
    let mut symbols = Vec::new();
    for _ in 0..num_values {
        let mut symbol = 0_u32;
        for i in 0..num_bytes {
            symbol |= (reader.read_u8()? as u32) << (8 * i as u32);
        }
        symbols.push(symbol);
    }
    Ok(symbols)
}

/// The first value is predicted from zero, every later one from its predecessor.
fn undo_difference(values: &mut [i32], num_components: usize, wrap: &WrapTransform) {
    for i in 0..values.len() {
        let predicted = if i < num_components { 0 } else { values[i - num_components] };
        values[i] = wrap.compute_original(predicted, values[i]);
    }
}

/// Completes the parallelogram spanned by the face across the edge facing the corner
/// of each value. Values whose parallelogram is not decoded yet use the difference to their predecessor.
fn undo_parallelogram(values: &mut [i32], num_components: usize, wrap: &WrapTransform, mesh_data: &MeshPredictionData<'_>) {
    let num_entries = (values.len() / num_components).min(mesh_data.value_to_corner.len());
    for c in 0..num_components.min(values.len()) {
        values[c] = wrap.compute_original(0, values[c]);
    }
    let table = mesh_data.table;
    for p in 1..num_entries {
        let corner = mesh_data.value_to_corner[p];
        let entries = table.opposite(corner).and_then(|opp| {
            let opp_value = mesh_data.value_of(opp)?;
            let next_value = mesh_data.value_of(table.next(opp))?;
            let prev_value = mesh_data.value_of(table.previous(opp))?;
            Some([opp_value, next_value, prev_value]).filter(|entries| entries.iter().all(|&e| e < p))
        });
        let dst = p * num_components;
        for c in 0..num_components {
            let predicted = match entries {
                Some([opp, next, prev]) => {
                    let parallelogram = values[next * num_components + c] as i64
                        + values[prev * num_components + c] as i64
                        - values[opp * num_components + c] as i64;
                    parallelogram as i32
                },
                None => values[dst - num_components + c],
            };
            values[dst + c] = wrap.compute_original(predicted, values[dst + c]);
        }
    }
}
