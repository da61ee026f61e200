use crate::core::bit_coder::ByteWriter;
use crate::core::shared::PointIdx;
use crate::shared::connectivity::{IndexWidth, SequentialMethod};
use crate::shared::entropy;
use crate::utils::bit_coder::leb128_write;
use super::entropy::symbol_coding::encode_symbols;

/// Writes the faces of a sequential mesh. Indices are entropy coded as
/// differences when `compressed` is set, and stored as plain values sized
/// by the number of points otherwise.
pub(crate) fn encode_connectivity<W>(faces: &[[PointIdx; 3]], num_points: usize, compressed: bool, writer: &mut W) -> Result<(), entropy::Err>
    where W: ByteWriter
{
    leb128_write(faces.len() as u64, writer);
    leb128_write(num_points as u64, writer);
    if compressed {
        writer.write_u8(SequentialMethod::Compressed.get_id());
        return encode_index_deltas(faces, writer);
    }
    writer.write_u8(SequentialMethod::Raw.get_id());

    let width = IndexWidth::for_point_count(num_points, true);
    for face in faces {
        for &index in face {
            width.write_index(index, writer);
        }
    }
    Ok(())
}

/// Each index becomes the magnitude of its difference to the previous index,
/// shifted up by one bit that holds the sign.
pub(crate) fn encode_index_deltas<W>(faces: &[[PointIdx; 3]], writer: &mut W) -> Result<(), entropy::Err>
    where W: ByteWriter
{
    let mut last = 0_i64;
    let symbols = faces.iter()
        .flatten()
        .map(|&index| {
            let delta = index as i64 - last;
            last = index as i64;
            ((delta.unsigned_abs() as u32) << 1) | (delta < 0) as u32
        })
        .collect::<Vec<_>>();
    encode_symbols(&symbols, 1, writer)
}
