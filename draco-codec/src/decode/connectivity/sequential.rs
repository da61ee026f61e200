use crate::core::bit_coder::{ByteReader, ReaderErr};
use crate::core::shared::PointIdx;
use crate::shared::connectivity::{IndexWidth, SequentialMethod};
use crate::shared::header::bitstream_version;
use crate::utils::bit_coder::leb128_read;
use crate::decode::entropy::symbol_coding::{self, decode_symbols};
use super::Connectivity;

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Entropy coded indices: {0}")]
    EntropyError(#[from] symbol_coding::Err),
    #[error("Face index {0} is out of range for {1} points")]
    IndexOutOfRange(u64, usize),
    #[error("Index delta of -{0} goes below zero")]
    InvalidIndexDelta(u32),
    #[error("Invalid connectivity method id: {0}")]
    InvalidMethod(u8),
    #[error("Not enough data: {0}")]
    NotEnoughData(#[from] ReaderErr),
    #[error("{0} faces cannot fit in the remaining input")]
    TooManyFaces(u64),
}

pub(crate) fn decode_connectivity<R>(reader: &mut R, version: u16) -> Result<Connectivity, Err>
    where R: ByteReader
{
    let has_varint_counts = version >= bitstream_version(2, 2);
    let (num_faces, num_points) = if has_varint_counts {
        (leb128_read(reader)?, leb128_read(reader)?)
    } else {
        (reader.read_u32()? as u64, reader.read_u32()? as u64)
    };
    if num_faces > u32::MAX as u64 / 3 {
        return Err(Err::TooManyFaces(num_faces));
    }
    let num_points = usize::try_from(num_points)
        .map_err(|_| ReaderErr::NotEnoughData)?;

    let method = reader.read_u8()?;
    let faces = match SequentialMethod::from_id(method) {
        Some(SequentialMethod::Raw) => decode_raw_indices(reader, num_faces, num_points, has_varint_counts)?,
        Some(SequentialMethod::Compressed) => decode_compressed_indices(reader, num_faces as usize, num_points)?,
        None => return Err(Err::InvalidMethod(method)),
    };

    Ok(Connectivity { faces, num_points, corner_tables: None })
}

fn decode_raw_indices<R>(reader: &mut R, num_faces: u64, num_points: usize, has_varint_counts: bool) -> Result<Vec<[PointIdx; 3]>, Err>
    where R: ByteReader
{
    let width = IndexWidth::for_point_count(num_points, has_varint_counts);
    let mut faces = Vec::new();
    for _ in 0..num_faces {
        let mut face = [0; 3];
        for corner in face.iter_mut() {
            let index = width.read_index(reader)?;
            if index >= num_points as u64 {
                return Err(Err::IndexOutOfRange(index, num_points));
            }
            *corner = index as PointIdx;
        }
        faces.push(face);
    }
    Ok(faces)
}

/// Indices are entropy coded as differences to the previous index,
/// the lowest bit of each symbol holding the sign.
fn decode_compressed_indices<R>(reader: &mut R, num_faces: usize, num_points: usize) -> Result<Vec<[PointIdx; 3]>, Err>
    where R: ByteReader
{
    let symbols = decode_symbols(num_faces * 3, 1, reader)?;
    let mut last = 0_u64;
    let mut faces = Vec::with_capacity(num_faces);
    for chunk in symbols.chunks_exact(3) {
        let mut face = [0; 3];
        for (corner, &symbol) in face.iter_mut().zip(chunk) {
            let delta = (symbol >> 1) as u64;
            let index = if symbol & 1 == 1 {
                last.checked_sub(delta).ok_or(Err::InvalidIndexDelta(symbol >> 1))?
            } else {
                last + delta
            };
            if index >= num_points as u64 {
                return Err(Err::IndexOutOfRange(index, num_points));
            }
            *corner = index as PointIdx;
            last = index;
        }
        faces.push(face);
    }
    Ok(faces)
}
