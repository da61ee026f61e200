use crate::core::bit_coder::{BitReader, ByteReader, ReaderErr};
use crate::shared::entropy::{rans_precision_bits, SymbolCodingMethod, MAX_RAW_BIT_LENGTH, TAG_BIT_LENGTH};
use super::rans::{self, RansSymbolDecoder};

#[remain::sorted]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Err {
    #[error("Invalid bit length {0} of a tagged value")]
    InvalidBitLength(usize),
    #[error("Invalid symbol coding method {0}")]
    InvalidMethod(u8),
    #[error("Invalid bit length {0} of a raw symbol alphabet")]
    InvalidRawBitLength(u8),
    #[error("Not enough data: {0}")]
    NotEnoughData(#[from] ReaderErr),
    #[error("Entropy coder error: {0}")]
    Rans(#[from] rans::Err),
    #[error("{0} values do not split into groups of {1} components")]
    ValueCountMismatch(usize, usize),
}

/// Decodes `num_values` symbols that were coded in groups of `num_components`.
pub(crate) fn decode_symbols<R>(num_values: usize, num_components: usize, reader: &mut R) -> Result<Vec<u32>, Err>
    where R: ByteReader
{
    if num_values == 0 {
        return Ok(Vec::new());
    }
    let method = reader.read_u8()?;
    match SymbolCodingMethod::from_id(method) {
        Some(SymbolCodingMethod::Tagged) => decode_tagged_symbols(num_values, num_components, reader),
        Some(SymbolCodingMethod::Raw) => decode_raw_symbols(num_values, reader),
        None => Err(Err::InvalidMethod(method)),
    }
}

fn decode_tagged_symbols<R>(num_values: usize, num_components: usize, reader: &mut R) -> Result<Vec<u32>, Err>
    where R: ByteReader
{
    if num_components == 0 || num_values % num_components != 0 {
        return Err(Err::ValueCountMismatch(num_values, num_components));
    }
    let mut tags = RansSymbolDecoder::read_from(reader, rans_precision_bits(TAG_BIT_LENGTH))?;

    // the plain bits of the values start right after the tag block
    let mut bits = BitReader::spown_from(reader);
    let mut out = Vec::new();
    for _ in 0..num_values / num_components {
        let bit_length = tags.decode_symbol();
        if bit_length > 32 {
            return Err(Err::InvalidBitLength(bit_length));
        }
        for _ in 0..num_components {
            out.push(bits.read_bits(bit_length as u8)?);
        }
    }
    Ok(out)
}

fn decode_raw_symbols<R>(num_values: usize, reader: &mut R) -> Result<Vec<u32>, Err>
    where R: ByteReader
{
    let max_bit_length = reader.read_u8()?;
    if max_bit_length == 0 || max_bit_length > MAX_RAW_BIT_LENGTH {
        return Err(Err::InvalidRawBitLength(max_bit_length));
    }
    let mut decoder = RansSymbolDecoder::read_from(reader, rans_precision_bits(max_bit_length))?;
    let mut out = Vec::new();
    for _ in 0..num_values {
        out.push(decoder.decode_symbol() as u32);
    }
    Ok(out)
}
