use crate::core::bit_coder::{ByteReader, ReaderErr};
use crate::shared::entropy::{
    self, rans_build_tables, RansSymbol, IO_BASE, L_RABS_BASE, RABS_PRECISION
};
use crate::shared::header::bitstream_version;
use crate::utils::bit_coder::leb128_read;

#[remain::sorted]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Err {
    #[error("Coded block of {0} bytes cannot be addressed")]
    BlockTooLarge(u64),
    #[error("Invalid initial coder state")]
    InvalidState,
    #[error("Not enough data: {0}")]
    NotEnoughData(#[from] ReaderErr),
    #[error("Probability table error: {0}")]
    ProbabilityError(#[from] entropy::Err),
    #[error("Run of zero probabilities overflows the {0} symbols of the table")]
    ZeroRunOverflow(usize),
}

/// Reads the final coder state from the tail of `buf`. The two top bits of the
/// last byte give the number of further bytes holding the state.
/// Returns the state and the number of bytes left in front of it.
fn read_init(buf: &[u8], l_base: u32, allow_four_bytes: bool) -> Result<(u32, usize), Err> {
    let Some(&last) = buf.last() else {
        return Err(Err::InvalidState);
    };
    let len = buf.len();
    let (state, offset) = match last >> 6 {
        0 => ((last & 0x3F) as u32, len - 1),
        1 if len >= 2 => (u16::from_le_bytes([buf[len - 2], last]) as u32 & 0x3FFF, len - 2),
        2 if len >= 3 => (u32::from_le_bytes([buf[len - 3], buf[len - 2], last, 0]) & 0x3F_FFFF, len - 3),
        3 if allow_four_bytes && len >= 4 => {
            (u32::from_le_bytes([buf[len - 4], buf[len - 3], buf[len - 2], last]) & 0x3FFF_FFFF, len - 4)
        },
        _ => return Err(Err::InvalidState),
    };
    let state = state + l_base;
    if state as u64 >= l_base as u64 * IO_BASE as u64 {
        return Err(Err::InvalidState);
    }
    Ok((state, offset))
}

/// Reads a block length and then the block itself.
fn read_block<R>(reader: &mut R) -> Result<Vec<u8>, Err>
    where R: ByteReader
{
    let size = leb128_read(reader)?;
    let size = usize::try_from(size).map_err(|_| Err::BlockTooLarge(size))?;
    Ok(reader.read_bytes(size)?)
}

/// Multi-symbol rANS decoder over an in-memory block.
/// The block is consumed back to front, mirroring the encoder that wrote it front to back in reverse symbol order.
pub(crate) struct RansDecoder {
    buf: Vec<u8>,
    offset: usize,
    state: u32,
    precision_bits: u32,
    l_rans_base: u32,
    symbols: Vec<RansSymbol>,
    lookup: Vec<u32>,
}

impl RansDecoder {
    pub(crate) fn new(buf: Vec<u8>, probabilities: &[u32], precision_bits: u32) -> Result<Self, Err> {
        let (symbols, lookup) = rans_build_tables(probabilities, precision_bits)?;
        let l_rans_base = (1 << precision_bits) * 4;
        let (state, offset) = read_init(&buf, l_rans_base, true)?;
        Ok(Self { buf, offset, state, precision_bits, l_rans_base, symbols, lookup })
    }

    pub(crate) fn read(&mut self) -> usize {
        while self.state < self.l_rans_base && self.offset > 0 {
            self.offset -= 1;
            self.state = self.state * IO_BASE + self.buf[self.offset] as u32;
        }
        let quo = self.state >> self.precision_bits;
        let rem = self.state & ((1 << self.precision_bits) - 1);
        let idx = self.lookup[rem as usize] as usize;
        let symbol = self.symbols[idx];
        self.state = quo * symbol.prob + rem - symbol.cum_prob;
        idx
    }
}

/// Binary rANS decoder with a fixed probability of zero, in 1/256 steps.
pub(crate) struct RabsDecoder {
    buf: Vec<u8>,
    offset: usize,
    state: u32,
    prob_zero: u8,
}

impl RabsDecoder {
    pub(crate) fn new(buf: Vec<u8>, prob_zero: u8) -> Result<Self, Err> {
        let (state, offset) = read_init(&buf, L_RABS_BASE, false)?;
        Ok(Self { buf, offset, state, prob_zero })
    }

    pub(crate) fn read(&mut self) -> bool {
        let p = RABS_PRECISION - self.prob_zero as u32;
        if self.state < L_RABS_BASE && self.offset > 0 {
            self.offset -= 1;
            self.state = self.state * IO_BASE + self.buf[self.offset] as u32;
        }
        let quo = self.state / RABS_PRECISION;
        let rem = self.state % RABS_PRECISION;
        let xn = quo * p;
        if rem < p {
            self.state = xn + rem;
            true
        } else {
            self.state -= xn + p;
            false
        }
    }
}

/// Decoder of a stream of bits that was written with a single adaptive probability.
/// The stream is a probability of zero, a block length and the coded block.
pub(crate) struct RansBitDecoder {
    decoder: RabsDecoder,
}

impl RansBitDecoder {
    pub(crate) fn read_from<R>(reader: &mut R, version: u16) -> Result<Self, Err>
        where R: ByteReader
    {
        let prob_zero = reader.read_u8()?;
        let buf = if version < bitstream_version(2, 2) {
            let size = reader.read_u32()? as usize;
            reader.read_bytes(size)?
        } else {
            read_block(reader)?
        };
        Ok(Self { decoder: RabsDecoder::new(buf, prob_zero)? })
    }

    #[inline]
    pub(crate) fn decode_next_bit(&mut self) -> bool {
        self.decoder.read()
    }
}

/// Decoder of symbols drawn from an alphabet with a transmitted probability table.
pub(crate) struct RansSymbolDecoder {
    decoder: RansDecoder,
}

impl RansSymbolDecoder {
    /// Reads the probability table and the coded block.
    pub(crate) fn read_from<R>(reader: &mut R, precision_bits: u32) -> Result<Self, Err>
        where R: ByteReader
    {
        let num_symbols = leb128_read(reader)?;
        let num_symbols = usize::try_from(num_symbols).map_err(|_| Err::BlockTooLarge(num_symbols))?;

        // Each entry starts with a byte whose two low bits give the number of
        // extra bytes of the probability. The value 3 instead marks a run of
        // zero probabilities whose length is in the upper six bits.
        let mut probabilities = Vec::new();
        while probabilities.len() < num_symbols {
            let data = reader.read_u8()?;
            let token = data & 3;
            if token == 3 {
                let run = (data >> 2) as usize + 1;
                if probabilities.len() + run > num_symbols {
                    return Err(Err::ZeroRunOverflow(num_symbols));
                }
                probabilities.resize(probabilities.len() + run, 0);
            } else {
                let mut prob = (data >> 2) as u32;
                for b in 0..token as u32 {
                    prob |= (reader.read_u8()? as u32) << (8 * (b + 1) - 2);
                }
                probabilities.push(prob);
            }
        }

        let buf = read_block(reader)?;
        let decoder = RansDecoder::new(buf, &probabilities, precision_bits)?;
        Ok(Self { decoder })
    }

    #[inline]
    pub(crate) fn decode_symbol(&mut self) -> usize {
        self.decoder.read()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::DecoderBuffer;
    use crate::encode::entropy::rans::{RabsEncoder, RansBitEncoder, RansEncoder};

    #[test]
    fn symbols_come_back_in_order() {
        let probabilities = [1000, 2000, 0, 1096];
        let data = (0..3000_usize).map(|i| [0, 1, 3, 1][i * 7 % 4]).collect::<Vec<_>>();
        let mut encoder = RansEncoder::new(&probabilities, 12).unwrap();
        for &symbol in data.iter().rev() {
            encoder.write(symbol);
        }
        let buf = encoder.flush();

        let mut decoder = RansDecoder::new(buf, &probabilities, 12).unwrap();
        for &symbol in &data {
            assert_eq!(decoder.read(), symbol);
        }
    }

    #[test]
    fn bits_come_back_in_order() {
        let bits = (0..1000).map(|i| i % 9 == 0).collect::<Vec<_>>();
        let mut encoder = RabsEncoder::new(30);
        for &bit in bits.iter().rev() {
            encoder.write(bit);
        }
        let buf = encoder.flush();

        let mut decoder = RabsDecoder::new(buf, 30).unwrap();
        for &bit in &bits {
            assert_eq!(decoder.read(), bit);
        }
    }

    #[test]
    fn single_zero_bit() {
        // probability of zero 255, block of one byte holding the state
        let data = [255, 1, 0x11, 0xAA];
        let mut buffer = DecoderBuffer::new(&data);
        let mut decoder = RansBitDecoder::read_from(&mut buffer, 0x0202).unwrap();
        assert!(!decoder.decode_next_bit());
        assert_eq!(buffer.remaining_size(), 1);
    }

    #[test]
    fn bit_encoder_output_is_readable() {
        let bits = [true, false, false, true, true, true, false];
        let mut encoder = RansBitEncoder::new();
        for &bit in &bits {
            encoder.encode_bit(bit);
        }
        let mut buffer = Vec::new();
        encoder.end_encoding(&mut buffer);

        let mut reader = DecoderBuffer::new(&buffer);
        let mut decoder = RansBitDecoder::read_from(&mut reader, 0x0202).unwrap();
        for &bit in &bits {
            assert_eq!(decoder.decode_next_bit(), bit);
        }
        assert_eq!(reader.remaining_size(), 0);
    }

    #[test]
    fn reject_invalid_blocks() {
        assert!(matches!(RabsDecoder::new(Vec::new(), 128), Err(Err::InvalidState)));
        // the binary coder has no four byte state
        assert!(matches!(RabsDecoder::new(vec![0, 0, 0, 0xC0], 128), Err(Err::InvalidState)));
        // a two byte state needs two bytes
        assert!(matches!(RansDecoder::new(vec![0x40], &[4096], 12), Err(Err::InvalidState)));

        // a run of four zeros in a table of three symbols
        let data = [3, (3 << 2) | 3];
        assert!(matches!(
            RansSymbolDecoder::read_from(&mut DecoderBuffer::new(&data), 12),
            Err(Err::ZeroRunOverflow(3))
        ));
        // probabilities adding up to 4095
        let data = [1, 0xFD, 0x3F, 1, 0x00];
        assert!(matches!(
            RansSymbolDecoder::read_from(&mut DecoderBuffer::new(&data), 12),
            Err(Err::ProbabilityError(_))
        ));
    }
}
