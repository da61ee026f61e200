use crate::core::bit_coder::ByteWriter;
use crate::shared::entropy::{self, rans_build_tables, RansSymbol, IO_BASE, L_RABS_BASE, RABS_PRECISION};
use crate::utils::bit_coder::leb128_write;

/// Appends the final state so that its last byte tells the decoder how many bytes it spans.
fn write_end(buf: &mut Vec<u8>, state: u32, l_base: u32) {
    let state = state - l_base;
    if state < 1 << 6 {
        buf.push(state as u8);
    } else if state < 1 << 14 {
        buf.extend_from_slice(&((0x01 << 14) + state).to_le_bytes()[..2]);
    } else if state < 1 << 22 {
        buf.extend_from_slice(&((0x02 << 22) + state).to_le_bytes()[..3]);
    } else {
        buf.extend_from_slice(&((0x03 << 30) + state).to_le_bytes());
    }
}

/// Multi-symbol rANS encoder. Symbols must be written in reverse order of decoding.
pub(crate) struct RansEncoder {
    buf: Vec<u8>,
    state: u32,
    precision_bits: u32,
    l_rans_base: u32,
    symbols: Vec<RansSymbol>,
}

impl RansEncoder {
    pub(crate) fn new(probabilities: &[u32], precision_bits: u32) -> Result<Self, entropy::Err> {
        let (symbols, _) = rans_build_tables(probabilities, precision_bits)?;
        let l_rans_base = (1 << precision_bits) * 4;
        Ok(Self { buf: Vec::new(), state: l_rans_base, precision_bits, l_rans_base, symbols })
    }

    pub(crate) fn write(&mut self, symbol: usize) {
        let sym = self.symbols[symbol];
        let bound = self.l_rans_base / (1 << self.precision_bits) * IO_BASE * sym.prob;
        while self.state >= bound {
            self.buf.push(self.state as u8);
            self.state /= IO_BASE;
        }
        self.state = ((self.state / sym.prob) << self.precision_bits) + self.state % sym.prob + sym.cum_prob;
    }

    pub(crate) fn flush(mut self) -> Vec<u8> {
        write_end(&mut self.buf, self.state, self.l_rans_base);
        self.buf
    }
}

/// Binary rANS encoder with a fixed probability of zero, in 1/256 steps.
/// Bits must be written in reverse order of decoding.
pub(crate) struct RabsEncoder {
    buf: Vec<u8>,
    state: u32,
    prob_zero: u32,
}

impl RabsEncoder {
    /// A probability of zero of 0 cannot be coded and is raised to 1.
    pub(crate) fn new(prob_zero: u8) -> Self {
        Self { buf: Vec::new(), state: L_RABS_BASE, prob_zero: prob_zero.max(1) as u32 }
    }

    pub(crate) fn write(&mut self, bit: bool) {
        let p = RABS_PRECISION - self.prob_zero;
        let l_s = if bit { p } else { self.prob_zero };
        if self.state >= L_RABS_BASE / RABS_PRECISION * IO_BASE * l_s {
            self.buf.push(self.state as u8);
            self.state /= IO_BASE;
        }
        let quot = self.state / l_s;
        let rem = self.state % l_s;
        self.state = quot * RABS_PRECISION + rem + if bit { 0 } else { p };
    }

    pub(crate) fn flush(mut self) -> Vec<u8> {
        write_end(&mut self.buf, self.state, L_RABS_BASE);
        self.buf
    }
}

/// Collects bits and writes them with a probability of zero measured over all of them.
#[derive(Debug, Default)]
pub(crate) struct RansBitEncoder {
    bits: Vec<bool>,
}

impl RansBitEncoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn encode_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub(crate) fn end_encoding<W>(self, writer: &mut W)
        where W: ByteWriter
    {
        let num_zeros = self.bits.iter().filter(|&&b| !b).count();
        let total = self.bits.len().max(1);
        let prob_zero = (num_zeros as f64 / total as f64 * 256.0 + 0.5) as u32;
        let prob_zero = prob_zero.clamp(1, 255) as u8;

        let mut encoder = RabsEncoder::new(prob_zero);
        for &bit in self.bits.iter().rev() {
            encoder.write(bit);
        }
        let buf = encoder.flush();

        writer.write_u8(prob_zero);
        leb128_write(buf.len() as u64, writer);
        writer.write_bytes(&buf);
    }
}
