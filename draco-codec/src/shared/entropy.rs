/// Lower bound of the normalized state of the binary coder.
pub(crate) const L_RABS_BASE: u32 = 4096;
/// Probabilities of the binary coder are expressed in 1/256 steps.
pub(crate) const RABS_PRECISION: u32 = 256;
/// Bytes are the unit of renormalization for both coders.
pub(crate) const IO_BASE: u32 = 256;

/// Longest bit length the raw scheme accepts for its symbol alphabet.
pub(crate) const MAX_RAW_BIT_LENGTH: u8 = 18;
/// Bit length of the alphabet of tags, which store the bit length of each tagged value.
pub(crate) const TAG_BIT_LENGTH: u8 = 5;

/// Entropy coding scheme of a block of symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SymbolCodingMethod {
    /// Every group of components is prefixed by an entropy coded bit length
    /// and the values follow as plain bits.
    Tagged,
    /// The values themselves are entropy coded.
    Raw,
}

impl SymbolCodingMethod {
    pub(crate) fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(SymbolCodingMethod::Tagged),
            1 => Some(SymbolCodingMethod::Raw),
            _ => None,
        }
    }

    pub(crate) fn get_id(self) -> u8 {
        match self {
            SymbolCodingMethod::Tagged => 0,
            SymbolCodingMethod::Raw => 1,
        }
    }
}

/// Precision, in bits, of the probability table for an alphabet whose
/// symbols need `unique_symbols_bit_length` bits.
pub(crate) const fn rans_precision_bits(unique_symbols_bit_length: u8) -> u32 {
    let precision = 3 * unique_symbols_bit_length as u32 / 2;
    if precision < 12 {
        12
    } else if precision > 20 {
        20
    } else {
        precision
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RansSymbol {
    pub prob: u32,
    pub cum_prob: u32,
}

/// Builds the symbol table and the slot lookup table of a probability table.
/// The probabilities must add up to exactly `1 << precision_bits`.
pub(crate) fn rans_build_tables(probabilities: &[u32], precision_bits: u32) -> Result<(Vec<RansSymbol>, Vec<u32>), Err> {
    let precision = 1_u64 << precision_bits;
    let mut symbols = Vec::with_capacity(probabilities.len());
    let mut lookup = Vec::with_capacity(precision as usize);
    let mut cum_prob = 0_u64;
    for (i, &prob) in probabilities.iter().enumerate() {
        symbols.push(RansSymbol { prob, cum_prob: cum_prob as u32 });
        cum_prob += prob as u64;
        if cum_prob > precision {
            return Err(Err::InvalidProbabilities(cum_prob, precision));
        }
        lookup.resize(cum_prob as usize, i as u32);
    }
    if cum_prob != precision {
        return Err(Err::InvalidProbabilities(cum_prob, precision));
    }
    Ok((symbols, lookup))
}

#[remain::sorted]
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Err {
    #[error("Probabilities add up to {0} instead of {1}")]
    InvalidProbabilities(u64, u64),
}
