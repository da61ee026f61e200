use crate::core::bit_coder::{BitWriter, ByteWriter};
use crate::shared::entropy::{self, rans_precision_bits, SymbolCodingMethod, TAG_BIT_LENGTH};
use crate::utils::bit_coder::leb128_write;
use super::rans::RansEncoder;

/// Alphabets up to this bit length have their symbols entropy coded directly.
/// Wider values are tagged with their bit length instead.
const MAX_DIRECT_BIT_LENGTH: u8 = 12;

fn bit_length(value: u32) -> u8 {
    (32 - value.leading_zeros()).max(1) as u8
}

/// Encodes symbols that are grouped by `num_components`.
/// `symbols.len()` must be a multiple of `num_components`.
pub(crate) fn encode_symbols<W>(symbols: &[u32], num_components: usize, writer: &mut W) -> Result<(), entropy::Err>
    where W: ByteWriter
{
    let Some(&max_value) = symbols.iter().max() else {
        return Ok(());
    };
    let max_bit_length = bit_length(max_value);
    if max_bit_length <= MAX_DIRECT_BIT_LENGTH {
        writer.write_u8(SymbolCodingMethod::Raw.get_id());
        encode_raw_symbols(symbols, max_bit_length, writer)
    } else {
        writer.write_u8(SymbolCodingMethod::Tagged.get_id());
        encode_tagged_symbols(symbols, num_components.max(1), writer)
    }
}

fn encode_raw_symbols<W>(symbols: &[u32], max_bit_length: u8, writer: &mut W) -> Result<(), entropy::Err>
    where W: ByteWriter
{
    writer.write_u8(max_bit_length);
    let mut frequencies = vec![0_u64; 1 << max_bit_length];
    for &symbol in symbols {
        frequencies[symbol as usize] += 1;
    }
    encode_with_frequencies(symbols.iter().map(|&s| s as usize), &frequencies, rans_precision_bits(max_bit_length), writer)
}

fn encode_tagged_symbols<W>(symbols: &[u32], num_components: usize, writer: &mut W) -> Result<(), entropy::Err>
    where W: ByteWriter
{
    let bit_lengths = symbols.chunks(num_components)
        .map(|group| bit_length(group.iter().copied().max().unwrap_or(0)))
        .collect::<Vec<_>>();
    let mut frequencies = vec![0_u64; 33];
    for &len in &bit_lengths {
        frequencies[len as usize] += 1;
    }
    let tags = bit_lengths.iter().map(|&len| len as usize);
    encode_with_frequencies(tags, &frequencies, rans_precision_bits(TAG_BIT_LENGTH), writer)?;

    let mut values = Vec::new();
    let mut bits = BitWriter::spown_from(&mut values);
    for (group, &len) in symbols.chunks(num_components).zip(&bit_lengths) {
        for &value in group {
            bits.write_bits(len, value);
        }
    }
    bits.flush();
    writer.write_bytes(&values);
    Ok(())
}

/// Writes the probability table derived from `frequencies` followed by the coded block of `symbols`.
fn encode_with_frequencies<I, W>(symbols: I, frequencies: &[u64], precision_bits: u32, writer: &mut W) -> Result<(), entropy::Err>
    where I: DoubleEndedIterator<Item = usize>, W: ByteWriter
{
    let num_symbols = frequencies.iter().rposition(|&f| f > 0).map_or(0, |i| i + 1);
    let probabilities = normalize(&frequencies[..num_symbols], precision_bits);
    write_probability_table(&probabilities, writer);

    let mut encoder = RansEncoder::new(&probabilities, precision_bits)?;
    for symbol in symbols.rev() {
        encoder.write(symbol);
    }
    let buf = encoder.flush();
    leb128_write(buf.len() as u64, writer);
    writer.write_bytes(&buf);
    Ok(())
}

/// Scales frequencies to probabilities adding up to `1 << precision_bits`.
/// Every symbol that occurs keeps a probability of at least one.
fn normalize(frequencies: &[u64], precision_bits: u32) -> Vec<u32> {
    let precision = 1_u64 << precision_bits;
    let total = frequencies.iter().sum::<u64>().max(1);
    let mut probabilities = frequencies.iter()
        .map(|&f| if f == 0 { 0 } else { ((f as u128 * precision as u128 / total as u128) as u64).max(1) })
        .collect::<Vec<_>>();

    let largest = |probabilities: &[u64]| {
        (0..probabilities.len()).max_by_key(|&i| probabilities[i]).unwrap_or(0)
    };
    let sum = probabilities.iter().sum::<u64>();
    if sum < precision {
        let i = largest(&probabilities);
        probabilities[i] += precision - sum;
    } else {
        let mut excess = sum - precision;
        while excess > 0 {
            let i = largest(&probabilities);
            let take = excess.min(probabilities[i] - 1);
            if take == 0 {
                break;
            }
            probabilities[i] -= take;
            excess -= take;
        }
    }
    probabilities.into_iter().map(|p| p as u32).collect()
}

fn write_probability_table<W>(probabilities: &[u32], writer: &mut W)
    where W: ByteWriter
{
    leb128_write(probabilities.len() as u64, writer);
    let mut i = 0;
    while i < probabilities.len() {
        let prob = probabilities[i];
        if prob == 0 {
            // a run of up to 64 zeros, the last entry of the table is never zero
            let mut run = 1;
            while run < 64 && i + run < probabilities.len() && probabilities[i + run] == 0 {
                run += 1;
            }
            writer.write_u8((((run - 1) << 2) | 3) as u8);
            i += run;
        } else {
            let num_extra_bytes = if prob >= 1 << 14 { 2 } else if prob >= 1 << 6 { 1 } else { 0 };
            writer.write_u8(((prob << 2) | num_extra_bytes) as u8);
            for b in 0..num_extra_bytes {
                writer.write_u8((prob >> (8 * (b + 1) - 2)) as u8);
            }
            i += 1;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probabilities_fill_the_precision() {
        let probabilities = normalize(&[1, 0, 1_000_000, 3], 12);
        assert_eq!(probabilities.iter().sum::<u32>(), 4096);
        assert_eq!(probabilities[0], 1);
        assert_eq!(probabilities[1], 0);
        assert_eq!(probabilities[3], 1);

        let probabilities = normalize(&[1; 4096], 12);
        assert!(probabilities.iter().all(|&p| p == 1));
    }

    #[test]
    fn zero_runs_are_collapsed() {
        let mut buffer = Vec::new();
        let mut probabilities = vec![0; 70];
        probabilities.push(100);
        write_probability_table(&probabilities, &mut buffer);
        // 71 entries, a run of 64, a run of 6, then 100 with one extra byte
        assert_eq!(buffer, vec![71, (63 << 2) | 3, (5 << 2) | 3, (100 << 2 | 1) as u8, 1]);
    }

    #[test]
    fn no_symbols_no_output() {
        let mut buffer = Vec::new();
        encode_symbols(&[], 3, &mut buffer).unwrap();
        assert!(buffer.is_empty());
    }
}
