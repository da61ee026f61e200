use crate::core::bit_coder::{ByteReader, ByteWriter, ReaderErr};

/// Per-attribute decoder selected by the sequential attribute encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SequentialDecoderType {
    Generic,
    Integer,
    Quantization,
    Normals,
}

impl SequentialDecoderType {
    pub(crate) fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(SequentialDecoderType::Generic),
            1 => Some(SequentialDecoderType::Integer),
            2 => Some(SequentialDecoderType::Quantization),
            3 => Some(SequentialDecoderType::Normals),
            _ => None,
        }
    }

    pub(crate) fn get_id(self) -> u8 {
        match self {
            SequentialDecoderType::Generic => 0,
            SequentialDecoderType::Integer => 1,
            SequentialDecoderType::Quantization => 2,
            SequentialDecoderType::Normals => 3,
        }
    }

    pub(crate) fn write_to<W>(self, writer: &mut W)
        where W: ByteWriter
    {
        writer.write_u8(self.get_id());
    }
}

/// Mesh element an attribute of an edgebreaker mesh is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MeshAttributeElement {
    /// One value per vertex, ordered along the vertex connectivity.
    Vertex,
    /// Values that may differ between the corners of a vertex, split along attribute seams.
    Corner,
}

impl MeshAttributeElement {
    pub(crate) fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(MeshAttributeElement::Vertex),
            1 => Some(MeshAttributeElement::Corner),
            _ => None,
        }
    }
}

/// Order in which the values of an edgebreaker mesh are visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalMethod {
    DepthFirst,
    PredictionDegree,
}

impl TraversalMethod {
    pub(crate) fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(TraversalMethod::DepthFirst),
            1 => Some(TraversalMethod::PredictionDegree),
            _ => None,
        }
    }
}

/// Prediction scheme applied to integer attribute values.
/// The parallelogram prediction needs the corner table of an edgebreaker mesh;
/// values of sequential meshes written with it are decoded as differences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PredictionMethod {
    None,
    #[default]
    Difference,
    Parallelogram,
}

impl PredictionMethod {
    pub(crate) fn from_id(id: i8) -> Option<Self> {
        match id {
            -2 => Some(PredictionMethod::None),
            0 => Some(PredictionMethod::Difference),
            1 => Some(PredictionMethod::Parallelogram),
            _ => None,
        }
    }

    pub(crate) fn get_id(self) -> i8 {
        match self {
            PredictionMethod::None => -2,
            PredictionMethod::Difference => 0,
            PredictionMethod::Parallelogram => 1,
        }
    }
}

pub(crate) const PREDICTION_TRANSFORM_WRAP: i8 = 1;

/// Maps a signed value onto the unsigned symbol range, small magnitudes first.
#[inline]
pub(crate) fn to_symbol(value: i32) -> u32 {
    if value >= 0 {
        (value as u32) << 1
    } else {
        ((-(value as i64) - 1) as u32) << 1 | 1
    }
}

#[inline]
pub(crate) fn from_symbol(symbol: u32) -> i32 {
    let value = (symbol >> 1) as i32;
    if symbol & 1 == 1 {
        -value - 1
    } else {
        value
    }
}

/// Wrap transform of the difference prediction.
/// Corrections are folded into `[min_correction, max_correction]` so that
/// the reconstructed value always lands back in `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct WrapTransform {
    min: i32,
    max: i32,
    max_dif: i64,
}

impl WrapTransform {
    pub(crate) fn new(min: i32, max: i32) -> Option<Self> {
        if min > max {
            return None;
        }
        let max_dif = 1 + max as i64 - min as i64;
        Some(Self { min, max, max_dif })
    }

    /// Bounds covering all values, or `[0, 0]` when there are none.
    pub(crate) fn from_values(values: &[i32]) -> Self {
        let min = values.iter().copied().min().unwrap_or(0);
        let max = values.iter().copied().max().unwrap_or(0);
        let max_dif = 1 + max as i64 - min as i64;
        Self { min, max, max_dif }
    }

    pub(crate) fn read_from<R>(reader: &mut R) -> Result<Option<Self>, ReaderErr>
        where R: ByteReader
    {
        let min = reader.read_i32()?;
        let max = reader.read_i32()?;
        Ok(Self::new(min, max))
    }

    pub(crate) fn write_to<W>(&self, writer: &mut W)
        where W: ByteWriter
    {
        writer.write_i32(self.min);
        writer.write_i32(self.max);
    }

    #[inline]
    fn clamp_prediction(&self, predicted: i32) -> i64 {
        predicted.clamp(self.min, self.max) as i64
    }

    pub(crate) fn compute_original(&self, predicted: i32, correction: i32) -> i32 {
        let mut value = self.clamp_prediction(predicted) + correction as i64;
        if value > self.max as i64 {
            value -= self.max_dif;
        } else if value < self.min as i64 {
            value += self.max_dif;
        }
        value as i32
    }

    pub(crate) fn compute_correction(&self, original: i32, predicted: i32) -> i32 {
        let mut max_correction = self.max_dif / 2;
        if self.max_dif & 1 == 0 {
            max_correction -= 1;
        }
        let min_correction = -max_correction;
        let mut correction = original as i64 - self.clamp_prediction(predicted);
        if correction < min_correction {
            correction += self.max_dif;
        } else if correction > max_correction {
            correction -= self.max_dif;
        }
        correction as i32
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols() {
        assert_eq!(to_symbol(0), 0);
        assert_eq!(to_symbol(-1), 1);
        assert_eq!(to_symbol(1), 2);
        assert_eq!(to_symbol(-2), 3);
        for value in [0, 1, -1, 1000, -1000, i32::MAX, i32::MIN] {
            assert_eq!(from_symbol(to_symbol(value)), value);
        }
    }

    #[test]
    fn wrap_keeps_values_in_range() {
        let values = [0, 1023, 7, 1000, 512, 3];
        let wrap = WrapTransform::from_values(&values);
        let mut prev = 0;
        for &value in &values {
            let correction = wrap.compute_correction(value, prev);
            assert!(correction.abs() <= 512, "correction {correction} escaped the wrap range");
            assert_eq!(wrap.compute_original(prev, correction), value);
            prev = value;
        }
    }

    #[test]
    fn wrap_rejects_inverted_bounds() {
        assert!(WrapTransform::new(5, 4).is_none());
        assert!(WrapTransform::new(i32::MIN, i32::MAX).is_some());
    }
}
