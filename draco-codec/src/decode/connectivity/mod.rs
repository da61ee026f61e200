pub(crate) mod sequential;
pub(crate) mod spirale_reversi;

use crate::core::bit_coder::ByteReader;
use crate::core::corner_table::attribute_corner_table::AttributeCornerTable;
use crate::core::corner_table::CornerTable;
use crate::core::shared::PointIdx;
use crate::shared::header::{bitstream_version, EncoderMethod};
use super::header::Header;

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Edgebreaker connectivity: {0}")]
    EdgebreakerError(#[from] spirale_reversi::Err),
    #[error("Sequential connectivity: {0}")]
    SequentialError(#[from] sequential::Err),
    #[error("Edgebreaker connectivity of bitstream version {0}.{1} is not supported")]
    UnsupportedEdgebreakerVersion(u8, u8),
}

/// Corner tables of an edgebreaker mesh, one for the vertices and one per
/// attribute seam set. Attributes are ordered and predicted along them.
pub(crate) struct CornerTables {
    pub base: CornerTable,
    pub attributes: Vec<AttributeCornerTable>,
}

pub(crate) struct Connectivity {
    pub faces: Vec<[PointIdx; 3]>,
    pub num_points: usize,
    /// Present for edgebreaker meshes only.
    pub corner_tables: Option<CornerTables>,
}

pub(crate) fn decode_connectivity<R>(reader: &mut R, header: &Header) -> Result<Connectivity, Err>
    where R: ByteReader
{
    match header.encoding_method {
        EncoderMethod::Sequential => Ok(sequential::decode_connectivity(reader, header.version())?),
        EncoderMethod::Edgebreaker => {
            if header.version() < bitstream_version(2, 2) {
                return Err(Err::UnsupportedEdgebreakerVersion(header.version_major, header.version_minor));
            }
            Ok(spirale_reversi::SpiraleReversi::decode_connectivity(reader, header.version())?)
        },
    }
}
