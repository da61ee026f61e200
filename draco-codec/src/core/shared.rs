/// Index of a point in a mesh. Every attribute holds exactly one value per point.
pub type PointIdx = usize;

/// Index of a face corner. Corners `3 * f`, `3 * f + 1` and `3 * f + 2` belong to face `f`.
pub type CornerIdx = usize;

/// Index of a vertex of a corner table.
pub type VertexIdx = usize;

pub trait ConfigType {
    fn default()-> Self;
}
