use serde::{Deserialize, Serialize};

use crate::codec::{AttributeSelector, MeshHandle};

#[remain::sorted]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Err {
    #[error("Attribute {att_id} has {found} components, expected {expected}")]
    ComponentMismatch { att_id: usize, expected: usize, found: usize },
    #[error("Attribute {0} has no values")]
    MissingValues(usize),
    #[error("No attribute matches {0:?}")]
    NotFound(AttributeSelector),
}

/// A record built from `STRIDE` consecutive floats.
pub trait PointRecord: Sized {
    const STRIDE: usize;

    /// `window` holds exactly `STRIDE` values.
    fn from_window(window: &[f32]) -> Self;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl PointRecord for Point3 {
    const STRIDE: usize = 3;

    fn from_window(window: &[f32]) -> Self {
        Self { x: window[0], y: window[1], z: window[2] }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl PointRecord for Point2 {
    const STRIDE: usize = 2;

    fn from_window(window: &[f32]) -> Self {
        Self { x: window[0], y: window[1] }
    }
}

/// Splits a flat buffer into records, in point order. A trailing partial window is dropped.
pub fn flatten<P: PointRecord>(values: &[f32]) -> Vec<P> {
    values.chunks_exact(P::STRIDE)
        .map(P::from_window)
        .collect()
}

/// Resolves the selected attribute and returns one record per point of the mesh.
pub fn extract<P, M>(mesh: &M, selector: &AttributeSelector) -> Result<Vec<P>, Err>
    where 
        P: PointRecord,
        M: MeshHandle,
{
    let att_id = selector.resolve(mesh)
        .ok_or_else(|| Err::NotFound(selector.clone()))?;

    let num_components = mesh.attribute_num_components(att_id)
        .ok_or(Err::MissingValues(att_id))?;
    if num_components != P::STRIDE {
        return Err(Err::ComponentMismatch { att_id, expected: P::STRIDE, found: num_components });
    }

    // The buffer is dropped as soon as the records are built.
    let values = mesh.attribute_float_for_all_points(att_id)
        .ok_or(Err::MissingValues(att_id))?;
    Ok(flatten(&values[..values.len().min(mesh.num_points().saturating_mul(P::STRIDE))]))
}
