use crate::core::corner_table::GenericCornerTable;
use crate::core::shared::{CornerIdx, PointIdx, VertexIdx};

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Traversal reached corner {0}, which leads nowhere")]
    BrokenTraversal(CornerIdx),
    #[error("Vertex {0} was never visited by the traversal")]
    UnvisitedVertex(VertexIdx),
    #[error("Value {0} is out of range for {1} points")]
    ValueOutOfRange(usize, usize),
}

/// Connectivity available to mesh prediction schemes while values are decoded.
pub(crate) struct MeshPredictionData<'t> {
    pub table: &'t dyn GenericCornerTable,
    pub vertex_to_value: Vec<Option<usize>>,
    /// Corner from which each value was first reached.
    pub value_to_corner: Vec<CornerIdx>,
}

impl MeshPredictionData<'_> {
    #[inline]
    pub fn value_of(&self, corner: CornerIdx) -> Option<usize> {
        self.vertex_to_value.get(self.table.vertex_idx(corner)).copied().flatten()
    }
}

/// Order in which the values of an attributes decoder are stored.
pub(crate) struct Sequence<'t> {
    pub num_values: usize,
    /// Value of every point, or `None` if there is one value per point in point order.
    pub point_to_value: Option<Vec<usize>>,
    pub mesh_data: Option<MeshPredictionData<'t>>,
}

impl Sequence<'_> {
    /// Values of sequentially encoded meshes.
    pub fn linear(num_points: usize) -> Self {
        Self { num_values: num_points, point_to_value: None, mesh_data: None }
    }
}

struct DepthFirst<'t> {
    table: &'t dyn GenericCornerTable,
    visited_faces: Vec<bool>,
    visited_vertices: Vec<bool>,
    data: MeshPredictionData<'t>,
}

impl<'t> DepthFirst<'t> {
    fn is_face_visited(&self, corner: Option<CornerIdx>) -> bool {
        corner.map_or(true, |c| self.visited_faces[c / 3])
    }

    fn visit_vertex(&mut self, corner: CornerIdx) -> Result<bool, Err> {
        let vertex = self.table.vertex_idx(corner);
        let visited = self.visited_vertices.get_mut(vertex)
            .ok_or(Err::BrokenTraversal(corner))?;
        if *visited {
            return Ok(false);
        }
        *visited = true;
        self.data.vertex_to_value[vertex] = Some(self.data.value_to_corner.len());
        self.data.value_to_corner.push(corner);
        Ok(true)
    }

    /// Visits the component of the face of `corner`, turning right first at every
    /// vertex and coming back for the left sides it skipped.
    fn traverse_from(&mut self, corner: CornerIdx) -> Result<(), Err> {
        if self.visited_faces[corner / 3] {
            return Ok(());
        }
        // the first face has no neighbor that visited its other two vertices
        self.visit_vertex(self.table.next(corner))?;
        self.visit_vertex(self.table.previous(corner))?;

        let mut stack = vec![corner];
        while let Some(&top) = stack.last() {
            if self.visited_faces[top / 3] {
                stack.pop();
                continue;
            }
            let mut corner = top;
            loop {
                self.visited_faces[corner / 3] = true;
                if self.visit_vertex(corner)? && !self.table.is_on_boundary(self.table.vertex_idx(corner)) {
                    corner = self.table.get_right_corner(corner)
                        .ok_or(Err::BrokenTraversal(corner))?;
                    continue;
                }

                let right = self.table.get_right_corner(corner);
                let left = self.table.get_left_corner(corner);
                match (self.is_face_visited(right), self.is_face_visited(left), right, left) {
                    (true, true, _, _) => {
                        stack.pop();
                        break;
                    },
                    (true, false, _, Some(left)) => corner = left,
                    (false, true, Some(right), _) => corner = right,
                    (false, false, Some(right), Some(left)) => {
                        // right first, the left side waits on the stack
                        if let Some(top) = stack.last_mut() {
                            *top = left;
                        }
                        stack.push(right);
                        break;
                    },
                    // a missing neighbor always counts as visited
                    _ => return Err(Err::BrokenTraversal(corner)),
                }
            }
        }
        Ok(())
    }
}

/// Orders values by a depth-first traversal of `table`, one value per vertex of the table.
/// `faces` gives the point of every corner of the decoded mesh.
pub(crate) fn depth_first<'t>(table: &'t dyn GenericCornerTable, faces: &[[PointIdx; 3]], num_points: usize)
    -> Result<Sequence<'t>, Err>
{
    let mut traversal = DepthFirst {
        table,
        visited_faces: vec![false; table.num_faces()],
        visited_vertices: vec![false; table.num_vertices()],
        data: MeshPredictionData {
            table,
            vertex_to_value: vec![None; table.num_vertices()],
            value_to_corner: Vec::new(),
        },
    };
    for face in 0..table.num_faces() {
        traversal.traverse_from(3 * face)?;
    }
    let data = traversal.data;

    let mut point_to_value = vec![0; num_points];
    for (f, face) in faces.iter().enumerate().take(table.num_faces()) {
        for (k, &point) in face.iter().enumerate() {
            let vertex = table.vertex_idx(3 * f + k);
            let value = data.vertex_to_value.get(vertex).copied().flatten()
                .ok_or(Err::UnvisitedVertex(vertex))?;
            if value >= num_points || point >= num_points {
                return Err(Err::ValueOutOfRange(value, num_points));
            }
            point_to_value[point] = value;
        }
    }

    Ok(Sequence {
        num_values: data.value_to_corner.len(),
        point_to_value: Some(point_to_value),
        mesh_data: Some(data),
    })
}
