pub(crate) mod attribute_corner_table;

use crate::core::shared::{CornerIdx, VertexIdx};

/// Connectivity of a triangle mesh in terms of corners.
/// Corner `c` sits in face `c / 3`, and the opposite of a corner is the corner
/// across the edge facing it, if that edge is shared by another face.
pub(crate) trait GenericCornerTable {
    fn num_corners(&self) -> usize;
    fn num_vertices(&self) -> usize;
    fn vertex_idx(&self, corner: CornerIdx) -> VertexIdx;
    fn opposite(&self, corner: CornerIdx) -> Option<CornerIdx>;
    fn left_most_corner(&self, vertex: VertexIdx) -> Option<CornerIdx>;

    fn num_faces(&self) -> usize {
        self.num_corners() / 3
    }

    fn next(&self, corner: CornerIdx) -> CornerIdx {
        if corner % 3 == 2 { corner - 2 } else { corner + 1 }
    }

    fn previous(&self, corner: CornerIdx) -> CornerIdx {
        if corner % 3 == 0 { corner + 2 } else { corner - 1 }
    }

    fn swing_right(&self, corner: CornerIdx) -> Option<CornerIdx> {
        self.opposite(self.previous(corner))
            .map(|c| self.previous(c))
    }

    fn swing_left(&self, corner: CornerIdx) -> Option<CornerIdx> {
        self.opposite(self.next(corner))
            .map(|c| self.next(c))
    }

    fn is_on_boundary(&self, vertex: VertexIdx) -> bool {
        match self.left_most_corner(vertex) {
            Some(c) => self.swing_left(c).is_none(),
            None => true,
        }
    }

    fn get_left_corner(&self, corner: CornerIdx) -> Option<CornerIdx> {
        self.opposite(self.previous(corner))
    }

    fn get_right_corner(&self, corner: CornerIdx) -> Option<CornerIdx> {
        self.opposite(self.next(corner))
    }
}

const INVALID_VERTEX: VertexIdx = VertexIdx::MAX;

/// Corner table grown face by face while the connectivity is decoded.
/// Vertices are created on demand and may later be merged away,
/// leaving them without a left-most corner.
#[derive(Debug, Clone, Default)]
pub(crate) struct CornerTable {
    corner_to_vertex: Vec<VertexIdx>,
    opposite_corners: Vec<Option<CornerIdx>>,
    /// The corner from which a vertex's corners are reached by swinging right.
    left_most_corners: Vec<Option<CornerIdx>>,
}

impl CornerTable {
    /// A table of `num_faces` faces whose corners are not mapped to any vertex yet.
    pub(crate) fn with_num_faces(num_faces: usize) -> Self {
        Self {
            corner_to_vertex: vec![INVALID_VERTEX; num_faces * 3],
            opposite_corners: vec![None; num_faces * 3],
            left_most_corners: Vec::new(),
        }
    }

    pub(crate) fn add_new_vertex(&mut self) -> VertexIdx {
        self.left_most_corners.push(None);
        self.left_most_corners.len() - 1
    }

    pub(crate) fn map_corner_to_vertex(&mut self, corner: CornerIdx, vertex: VertexIdx) {
        self.corner_to_vertex[corner] = vertex;
    }

    pub(crate) fn set_left_most_corner(&mut self, vertex: VertexIdx, corner: Option<CornerIdx>) {
        self.left_most_corners[vertex] = corner;
    }

    pub(crate) fn set_opposite_corners(&mut self, c0: CornerIdx, c1: CornerIdx) {
        self.opposite_corners[c0] = Some(c1);
        self.opposite_corners[c1] = Some(c0);
    }

    pub(crate) fn make_vertex_isolated(&mut self, vertex: VertexIdx) {
        self.left_most_corners[vertex] = None;
    }

    /// Whether every corner has been given a vertex.
    pub(crate) fn is_complete(&self) -> bool {
        self.corner_to_vertex.iter().all(|&v| v != INVALID_VERTEX)
    }

    /// Corners around `vertex`, first swinging left from its left-most corner
    /// and then right once the left side ends.
    pub(crate) fn vertex_corners(&self, vertex: VertexIdx) -> Vec<CornerIdx> {
        let Some(start) = self.left_most_corner(vertex) else {
            return Vec::new();
        };
        let mut out = vec![start];
        let mut corner = self.swing_left(start);
        while let Some(c) = corner {
            if c == start {
                return out;
            }
            out.push(c);
            corner = self.swing_left(c);
        }
        corner = self.swing_right(start);
        while let Some(c) = corner {
            if c == start {
                break;
            }
            out.push(c);
            corner = self.swing_right(c);
        }
        out
    }
}

impl GenericCornerTable for CornerTable {
    fn num_corners(&self) -> usize {
        self.corner_to_vertex.len()
    }

    fn num_vertices(&self) -> usize {
        self.left_most_corners.len()
    }

    fn vertex_idx(&self, corner: CornerIdx) -> VertexIdx {
        self.corner_to_vertex[corner]
    }

    fn opposite(&self, corner: CornerIdx) -> Option<CornerIdx> {
        self.opposite_corners[corner]
    }

    fn left_most_corner(&self, vertex: VertexIdx) -> Option<CornerIdx> {
        self.left_most_corners.get(vertex).copied().flatten()
    }
}


#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two triangles sharing the edge between vertices 1 and 2.
    ///
    /// ```text
    /// 2---3
    /// |\  |
    /// | \ |
    /// |  \|
    /// 0---1
    /// ```
    pub(crate) fn quad() -> CornerTable {
        let mut table = CornerTable::with_num_faces(2);
        for _ in 0..4 {
            table.add_new_vertex();
        }
        for (corner, vertex) in [0, 1, 2, 1, 3, 2].into_iter().enumerate() {
            table.map_corner_to_vertex(corner, vertex);
        }
        table.set_opposite_corners(0, 4);
        table.set_left_most_corner(0, Some(0));
        table.set_left_most_corner(1, Some(1));
        table.set_left_most_corner(2, Some(5));
        table.set_left_most_corner(3, Some(4));
        table
    }

    #[test]
    fn swinging_around_a_shared_edge() {
        let table = quad();
        assert!(table.is_complete());
        assert_eq!(table.next(5), 3);
        assert_eq!(table.previous(3), 5);
        // vertex 1 is seen from corner 1 and corner 3
        assert_eq!(table.swing_right(1), Some(3));
        assert_eq!(table.swing_left(3), Some(1));
        assert_eq!(table.swing_left(1), None);
        assert_eq!(table.vertex_corners(1), vec![1, 3]);
        assert_eq!(table.vertex_corners(2), vec![5, 2]);
        assert_eq!(table.get_right_corner(2), Some(4));
        assert_eq!(table.get_left_corner(1), Some(4));
        assert_eq!(table.get_right_corner(1), None);
        assert!(table.is_on_boundary(1));
    }

    #[test]
    fn isolated_vertices_have_no_corners() {
        let mut table = quad();
        table.make_vertex_isolated(3);
        assert_eq!(table.left_most_corner(3), None);
        assert!(table.vertex_corners(3).is_empty());
        assert!(table.is_on_boundary(3));
    }
}
