use crate::core::shared::{CornerIdx, VertexIdx};
use super::{CornerTable, GenericCornerTable, INVALID_VERTEX};

#[remain::sorted]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Err {
    #[error("Swinging left around vertex {0} comes back to its left-most corner")]
    SeamCycle(VertexIdx),
    #[error("Corner {0} is not reached from any vertex")]
    UnreachedCorner(CornerIdx),
}

/// Corner table of one attribute. Edges on attribute seams are cut, so a
/// mesh vertex splits into one attribute vertex per run of corners between seams.
#[derive(Debug, Clone)]
pub(crate) struct AttributeCornerTable {
    /// Whether the edge opposite to the corner is on a seam.
    is_edge_on_seam: Vec<bool>,
    /// Indexed by the vertices of the mesh corner table.
    is_vertex_on_seam: Vec<bool>,
    opposite_corners: Vec<Option<CornerIdx>>,
    corner_to_vertex: Vec<VertexIdx>,
    left_most_corners: Vec<CornerIdx>,
}

impl AttributeCornerTable {
    /// Builds the table from the corners whose opposite edges are seams.
    pub(crate) fn new(base: &CornerTable, seam_corners: &[CornerIdx]) -> Result<Self, Err> {
        let mut out = Self {
            is_edge_on_seam: vec![false; base.num_corners()],
            is_vertex_on_seam: vec![false; base.num_vertices()],
            opposite_corners: Vec::new(),
            corner_to_vertex: vec![INVALID_VERTEX; base.num_corners()],
            left_most_corners: Vec::new(),
        };
        for &c in seam_corners {
            out.add_seam_edge(base, c);
        }
        out.opposite_corners = (0..base.num_corners())
            .map(|c| if out.is_edge_on_seam[c] { None } else { base.opposite(c) })
            .collect();
        out.recompute_vertices(base)?;
        Ok(out)
    }

    fn add_seam_edge(&mut self, base: &CornerTable, c: CornerIdx) {
        self.is_edge_on_seam[c] = true;
        self.is_vertex_on_seam[base.vertex_idx(base.next(c))] = true;
        self.is_vertex_on_seam[base.vertex_idx(base.previous(c))] = true;
        if let Some(opp) = base.opposite(c) {
            self.is_edge_on_seam[opp] = true;
            self.is_vertex_on_seam[base.vertex_idx(base.next(opp))] = true;
            self.is_vertex_on_seam[base.vertex_idx(base.previous(opp))] = true;
        }
    }

    fn recompute_vertices(&mut self, base: &CornerTable) -> Result<(), Err> {
        let mut num_new_vertices = 0;
        for v in 0..base.num_vertices() {
            let Some(c) = base.left_most_corner(v) else {
                continue;
            };
            let mut first_vert = num_new_vertices;
            num_new_vertices += 1;

            // On a seam, the attribute vertex starts at the first seam reached swinging left.
            let mut first_c = c;
            if self.is_vertex_on_seam[v] {
                let mut curr = self.swing_left(first_c);
                while let Some(curr_c) = curr {
                    first_c = curr_c;
                    curr = self.swing_left(curr_c);
                    if curr == Some(c) {
                        return Err(Err::SeamCycle(v));
                    }
                }
            }
            self.corner_to_vertex[first_c] = first_vert;
            self.left_most_corners.push(first_c);

            let mut curr = base.swing_right(first_c);
            while let Some(curr_c) = curr {
                if curr_c == first_c {
                    break;
                }
                if self.is_edge_on_seam[base.next(curr_c)] {
                    first_vert = num_new_vertices;
                    num_new_vertices += 1;
                    self.left_most_corners.push(curr_c);
                }
                self.corner_to_vertex[curr_c] = first_vert;
                curr = base.swing_right(curr_c);
            }
        }

        match self.corner_to_vertex.iter().position(|&v| v == INVALID_VERTEX) {
            Some(c) => Err(Err::UnreachedCorner(c)),
            None => Ok(()),
        }
    }

    /// Whether the mesh vertex `base_vertex` touches a seam of this attribute.
    pub(crate) fn is_vertex_on_seam(&self, base_vertex: VertexIdx) -> bool {
        self.is_vertex_on_seam[base_vertex]
    }
}

impl GenericCornerTable for AttributeCornerTable {
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
        self.left_most_corners.get(vertex).copied()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::corner_table::tests::quad;

    #[test]
    fn boundary_seams_keep_shared_vertices() {
        let base = quad();
        // every boundary edge, the shared edge stays connected
        let table = AttributeCornerTable::new(&base, &[1, 2, 3, 5]).unwrap();
        assert_eq!(table.num_vertices(), 4);
        assert_eq!(table.vertex_idx(1), table.vertex_idx(3));
        assert_eq!(table.vertex_idx(2), table.vertex_idx(5));
        assert_eq!(table.opposite(0), Some(4));
    }

    #[test]
    fn interior_seam_splits_vertices() {
        let base = quad();
        let table = AttributeCornerTable::new(&base, &[0, 1, 2, 3, 5]).unwrap();
        assert_eq!(table.num_vertices(), 6);
        assert_ne!(table.vertex_idx(1), table.vertex_idx(3));
        assert_ne!(table.vertex_idx(2), table.vertex_idx(5));
        assert_eq!(table.opposite(0), None);
        assert_eq!(table.opposite(4), None);
        assert!(table.is_vertex_on_seam(1));
        assert!(table.is_vertex_on_seam(0));
    }
}
