use std::collections::HashMap;

use crate::core::bit_coder::{BitReader, ByteReader, ReaderErr};
use crate::core::corner_table::attribute_corner_table::{self, AttributeCornerTable};
use crate::core::corner_table::{CornerTable, GenericCornerTable};
use crate::core::shared::{CornerIdx, PointIdx, VertexIdx};
use crate::decode::entropy::rans::{self, RansBitDecoder};
use crate::utils::bit_coder::leb128_read;
use super::{Connectivity, CornerTables};

/// Traversal type of the plain edgebreaker, which stores every symbol with a fixed bit pattern.
const STANDARD_TRAVERSAL: u8 = 0;

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Attribute seam error: {0}")]
    AttributeSeamError(#[from] attribute_corner_table::Err),
    #[error("Corner {0} is matched to a face that already has a neighbor")]
    CornerAlreadyMatched(CornerIdx),
    #[error("Decoded faces have a repeated vertex")]
    DegenerateFace,
    #[error("{0} faces were decoded, but {1} were declared")]
    FaceCountMismatch(usize, usize),
    #[error("Invalid topology split: {0}")]
    InvalidTopologySplit(&'static str),
    #[error("Vertex {0} has lost its corners")]
    InvalidVertex(VertexIdx),
    #[error("The traversal needs an active edge, but none is left")]
    NoActiveEdge,
    #[error("Not enough data: {0}")]
    NotEnoughData(#[from] ReaderErr),
    #[error("Point {0} is out of range for {1} points")]
    PointOutOfRange(PointIdx, usize),
    #[error("Entropy coder error: {0}")]
    Rans(#[from] rans::Err),
    #[error("Swinging around vertex {0} never reaches a seam")]
    SeamNotFound(VertexIdx),
    #[error("Counts of the header do not fit together: {0}")]
    TooMany(&'static str),
    #[error("More vertices were decoded than the {0} declared")]
    TooManyVertices(usize),
    #[error("Unsupported edgebreaker traversal type: {0}")]
    UnsupportedTraversal(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Symbol {
    C,
    S,
    L,
    R,
    E,
}

/// Side of the face of the source symbol that a topology split attaches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Orientation {
    Left,
    Right,
}

/// Two parts of the traversal that meet again at an S symbol.
/// Symbol ids count in the encoder's order, which is the reverse of decoding.
#[derive(Clone, Copy, Debug)]
struct TopologySplit {
    source_symbol_idx: usize,
    split_symbol_idx: usize,
    source_edge: Orientation,
}

/// Reads the symbol stream, one bit for C and three bits for every other symbol.
struct SymbolReader {
    bits: std::vec::IntoIter<u8>,
    current: u8,
    num_bits_left: u8,
}

impl SymbolReader {
    fn new(buf: Vec<u8>) -> Self {
        Self { bits: buf.into_iter(), current: 0, num_bits_left: 0 }
    }

    fn read_bit(&mut self) -> Result<u8, ReaderErr> {
        if self.num_bits_left == 0 {
            self.current = self.bits.read_u8()?;
            self.num_bits_left = 8;
        }
        let bit = self.current & 1;
        self.current >>= 1;
        self.num_bits_left -= 1;
        Ok(bit)
    }

    fn read_symbol(&mut self) -> Result<Symbol, ReaderErr> {
        if self.read_bit()? == 0 {
            return Ok(Symbol::C);
        }
        let suffix = self.read_bit()? | (self.read_bit()? << 1);
        Ok(match suffix {
            0 => Symbol::S,
            1 => Symbol::L,
            2 => Symbol::R,
            _ => Symbol::E,
        })
    }
}

/// Rebuilds the mesh from an edgebreaker stream by replaying its symbols in reverse.
pub(crate) struct SpiraleReversi {
    corner_table: CornerTable,
    /// Vertices on an open boundary. Split symbols add one vertex each that is merged away later.
    is_vert_hole: Vec<bool>,
    topology_splits: Vec<TopologySplit>,
    num_faces: usize,
    num_encoded_symbols: usize,
    num_attribute_data: usize,
}

impl SpiraleReversi {
    /// Decodes the connectivity that follows the traversal type byte and the counts.
    pub(crate) fn decode_connectivity<R>(reader: &mut R, version: u16) -> Result<Connectivity, Err>
        where R: ByteReader
    {
        let traversal_type = reader.read_u8()?;
        if traversal_type != STANDARD_TRAVERSAL {
            return Err(Err::UnsupportedTraversal(traversal_type));
        }

        let num_vertices = leb128_read(reader)?;
        let num_faces = leb128_read(reader)?;
        if num_faces > u32::MAX as u64 / 3 {
            return Err(Err::TooMany("faces"));
        }
        if num_vertices > num_faces * 3 {
            return Err(Err::TooMany("vertices for the faces"));
        }
        let num_attribute_data = reader.read_u8()? as usize;
        let num_encoded_symbols = leb128_read(reader)?;
        if num_faces < num_encoded_symbols || num_faces > num_encoded_symbols + num_encoded_symbols / 3 {
            return Err(Err::TooMany("faces for the symbols"));
        }
        let num_split_symbols = leb128_read(reader)?;
        if num_split_symbols > num_encoded_symbols {
            return Err(Err::TooMany("split symbols"));
        }
        let topology_splits = read_topology_splits(reader, num_faces)?;

        let size = leb128_read(reader)?;
        let symbols = reader.read_bytes(usize::try_from(size).map_err(|_| ReaderErr::NotEnoughData)?)?;
        // every symbol takes at least one bit
        if num_encoded_symbols > symbols.len() as u64 * 8 {
            return Err(Err::NotEnoughData(ReaderErr::NotEnoughData));
        }
        let mut start_faces = RansBitDecoder::read_from(reader, version)?;
        let mut seam_decoders = (0..num_attribute_data)
            .map(|_| RansBitDecoder::read_from(reader, version))
            .collect::<Result<Vec<_>, _>>()?;

        let (num_vertices, num_faces, num_encoded_symbols, num_split_symbols) =
            (num_vertices as usize, num_faces as usize, num_encoded_symbols as usize, num_split_symbols as usize);
        let mut decoder = Self {
            corner_table: CornerTable::with_num_faces(num_faces),
            is_vert_hole: vec![true; num_vertices + num_split_symbols],
            topology_splits,
            num_faces,
            num_encoded_symbols,
            num_attribute_data,
        };
        let num_connectivity_verts = decoder.replay_symbols(SymbolReader::new(symbols), &mut start_faces)?;

        let seam_corners = decoder.decode_attribute_seams(&mut seam_decoders);
        let attribute_tables = seam_corners.iter()
            .map(|seams| AttributeCornerTable::new(&decoder.corner_table, seams))
            .collect::<Result<Vec<_>, _>>()?;

        let (faces, num_points) = decoder.assign_points_to_corners(&attribute_tables, num_connectivity_verts)?;
        if let Some(&point) = faces.iter().flatten().find(|&&p| p >= num_points) {
            return Err(Err::PointOutOfRange(point, num_points));
        }
        Ok(Connectivity {
            faces,
            num_points,
            corner_tables: Some(CornerTables { base: decoder.corner_table, attributes: attribute_tables }),
        })
    }

    /// Builds the corner table face by face. Returns the number of vertices in use.
    fn replay_symbols(&mut self, mut symbols: SymbolReader, start_faces: &mut RansBitDecoder) -> Result<usize, Err> {
        let max_num_vertices = self.is_vert_hole.len();
        let remove_invalid_vertices = self.num_attribute_data == 0;
        let mut invalid_vertices = Vec::new();
        let mut active_corner_stack: Vec<CornerIdx> = Vec::new();
        let mut topology_split_active_corners: HashMap<usize, CornerIdx> = HashMap::new();

        let mut num_faces = 0;
        for symbol_id in 0..self.num_encoded_symbols {
            let corner = 3 * num_faces;
            num_faces += 1;
            let mut check_topology_split = false;
            match symbols.read_symbol()? {
                Symbol::C => {
                    // A face closing the gap between the active edge "a" and the
                    // boundary edge "b" that follows it around the vertex "x".
                    let corner_a = *active_corner_stack.last().ok_or(Err::NoActiveEdge)?;
                    let table = &mut self.corner_table;
                    let vertex_x = table.vertex_idx(table.next(corner_a));
                    let corner_b = table.next(
                        table.left_most_corner(vertex_x).ok_or(Err::InvalidVertex(vertex_x))?
                    );
                    if corner_a == corner_b {
                        return Err(Err::CornerAlreadyMatched(corner_a));
                    }
                    for c in [corner_a, corner_b] {
                        if table.opposite(c).is_some() {
                            return Err(Err::CornerAlreadyMatched(c));
                        }
                    }
                    table.set_opposite_corners(corner_a, corner + 1);
                    table.set_opposite_corners(corner_b, corner + 2);

                    let vert_a_prev = table.vertex_idx(table.previous(corner_a));
                    let vert_b_next = table.vertex_idx(table.next(corner_b));
                    if vertex_x == vert_a_prev || vertex_x == vert_b_next {
                        return Err(Err::DegenerateFace);
                    }
                    table.map_corner_to_vertex(corner, vertex_x);
                    table.map_corner_to_vertex(corner + 1, vert_b_next);
                    table.map_corner_to_vertex(corner + 2, vert_a_prev);
                    table.set_left_most_corner(vert_a_prev, Some(corner + 2));
                    // the tip is now surrounded by faces
                    self.is_vert_hole[vertex_x] = false;
                    *active_corner_stack.last_mut().ok_or(Err::NoActiveEdge)? = corner;
                },
                symbol @ (Symbol::R | Symbol::L) => {
                    // A face on the active edge with a new vertex at its tip.
                    let corner_a = *active_corner_stack.last().ok_or(Err::NoActiveEdge)?;
                    let table = &mut self.corner_table;
                    if table.opposite(corner_a).is_some() {
                        return Err(Err::CornerAlreadyMatched(corner_a));
                    }
                    let (opp_corner, corner_l, corner_r) = if symbol == Symbol::R {
                        (corner + 2, corner + 1, corner)
                    } else {
                        (corner + 1, corner, corner + 2)
                    };
                    table.set_opposite_corners(opp_corner, corner_a);
                    let new_vertex = table.add_new_vertex();
                    if table.num_vertices() > max_num_vertices {
                        return Err(Err::TooManyVertices(max_num_vertices));
                    }
                    table.map_corner_to_vertex(opp_corner, new_vertex);
                    table.set_left_most_corner(new_vertex, Some(opp_corner));

                    let vertex_r = table.vertex_idx(table.previous(corner_a));
                    table.map_corner_to_vertex(corner_r, vertex_r);
                    table.set_left_most_corner(vertex_r, Some(corner_r));
                    let vertex_l = table.vertex_idx(table.next(corner_a));
                    table.map_corner_to_vertex(corner_l, vertex_l);

                    *active_corner_stack.last_mut().ok_or(Err::NoActiveEdge)? = corner;
                    check_topology_split = true;
                },
                Symbol::S => {
                    // A face joining the two topmost active edges. The vertices at
                    // corners "p" and "n" turn out to be one and are merged.
                    let corner_b = active_corner_stack.pop().ok_or(Err::NoActiveEdge)?;
                    if let Some(c) = topology_split_active_corners.remove(&symbol_id) {
                        active_corner_stack.push(c);
                    }
                    let corner_a = *active_corner_stack.last().ok_or(Err::NoActiveEdge)?;
                    if corner_a == corner_b {
                        return Err(Err::CornerAlreadyMatched(corner_a));
                    }
                    let table = &mut self.corner_table;
                    for c in [corner_a, corner_b] {
                        if table.opposite(c).is_some() {
                            return Err(Err::CornerAlreadyMatched(c));
                        }
                    }
                    table.set_opposite_corners(corner_a, corner + 2);
                    table.set_opposite_corners(corner_b, corner + 1);

                    let vertex_p = table.vertex_idx(table.previous(corner_a));
                    table.map_corner_to_vertex(corner, vertex_p);
                    let vertex_a_next = table.vertex_idx(table.next(corner_a));
                    table.map_corner_to_vertex(corner + 1, vertex_a_next);
                    let vert_b_prev = table.vertex_idx(table.previous(corner_b));
                    table.map_corner_to_vertex(corner + 2, vert_b_prev);
                    table.set_left_most_corner(vert_b_prev, Some(corner + 2));

                    let mut corner_n = table.next(corner_b);
                    let vertex_n = table.vertex_idx(corner_n);
                    let left_most_n = table.left_most_corner(vertex_n);
                    table.set_left_most_corner(vertex_p, left_most_n);
                    // every corner of "n" reached counterclockwise now belongs to "p"
                    let first_corner = corner_n;
                    loop {
                        table.map_corner_to_vertex(corner_n, vertex_p);
                        match table.swing_left(corner_n) {
                            Some(c) if c == first_corner => return Err(Err::InvalidVertex(vertex_n)),
                            Some(c) => corner_n = c,
                            None => break,
                        }
                    }
                    table.make_vertex_isolated(vertex_n);
                    if remove_invalid_vertices {
                        invalid_vertices.push(vertex_n);
                    }
                    *active_corner_stack.last_mut().ok_or(Err::NoActiveEdge)? = corner;
                },
                Symbol::E => {
                    // A new component starts with a face of three new vertices.
                    let table = &mut self.corner_table;
                    let first_vertex = table.add_new_vertex();
                    table.map_corner_to_vertex(corner, first_vertex);
                    let v = table.add_new_vertex();
                    table.map_corner_to_vertex(corner + 1, v);
                    let v = table.add_new_vertex();
                    table.map_corner_to_vertex(corner + 2, v);
                    if table.num_vertices() > max_num_vertices {
                        return Err(Err::TooManyVertices(max_num_vertices));
                    }
                    for i in 0..3 {
                        table.set_left_most_corner(first_vertex + i, Some(corner + i));
                    }
                    active_corner_stack.push(corner);
                    check_topology_split = true;
                },
            }

            if check_topology_split {
                // A face from an L, R or E symbol may be where a split part of the
                // traversal continues. Its free edge then waits for the matching S symbol.
                let encoder_symbol_id = self.num_encoded_symbols - symbol_id - 1;
                while let Some(split) = self.take_topology_split(encoder_symbol_id)? {
                    let act_top_corner = *active_corner_stack.last().ok_or(Err::NoActiveEdge)?;
                    let new_active_corner = match split.source_edge {
                        Orientation::Right => self.corner_table.next(act_top_corner),
                        Orientation::Left => self.corner_table.previous(act_top_corner),
                    };
                    let decoder_split_symbol_id = self.num_encoded_symbols
                        .checked_sub(split.split_symbol_idx + 1)
                        .ok_or(Err::InvalidTopologySplit("split symbol out of range"))?;
                    topology_split_active_corners.insert(decoder_split_symbol_id, new_active_corner);
                }
            }
        }

        // Each remaining active edge was opened by a start face, either an
        // interior face closing three edges or a boundary.
        while let Some(corner) = active_corner_stack.pop() {
            let interior_face = start_faces.decode_next_bit();
            if !interior_face {
                continue;
            }
            if num_faces >= self.num_faces {
                return Err(Err::FaceCountMismatch(num_faces + 1, self.num_faces));
            }
            let table = &mut self.corner_table;
            let vert_n = table.vertex_idx(table.next(corner));
            let corner_b = table.next(table.left_most_corner(vert_n).ok_or(Err::InvalidVertex(vert_n))?);
            let vert_x = table.vertex_idx(table.next(corner_b));
            let corner_c = table.next(table.left_most_corner(vert_x).ok_or(Err::InvalidVertex(vert_x))?);
            if corner == corner_b || corner == corner_c || corner_b == corner_c {
                return Err(Err::CornerAlreadyMatched(corner));
            }
            for c in [corner, corner_b, corner_c] {
                if table.opposite(c).is_some() {
                    return Err(Err::CornerAlreadyMatched(c));
                }
            }
            let vert_p = table.vertex_idx(table.next(corner_c));

            let new_corner = 3 * num_faces;
            num_faces += 1;
            table.set_opposite_corners(new_corner, corner);
            table.set_opposite_corners(new_corner + 1, corner_b);
            table.set_opposite_corners(new_corner + 2, corner_c);
            table.map_corner_to_vertex(new_corner, vert_x);
            table.map_corner_to_vertex(new_corner + 1, vert_p);
            table.map_corner_to_vertex(new_corner + 2, vert_n);
            for v in [vert_x, vert_p, vert_n] {
                self.is_vert_hole[v] = false;
            }
        }
        if num_faces != self.num_faces {
            return Err(Err::FaceCountMismatch(num_faces, self.num_faces));
        }

        let mut num_vertices = self.corner_table.num_vertices();
        for invalid_vert in invalid_vertices {
            num_vertices = self.fill_invalid_vertex(invalid_vert, num_vertices)?;
        }
        Ok(num_vertices)
    }

    /// Pops the next topology split if it starts at `encoder_symbol_id`.
    fn take_topology_split(&mut self, encoder_symbol_id: usize) -> Result<Option<TopologySplit>, Err> {
        match self.topology_splits.last() {
            // splits are consumed in order, so a larger source was skipped
            Some(split) if split.source_symbol_idx > encoder_symbol_id => {
                Err(Err::InvalidTopologySplit("source symbol was skipped"))
            },
            Some(split) if split.source_symbol_idx == encoder_symbol_id => Ok(self.topology_splits.pop()),
            _ => Ok(None),
        }
    }

    /// Moves the last vertex in use into the slot of the merged-away `invalid_vert`,
    /// so that vertices in use stay contiguous. Returns the new number of vertices in use.
    fn fill_invalid_vertex(&mut self, invalid_vert: VertexIdx, mut num_vertices: usize) -> Result<usize, Err> {
        let table = &mut self.corner_table;
        let mut src_vert = num_vertices.checked_sub(1).ok_or(Err::InvalidVertex(invalid_vert))?;
        while table.left_most_corner(src_vert).is_none() {
            num_vertices -= 1;
            src_vert = num_vertices.checked_sub(1).ok_or(Err::InvalidVertex(invalid_vert))?;
        }
        if src_vert < invalid_vert {
            return Ok(num_vertices);
        }

        for c in table.vertex_corners(src_vert) {
            if table.vertex_idx(c) != src_vert {
                return Err(Err::InvalidVertex(src_vert));
            }
            table.map_corner_to_vertex(c, invalid_vert);
        }
        let left_most = table.left_most_corner(src_vert);
        table.set_left_most_corner(invalid_vert, left_most);
        table.make_vertex_isolated(src_vert);
        self.is_vert_hole[invalid_vert] = self.is_vert_hole[src_vert];
        self.is_vert_hole[src_vert] = false;
        Ok(num_vertices - 1)
    }

    /// Collects, per attribute, the corners whose opposite edges are seams.
    /// Boundary edges are always seams. An interior edge carries one bit per
    /// attribute, read while visiting the face of lower index.
    fn decode_attribute_seams(&self, decoders: &mut [RansBitDecoder]) -> Vec<Vec<CornerIdx>> {
        let table = &self.corner_table;
        let mut seams = vec![Vec::new(); decoders.len()];
        if decoders.is_empty() {
            return seams;
        }
        for corner in 0..table.num_corners() {
            match table.opposite(corner) {
                None => seams.iter_mut().for_each(|s| s.push(corner)),
                Some(opp) if opp / 3 < corner / 3 => {},
                Some(_) => {
                    for (decoder, s) in decoders.iter_mut().zip(seams.iter_mut()) {
                        if decoder.decode_next_bit() {
                            s.push(corner);
                        }
                    }
                },
            }
        }
        seams
    }

    /// Gives every corner a point. Without attribute seams a point is a vertex;
    /// otherwise the corners of a vertex get a new point wherever any attribute changes its value.
    fn assign_points_to_corners(&self, attribute_tables: &[AttributeCornerTable], num_connectivity_verts: usize)
        -> Result<(Vec<[PointIdx; 3]>, usize), Err>
    {
        let table = &self.corner_table;
        let faces_from = |corner_to_point: &dyn Fn(CornerIdx) -> PointIdx| {
            (0..table.num_faces())
                .map(|f| [corner_to_point(3 * f), corner_to_point(3 * f + 1), corner_to_point(3 * f + 2)])
                .collect::<Vec<_>>()
        };
        if attribute_tables.is_empty() {
            return Ok((faces_from(&|c| table.vertex_idx(c)), num_connectivity_verts));
        }

        let mut corner_to_point = vec![0; table.num_corners()];
        let mut num_points = 0;
        for v in 0..table.num_vertices() {
            let Some(c) = table.left_most_corner(v) else {
                continue;
            };
            // start at a seam, or at the boundary where the left-most corner already is
            let mut first_corner = c;
            if !self.is_vert_hole[v] {
                for att_table in attribute_tables.iter().filter(|t| t.is_vertex_on_seam(v)) {
                    let vert_id = att_table.vertex_idx(c);
                    let mut act_c = table.swing_right(c).ok_or(Err::SeamNotFound(v))?;
                    let mut seam_found = false;
                    while act_c != c {
                        if att_table.vertex_idx(act_c) != vert_id {
                            first_corner = act_c;
                            seam_found = true;
                            break;
                        }
                        act_c = table.swing_right(act_c).ok_or(Err::SeamNotFound(v))?;
                    }
                    if seam_found {
                        break;
                    }
                }
            }

            corner_to_point[first_corner] = num_points;
            num_points += 1;
            let mut prev_c = first_corner;
            let mut curr = table.swing_right(first_corner);
            while let Some(c) = curr {
                if c == first_corner {
                    break;
                }
                let attribute_seam = attribute_tables.iter()
                    .any(|t| t.vertex_idx(c) != t.vertex_idx(prev_c));
                if attribute_seam {
                    corner_to_point[c] = num_points;
                    num_points += 1;
                } else {
                    corner_to_point[c] = corner_to_point[prev_c];
                }
                prev_c = c;
                curr = table.swing_right(c);
            }
        }
        Ok((faces_from(&|c| corner_to_point[c]), num_points))
    }
}

fn read_topology_splits<R>(reader: &mut R, num_faces: u64) -> Result<Vec<TopologySplit>, Err>
    where R: ByteReader
{
    let num_topology_splits = leb128_read(reader)?;
    if num_topology_splits > num_faces {
        return Err(Err::TooMany("topology splits"));
    }
    let mut splits = Vec::new();
    let mut last_idx = 0_u64;
    for _ in 0..num_topology_splits {
        let source_symbol_idx = leb128_read(reader)?
            .checked_add(last_idx)
            .filter(|&idx| idx <= u32::MAX as u64)
            .ok_or(Err::InvalidTopologySplit("source symbol out of range"))?;
        let delta = leb128_read(reader)?;
        let split_symbol_idx = source_symbol_idx.checked_sub(delta)
            .ok_or(Err::InvalidTopologySplit("split symbol precedes its source"))?;
        splits.push(TopologySplit {
            source_symbol_idx: source_symbol_idx as usize,
            split_symbol_idx: split_symbol_idx as usize,
            source_edge: Orientation::Left,
        });
        last_idx = source_symbol_idx;
    }

    if !splits.is_empty() {
        let mut bits = BitReader::spown_from(reader);
        for split in splits.iter_mut() {
            split.source_edge = match bits.read_bits(1)? {
                0 => Orientation::Left,
                _ => Orientation::Right,
            };
        }
    }
    Ok(splits)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::DecoderBuffer;

    /// Bit stream holding a single zero, read as a boundary start face or as no seam.
    const ZERO_BIT: [u8; 3] = [255, 1, 0x11];

    fn stream(num_vertices: u8, num_faces: u8, num_attribute_data: u8, symbols: &[u8], num_symbols: u8) -> Vec<u8> {
        let mut data = vec![STANDARD_TRAVERSAL, num_vertices, num_faces, num_attribute_data, num_symbols, 0, 0];
        data.push(symbols.len() as u8);
        data.extend_from_slice(symbols);
        data.extend(ZERO_BIT);
        for _ in 0..num_attribute_data {
            data.extend(ZERO_BIT);
        }
        data
    }

    #[test]
    fn single_triangle() {
        // E
        let data = stream(3, 1, 0, &[0b111], 1);
        let mut buffer = DecoderBuffer::new(&data);
        let connectivity = SpiraleReversi::decode_connectivity(&mut buffer, 0x0202).unwrap();
        assert_eq!(buffer.remaining_size(), 0);
        assert_eq!(connectivity.faces, vec![[0, 1, 2]]);
        assert_eq!(connectivity.num_points, 3);
        let tables = connectivity.corner_tables.unwrap();
        assert_eq!(tables.base.num_vertices(), 3);
        assert!(tables.attributes.is_empty());
    }

    #[test]
    fn two_triangles_with_attribute_data() {
        // decoded in order: E, then R on its active edge
        let symbols = [0b111 | (0b101 << 3)];
        let data = stream(4, 2, 1, &symbols, 2);
        let mut buffer = DecoderBuffer::new(&data);
        let connectivity = SpiraleReversi::decode_connectivity(&mut buffer, 0x0202).unwrap();
        assert_eq!(buffer.remaining_size(), 0);
        assert_eq!(connectivity.faces.len(), 2);
        assert_eq!(connectivity.num_points, 4);

        let tables = connectivity.corner_tables.unwrap();
        assert!(tables.base.is_complete());
        assert_eq!(tables.base.opposite(0), Some(5));
        // only the shared edge carries a seam bit, and it is not set
        assert_eq!(tables.attributes[0].num_vertices(), 4);

        let faces = connectivity.faces;
        let shared = faces[0].iter().filter(|p| faces[1].contains(p)).count();
        assert_eq!(shared, 2);
    }

    #[test]
    fn reject_invalid_streams() {
        let mut data = stream(3, 1, 0, &[0b111], 1);
        data[0] = 2;
        assert!(matches!(
            SpiraleReversi::decode_connectivity(&mut DecoderBuffer::new(&data), 0x0202),
            Err(Err::UnsupportedTraversal(2))
        ));

        // a C symbol needs an active edge
        let data = stream(3, 1, 0, &[0], 1);
        assert!(matches!(
            SpiraleReversi::decode_connectivity(&mut DecoderBuffer::new(&data), 0x0202),
            Err(Err::NoActiveEdge)
        ));

        // more vertices than three per face
        let data = stream(4, 1, 0, &[0b111], 1);
        assert!(matches!(
            SpiraleReversi::decode_connectivity(&mut DecoderBuffer::new(&data), 0x0202),
            Err(Err::TooMany(_))
        ));

        // two vertices declared for a new triangle
        let data = stream(2, 1, 0, &[0b111], 1);
        assert!(matches!(
            SpiraleReversi::decode_connectivity(&mut DecoderBuffer::new(&data), 0x0202),
            Err(Err::TooManyVertices(2))
        ));

        // sixteen symbols cannot fit in one byte
        let data = stream(3, 16, 0, &[0b111], 16);
        assert!(matches!(
            SpiraleReversi::decode_connectivity(&mut DecoderBuffer::new(&data), 0x0202),
            Err(Err::NotEnoughData(_))
        ));
    }
}
