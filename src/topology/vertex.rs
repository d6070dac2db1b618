use super::edge::{EdgeId, HalfEdgeRef};

slotmap::new_key_type! {
    /// Unique identifier for a vertex of a surface.
    pub struct VertexId;
}

/// Data associated with a vertex (a cone point of the flat metric).
#[derive(Debug, Clone, Default)]
pub struct VertexData {
    /// Outgoing oriented edges in counter-clockwise order.
    ///
    /// Filled by [`Surface::build_vertex_cycles`](super::Surface::build_vertex_cycles).
    pub out_edges: Vec<HalfEdgeRef>,
    /// Interior angle between `out_edges[i]` and `out_edges[i + 1]`.
    pub sectors: Vec<f64>,
    /// Number of edge endpoints at this vertex, maintained through identifications.
    pub valence: usize,
    /// Sum of the sector angles.
    pub total_angle: f64,
    /// Some edge incident to this vertex.
    pub edge: Option<EdgeId>,
    /// `true` if the edge cycle around this vertex is interrupted by an open edge.
    pub on_boundary: bool,
    /// Set when this vertex was merged into another; removed by compaction.
    pub deleted: bool,
}

impl VertexData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the sector following `position` in the cycle.
    #[must_use]
    pub fn next_position(&self, position: usize) -> usize {
        (position + 1) % self.out_edges.len()
    }

    /// Index of the sector preceding `position` in the cycle.
    #[must_use]
    pub fn prev_position(&self, position: usize) -> usize {
        (position + self.out_edges.len() - 1) % self.out_edges.len()
    }
}
