use crate::algebra::DualVector;

use super::face::FaceId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an undirected edge of a surface.
    pub struct EdgeId;
}

/// One of the two orientations of an undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Traversed from `v0` to `v1`, along the edge vector.
    Positive,
    /// Traversed from `v1` to `v0`, against the edge vector.
    Negative,
}

impl Sign {
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }

    /// `+1` or `-1`.
    #[must_use]
    pub fn value(self) -> i64 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }

    fn side(self) -> usize {
        match self {
            Self::Positive => 0,
            Self::Negative => 1,
        }
    }
}

/// Position of an oriented edge inside a face boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HalfEdgeRef {
    pub face: FaceId,
    pub position: usize,
}

impl HalfEdgeRef {
    #[must_use]
    pub fn new(face: FaceId, position: usize) -> Self {
        Self { face, position }
    }
}

/// An undirected edge used with a given orientation, owned by one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientedEdge {
    /// The undirected edge.
    pub edge: EdgeId,
    /// Orientation relative to the edge vector.
    pub sign: Sign,
    /// For fold edges: the oriented edge this one was reflected from.
    pub from_edge: Option<HalfEdgeRef>,
}

impl OrientedEdge {
    #[must_use]
    pub fn new(edge: EdgeId, sign: Sign) -> Self {
        Self {
            edge,
            sign,
            from_edge: None,
        }
    }
}

/// Data associated with an undirected edge.
///
/// The positive side face traverses the edge from `v0` to `v1`; the negative
/// side face traverses it backwards. An edge with one side missing is open.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub v0: VertexId,
    pub v1: VertexId,
    /// Faces on the positive and negative side.
    pub faces: [Option<FaceId>; 2],
    /// Offset from `v0` to `v1`.
    pub vector: DualVector,
    /// Column of this edge in the perturbation constraint matrix.
    pub index: usize,
    /// Shared by all edges descended from the same seed edge.
    pub label: Option<usize>,
    /// `true` for fold edges rather than true billiard walls.
    pub internal: bool,
    /// Set when this edge was absorbed by another; removed by compaction.
    pub orphaned: bool,
}

impl EdgeData {
    #[must_use]
    pub fn new(v0: VertexId, v1: VertexId, vector: DualVector) -> Self {
        Self {
            v0,
            v1,
            faces: [None, None],
            vector,
            index: 0,
            label: None,
            internal: false,
            orphaned: false,
        }
    }

    /// The face on the side traversing the edge with `sign`.
    #[must_use]
    pub fn face(&self, sign: Sign) -> Option<FaceId> {
        self.faces[sign.side()]
    }

    pub(crate) fn set_face(&mut self, sign: Sign, face: Option<FaceId>) {
        self.faces[sign.side()] = face;
    }

    /// Fills whichever side is still missing.
    pub(crate) fn set_null_face(&mut self, face: FaceId) {
        if let Some(slot) = self.faces.iter_mut().find(|f| f.is_none()) {
            *slot = Some(face);
        }
    }

    /// `true` if exactly one side has a face.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.orphaned && (self.faces[0].is_some() != self.faces[1].is_some())
    }

    /// The face and orientation on the attached side of an open edge.
    #[must_use]
    pub fn boundary_side(&self) -> Option<(FaceId, Sign)> {
        if !self.is_open() {
            return None;
        }
        match self.faces {
            [Some(f), None] => Some((f, Sign::Positive)),
            [None, Some(f)] => Some((f, Sign::Negative)),
            _ => None,
        }
    }

    /// Origin vertex when traversed with `sign`.
    #[must_use]
    pub fn origin(&self, sign: Sign) -> VertexId {
        match sign {
            Sign::Positive => self.v0,
            Sign::Negative => self.v1,
        }
    }

    /// Target vertex when traversed with `sign`.
    #[must_use]
    pub fn target(&self, sign: Sign) -> VertexId {
        self.origin(sign.flip())
    }

    /// The edge vector as seen when traversed with `sign`.
    #[must_use]
    pub fn oriented_vector(&self, sign: Sign) -> DualVector {
        match sign {
            Sign::Positive => self.vector.clone(),
            Sign::Negative => self.vector.neg(),
        }
    }
}
