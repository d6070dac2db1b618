use crate::algebra::DualVector;

use super::edge::OrientedEdge;

slotmap::new_key_type! {
    /// Unique identifier for a face of a surface.
    pub struct FaceId;
}

/// Data associated with a face.
///
/// A face is a closed counter-clockwise cycle of oriented edges. Its
/// `position` is an arbitrary tag vector that is reflected along with the
/// face, so two copies of a polygon related by the same reflections carry the
/// same tag.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The boundary cycle.
    pub boundary: Vec<OrientedEdge>,
    /// Position tag used to recognise equal copies during edge matching.
    pub position: DualVector,
    /// Billiard mode: the face this one was reflected from.
    pub origin: Option<FaceId>,
    /// Billiard mode: the axis of the reflection that produced this face.
    pub reflection: Option<DualVector>,
}

impl FaceData {
    #[must_use]
    pub fn new(boundary: Vec<OrientedEdge>, position: DualVector) -> Self {
        Self {
            boundary,
            position,
            origin: None,
            reflection: None,
        }
    }

    /// Number of edges in the boundary.
    #[must_use]
    pub fn order(&self) -> usize {
        self.boundary.len()
    }

    /// A face whose boundary was consumed; removed by compaction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boundary.is_empty()
    }

    /// Index following `position` in the boundary; `None` once the boundary
    /// has been consumed.
    #[must_use]
    pub fn next_position(&self, position: usize) -> Option<usize> {
        let n = self.order();
        (n > 0).then(|| (position + 1) % n)
    }

    /// Index preceding `position` in the boundary; `None` once the boundary
    /// has been consumed.
    #[must_use]
    pub fn prev_position(&self, position: usize) -> Option<usize> {
        let n = self.order();
        (n > 0).then(|| (position % n + n - 1) % n)
    }
}
