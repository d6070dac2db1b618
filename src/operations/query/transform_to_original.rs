use crate::algebra::DualVector;
use crate::error::Result;
use crate::math::{planar, Point};
use crate::topology::{FaceId, Surface};

/// Maps an offset on a reflected face back to the frame of the seed face it
/// descends from, by undoing every reflection up the provenance chain.
///
/// Faces that were not produced by a billiard-mode reflection are their own
/// original, so the offset is returned unchanged.
pub struct TransformToOriginal {
    face: FaceId,
    vector: DualVector,
}

impl TransformToOriginal {
    /// Creates a new `TransformToOriginal` query for an exact or floating offset.
    #[must_use]
    pub fn new(face: FaceId, vector: DualVector) -> Self {
        Self { face, vector }
    }

    /// Creates a query for a floating point offset.
    #[must_use]
    pub fn point(face: FaceId, point: Point) -> Self {
        Self::new(face, DualVector::floating(point))
    }

    /// Executes the query, returning the original face and the mapped offset.
    ///
    /// # Errors
    ///
    /// Returns an error if a face on the chain is missing or an exact
    /// reflection axis is not rigid.
    pub fn execute(&self, surface: &Surface) -> Result<(FaceId, DualVector)> {
        let mut face = self.face;
        let mut vector = self.vector.clone();
        loop {
            let data = surface.face(face)?;
            let (Some(origin), Some(axis)) = (data.origin, &data.reflection) else {
                return Ok((face, vector));
            };
            vector = if vector.symbolic().is_some() {
                vector.reflect(axis)?
            } else {
                DualVector::floating(planar::reflect(vector.approx(), axis.approx()))
            };
            face = origin;
        }
    }
}
