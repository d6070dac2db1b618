use crate::algebra::DualVector;
use crate::error::{Result, TopologyError};
use crate::math::intersect_2d::polygon_self_intersects;
use crate::math::planar;
use crate::topology::{FaceId, HalfEdgeRef, Surface};

use super::TransformToOriginal;

/// Checks the geometric and combinatorial invariants of one face.
///
/// A face passes when:
/// - each edge ends where the next begins;
/// - exact and floating coordinates agree;
/// - a triangle turns strictly counter-clockwise at every corner and
///   satisfies the triangle inequality, and any other face is not
///   self-intersecting;
/// - in exact mode, every open wall edge has a common direction;
/// - every closed edge has a pair with swapped endpoints and the opposite vector;
/// - the boundary vectors sum to zero;
/// - in billiard mode, the first corner maps back onto the first corner of
///   the original face.
pub struct CheckFace {
    face: FaceId,
}

impl CheckFace {
    /// Creates a new `CheckFace` query.
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self { face }
    }

    /// Executes the check.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvariantViolation`] naming the face and the
    /// first invariant that fails.
    #[allow(clippy::too_many_lines)]
    pub fn execute(&self, surface: &Surface) -> Result<()> {
        let id = self.face;
        let face = surface.face(id)?;
        let n = face.order();
        if n == 0 {
            return Ok(());
        }
        let epsilon = surface.epsilon();
        let fail = |message: String| -> crate::error::UnfoldError {
            TopologyError::violation(id, message).into()
        };

        let vectors = face
            .boundary
            .iter()
            .map(|oe| surface.oriented_vector(oe))
            .collect::<std::result::Result<Vec<DualVector>, _>>()?;
        let approx: Vec<_> = vectors.iter().map(DualVector::approx).collect();

        let mut sum = vectors[0].clone();
        for v in &vectors[1..] {
            sum = sum.try_add(v)?;
        }

        for (i, oe) in face.boundary.iter().enumerate() {
            let next = (i + 1) % n;
            let prev = (i + n - 1) % n;
            let edge = surface.edge(oe.edge)?;

            if edge.face(oe.sign) != Some(id) && edge.faces.iter().all(|f| *f != Some(id)) {
                return Err(fail(format!("edge {:?} does not reference the face", oe.edge)));
            }
            if surface.target(oe)? != surface.origin(&face.boundary[next])? {
                return Err(fail(format!(
                    "edge {:?} does not end where edge {:?} begins",
                    oe.edge, face.boundary[next].edge
                )));
            }
            vectors[i]
                .check(surface.params(), epsilon)
                .map_err(|e| fail(format!("edge {:?}: {e}", oe.edge)))?;

            if n == 3 {
                if !planar::ccw(approx[i], approx[next]) {
                    return Err(fail(format!("corner after edge {:?} is not counter-clockwise", oe.edge)));
                }
                if approx[i].norm() >= approx[next].norm() + approx[prev].norm() {
                    return Err(fail("triangle inequality violated".into()));
                }
            }

            if edge.is_open() {
                if !edge.internal {
                    if let Some(exact) = vectors[i].symbolic() {
                        exact
                            .common_direction()
                            .map_err(|e| fail(format!("open edge {:?} is not rigid: {e}", oe.edge)))?;
                    }
                }
                continue;
            }

            let pair = surface
                .pair(HalfEdgeRef::new(id, i))?
                .ok_or_else(|| fail(format!("closed edge {:?} has no pair", oe.edge)))?;
            let other = surface.oriented(pair)?;
            if surface.origin(&other)? != surface.target(oe)? || surface.target(&other)? != surface.origin(oe)? {
                return Err(fail(format!("pair of edge {:?} has mismatched endpoints", oe.edge)));
            }
            if !surface.oriented_vector(&other)?.try_add(&vectors[i])?.vanishes(epsilon) {
                return Err(fail(format!("pair of edge {:?} is not opposite", oe.edge)));
            }
        }

        if n != 3 && polygon_self_intersects(&approx) {
            return Err(fail("face is self-intersecting".into()));
        }
        if !sum.vanishes(epsilon) {
            return Err(fail(format!("boundary sums to {} instead of zero", sum.approx())));
        }

        if surface.config().billiard && face.origin.is_some() {
            let corner = vectors[0].try_sub(&vectors[n - 1])?;
            let (original, mapped) = TransformToOriginal::new(id, corner).execute(surface)?;
            let seed = surface.face(original)?;
            let first = surface.oriented_vector(&seed.boundary[0])?;
            let last = surface.oriented_vector(&seed.boundary[seed.order() - 1])?;
            let expected = first.try_sub(&last)?;
            if (mapped.approx() - expected.approx()).norm() > epsilon {
                return Err(fail(format!(
                    "first corner maps to {} but the original corner is {}",
                    mapped.approx(),
                    expected.approx()
                )));
            }
        }
        Ok(())
    }
}

/// Checks every live face of the surface, stopping at the first failure.
#[derive(Default)]
pub struct ValidateFaces;

impl ValidateFaces {
    /// Creates a new `ValidateFaces` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the validation.
    ///
    /// # Errors
    ///
    /// Returns the first [`TopologyError::InvariantViolation`] found.
    pub fn execute(&self, surface: &Surface) -> Result<()> {
        let faces: Vec<FaceId> = surface.faces().map(|(id, _)| id).collect();
        for face in faces {
            CheckFace::new(face).execute(surface)?;
        }
        Ok(())
    }
}
