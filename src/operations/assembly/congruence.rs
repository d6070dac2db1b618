use crate::error::Result;
use crate::topology::{OrientedEdge, Surface};

/// How two boundary edges line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Congruence {
    /// Equal vectors: origin meets origin.
    Same,
    /// Opposite vectors: origin meets target.
    Reverse,
    Incongruent,
}

impl Congruence {
    /// Compares the vectors of two oriented edges in the surface arithmetic.
    ///
    /// # Errors
    ///
    /// Returns an error if either edge is missing.
    pub fn of(surface: &Surface, a: &OrientedEdge, b: &OrientedEdge) -> Result<Self> {
        let epsilon = surface.epsilon();
        let va = surface.oriented_vector(a)?;
        let vb = surface.oriented_vector(b)?;
        Ok(if va.matches(&vb, epsilon) {
            Self::Same
        } else if va.matches(&vb.neg(), epsilon) {
            Self::Reverse
        } else {
            Self::Incongruent
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::algebra::DualVector;
    use crate::math::Point;
    use crate::topology::Sign;

    #[test]
    fn classification_is_symmetric() {
        let mut surface = Surface::default();
        let v = surface.add_vertex();
        let a = surface
            .add_edge(v, v, DualVector::floating(Point::new(1.0, 2.0)))
            .unwrap();
        let b = surface
            .add_edge(v, v, DualVector::floating(Point::new(-1.0, -2.0)))
            .unwrap();
        let c = surface
            .add_edge(v, v, DualVector::floating(Point::new(2.0, 1.0)))
            .unwrap();
        let pos = |e| OrientedEdge::new(e, Sign::Positive);

        assert_eq!(Congruence::of(&surface, &pos(a), &pos(b)).unwrap(), Congruence::Reverse);
        assert_eq!(Congruence::of(&surface, &pos(b), &pos(a)).unwrap(), Congruence::Reverse);
        assert_eq!(
            Congruence::of(&surface, &pos(a), &OrientedEdge::new(b, Sign::Negative)).unwrap(),
            Congruence::Same
        );
        assert_eq!(Congruence::of(&surface, &pos(a), &pos(c)).unwrap(), Congruence::Incongruent);
        assert_eq!(Congruence::of(&surface, &pos(c), &pos(a)).unwrap(), Congruence::Incongruent);
    }
}
