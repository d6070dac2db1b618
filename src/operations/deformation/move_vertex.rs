use tracing::debug;

use crate::algebra::AlgebraicNumber;
use crate::error::{Result, TopologyError};
use crate::math::Point;
use crate::topology::{Surface, VertexId};

/// Translates every outgoing edge of a vertex by a fixed offset.
///
/// In exact mode the offset becomes two new parameters `t, s` weighting the
/// field generator `ξ` and its conjugate, so that `t ξ + s ξ̄ = offset`.
/// Loops at the vertex are both outgoing and incoming and end up unchanged.
/// Every touched edge is re-checked for consistency afterwards, and a failed
/// move leaves the surface as it was.
pub struct MoveVertex {
    vertex: VertexId,
    offset: Point,
}

impl MoveVertex {
    /// Creates a new `MoveVertex` operation.
    #[must_use]
    pub fn new(vertex: VertexId, offset: Point) -> Self {
        Self { vertex, offset }
    }

    /// Adds the two translation parameters and returns the index of the first.
    fn add_translation(&self, surface: &mut Surface) -> Result<Option<(usize, AlgebraicNumber)>> {
        let Some(field) = surface.arithmetic().field().cloned() else {
            return Ok(None);
        };
        let xi = field.generator_embedding();
        if xi.re.abs() < surface.epsilon() || xi.im.abs() < surface.epsilon() {
            return Err(TopologyError::MalformedInput(format!(
                "the generator {xi} of a field of order {} cannot carry a translation",
                field.order()
            ))
            .into());
        }
        let along = 0.5 * self.offset.re / xi.re;
        let across = 0.5 * self.offset.im / xi.im;
        let first = surface.add_parameters(&[along + across, along - across]);
        Ok(Some((first, AlgebraicNumber::generator(&field))))
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MalformedInput`] if the field generator is
    /// real or purely imaginary, and an error if the vertex cycles cannot be
    /// built or a moved edge fails its consistency check.
    pub fn execute(&self, surface: &mut Surface) -> Result<()> {
        surface.atomically(|draft| self.run(draft))
    }

    fn run(&self, surface: &mut Surface) -> Result<()> {
        surface.build_vertex_cycles()?;
        let out_edges = surface.vertex(self.vertex)?.out_edges.clone();
        let translation = self.add_translation(surface)?;

        for &at in &out_edges {
            let oe = surface.oriented(at)?;
            let sign = oe.sign.value();
            let edge = surface.edge_mut(oe.edge)?;
            #[allow(clippy::cast_precision_loss)]
            let delta = self.offset * sign as f64;
            edge.vector.set_approx(edge.vector.approx() + delta);

            if let (Some((first, xi)), Some(vector)) = (&translation, edge.vector.symbolic_mut()) {
                let shifts = [xi.scale(sign), xi.conjugate().scale(sign)];
                for (index, shift) in (*first..).zip(&shifts) {
                    let value = vector.coefficient(index)? + shift;
                    vector.set_coefficient(index, value)?;
                }
            }
        }

        let epsilon = surface.epsilon();
        for &at in &out_edges {
            let oe = surface.oriented(at)?;
            surface.edge(oe.edge)?.vector.check(surface.params(), epsilon)?;
        }
        debug!(vertex = ?self.vertex, offset = %self.offset, edges = out_edges.len(), "moved vertex");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::algebra::{Arithmetic, DualVector, NumberField};
    use crate::config::SurfaceConfig;
    use crate::error::UnfoldError;
    use crate::operations::creation::MakePolygon;
    use crate::operations::deformation::PerturbConjugates;
    use crate::operations::query::ValidateFaces;
    use crate::topology::FaceId;

    fn exact_square(order: u32) -> (Surface, FaceId) {
        let field = NumberField::cyclotomic(order);
        let step = i64::from(order / 4);
        let mut surface = Surface::new(SurfaceConfig::new().with_arithmetic(Arithmetic::Exact(field.clone())));
        let edges = (0..4)
            .map(|k| surface.exact_vector(AlgebraicNumber::root_of_unity(&field, k * step)).unwrap())
            .collect();
        let face = MakePolygon::new(edges).execute(&mut surface).unwrap();
        (surface, face)
    }

    #[test]
    fn exact_move_adds_a_conjugate_pair() {
        let (mut surface, face) = exact_square(8);
        let corner = surface.origin(&surface.face(face).unwrap().boundary[0]).unwrap();
        let offset = Point::new(0.05, 0.02);

        MoveVertex::new(corner, offset).execute(&mut surface).unwrap();
        assert_eq!(surface.params().count(), 2);

        let boundary = surface.face(face).unwrap().boundary.clone();
        let out = surface.oriented_vector(&boundary[0]).unwrap().approx();
        assert_relative_eq!(out.re, 1.05, epsilon = 1e-12);
        assert_relative_eq!(out.im, 0.02, epsilon = 1e-12);
        let incoming = surface.oriented_vector(&boundary[3]).unwrap().approx();
        assert_relative_eq!(incoming.im, -1.0, epsilon = 1e-12);

        // The two new parameters already pair up under conjugation.
        assert_eq!(PerturbConjugates::new(0.01).execute(&mut surface).unwrap(), 0);
    }

    #[test]
    fn floating_move_shifts_out_edges() {
        let mut surface = Surface::default();
        let face = MakePolygon::new(vec![
            DualVector::floating(Point::new(2.0, 0.0)),
            DualVector::floating(Point::new(-1.0, 1.0)),
            DualVector::floating(Point::new(-1.0, -1.0)),
        ])
        .execute(&mut surface)
        .unwrap();
        let boundary = surface.face(face).unwrap().boundary.clone();
        let apex = surface.origin(&boundary[1]).unwrap();

        MoveVertex::new(apex, Point::new(0.0, 0.5)).execute(&mut surface).unwrap();
        let moved = surface.oriented_vector(&boundary[1]).unwrap().approx();
        assert_relative_eq!(moved.im, 1.5, epsilon = 1e-12);
        assert_eq!(surface.params().count(), 0);
    }

    #[test]
    fn gaussian_generator_cannot_translate() {
        let (mut surface, face) = exact_square(4);
        let corner = surface.origin(&surface.face(face).unwrap().boundary[0]).unwrap();
        let err = MoveVertex::new(corner, Point::new(0.1, 0.0))
            .execute(&mut surface)
            .unwrap_err();
        assert!(matches!(err, UnfoldError::Topology(TopologyError::MalformedInput(_))));
        assert_eq!(surface.params().count(), 0);
    }

    #[test]
    fn moved_torus_vertex_keeps_faces_closed() {
        let (mut surface, face) = exact_square(8);
        crate::operations::assembly::CompleteSurface::new()
            .execute(&mut surface)
            .unwrap();
        let corner = surface.origin(&surface.face(face).unwrap().boundary[0]).unwrap();
        MoveVertex::new(corner, Point::new(0.01, -0.01)).execute(&mut surface).unwrap();
        ValidateFaces::new().execute(&surface).unwrap();
    }
}
