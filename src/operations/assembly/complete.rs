use tracing::{debug, info};

use crate::error::{Result, TopologyError};
use crate::operations::query::ValidateFaces;
use crate::topology::{EdgeId, FaceId, HalfEdgeRef, Surface};

use super::ReflectFace;

/// Outcome of a completion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub reflections: usize,
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
}

fn half_edges(surface: &Surface) -> Vec<HalfEdgeRef> {
    surface
        .faces()
        .flat_map(|(id, face)| (0..face.order()).map(move |i| HalfEdgeRef::new(id, i)))
        .collect()
}

/// Marks edges that are already glued as folds, recording the other side
/// as their provenance, and renumbers every edge.
fn setup_reflect(surface: &mut Surface) -> Result<()> {
    for at in half_edges(surface) {
        let oe = surface.oriented(at)?;
        if surface.edge(oe.edge)?.is_open() {
            continue;
        }
        let pair = surface.pair(at)?;
        surface.edge_mut(oe.edge)?.internal = true;
        surface.face_mut(at.face)?.boundary[at.position].from_edge = pair;
    }
    surface.assign_labels();
    Ok(())
}

/// Points every fold edge at the oriented edge now across from it.
fn set_internal_edges(surface: &mut Surface) -> Result<()> {
    for at in half_edges(surface) {
        let oe = surface.oriented(at)?;
        if surface.edge(oe.edge)?.internal {
            let pair = surface.pair(at)?;
            surface.face_mut(at.face)?.boundary[at.position].from_edge = pair;
        }
    }
    Ok(())
}

fn first_open(surface: &Surface, internal_only: bool) -> Option<EdgeId> {
    surface
        .edges()
        .find(|(_, e)| e.is_open() && (!internal_only || e.internal))
        .map(|(id, _)| id)
}

/// Closes the surface by reflecting faces across open edges until none remain.
///
/// Every reflection is followed by compaction and a full face validation,
/// and by a fold pass across the same edge. Vertex cycles are built once the
/// surface is closed. On a surface that is already closed no faces are added.
/// A failed run leaves the surface as it was.
#[derive(Default)]
pub struct CompleteSurface;

impl CompleteSurface {
    /// Creates a new `CompleteSurface` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation, or
    /// [`TopologyError::CompletionDiverged`] once the configured number of
    /// reflections is exceeded.
    pub fn execute(&self, surface: &mut Surface) -> Result<Completion> {
        surface.atomically(|draft| self.run(draft))
    }

    fn run(&self, surface: &mut Surface) -> Result<Completion> {
        ValidateFaces::new().execute(surface)?;
        setup_reflect(surface)?;

        let limit = surface.config().max_reflections;
        let mut reflections = 0;
        while let Some(edge) = first_open(surface, false) {
            if reflections >= limit {
                return Err(TopologyError::CompletionDiverged { reflections }.into());
            }
            let (face, _) = surface
                .edge(edge)?
                .boundary_side()
                .ok_or(TopologyError::EntityNotFound("boundary face"))?;
            debug!(?edge, ?face, reflections, "reflecting across open edge");
            ReflectFace::new(edge, face).execute(surface)?;
            reflections += 1;
            surface.compact();
            ValidateFaces::new().execute(surface)?;

            reflections += CompleteInternal::new(edge)
                .with_budget(limit.saturating_sub(reflections))
                .run(surface)?;
        }

        ValidateFaces::new().execute(surface)?;
        surface.build_vertex_cycles()?;

        let completion = Completion {
            reflections,
            vertices: surface.vertices().count(),
            edges: surface.edges().count(),
            faces: surface.faces().count(),
        };
        info!(
            reflections,
            faces = completion.faces,
            edges = completion.edges,
            vertices = completion.vertices,
            "surface complete"
        );
        Ok(completion)
    }
}

/// Closes open fold edges by reflecting, across `edge`, the face each fold
/// was copied from, then refreshes fold provenance. A failed run leaves the
/// surface as it was.
pub struct CompleteInternal {
    edge: EdgeId,
    budget: Option<usize>,
}

impl CompleteInternal {
    /// Creates a new `CompleteInternal` operation.
    #[must_use]
    pub fn new(edge: EdgeId) -> Self {
        Self { edge, budget: None }
    }

    /// Caps the number of reflections; defaults to the surface configuration.
    #[must_use]
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Executes the operation, returning the number of reflections performed.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation, or
    /// [`TopologyError::CompletionDiverged`] once the budget is exhausted.
    pub fn execute(&self, surface: &mut Surface) -> Result<usize> {
        surface.atomically(|draft| self.run(draft))
    }

    fn run(&self, surface: &mut Surface) -> Result<usize> {
        let budget = self.budget.unwrap_or(surface.config().max_reflections);
        let mut reflections = 0;
        while let Some(fold) = first_open(surface, true) {
            if reflections >= budget {
                return Err(TopologyError::CompletionDiverged { reflections }.into());
            }
            let at = surface
                .boundary_ref(fold)?
                .ok_or(TopologyError::EntityNotFound("boundary face"))?;
            let source: FaceId = surface
                .oriented(at)?
                .from_edge
                .ok_or_else(|| TopologyError::violation(at.face, format!("fold edge {fold:?} has no provenance")))?
                .face;
            debug!(axis = ?self.edge, ?fold, ?source, "reflecting fold source");
            ReflectFace::new(self.edge, source).execute(surface)?;
            reflections += 1;
            surface.compact();
            ValidateFaces::new().execute(surface)?;
        }
        set_internal_edges(surface)?;
        Ok(reflections)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::TAU;

    use approx::assert_relative_eq;

    use super::*;
    use crate::algebra::{AlgebraicNumber, Arithmetic, DualVector, NumberField};
    use crate::config::SurfaceConfig;
    use crate::error::UnfoldError;
    use crate::math::Point;
    use crate::operations::creation::{MakePolygon, MakeTriangle};
    use crate::operations::query::{SurfaceStatistics, TransformToOriginal};
    use crate::topology::{OrientedEdge, Sign};

    fn floating_square(surface: &mut Surface) -> FaceId {
        MakePolygon::new(
            [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)]
                .into_iter()
                .map(|(x, y)| DualVector::floating(Point::new(x, y)))
                .collect(),
        )
        .execute(surface)
        .unwrap()
    }

    fn assert_flat_torus(surface: &Surface) {
        let stats = SurfaceStatistics::new().execute(surface);
        assert_eq!(stats.open_edges, 0);
        assert_eq!(stats.genus, Some(1));
        for (_, vertex) in surface.vertices() {
            assert!(!vertex.on_boundary);
            assert_relative_eq!(vertex.total_angle, TAU, epsilon = 1e-9);
            assert_relative_eq!(vertex.sectors.iter().sum::<f64>(), vertex.total_angle, epsilon = 1e-12);
        }
    }

    #[test]
    fn square_unfolds_to_four_copies() {
        let mut surface = Surface::default();
        floating_square(&mut surface);

        let completion = CompleteSurface::new().execute(&mut surface).unwrap();
        assert_eq!(completion.reflections, 3);
        assert_eq!(completion.faces, 4);
        assert_eq!(completion.edges, 8);
        assert_eq!(completion.vertices, 4);
        assert_flat_torus(&surface);
    }

    #[test]
    fn exact_square_matches_floating_square() {
        let field = NumberField::cyclotomic(4);
        let mut surface = Surface::new(SurfaceConfig::new().with_arithmetic(Arithmetic::Exact(field.clone())));
        let edges = (0..4)
            .map(|k| surface.exact_vector(AlgebraicNumber::root_of_unity(&field, k)).unwrap())
            .collect();
        MakePolygon::new(edges).execute(&mut surface).unwrap();

        let completion = CompleteSurface::new().execute(&mut surface).unwrap();
        assert_eq!((completion.reflections, completion.faces), (3, 4));
        assert_flat_torus(&surface);
    }

    #[test]
    fn completing_a_closed_surface_adds_nothing() {
        let mut surface = Surface::default();
        floating_square(&mut surface);
        let first = CompleteSurface::new().execute(&mut surface).unwrap();
        let second = CompleteSurface::new().execute(&mut surface).unwrap();
        assert_eq!(second.reflections, 0);
        assert_eq!(
            (second.faces, second.edges, second.vertices),
            (first.faces, first.edges, first.vertices)
        );
    }

    #[test]
    fn reflection_cap_reports_divergence() {
        let mut surface = Surface::new(SurfaceConfig::new().with_max_reflections(1));
        floating_square(&mut surface);
        let err = CompleteSurface::new().execute(&mut surface).unwrap_err();
        assert!(matches!(
            err,
            UnfoldError::Topology(TopologyError::CompletionDiverged { reflections: 1 })
        ));

        assert_eq!(surface.faces().count(), 1);
        assert_eq!(surface.edges().count(), 4);
        assert_eq!(surface.open_edges().len(), 4);
        assert_eq!(surface.vertices().count(), 4);
        for (_, edge) in surface.edges() {
            assert_eq!(edge.label, None);
            assert!(!edge.internal);
        }
    }

    #[test]
    fn labelled_square_is_relabelled_and_closes() {
        let mut surface = Surface::default();
        MakePolygon::new(
            [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)]
                .into_iter()
                .map(|(x, y)| DualVector::floating(Point::new(x, y)))
                .collect(),
        )
        .with_labels(vec![0, 1, 0, 1])
        .execute(&mut surface)
        .unwrap();

        let completion = CompleteSurface::new().execute(&mut surface).unwrap();
        assert_eq!(completion.reflections, 3);
        assert_eq!((completion.faces, completion.edges, completion.vertices), (4, 8, 4));
        assert_flat_torus(&surface);

        let mut labels: Vec<usize> = surface.edges().filter_map(|(_, e)| e.label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), surface.edges().count());
    }

    #[test]
    fn heptagonal_billiard_has_three_cone_points() {
        let mut surface = Surface::default();
        MakeTriangle::from_angles(1, 2, 4).execute(&mut surface).unwrap();

        let completion = CompleteSurface::new().execute(&mut surface).unwrap();
        assert_eq!((completion.faces, completion.edges, completion.vertices), (14, 21, 3));
        let stats = SurfaceStatistics::new().execute(&surface);
        assert_eq!(stats.open_edges, 0);
        assert_eq!(stats.genus, Some(3));

        let mut totals: Vec<f64> = surface.vertices().map(|(_, v)| v.total_angle).collect();
        totals.sort_by(f64::total_cmp);
        for (total, turns) in totals.iter().zip([1.0, 2.0, 4.0]) {
            assert_relative_eq!(*total, turns * TAU, epsilon = 1e-9);
        }
    }

    #[test]
    fn right_isosceles_billiard_maps_back_onto_the_table() {
        let config = SurfaceConfig::new()
            .with_arithmetic(Arithmetic::Exact(NumberField::cyclotomic(8)))
            .with_billiard(true);
        let mut surface = Surface::new(config);
        let seed = MakeTriangle::from_angles(1, 1, 2).execute(&mut surface).unwrap();
        let table: Vec<Point> = {
            let boundary = &surface.face(seed).unwrap().boundary;
            let ab = surface.oriented_vector(&boundary[0]).unwrap().approx();
            let ca = surface.oriented_vector(&boundary[2]).unwrap().approx();
            vec![Point::new(0.0, 0.0), ab, -ca]
        };

        let completion = CompleteSurface::new().execute(&mut surface).unwrap();
        assert_eq!(completion.faces, 8);
        assert_flat_torus(&surface);

        for (id, face) in surface.faces() {
            let mut offset = surface.exact_vector(AlgebraicNumber::zero(surface.arithmetic().field().unwrap())).unwrap();
            for oe in &face.boundary {
                let (original, mapped) = TransformToOriginal::new(id, offset.clone()).execute(&surface).unwrap();
                assert_eq!(original, seed);
                assert!(
                    table.iter().any(|corner| (corner - mapped.approx()).norm() < 1e-9),
                    "{} is not a corner of the table",
                    mapped.approx()
                );
                offset = offset.try_add(&surface.oriented_vector(oe).unwrap()).unwrap();
            }
        }
    }

    #[test]
    fn folded_seed_closes_through_internal_pass() {
        let mut surface = Surface::default();
        let p: Vec<_> = (0..4).map(|_| surface.add_vertex()).collect();
        let v = |x: f64, y: f64| DualVector::floating(Point::new(x, y));
        let a = surface.add_edge(p[0], p[1], v(1.0, 0.0)).unwrap();
        let b = surface.add_edge(p[1], p[2], v(0.0, 1.0)).unwrap();
        let d = surface.add_edge(p[2], p[0], v(-1.0, -1.0)).unwrap();
        let c = surface.add_edge(p[2], p[3], v(-1.0, 0.0)).unwrap();
        let l = surface.add_edge(p[3], p[0], v(0.0, -1.0)).unwrap();
        surface
            .add_face(vec![
                OrientedEdge::new(a, Sign::Positive),
                OrientedEdge::new(b, Sign::Positive),
                OrientedEdge::new(d, Sign::Positive),
            ])
            .unwrap();
        surface
            .add_face(vec![
                OrientedEdge::new(d, Sign::Negative),
                OrientedEdge::new(c, Sign::Positive),
                OrientedEdge::new(l, Sign::Positive),
            ])
            .unwrap();

        let completion = CompleteSurface::new().execute(&mut surface).unwrap();
        assert_eq!(completion.faces, 8);
        assert!(surface.edge(d).unwrap().internal);
        assert_flat_torus(&surface);
        for (_, edge) in surface.edges().filter(|(_, e)| e.internal) {
            assert!(!edge.is_open());
        }
    }
}
