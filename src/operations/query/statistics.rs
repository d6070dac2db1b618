use crate::topology::Surface;

/// Entity counts and topological invariants of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
    pub open_edges: usize,
    /// `V − E + F`.
    pub euler_characteristic: i64,
    /// Genus, once the surface has no open edges.
    pub genus: Option<i64>,
}

/// Counts the live entities of a surface.
#[derive(Default)]
pub struct SurfaceStatistics;

impl SurfaceStatistics {
    /// Creates a new `SurfaceStatistics` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query.
    #[must_use]
    pub fn execute(&self, surface: &Surface) -> Statistics {
        let vertices = surface.vertices().count();
        let edges = surface.edges().count();
        let faces = surface.faces().count();
        let open_edges = surface.open_edges().len();
        let as_i64 = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        let euler_characteristic = as_i64(vertices) - as_i64(edges) + as_i64(faces);
        let genus = (open_edges == 0 && faces > 0).then(|| (2 - euler_characteristic) / 2);
        Statistics {
            vertices,
            edges,
            faces,
            open_edges,
            euler_characteristic,
            genus,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::algebra::DualVector;
    use crate::math::Point;
    use crate::topology::{OrientedEdge, Sign};

    #[test]
    fn square_torus_has_genus_one() {
        let mut surface = Surface::default();
        let v = surface.add_vertex();
        let h = surface
            .add_edge(v, v, DualVector::floating(Point::new(1.0, 0.0)))
            .unwrap();
        let w = surface
            .add_edge(v, v, DualVector::floating(Point::new(0.0, 1.0)))
            .unwrap();
        surface
            .add_face(vec![
                OrientedEdge::new(h, Sign::Positive),
                OrientedEdge::new(w, Sign::Positive),
                OrientedEdge::new(h, Sign::Negative),
                OrientedEdge::new(w, Sign::Negative),
            ])
            .unwrap();

        let stats = SurfaceStatistics::new().execute(&surface);
        assert_eq!((stats.vertices, stats.edges, stats.faces), (1, 2, 1));
        assert_eq!(stats.euler_characteristic, 0);
        assert_eq!(stats.genus, Some(1));
    }

    #[test]
    fn open_surfaces_have_no_genus() {
        let mut surface = Surface::default();
        let a = surface.add_vertex();
        let b = surface.add_vertex();
        surface
            .add_edge(a, b, DualVector::floating(Point::new(1.0, 0.0)))
            .unwrap();
        let stats = SurfaceStatistics::new().execute(&surface);
        assert_eq!(stats.genus, None);
        assert_eq!(stats.euler_characteristic, 1);
    }
}
