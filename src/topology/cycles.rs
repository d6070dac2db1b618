use std::collections::HashMap;

use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::math::planar;

use super::{HalfEdgeRef, Surface, VertexId};

impl Surface {
    /// Next outgoing oriented edge counter-clockwise around its origin.
    fn ccw_successor(&self, at: HalfEdgeRef) -> Result<Option<HalfEdgeRef>> {
        Ok(self.pair(self.prev_ref(at)?)?)
    }

    /// Next outgoing oriented edge clockwise around its origin.
    fn cw_successor(&self, at: HalfEdgeRef) -> Result<Option<HalfEdgeRef>> {
        match self.pair(at)? {
            Some(p) => Ok(Some(self.next_ref(p)?)),
            None => Ok(None),
        }
    }

    /// Interior angle of the face corner whose first side is `at`.
    fn sector_angle(&self, at: HalfEdgeRef) -> Result<f64> {
        let out = self.oriented_vector(&self.oriented(at)?)?.approx();
        let back = -self.oriented_vector(&self.oriented(self.prev_ref(at)?)?)?.approx();
        Ok(planar::ccw_angle(out, back))
    }

    /// Orders the outgoing edges of every vertex counter-clockwise and
    /// records the sector angles and total angle.
    ///
    /// A vertex touched by an open edge gets its fan starting at the edge
    /// whose clockwise neighbour is missing.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvariantViolation`] if a vertex's outgoing
    /// edges do not form a single fan, or if a closed vertex's cycle
    /// length disagrees with its valence.
    pub fn build_vertex_cycles(&mut self) -> Result<()> {
        let mut outgoing: HashMap<VertexId, Vec<HalfEdgeRef>> = HashMap::new();
        for (face_id, face) in self.faces() {
            for (position, oe) in face.boundary.iter().enumerate() {
                outgoing
                    .entry(self.origin(oe)?)
                    .or_default()
                    .push(HalfEdgeRef::new(face_id, position));
            }
        }

        let ids: Vec<VertexId> = self.vertices().map(|(id, _)| id).collect();
        for id in ids {
            let candidates = outgoing.remove(&id).unwrap_or_default();
            let Some(&first) = candidates.first() else {
                let v = self.vertex_mut(id)?;
                v.out_edges.clear();
                v.sectors.clear();
                v.total_angle = 0.0;
                v.on_boundary = false;
                continue;
            };

            let mut start = first;
            let mut on_boundary = false;
            for &h in &candidates {
                if self.cw_successor(h)?.is_none() {
                    start = h;
                    on_boundary = true;
                    break;
                }
            }

            let mut out_edges = vec![start];
            let mut sectors = Vec::new();
            let mut current = start;
            loop {
                sectors.push(self.sector_angle(current)?);
                match self.ccw_successor(current)? {
                    Some(next) if next == start => break,
                    Some(next) => {
                        if out_edges.len() > candidates.len() {
                            return Err(TopologyError::violation(
                                None,
                                format!("edge cycle around vertex {id:?} does not close"),
                            )
                            .into());
                        }
                        out_edges.push(next);
                        current = next;
                    }
                    None => break,
                }
            }

            if out_edges.len() != candidates.len() {
                return Err(TopologyError::violation(
                    None,
                    format!(
                        "vertex {id:?} has {} outgoing edges but its cycle visits {}",
                        candidates.len(),
                        out_edges.len()
                    ),
                )
                .into());
            }
            let vertex = self.vertex_mut(id)?;
            if !on_boundary && vertex.valence != out_edges.len() {
                return Err(TopologyError::violation(
                    None,
                    format!(
                        "vertex {id:?} has valence {} but cycle length {}",
                        vertex.valence,
                        out_edges.len()
                    ),
                )
                .into());
            }
            vertex.total_angle = sectors.iter().sum();
            vertex.out_edges = out_edges;
            vertex.sectors = sectors;
            vertex.on_boundary = on_boundary;
            debug!(vertex = ?id, total_angle = vertex.total_angle, "built vertex cycle");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, TAU};

    use approx::assert_relative_eq;

    use crate::algebra::DualVector;
    use crate::math::Point;
    use crate::topology::{OrientedEdge, Sign, Surface};

    #[test]
    fn square_torus_has_one_flat_vertex() {
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

        surface.build_vertex_cycles().unwrap();
        let vertex = surface.vertex(v).unwrap();
        assert_eq!(vertex.out_edges.len(), 4);
        assert!(!vertex.on_boundary);
        assert_relative_eq!(vertex.total_angle, TAU, epsilon = 1e-12);
        for sector in &vertex.sectors {
            assert_relative_eq!(*sector, FRAC_PI_2, epsilon = 1e-12);
        }
    }

    #[test]
    fn open_triangle_vertices_are_boundary_fans() {
        let mut surface = Surface::default();
        let a = surface.add_vertex();
        let b = surface.add_vertex();
        let c = surface.add_vertex();
        let e0 = surface
            .add_edge(a, b, DualVector::floating(Point::new(1.0, 0.0)))
            .unwrap();
        let e1 = surface
            .add_edge(b, c, DualVector::floating(Point::new(-1.0, 1.0)))
            .unwrap();
        let e2 = surface
            .add_edge(c, a, DualVector::floating(Point::new(0.0, -1.0)))
            .unwrap();
        surface
            .add_face(vec![
                OrientedEdge::new(e0, Sign::Positive),
                OrientedEdge::new(e1, Sign::Positive),
                OrientedEdge::new(e2, Sign::Positive),
            ])
            .unwrap();

        surface.build_vertex_cycles().unwrap();
        let corner = surface.vertex(a).unwrap();
        assert!(corner.on_boundary);
        assert_eq!(corner.out_edges.len(), 1);
        assert_relative_eq!(corner.total_angle, FRAC_PI_2, epsilon = 1e-12);
    }
}
