//! Directions at a cone point.
//!
//! A direction is a ray leaving a vertex of the flat surface. Around a cone
//! point of total angle `Θ` the rays form a circle of length `Θ`, cut into
//! sectors by the outgoing edges, so a direction is stored as the sector it
//! falls in plus its planar vector in the coordinates of that sector.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{GeometryError, Result, TopologyError};
use crate::math::{planar, Point, ANGLE_TOLERANCE};

use super::{HalfEdgeRef, Surface, VertexData, VertexId};

/// A ray leaving a vertex, located in one of the vertex's sectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    vertex: VertexId,
    position: usize,
    vector: Point,
}

fn cycle(surface: &Surface, vertex: VertexId) -> Result<&VertexData> {
    let data = surface.vertex(vertex)?;
    if data.out_edges.is_empty() {
        return Err(TopologyError::MalformedInput(format!(
            "vertex {vertex:?} has no edge cycle"
        ))
        .into());
    }
    Ok(data)
}

fn out_vector(surface: &Surface, at: HalfEdgeRef) -> Result<Point> {
    Ok(surface.oriented_vector(&surface.oriented(at)?)?.approx())
}

/// The ray closing the sector that starts at `at`.
fn sector_end(surface: &Surface, at: HalfEdgeRef) -> Result<Point> {
    Ok(-surface
        .oriented_vector(&surface.oriented(surface.prev_ref(at)?)?)?
        .approx())
}

fn in_sector(surface: &Surface, data: &VertexData, position: usize, p: Point) -> Result<bool> {
    let at = data.out_edges[position];
    let start = out_vector(surface, at)?;
    if planar::aligned(start, p) {
        return Ok(true);
    }
    Ok(planar::ccw_angle(start, p) < data.sectors[position]
        && !planar::aligned(sector_end(surface, at)?, p))
}

impl Direction {
    /// Finds the sector of `vertex` that contains `vector`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MalformedInput`] if the vertex has no cycle or
    /// no sector contains the vector.
    pub fn locate(surface: &Surface, vertex: VertexId, vector: Point) -> Result<Self> {
        let data = cycle(surface, vertex)?;
        for position in 0..data.out_edges.len() {
            if in_sector(surface, data, position, vector)? {
                return Ok(Self {
                    vertex,
                    position,
                    vector,
                });
            }
        }
        Err(TopologyError::MalformedInput(format!(
            "no sector of vertex {vertex:?} contains {vector}"
        ))
        .into())
    }

    /// The direction along an outgoing oriented edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not in its origin's cycle.
    pub fn from_edge(surface: &Surface, at: HalfEdgeRef) -> Result<Self> {
        let vertex = surface.origin(&surface.oriented(at)?)?;
        let data = cycle(surface, vertex)?;
        let position = data
            .out_edges
            .iter()
            .position(|&h| h == at)
            .ok_or(TopologyError::EntityNotFound("edge in vertex cycle"))?;
        Ok(Self {
            vertex,
            position,
            vector: out_vector(surface, at)?,
        })
    }

    #[must_use]
    pub fn vertex(&self) -> VertexId {
        self.vertex
    }

    /// Index of the sector in the vertex cycle.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn vector(&self) -> Point {
        self.vector
    }

    /// Confirms the stored vector lies in the stored sector.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Orientation`] if it does not.
    pub fn check(&self, surface: &Surface) -> Result<()> {
        let data = cycle(surface, self.vertex)?;
        if in_sector(surface, data, self.position, self.vector)? {
            Ok(())
        } else {
            Err(GeometryError::Orientation(format!(
                "{} is outside sector {} of vertex {:?}",
                self.vector, self.position, self.vertex
            ))
            .into())
        }
    }

    /// Moves counter-clockwise to the first sector containing `p`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Orientation`] if no sector contains `p`.
    pub fn rotate_ccw_to(&mut self, surface: &Surface, p: Point) -> Result<()> {
        let data = cycle(surface, self.vertex)?;
        let mut position = self.position;
        for _ in 0..data.out_edges.len() {
            if in_sector(surface, data, position, p)? {
                self.position = position;
                self.vector = p;
                return Ok(());
            }
            position = data.next_position(position);
        }
        Err(GeometryError::Orientation(format!("cannot rotate counter-clockwise to {p}")).into())
    }

    /// Moves clockwise to the first sector containing `p`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Orientation`] if no sector contains `p`.
    pub fn rotate_cw_to(&mut self, surface: &Surface, p: Point) -> Result<()> {
        let data = cycle(surface, self.vertex)?;
        let mut position = self.position;
        for _ in 0..data.out_edges.len() {
            if in_sector(surface, data, position, p)? {
                self.position = position;
                self.vector = p;
                return Ok(());
            }
            position = data.prev_position(position);
        }
        Err(GeometryError::Orientation(format!("cannot rotate clockwise to {p}")).into())
    }

    /// Counter-clockwise angle from `self` to `other`, in `[0, Θ)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directions are at different vertices.
    pub fn angle_to(&self, surface: &Surface, other: &Self) -> Result<f64> {
        if self.vertex != other.vertex {
            return Err(TopologyError::MalformedInput(
                "directions at different vertices".into(),
            )
            .into());
        }
        let data = cycle(surface, self.vertex)?;
        let mut angle = 0.0;
        let mut position = self.position;
        while position != other.position {
            angle += data.sectors[position];
            position = data.next_position(position);
        }
        angle += planar::ccw_angle(out_vector(surface, data.out_edges[other.position])?, other.vector);
        angle -= planar::ccw_angle(out_vector(surface, data.out_edges[self.position])?, self.vector);
        if angle < 0.0 {
            angle += data.total_angle;
        }
        Ok(angle)
    }

    fn verify_turn(&self, surface: &Surface, from: &Self, expected: f64) -> Result<()> {
        let total = cycle(surface, self.vertex)?.total_angle;
        let actual = from.angle_to(surface, self)?;
        let off = (actual - expected).abs();
        if off < ANGLE_TOLERANCE || (off - total).abs() < ANGLE_TOLERANCE {
            Ok(())
        } else {
            Err(GeometryError::Orientation(format!(
                "rotation by {expected} landed {actual} away"
            ))
            .into())
        }
    }

    /// Rotates counter-clockwise by `theta ∈ [0, π)`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::AngleOutOfRange`] for other angles, or
    /// [`GeometryError::Orientation`] if the resulting sector is inconsistent.
    pub fn rotate(&mut self, surface: &Surface, theta: f64) -> Result<()> {
        if !(0.0..PI).contains(&theta) {
            return Err(GeometryError::AngleOutOfRange {
                angle: theta,
                min: 0.0,
                max: PI,
            }
            .into());
        }
        let from = *self;
        self.rotate_ccw_to(surface, planar::rotate(self.vector, theta))?;
        self.verify_turn(surface, &from, theta)
    }

    /// Rotates counter-clockwise by any `theta ≥ 0`, in quarter turns.
    /// Whole turns around the vertex are dropped first.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::AngleOutOfRange`] for negative angles, or
    /// [`GeometryError::Orientation`] if the result is inconsistent.
    pub fn rotate_general(&mut self, surface: &Surface, theta: f64) -> Result<()> {
        if !(theta >= 0.0 && theta.is_finite()) {
            return Err(GeometryError::AngleOutOfRange {
                angle: theta,
                min: 0.0,
                max: f64::INFINITY,
            }
            .into());
        }
        let total = cycle(surface, self.vertex)?.total_angle;
        let turn = theta % total;
        let from = *self;
        let quarters = (turn / FRAC_PI_2).floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        for _ in 0..quarters as u64 {
            self.rotate(surface, FRAC_PI_2)?;
        }
        self.rotate(surface, turn - quarters * FRAC_PI_2)?;
        self.verify_turn(surface, &from, turn)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::algebra::DualVector;
    use crate::topology::{OrientedEdge, Sign};
    use approx::assert_relative_eq;

    fn torus() -> (Surface, VertexId) {
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
        (surface, v)
    }

    #[test]
    fn locate_and_rotate() {
        let (surface, v) = torus();
        let mut d = Direction::locate(&surface, v, Point::new(1.0, 1.0)).unwrap();
        assert_eq!(d.position(), 0);
        d.check(&surface).unwrap();

        let start = d;
        d.rotate(&surface, FRAC_PI_2).unwrap();
        assert_eq!(d.position(), 1);
        assert_relative_eq!(d.vector().re, -1.0, epsilon = 1e-12);
        assert_relative_eq!(start.angle_to(&surface, &d).unwrap(), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn edge_directions_sit_on_sector_starts() {
        let (surface, v) = torus();
        let first = surface.vertex(v).unwrap().out_edges[0];
        let d = Direction::from_edge(&surface, first).unwrap();
        assert_eq!(d.position(), 0);
        d.check(&surface).unwrap();
    }

    #[test]
    fn half_turn_is_out_of_range() {
        let (surface, v) = torus();
        let mut d = Direction::locate(&surface, v, Point::new(1.0, 0.5)).unwrap();
        assert!(d.rotate(&surface, PI).is_err());
        assert!(d.rotate_general(&surface, -0.1).is_err());
    }

    #[test]
    fn general_rotation_wraps_around() {
        let (surface, v) = torus();
        let start = Direction::locate(&surface, v, Point::new(2.0, 1.0)).unwrap();
        let mut d = start;
        d.rotate_general(&surface, 5.0 * FRAC_PI_2 + 0.25).unwrap();
        assert_relative_eq!(
            start.angle_to(&surface, &d).unwrap(),
            FRAC_PI_2 + 0.25,
            epsilon = 1e-9
        );
    }

    #[test]
    fn many_whole_turns_reduce_first() {
        let (surface, v) = torus();
        let start = Direction::locate(&surface, v, Point::new(2.0, 1.0)).unwrap();
        let total = surface.vertex(v).unwrap().total_angle;
        let theta = 1e9 * std::f64::consts::TAU + 0.3;
        let mut d = start;
        d.rotate_general(&surface, theta).unwrap();
        assert_relative_eq!(start.angle_to(&surface, &d).unwrap(), theta % total, epsilon = 1e-9);
    }

    #[test]
    fn rotation_around_a_large_cone_point() {
        let mut surface = Surface::default();
        crate::operations::creation::MakeTriangle::from_angles(1, 2, 4)
            .execute(&mut surface)
            .unwrap();
        crate::operations::assembly::CompleteSurface::new()
            .execute(&mut surface)
            .unwrap();
        let (v, data) = surface
            .vertices()
            .max_by(|a, b| a.1.total_angle.total_cmp(&b.1.total_angle))
            .unwrap();
        assert_relative_eq!(data.total_angle, 4.0 * std::f64::consts::TAU, epsilon = 1e-9);

        let mut start = Direction::from_edge(&surface, data.out_edges[0]).unwrap();
        start.rotate(&surface, 0.1).unwrap();
        for theta in [0.3, 2.0, 7.0, 20.0, 25.0] {
            let mut d = start;
            d.rotate_general(&surface, theta).unwrap();
            assert_eq!(d.vertex(), v);
            d.check(&surface).unwrap();
            assert_relative_eq!(start.angle_to(&surface, &d).unwrap(), theta, epsilon = 1e-7);
        }
    }

    #[test]
    fn cw_rotation_walks_backwards() {
        let (surface, v) = torus();
        let mut d = Direction::locate(&surface, v, Point::new(1.0, 1.0)).unwrap();
        d.rotate_cw_to(&surface, Point::new(1.0, -1.0)).unwrap();
        assert_eq!(d.position(), 3);
    }
}
