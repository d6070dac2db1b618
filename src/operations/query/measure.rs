use crate::error::{Result, TopologyError};
use crate::math::{planar, Point};
use crate::topology::{FaceId, Surface, VertexId};

/// Average of a face's vertex offsets, measured from its first vertex.
pub struct Barycenter {
    face: FaceId,
}

impl Barycenter {
    /// Creates a new `Barycenter` query.
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self { face }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is missing or empty.
    pub fn execute(&self, surface: &Surface) -> Result<Point> {
        let face = surface.face(self.face)?;
        if face.is_empty() {
            return Err(TopologyError::EntityNotFound("face boundary").into());
        }
        let mut corner = Point::new(0.0, 0.0);
        let mut total = Point::new(0.0, 0.0);
        for oe in &face.boundary {
            corner += surface.oriented_vector(oe)?.approx();
            total += corner;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = face.order() as f64;
        Ok(total / n)
    }
}

/// Area of a triangular face.
pub struct TriangleArea {
    face: FaceId,
}

impl TriangleArea {
    /// Creates a new `TriangleArea` query.
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self { face }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MalformedInput`] if the face is not a triangle.
    pub fn execute(&self, surface: &Surface) -> Result<f64> {
        let face = surface.face(self.face)?;
        if face.order() != 3 {
            return Err(TopologyError::MalformedInput(format!(
                "area requested for a face of order {}",
                face.order()
            ))
            .into());
        }
        let first = surface.oriented_vector(&face.boundary[0])?.approx();
        let second = surface.oriented_vector(&face.boundary[1])?.approx();
        Ok(0.5 * planar::cross(first, second))
    }
}

/// Total cone angle at a vertex, as recorded by the last cycle build.
pub struct TotalAngle {
    vertex: VertexId,
}

impl TotalAngle {
    /// Creates a new `TotalAngle` query.
    #[must_use]
    pub fn new(vertex: VertexId) -> Self {
        Self { vertex }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is missing or has no edge cycle.
    pub fn execute(&self, surface: &Surface) -> Result<f64> {
        let vertex = surface.vertex(self.vertex)?;
        if vertex.out_edges.is_empty() {
            return Err(TopologyError::MalformedInput(format!(
                "vertex {:?} has no edge cycle",
                self.vertex
            ))
            .into());
        }
        Ok(vertex.total_angle)
    }
}
