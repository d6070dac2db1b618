use crate::algebra::DualVector;
use crate::error::{Result, TopologyError};
use crate::topology::{FaceId, OrientedEdge, Sign, Surface};

/// Seeds a surface with one polygon given by its consecutive edge vectors.
///
/// Every edge gets its own pair of endpoint vertices in sequence, so the
/// polygon is a single open face. Labels are optional and only describe the
/// seed; completion renumbers every edge when it starts.
pub struct MakePolygon {
    edges: Vec<DualVector>,
    labels: Option<Vec<usize>>,
}

impl MakePolygon {
    /// Creates a new `MakePolygon` operation.
    #[must_use]
    pub fn new(edges: Vec<DualVector>) -> Self {
        Self {
            edges,
            labels: None,
        }
    }

    /// Assigns labels to the edges, in boundary order.
    #[must_use]
    pub fn with_labels(mut self, labels: Vec<usize>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Executes the operation, adding the polygon to the surface.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MalformedInput`] if there are fewer than three
    /// edges, the edge vectors do not close up, the labels do not match the
    /// edges, or the vectors use the wrong arithmetic.
    pub fn execute(&self, surface: &mut Surface) -> Result<FaceId> {
        let n = self.edges.len();
        if n < 3 {
            return Err(TopologyError::MalformedInput(format!(
                "polygon needs at least three edges, got {n}"
            ))
            .into());
        }
        if let Some(labels) = &self.labels {
            if labels.len() != n {
                return Err(TopologyError::MalformedInput(format!(
                    "{} labels for {n} edges",
                    labels.len()
                ))
                .into());
            }
        }

        let exact = surface.arithmetic().is_exact();
        if self.edges.iter().any(|e| e.symbolic().is_some() != exact) {
            return Err(TopologyError::MalformedInput(
                "polygon edges do not match the surface arithmetic".into(),
            )
            .into());
        }

        let mut sum = self.edges[0].clone();
        for edge in &self.edges[1..] {
            sum = sum.try_add(edge)?;
        }
        if !sum.vanishes(surface.epsilon()) {
            return Err(TopologyError::MalformedInput(format!(
                "polygon does not close: edges sum to {}",
                sum.approx()
            ))
            .into());
        }

        let vertices: Vec<_> = (0..n).map(|_| surface.add_vertex()).collect();
        let mut boundary = Vec::with_capacity(n);
        for (i, vector) in self.edges.iter().enumerate() {
            let edge = surface.add_edge(vertices[i], vertices[(i + 1) % n], vector.clone())?;
            if let Some(labels) = &self.labels {
                surface.edge_mut(edge)?.label = Some(labels[i]);
            }
            boundary.push(OrientedEdge::new(edge, Sign::Positive));
        }
        surface.add_face(boundary)
    }
}
