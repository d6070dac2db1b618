use tracing::debug;

use crate::error::Result;
use crate::topology::{EdgeId, FaceId, OrientedEdge, Sign, Surface};

use super::{FindMatchingEdge, IdentifyEdges};

/// Adds the mirror image of a face across the line of an edge vector.
///
/// The image is built from fresh vertices and edges, walking the source
/// boundary backwards so the copy stays counter-clockwise; its first vertex
/// is the image of the source's first vertex. Each new edge keeps the label
/// (and fold provenance) of the edge it copies, and is glued to a matching
/// open edge right away when one exists.
pub struct ReflectFace {
    axis: EdgeId,
    face: FaceId,
}

impl ReflectFace {
    /// Creates a new `ReflectFace` operation reflecting `face` across `axis`.
    #[must_use]
    pub fn new(axis: EdgeId, face: FaceId) -> Self {
        Self { axis, face }
    }

    /// Executes the operation, returning the new face.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or face is missing, the axis is not rigid
    /// in exact mode, or a gluing fails.
    pub fn execute(&self, surface: &mut Surface) -> Result<FaceId> {
        let axis = surface.edge(self.axis)?.vector.clone();
        let source = surface.face(self.face)?.clone();

        let first = surface.add_vertex();
        let mut last = first;
        let mut boundary = Vec::with_capacity(source.order());
        for (i, oe) in source.boundary.iter().enumerate().rev() {
            let next = if i == 0 { first } else { surface.add_vertex() };
            let vector = surface.oriented_vector(oe)?.reflect(&axis)?.neg();
            let (label, internal) = {
                let edge = surface.edge(oe.edge)?;
                (edge.label, edge.internal)
            };

            let id = surface.add_edge(last, next, vector)?;
            let mut copy = OrientedEdge::new(id, Sign::Positive);
            let edge = surface.edge_mut(id)?;
            edge.label = label;
            if internal {
                edge.internal = true;
                copy.from_edge = oe.from_edge;
            }
            boundary.push(copy);
            last = next;
        }

        let new_edges: Vec<EdgeId> = boundary.iter().map(|oe| oe.edge).collect();
        let image = surface.add_face(boundary)?;
        let position = source.position.reflect(&axis)?;
        let billiard = surface.config().billiard;
        let data = surface.face_mut(image)?;
        data.position = position;
        if billiard {
            data.origin = Some(self.face);
            data.reflection = Some(axis);
        }

        let mut glued = 0_usize;
        for edge in new_edges {
            if let Some(candidate) = FindMatchingEdge::new(edge).execute(surface)? {
                IdentifyEdges::new(candidate, edge).execute(surface)?;
                glued += 1;
            }
        }

        debug!(axis = ?self.axis, source = ?self.face, ?image, glued, "reflected face");
        Ok(image)
    }
}
