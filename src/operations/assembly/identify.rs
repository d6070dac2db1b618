use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::topology::{EdgeId, Sign, Surface, VertexId};

use super::Congruence;

/// Merges one vertex into another.
///
/// Every edge endpoint at `absorb` is retargeted to `keep`, the valences are
/// added, and `absorb` is tombstoned until the next compaction.
pub struct IdentifyVertices {
    keep: VertexId,
    absorb: VertexId,
}

impl IdentifyVertices {
    /// Creates a new `IdentifyVertices` operation.
    #[must_use]
    pub fn new(keep: VertexId, absorb: VertexId) -> Self {
        Self { keep, absorb }
    }

    /// Executes the operation, returning the surviving vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is missing.
    pub fn execute(&self, surface: &mut Surface) -> Result<VertexId> {
        if self.keep == self.absorb {
            return Ok(self.keep);
        }
        surface.vertex(self.keep)?;
        let (valence, back_edge) = {
            let absorbed = surface.vertex_mut(self.absorb)?;
            absorbed.deleted = true;
            (std::mem::take(&mut absorbed.valence), absorbed.edge.take())
        };

        let edges: Vec<EdgeId> = surface.edges().map(|(id, _)| id).collect();
        for id in edges {
            let edge = surface.edge_mut(id)?;
            if edge.v0 == self.absorb {
                edge.v0 = self.keep;
            }
            if edge.v1 == self.absorb {
                edge.v1 = self.keep;
            }
        }

        let kept = surface.vertex_mut(self.keep)?;
        kept.valence += valence;
        if kept.edge.is_none() {
            kept.edge = back_edge;
        }
        Ok(self.keep)
    }
}

/// Glues the open edge `absorb` onto the congruent open edge `keep`.
///
/// The endpoints are identified head to head for [`Congruence::Same`] and
/// head to tail for [`Congruence::Reverse`]. The face that bordered `absorb`
/// then borders `keep`, and `absorb` is orphaned until the next compaction.
/// After a same-orientation gluing both faces walk `keep` in the same
/// direction; [`Surface::pair`] still matches the two sides by edge identity.
pub struct IdentifyEdges {
    keep: EdgeId,
    absorb: EdgeId,
}

impl IdentifyEdges {
    /// Creates a new `IdentifyEdges` operation.
    #[must_use]
    pub fn new(keep: EdgeId, absorb: EdgeId) -> Self {
        Self { keep, absorb }
    }

    /// Executes the operation, returning the surviving edge.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MalformedInput`] if the edges coincide or are
    /// not both open, and [`TopologyError::CongruenceMismatch`] if their
    /// vectors differ.
    pub fn execute(&self, surface: &mut Surface) -> Result<EdgeId> {
        let (keep, absorb) = (self.keep, self.absorb);
        if keep == absorb {
            return Err(TopologyError::MalformedInput(format!("cannot glue edge {keep:?} to itself")).into());
        }
        let open = |surface: &Surface, id: EdgeId| -> Result<_> {
            surface.boundary_ref(id)?.ok_or_else(|| {
                TopologyError::MalformedInput(format!("edge {id:?} is not open")).into()
            })
        };
        let at0 = open(surface, keep)?;
        let at1 = open(surface, absorb)?;
        let oe0 = surface.oriented(at0)?;
        let oe1 = surface.oriented(at1)?;

        let congruence = Congruence::of(surface, &oe0, &oe1)?;
        let sign = match congruence {
            Congruence::Same => {
                IdentifyVertices::new(surface.origin(&oe0)?, surface.origin(&oe1)?).execute(surface)?;
                IdentifyVertices::new(surface.target(&oe0)?, surface.target(&oe1)?).execute(surface)?;
                oe0.sign
            }
            Congruence::Reverse => {
                IdentifyVertices::new(surface.origin(&oe0)?, surface.target(&oe1)?).execute(surface)?;
                IdentifyVertices::new(surface.target(&oe0)?, surface.origin(&oe1)?).execute(surface)?;
                oe0.sign.flip()
            }
            Congruence::Incongruent => {
                return Err(TopologyError::CongruenceMismatch {
                    left: keep,
                    right: absorb,
                }
                .into())
            }
        };

        let slot = &mut surface.face_mut(at1.face)?.boundary[at1.position];
        slot.edge = keep;
        slot.sign = sign;
        surface.edge_mut(keep)?.set_null_face(at1.face);

        let vertices: Vec<VertexId> = surface.vertices().map(|(id, _)| id).collect();
        for id in vertices {
            let vertex = surface.vertex_mut(id)?;
            if vertex.edge == Some(absorb) {
                vertex.edge = Some(keep);
            }
        }

        // The absorbed edge's two endpoint counts were carried over by the
        // vertex merges above.
        let (w0, w1) = {
            let edge = surface.edge_mut(absorb)?;
            edge.set_face(Sign::Positive, None);
            edge.set_face(Sign::Negative, None);
            edge.orphaned = true;
            (edge.v0, edge.v1)
        };
        for w in [w0, w1] {
            let vertex = surface.vertex_mut(w)?;
            vertex.valence = vertex.valence.saturating_sub(1);
        }

        debug!(?keep, ?absorb, ?congruence, "identified edges");
        Ok(keep)
    }
}
