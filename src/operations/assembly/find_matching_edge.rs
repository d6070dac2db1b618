use crate::error::Result;
use crate::topology::{EdgeId, Surface};

use super::Congruence;

/// Looks for an open edge that `edge` can be glued to.
///
/// A candidate shares the label of `edge`, is open, and is congruent to it.
/// For a wall edge the candidate's face must carry the position tag that the
/// face of `edge` gets when reflected across `edge`; for a fold edge both
/// edges must descend from the two sides of the same fold.
pub struct FindMatchingEdge {
    edge: EdgeId,
}

impl FindMatchingEdge {
    /// Creates a new `FindMatchingEdge` query.
    #[must_use]
    pub fn new(edge: EdgeId) -> Self {
        Self { edge }
    }

    /// Executes the query. `Ok(None)` means the edge stays open for now.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface references are inconsistent or an
    /// exact reflection axis is not rigid.
    pub fn execute(&self, surface: &Surface) -> Result<Option<EdgeId>> {
        let Some(at) = surface.boundary_ref(self.edge)? else {
            return Ok(None);
        };
        let data = surface.edge(self.edge)?;
        let oe = surface.oriented(at)?;
        let epsilon = surface.epsilon();

        let reflected_position = if data.internal {
            None
        } else {
            let axis = surface.oriented_vector(&oe)?;
            Some(surface.face(at.face)?.position.reflect(&axis)?)
        };

        for (id, candidate) in surface.edges() {
            if id == self.edge || candidate.label != data.label || !candidate.is_open() {
                continue;
            }
            let Some(cat) = surface.boundary_ref(id)? else {
                continue;
            };
            let coe = surface.oriented(cat)?;
            if Congruence::of(surface, &coe, &oe)? == Congruence::Incongruent {
                continue;
            }

            if let Some(target) = &reflected_position {
                let position = &surface.face(cat.face)?.position;
                if (position.approx() - target.approx()).norm() > epsilon {
                    continue;
                }
                if let (Some(a), Some(b)) = (position.symbolic(), target.symbolic()) {
                    if a != b {
                        continue;
                    }
                }
            }

            if data.internal && candidate.internal {
                let folded = match (coe.from_edge, oe.from_edge) {
                    (Some(theirs), Some(ours)) => surface.pair(theirs)? == Some(ours),
                    _ => false,
                };
                if !folded {
                    continue;
                }
            }

            return Ok(Some(id));
        }
        Ok(None)
    }
}
