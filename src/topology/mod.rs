mod cycles;
pub mod direction;
pub mod edge;
pub mod face;
pub mod vertex;

pub use direction::Direction;
pub use edge::{EdgeData, EdgeId, HalfEdgeRef, OrientedEdge, Sign};
pub use face::{FaceData, FaceId};
pub use vertex::{VertexData, VertexId};

use std::collections::HashSet;
use std::f64::consts::PI;

use slotmap::SlotMap;
use tracing::debug;

use crate::algebra::{AlgebraicNumber, Arithmetic, DualVector, ParameterSpace, SymbolicVector};
use crate::config::SurfaceConfig;
use crate::error::{Result, TopologyError};
use crate::math::Point;

/// Entities removed by one [`Surface::compact`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compaction {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
}

/// A translation surface under construction.
///
/// The surface is the arena that owns every vertex, edge and face. Entities
/// reference each other through typed ids; merged or consumed entities are
/// tombstoned and only physically removed by [`Surface::compact`].
#[derive(Debug, Clone)]
pub struct Surface {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    params: ParameterSpace,
    config: SurfaceConfig,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(SurfaceConfig::default())
    }
}

impl Surface {
    /// Creates an empty surface with the given configuration.
    #[must_use]
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            vertices: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            params: ParameterSpace::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    #[must_use]
    pub fn arithmetic(&self) -> &Arithmetic {
        &self.config.arithmetic
    }

    #[must_use]
    pub fn params(&self) -> &ParameterSpace {
        &self.params
    }

    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    // --- Vector construction ---

    /// An exact constant vector in the surface's field.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MalformedInput`] on a floating surface.
    pub fn exact_vector(&self, value: AlgebraicNumber) -> Result<DualVector> {
        if !self.config.arithmetic.is_exact() {
            return Err(TopologyError::MalformedInput(
                "exact vector requested on a floating surface".into(),
            )
            .into());
        }
        Ok(DualVector::exact(
            SymbolicVector::constant(value, &self.params),
            &self.params,
        )?)
    }

    /// The initial position tag of a fresh face.
    pub(crate) fn position_tag(&self) -> Result<DualVector> {
        match &self.config.arithmetic {
            Arithmetic::Floating => Ok(DualVector::floating(Point::new(PI, 1.0))),
            Arithmetic::Exact(field) => {
                let one = AlgebraicNumber::from_integer(field, 1);
                let nudge = AlgebraicNumber::generator(field).div_integer(100)?;
                self.exact_vector(&one + &nudge)
            }
        }
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self) -> VertexId {
        self.vertices.insert(VertexData::new())
    }

    /// Returns the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the surface.
    pub fn vertex(&self, id: VertexId) -> std::result::Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or(TopologyError::EntityNotFound("vertex"))
    }

    /// Returns mutable vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the surface.
    pub fn vertex_mut(&mut self, id: VertexId) -> std::result::Result<&mut VertexData, TopologyError> {
        self.vertices
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("vertex"))
    }

    /// Live vertices.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter().filter(|(_, v)| !v.deleted)
    }

    // --- Edge operations ---

    /// Inserts an undirected edge from `v0` to `v1` with the given offset.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is missing or the vector uses the
    /// wrong arithmetic.
    pub fn add_edge(&mut self, v0: VertexId, v1: VertexId, vector: DualVector) -> Result<EdgeId> {
        if vector.symbolic().is_some() != self.config.arithmetic.is_exact() {
            return Err(TopologyError::MalformedInput(
                "edge vector does not match the surface arithmetic".into(),
            )
            .into());
        }
        self.vertex(v0)?;
        self.vertex(v1)?;
        let id = self.edges.insert(EdgeData::new(v0, v1, vector));
        for v in [v0, v1] {
            let data = self.vertex_mut(v)?;
            data.valence += 1;
            data.edge.get_or_insert(id);
        }
        Ok(id)
    }

    /// Returns the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the surface.
    pub fn edge(&self, id: EdgeId) -> std::result::Result<&EdgeData, TopologyError> {
        self.edges.get(id).ok_or(TopologyError::EntityNotFound("edge"))
    }

    /// Returns mutable edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the surface.
    pub fn edge_mut(&mut self, id: EdgeId) -> std::result::Result<&mut EdgeData, TopologyError> {
        self.edges
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("edge"))
    }

    /// Live edges.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter().filter(|(_, e)| !e.orphaned)
    }

    /// Live edges with exactly one face attached.
    #[must_use]
    pub fn open_edges(&self) -> Vec<EdgeId> {
        self.edges()
            .filter(|(_, e)| e.is_open())
            .map(|(id, _)| id)
            .collect()
    }

    // --- Face operations ---

    /// Inserts a face bounded by `boundary` and attaches it to its edges.
    ///
    /// Each oriented edge claims the side of its undirected edge matching its
    /// sign. Nothing is attached if any side is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MalformedInput`] for an empty boundary, a
    /// missing edge, or an edge side that is already in use.
    pub fn add_face(&mut self, boundary: Vec<OrientedEdge>) -> Result<FaceId> {
        if boundary.is_empty() {
            return Err(TopologyError::MalformedInput("face with empty boundary".into()).into());
        }
        let mut claimed = HashSet::new();
        for oe in &boundary {
            let edge = self.edge(oe.edge)?;
            if edge.face(oe.sign).is_some() || !claimed.insert((oe.edge, oe.sign)) {
                return Err(TopologyError::MalformedInput(format!(
                    "edge {:?} already has a face on its {:?} side",
                    oe.edge, oe.sign
                ))
                .into());
            }
        }
        let position = self.position_tag()?;
        let sides: Vec<_> = boundary.iter().map(|oe| (oe.edge, oe.sign)).collect();
        let id = self.faces.insert(FaceData::new(boundary, position));
        for (edge, sign) in sides {
            self.edge_mut(edge)?.set_face(sign, Some(id));
        }
        Ok(id)
    }

    /// Returns the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the surface.
    pub fn face(&self, id: FaceId) -> std::result::Result<&FaceData, TopologyError> {
        self.faces.get(id).ok_or(TopologyError::EntityNotFound("face"))
    }

    /// Returns mutable face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the surface.
    pub fn face_mut(&mut self, id: FaceId) -> std::result::Result<&mut FaceData, TopologyError> {
        self.faces
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("face"))
    }

    /// Live faces.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> {
        self.faces.iter().filter(|(_, f)| !f.is_empty())
    }

    // --- Oriented edge navigation ---

    /// The oriented edge at a boundary position.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or position does not exist.
    pub fn oriented(&self, at: HalfEdgeRef) -> std::result::Result<OrientedEdge, TopologyError> {
        self.face(at.face)?
            .boundary
            .get(at.position)
            .copied()
            .ok_or(TopologyError::EntityNotFound("oriented edge"))
    }

    /// Offset vector of an oriented edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge does not exist.
    pub fn oriented_vector(&self, oe: &OrientedEdge) -> std::result::Result<DualVector, TopologyError> {
        Ok(self.edge(oe.edge)?.oriented_vector(oe.sign))
    }

    /// Vertex an oriented edge starts at.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge does not exist.
    pub fn origin(&self, oe: &OrientedEdge) -> std::result::Result<VertexId, TopologyError> {
        Ok(self.edge(oe.edge)?.origin(oe.sign))
    }

    /// Vertex an oriented edge ends at.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge does not exist.
    pub fn target(&self, oe: &OrientedEdge) -> std::result::Result<VertexId, TopologyError> {
        Ok(self.edge(oe.edge)?.target(oe.sign))
    }

    /// The following oriented edge in the same face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist or its boundary was consumed.
    pub fn next_ref(&self, at: HalfEdgeRef) -> std::result::Result<HalfEdgeRef, TopologyError> {
        self.face(at.face)?
            .next_position(at.position)
            .map(|position| HalfEdgeRef::new(at.face, position))
            .ok_or_else(|| TopologyError::violation(at.face, "face boundary is empty"))
    }

    /// The preceding oriented edge in the same face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist or its boundary was consumed.
    pub fn prev_ref(&self, at: HalfEdgeRef) -> std::result::Result<HalfEdgeRef, TopologyError> {
        self.face(at.face)?
            .prev_position(at.position)
            .map(|position| HalfEdgeRef::new(at.face, position))
            .ok_or_else(|| TopologyError::violation(at.face, "face boundary is empty"))
    }

    /// The oriented edge on the other side of the same undirected edge, if
    /// that side is attached.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvariantViolation`] if the other side claims a
    /// face that does not contain the opposite orientation.
    pub fn pair(&self, at: HalfEdgeRef) -> std::result::Result<Option<HalfEdgeRef>, TopologyError> {
        let oe = self.oriented(at)?;
        let edge = self.edge(oe.edge)?;
        let [Some(first), Some(second)] = edge.faces else {
            return Ok(None);
        };
        // Prefer the opposite orientation; an edge glued with the same
        // orientation on both sides pairs by identity alone.
        let mut same = None;
        for face in [first, second] {
            for (position, c) in self.face(face)?.boundary.iter().enumerate() {
                let candidate = HalfEdgeRef::new(face, position);
                if c.edge != oe.edge || candidate == at {
                    continue;
                }
                if c.sign != oe.sign {
                    return Ok(Some(candidate));
                }
                same.get_or_insert(candidate);
            }
        }
        same.map(Some)
            .ok_or_else(|| TopologyError::violation(at.face, format!("no pair edge for {:?}", oe.edge)))
    }

    /// Where `edge` occurs in `face`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if the face does not use the edge.
    pub fn edge_in_face(&self, edge: EdgeId, face: FaceId) -> std::result::Result<HalfEdgeRef, TopologyError> {
        self.face(face)?
            .boundary
            .iter()
            .position(|oe| oe.edge == edge)
            .map(|position| HalfEdgeRef::new(face, position))
            .ok_or(TopologyError::EntityNotFound("edge in face"))
    }

    /// Position of an open edge inside its only face.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge does not exist or its face is inconsistent.
    pub fn boundary_ref(&self, edge: EdgeId) -> std::result::Result<Option<HalfEdgeRef>, TopologyError> {
        let Some((face, sign)) = self.edge(edge)?.boundary_side() else {
            return Ok(None);
        };
        self.face(face)?
            .boundary
            .iter()
            .position(|oe| oe.edge == edge && oe.sign == sign)
            .map(|position| Some(HalfEdgeRef::new(face, position)))
            .ok_or_else(|| TopologyError::violation(face, format!("open edge {edge:?} missing from its face")))
    }

    // --- Maintenance ---

    /// Physically removes tombstoned vertices, orphaned edges and emptied faces.
    pub fn compact(&mut self) -> Compaction {
        let before = (self.vertices.len(), self.edges.len(), self.faces.len());
        self.vertices.retain(|_, v| !v.deleted);
        self.edges.retain(|_, e| !e.orphaned);
        self.faces.retain(|_, f| !f.is_empty());
        let removed = Compaction {
            vertices: before.0 - self.vertices.len(),
            edges: before.1 - self.edges.len(),
            faces: before.2 - self.faces.len(),
        };
        debug!(?removed, "compacted surface");
        removed
    }

    /// Introduces new deformation parameters and pads every stored vector.
    ///
    /// Returns the coefficient index of the first new parameter.
    pub(crate) fn add_parameters(&mut self, values: &[f64]) -> usize {
        let n = values.len();
        for (_, edge) in &mut self.edges {
            edge.vector.pad(n);
        }
        for (_, face) in &mut self.faces {
            face.position.pad(n);
            if let Some(reflection) = &mut face.reflection {
                reflection.pad(n);
            }
        }
        let first = self.params.extend(values);
        debug!(first, count = n, "added deformation parameters");
        first
    }

    /// Numbers every live edge sequentially, replacing any existing labels.
    pub(crate) fn assign_labels(&mut self) {
        let live = self.edges.values_mut().filter(|e| !e.orphaned);
        for (label, edge) in live.enumerate() {
            edge.label = Some(label);
        }
    }

    /// Runs `op` on a copy of the surface and keeps the copy only if `op`
    /// succeeds, so a failed operation leaves the surface untouched.
    pub(crate) fn atomically<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let mut draft = self.clone();
        let value = op(&mut draft)?;
        *self = draft;
        Ok(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> DualVector {
        DualVector::floating(Point::new(x, y))
    }

    #[test]
    fn add_face_attaches_sides() {
        let mut surface = Surface::default();
        let a = surface.add_vertex();
        let b = surface.add_vertex();
        let c = surface.add_vertex();
        let e0 = surface.add_edge(a, b, p(1.0, 0.0)).unwrap();
        let e1 = surface.add_edge(b, c, p(-1.0, 1.0)).unwrap();
        let e2 = surface.add_edge(c, a, p(0.0, -1.0)).unwrap();
        let face = surface
            .add_face(vec![
                OrientedEdge::new(e0, Sign::Positive),
                OrientedEdge::new(e1, Sign::Positive),
                OrientedEdge::new(e2, Sign::Positive),
            ])
            .unwrap();

        assert_eq!(surface.edge(e0).unwrap().face(Sign::Positive), Some(face));
        assert!(surface.edge(e0).unwrap().is_open());
        assert_eq!(surface.open_edges().len(), 3);
        assert_eq!(surface.vertex(a).unwrap().valence, 2);

        let at = surface.boundary_ref(e1).unwrap().unwrap();
        assert_eq!(at, HalfEdgeRef::new(face, 1));
        assert_eq!(surface.next_ref(at).unwrap().position, 2);
        assert_eq!(surface.prev_ref(HalfEdgeRef::new(face, 0)).unwrap().position, 2);
        assert!(surface.pair(at).unwrap().is_none());
    }

    #[test]
    fn add_face_rejects_taken_side() {
        let mut surface = Surface::default();
        let a = surface.add_vertex();
        let e = surface.add_edge(a, a, p(1.0, 0.0)).unwrap();
        surface.add_face(vec![OrientedEdge::new(e, Sign::Positive)]).unwrap();
        let again = surface.add_face(vec![OrientedEdge::new(e, Sign::Positive)]);
        assert!(again.is_err());
        assert_eq!(surface.faces().count(), 1);
    }

    #[test]
    fn compaction_removes_tombstones() {
        let mut surface = Surface::default();
        let a = surface.add_vertex();
        let b = surface.add_vertex();
        let e = surface.add_edge(a, b, p(1.0, 0.0)).unwrap();
        surface.vertex_mut(b).unwrap().deleted = true;
        surface.edge_mut(e).unwrap().orphaned = true;
        let removed = surface.compact();
        assert_eq!(removed, Compaction { vertices: 1, edges: 1, faces: 0 });
        assert!(surface.vertex(b).is_err());
        assert!(surface.vertex(a).is_ok());
    }

    #[test]
    fn labels_are_renumbered_sequentially() {
        let mut surface = Surface::default();
        let a = surface.add_vertex();
        let e0 = surface.add_edge(a, a, p(1.0, 0.0)).unwrap();
        let e1 = surface.add_edge(a, a, p(0.0, 1.0)).unwrap();
        surface.edge_mut(e0).unwrap().label = Some(7);
        surface.edge_mut(e1).unwrap().label = Some(7);
        surface.assign_labels();
        assert_eq!(surface.edge(e0).unwrap().label, Some(0));
        assert_eq!(surface.edge(e1).unwrap().label, Some(1));
    }

    #[test]
    fn consumed_face_has_no_neighbours() {
        let mut surface = Surface::default();
        let a = surface.add_vertex();
        let e = surface.add_edge(a, a, p(1.0, 0.0)).unwrap();
        let face = surface.add_face(vec![OrientedEdge::new(e, Sign::Positive)]).unwrap();
        surface.face_mut(face).unwrap().boundary.clear();

        let at = HalfEdgeRef::new(face, 0);
        assert!(matches!(
            surface.next_ref(at),
            Err(TopologyError::InvariantViolation { face: Some(f), .. }) if f == face
        ));
        assert!(surface.prev_ref(at).is_err());
    }

    #[test]
    fn failed_atomic_operation_rolls_back() {
        let mut surface = Surface::default();
        let a = surface.add_vertex();
        let result: Result<()> = surface.atomically(|draft| {
            draft.add_vertex();
            draft.vertex_mut(a)?.valence = 9;
            Err(TopologyError::MalformedInput("abandoned".into()).into())
        });
        assert!(result.is_err());
        assert_eq!(surface.vertices().count(), 1);
        assert_eq!(surface.vertex(a).unwrap().valence, 0);

        surface.atomically(|draft| Ok(draft.add_vertex())).unwrap();
        assert_eq!(surface.vertices().count(), 2);
    }
}
