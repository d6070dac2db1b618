//! Building a closed surface by reflecting faces and gluing matching edges.

mod complete;
mod congruence;
mod find_matching_edge;
mod identify;
mod reflect_face;

pub use complete::{CompleteInternal, CompleteSurface, Completion};
pub use congruence::Congruence;
pub use find_matching_edge::FindMatchingEdge;
pub use identify::{IdentifyEdges, IdentifyVertices};
pub use reflect_face::ReflectFace;
