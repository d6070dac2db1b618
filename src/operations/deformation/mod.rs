//! Deformations of the flat structure: random perturbation within the space
//! of closed deformations, conjugate parameters, and vertex translation.

mod move_vertex;
mod perturb_all;
mod perturb_conjugates;

pub use move_vertex::MoveVertex;
pub use perturb_all::{PerturbAll, Perturbation};
pub use perturb_conjugates::PerturbConjugates;
