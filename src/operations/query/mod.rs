mod measure;
mod statistics;
mod transform_to_original;
mod validate_faces;

pub use measure::{Barycenter, TotalAngle, TriangleArea};
pub use statistics::{Statistics, SurfaceStatistics};
pub use transform_to_original::TransformToOriginal;
pub use validate_faces::{CheckFace, ValidateFaces};
