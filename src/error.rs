use thiserror::Error;

use crate::topology::{EdgeId, FaceId};

/// Top-level error type for surface construction.
#[derive(Debug, Error)]
pub enum UnfoldError {
    #[error(transparent)]
    Algebra(#[from] AlgebraError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Errors raised by exact and symbolic arithmetic.
#[derive(Debug, Error)]
pub enum AlgebraError {
    #[error("dimension mismatch: {left} coefficients vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("division by zero in number field")]
    DivisionByZero,

    #[error("operation on the zero vector")]
    ZeroVector,

    #[error("vector is not rigid: coefficients have no common direction")]
    NotRigid,

    #[error("cannot combine exact and floating-only vectors")]
    RepresentationMismatch,

    #[error("integer overflow during lattice reduction")]
    Overflow,

    #[error("exact and floating coordinates disagree by {deviation:e}")]
    Inconsistent { deviation: f64 },

    #[error("{0} only deforms floating coordinates")]
    FloatingOnly(&'static str),
}

/// Errors related to planar geometry and direction navigation.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("angle {angle} is out of range [{min}, {max})")]
    AngleOutOfRange { angle: f64, min: f64, max: f64 },

    #[error("orientation check failed: {0}")]
    Orientation(String),
}

/// Errors related to the combinatorial surface.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("invariant violated on face {face:?}: {message}")]
    InvariantViolation {
        face: Option<FaceId>,
        message: String,
    },

    #[error("edges {left:?} and {right:?} are not congruent")]
    CongruenceMismatch { left: EdgeId, right: EdgeId },

    #[error("surface did not close after {reflections} reflections")]
    CompletionDiverged { reflections: usize },
}

impl TopologyError {
    /// Shorthand for an invariant violation on a given face.
    pub(crate) fn violation(face: impl Into<Option<FaceId>>, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            face: face.into(),
            message: message.into(),
        }
    }
}

/// Convenience type alias for results using [`UnfoldError`].
pub type Result<T> = std::result::Result<T, UnfoldError>;
