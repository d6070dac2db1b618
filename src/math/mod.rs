pub mod intersect_2d;
pub mod lattice;
pub mod planar;

/// A point or offset vector in the plane, stored as a complex number.
pub type Point = num_complex::Complex<f64>;

/// Tolerance for floating predicates (collinearity, orientation).
pub const TOLERANCE: f64 = 1e-10;

/// Default tolerance for exact/floating agreement and closure checks.
pub const EPSILON: f64 = 1e-9;

/// Tolerance for angle verification after rotating a direction.
pub const ANGLE_TOLERANCE: f64 = 1e-7;
