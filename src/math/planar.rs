use std::f64::consts::TAU;

use super::{Point, TOLERANCE};

/// Signed area of the parallelogram spanned by `a` and `b`.
#[must_use]
pub fn cross(a: Point, b: Point) -> f64 {
    a.re * b.im - a.im * b.re
}

/// Euclidean dot product.
#[must_use]
pub fn dot(a: Point, b: Point) -> f64 {
    a.re * b.re + a.im * b.im
}

/// Returns `true` if `a` and `b` lie on a common line through the origin.
///
/// The test is relative to the lengths of both vectors.
#[must_use]
pub fn collinear(a: Point, b: Point) -> bool {
    cross(a, b).abs() <= TOLERANCE * a.norm() * b.norm()
}

/// Returns `true` if `a` and `b` are collinear and point the same way.
#[must_use]
pub fn aligned(a: Point, b: Point) -> bool {
    collinear(a, b) && dot(a, b) > 0.0
}

/// Returns `true` if `b` is strictly counter-clockwise of `a` (within a half turn).
#[must_use]
pub fn ccw(a: Point, b: Point) -> bool {
    !collinear(a, b) && cross(a, b) > 0.0
}

/// Counter-clockwise angle from `a` to `b`, in `[0, 2π)`.
///
/// Aligned vectors give exactly zero.
#[must_use]
pub fn ccw_angle(a: Point, b: Point) -> f64 {
    if aligned(a, b) {
        return 0.0;
    }
    let theta = (b / a).arg();
    if theta < 0.0 {
        theta + TAU
    } else {
        theta
    }
}

/// Reflects `v` across the line through the origin spanned by `axis`.
#[must_use]
pub fn reflect(v: Point, axis: Point) -> Point {
    axis * v.conj() / axis.conj()
}

/// Rotates `v` counter-clockwise by `theta` radians.
#[must_use]
pub fn rotate(v: Point, theta: f64) -> Point {
    Point::new(
        theta.cos() * v.re - theta.sin() * v.im,
        theta.sin() * v.re + theta.cos() * v.im,
    )
}
