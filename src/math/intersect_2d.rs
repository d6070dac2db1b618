use super::planar::cross;
use super::{Point, TOLERANCE};

/// Sign of an orientation value, with values within `scale * TOLERANCE` treated as zero.
fn orientation_sign(value: f64, scale: f64) -> i8 {
    if value.abs() <= TOLERANCE * scale {
        0
    } else if value > 0.0 {
        1
    } else {
        -1
    }
}

/// Returns `true` if the open segments `[a, a + da]` and `[b, b + db]` cross.
///
/// Only proper crossings count: touching at an endpoint or overlapping
/// collinearly is not an intersection of the interiors.
#[must_use]
pub fn segments_cross_interior(a: Point, da: Point, b: Point, db: Point) -> bool {
    let scale = da.norm() * db.norm();
    if scale <= TOLERANCE {
        return false;
    }
    let o1 = orientation_sign(cross(da, b - a), scale);
    let o2 = orientation_sign(cross(da, b + db - a), scale);
    let o3 = orientation_sign(cross(db, a - b), scale);
    let o4 = orientation_sign(cross(db, a + da - b), scale);
    o1 * o2 < 0 && o3 * o4 < 0
}

/// Returns `true` if a closed polygon given by its edge vectors crosses itself.
///
/// The polygon starts at the origin; the edges are consecutive offsets.
#[must_use]
pub fn polygon_self_intersects(edges: &[Point]) -> bool {
    let mut start_i = Point::new(0.0, 0.0);
    for (i, &ei) in edges.iter().enumerate() {
        let mut start_k = Point::new(0.0, 0.0);
        for (k, &ek) in edges.iter().enumerate() {
            if k != i && segments_cross_interior(start_i, ei, start_k, ek) {
                return true;
            }
            start_k += ek;
        }
        start_i += ei;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn crossing_diagonals() {
        assert!(segments_cross_interior(
            p(0.0, 0.0),
            p(1.0, 1.0),
            p(1.0, 0.0),
            p(-1.0, 1.0)
        ));
    }

    #[test]
    fn shared_endpoint_is_not_a_crossing() {
        assert!(!segments_cross_interior(
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(1.0, 0.0),
            p(0.0, 1.0)
        ));
    }

    #[test]
    fn square_is_simple_bowtie_is_not() {
        let square = [p(1.0, 0.0), p(0.0, 1.0), p(-1.0, 0.0), p(0.0, -1.0)];
        assert!(!polygon_self_intersects(&square));

        let bowtie = [p(1.0, 1.0), p(0.0, -1.0), p(-1.0, 1.0), p(0.0, -1.0)];
        assert!(polygon_self_intersects(&bowtie));
    }
}
