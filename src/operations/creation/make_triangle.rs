use std::f64::consts::PI;

use crate::algebra::{AlgebraicNumber, Arithmetic, DualVector};
use crate::error::{Result, TopologyError};
use crate::math::Point;
use crate::topology::{FaceId, Surface};

use super::MakePolygon;

/// Seeds a surface with the billiard triangle of angles `πa/N, πb/N, πc/N`,
/// where `N = a + b + c`.
///
/// With `ζ = e^{iπ/N}` and `s(k) = ζ^k − ζ^{−k}`, the triangle is
/// `A = 0`, `B = s(c)`, `C = ζ^a · s(b)`: the law-of-sines triangle turned a
/// quarter turn so every vertex lies in `Q(ζ)`. In exact mode the surface
/// field must contain the `2N`-th roots of unity.
pub struct MakeTriangle {
    angles: [u32; 3],
}

impl MakeTriangle {
    /// Creates a new `MakeTriangle` operation from integer angle weights.
    #[must_use]
    pub fn from_angles(a: u32, b: u32, c: u32) -> Self {
        Self { angles: [a, b, c] }
    }

    /// The field order `2N` needed to build this triangle exactly.
    #[must_use]
    pub fn field_order(&self) -> u32 {
        2 * self.angles.iter().sum::<u32>()
    }

    fn floating_edges(&self) -> [Point; 2] {
        let [a, b, c] = self.angles;
        let n = f64::from(a + b + c);
        let zeta = |k: u32| Point::from_polar(1.0, PI * f64::from(k) / n);
        let s = |k: u32| zeta(k) - zeta(k).conj();
        [s(c), zeta(a) * s(b)]
    }

    /// Executes the operation, adding the triangle to the surface.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MalformedInput`] if an angle weight is zero or
    /// the exact field lacks the needed roots of unity.
    pub fn execute(&self, surface: &mut Surface) -> Result<FaceId> {
        let [a, b, c] = self.angles;
        if a == 0 || b == 0 || c == 0 {
            return Err(TopologyError::MalformedInput(format!(
                "triangle angles must be positive, got ({a}, {b}, {c})"
            ))
            .into());
        }

        let (ab, ac) = match surface.arithmetic().clone() {
            Arithmetic::Floating => {
                let [ab, ac] = self.floating_edges();
                (DualVector::floating(ab), DualVector::floating(ac))
            }
            Arithmetic::Exact(field) => {
                let order = field.order();
                let needed = self.field_order();
                if order % needed != 0 {
                    return Err(TopologyError::MalformedInput(format!(
                        "field of order {order} does not contain the {needed}-th roots of unity"
                    ))
                    .into());
                }
                let step = i64::from(order / needed);
                let zeta = |k: u32| AlgebraicNumber::root_of_unity(&field, step * i64::from(k));
                let s = |k: u32| {
                    &AlgebraicNumber::root_of_unity(&field, step * i64::from(k))
                        - &AlgebraicNumber::root_of_unity(&field, -step * i64::from(k))
                };
                (
                    surface.exact_vector(s(c))?,
                    surface.exact_vector(&zeta(a) * &s(b))?,
                )
            }
        };

        let bc = ac.try_sub(&ab)?;
        let ca = ac.neg();
        MakePolygon::new(vec![ab, bc, ca]).execute(surface)
    }
}
