use std::fmt;
use std::rc::Rc;

use super::number_field::{cross_product, AlgebraicNumber, NumberField};
use super::params::ParameterSpace;
use crate::error::AlgebraError;
use crate::math::Point;

/// An offset vector as an exact linear combination of deformation parameters.
///
/// `coeffs[0]` is the constant term; `coeffs[i]` multiplies parameter `t_i`.
#[derive(Clone, PartialEq, Eq)]
pub struct SymbolicVector {
    coeffs: Vec<AlgebraicNumber>,
}

fn same_dimension(a: &SymbolicVector, b: &SymbolicVector) -> Result<(), AlgebraError> {
    if a.coeffs.len() == b.coeffs.len() {
        Ok(())
    } else {
        Err(AlgebraError::DimensionMismatch {
            left: a.coeffs.len(),
            right: b.coeffs.len(),
        })
    }
}

impl SymbolicVector {
    /// Creates a vector from its coefficients; at least the constant term is required.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::DimensionMismatch`] if `coeffs` is empty.
    pub fn new(coeffs: Vec<AlgebraicNumber>) -> Result<Self, AlgebraError> {
        if coeffs.is_empty() {
            return Err(AlgebraError::DimensionMismatch { left: 0, right: 1 });
        }
        Ok(Self { coeffs })
    }

    /// The zero vector over a space with `params` parameters.
    #[must_use]
    pub fn zero(field: &Rc<NumberField>, params: &ParameterSpace) -> Self {
        Self {
            coeffs: vec![AlgebraicNumber::zero(field); params.dimension()],
        }
    }

    /// A vector with constant term `value` and no parameter dependence.
    #[must_use]
    pub fn constant(value: AlgebraicNumber, params: &ParameterSpace) -> Self {
        let mut coeffs = vec![AlgebraicNumber::zero(value.field()); params.dimension()];
        coeffs[0] = value;
        Self { coeffs }
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.coeffs.len()
    }

    #[must_use]
    pub fn field(&self) -> &Rc<NumberField> {
        self.coeffs[0].field()
    }

    #[must_use]
    pub fn coefficients(&self) -> &[AlgebraicNumber] {
        &self.coeffs
    }

    /// Returns the coefficient at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::DimensionMismatch`] if `index` is past the end.
    pub fn coefficient(&self, index: usize) -> Result<&AlgebraicNumber, AlgebraError> {
        self.coeffs.get(index).ok_or(AlgebraError::DimensionMismatch {
            left: self.coeffs.len(),
            right: index + 1,
        })
    }

    /// Overwrites the coefficient at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::DimensionMismatch`] if `index` is past the end.
    pub fn set_coefficient(&mut self, index: usize, value: AlgebraicNumber) -> Result<(), AlgebraError> {
        let len = self.coeffs.len();
        let slot = self.coeffs.get_mut(index).ok_or(AlgebraError::DimensionMismatch {
            left: len,
            right: index + 1,
        })?;
        *slot = value;
        Ok(())
    }

    /// Appends `n` zero coefficients for newly introduced parameters.
    pub fn pad(&mut self, n: usize) {
        let zero = AlgebraicNumber::zero(self.field());
        self.coeffs.resize(self.coeffs.len() + n, zero);
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(AlgebraicNumber::is_zero)
    }

    /// Componentwise sum.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::DimensionMismatch`] on differing parameter counts.
    pub fn try_add(&self, other: &Self) -> Result<Self, AlgebraError> {
        same_dimension(self, other)?;
        Ok(Self {
            coeffs: self.coeffs.iter().zip(&other.coeffs).map(|(a, b)| a + b).collect(),
        })
    }

    /// Componentwise difference.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::DimensionMismatch`] on differing parameter counts.
    pub fn try_sub(&self, other: &Self) -> Result<Self, AlgebraError> {
        same_dimension(self, other)?;
        Ok(Self {
            coeffs: self.coeffs.iter().zip(&other.coeffs).map(|(a, b)| a - b).collect(),
        })
    }

    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|c| -c).collect(),
        }
    }

    /// Multiplies every coefficient by a field element.
    #[must_use]
    pub fn scale(&self, factor: &AlgebraicNumber) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|c| c * factor).collect(),
        }
    }

    #[must_use]
    pub fn scale_integer(&self, k: i64) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|c| c.scale(k)).collect(),
        }
    }

    /// Applies field conjugation to every coefficient.
    #[must_use]
    pub fn conjugate(&self) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(AlgebraicNumber::conjugate).collect(),
        }
    }

    /// Evaluates the vector at the current parameter values.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::DimensionMismatch`] if the vector was built for a
    /// different number of parameters.
    pub fn evaluate(&self, params: &ParameterSpace) -> Result<Point, AlgebraError> {
        if self.coeffs.len() != params.dimension() {
            return Err(AlgebraError::DimensionMismatch {
                left: self.coeffs.len(),
                right: params.dimension(),
            });
        }
        let mut value = self.coeffs[0].to_complex();
        for (c, t) in self.coeffs[1..].iter().zip(params.values()) {
            value += c.to_complex() * *t;
        }
        Ok(value)
    }

    /// Exact collinearity: the symmetrised cross pairing of every coefficient
    /// pair vanishes.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::DimensionMismatch`] on differing parameter counts.
    pub fn collinear(&self, other: &Self) -> Result<bool, AlgebraError> {
        same_dimension(self, other)?;
        let n = self.coeffs.len();
        for i in 0..n {
            for j in i..n {
                let q = &cross_product(&self.coeffs[i], &other.coeffs[j])
                    + &cross_product(&self.coeffs[j], &other.coeffs[i]);
                if !q.is_zero() {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// The common complex direction of all coefficients.
    ///
    /// Returns the first nonzero coefficient when every coefficient is a real
    /// multiple of it.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::NotRigid`] if the coefficients point in
    /// different directions, or [`AlgebraError::ZeroVector`] for the zero vector.
    pub fn common_direction(&self) -> Result<AlgebraicNumber, AlgebraError> {
        let n = self.coeffs.len();
        for i in 0..n {
            for j in (i + 1)..n {
                if !cross_product(&self.coeffs[i], &self.coeffs[j]).is_zero() {
                    return Err(AlgebraError::NotRigid);
                }
            }
        }
        self.coeffs
            .iter()
            .find(|c| !c.is_zero())
            .cloned()
            .ok_or(AlgebraError::ZeroVector)
    }

    /// Reflects across the line spanned by `axis`.
    ///
    /// With `d` the direction of `axis`, each coefficient `c` maps to
    /// `conj(c) · d / conj(d)`; the parameters are real so this is the
    /// reflection of the evaluated vector for every parameter value.
    ///
    /// # Errors
    ///
    /// Fails if `axis` has no common direction or the dimensions differ.
    pub fn reflect(&self, axis: &Self) -> Result<Self, AlgebraError> {
        same_dimension(self, axis)?;
        let d = axis.common_direction()?;
        let w = d.checked_div(&d.conjugate())?;
        Ok(Self {
            coeffs: self.coeffs.iter().map(|c| &c.conjugate() * &w).collect(),
        })
    }
}

impl fmt::Debug for SymbolicVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for SymbolicVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.coeffs[0])?;
        for (i, c) in self.coeffs.iter().enumerate().skip(1) {
            write!(f, " + ({c})t{i}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn gaussian(f: &Rc<NumberField>, re: i64, im: i64) -> AlgebraicNumber {
        &AlgebraicNumber::from_integer(f, re) + &AlgebraicNumber::generator(f).scale(im)
    }

    fn vector(f: &Rc<NumberField>, parts: &[(i64, i64)]) -> SymbolicVector {
        SymbolicVector::new(parts.iter().map(|&(a, b)| gaussian(f, a, b)).collect()).unwrap()
    }

    #[test]
    fn evaluates_with_parameters() {
        let f = NumberField::cyclotomic(4);
        let mut params = ParameterSpace::new();
        params.extend(&[0.5]);
        let v = vector(&f, &[(1, 0), (0, 2)]);
        let p = v.evaluate(&params).unwrap();
        assert_relative_eq!(p.re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.im, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let f = NumberField::cyclotomic(4);
        let a = vector(&f, &[(1, 0)]);
        let b = vector(&f, &[(1, 0), (0, 1)]);
        assert!(matches!(
            a.try_add(&b),
            Err(AlgebraError::DimensionMismatch { left: 1, right: 2 })
        ));
        assert!(a.evaluate(&ParameterSpace::new()).is_ok());
        let mut params = ParameterSpace::new();
        params.extend(&[1.0]);
        assert!(a.evaluate(&params).is_err());
    }

    #[test]
    fn reflection_across_horizontal_is_conjugation() {
        let f = NumberField::cyclotomic(4);
        let v = vector(&f, &[(2, 3)]);
        let axis = vector(&f, &[(5, 0)]);
        assert_eq!(v.reflect(&axis).unwrap(), v.conjugate());
    }

    #[test]
    fn common_direction_detects_rigidity() {
        let f = NumberField::cyclotomic(4);
        let rigid = vector(&f, &[(1, 1), (2, 2)]);
        assert_eq!(rigid.common_direction().unwrap(), gaussian(&f, 1, 1));
        let flexible = vector(&f, &[(1, 0), (0, 1)]);
        assert!(matches!(flexible.common_direction(), Err(AlgebraError::NotRigid)));
        let zero = vector(&f, &[(0, 0)]);
        assert!(matches!(zero.common_direction(), Err(AlgebraError::ZeroVector)));
    }

    #[test]
    fn collinear_real_multiples() {
        let f = NumberField::cyclotomic(8);
        let z = AlgebraicNumber::generator(&f);
        let p = SymbolicVector::new(vec![z.clone(), z.scale(2)]).unwrap();
        let q = p.scale_integer(-3);
        assert!(p.collinear(&q).unwrap());
        let r = SymbolicVector::new(vec![z.clone(), AlgebraicNumber::from_integer(&f, 1)]).unwrap();
        assert!(!p.collinear(&r).unwrap());
    }

    proptest! {
        #[test]
        fn collinearity_survives_conjugation(
            a in prop::collection::vec((-4_i64..=4, -4_i64..=4), 2),
            b in prop::collection::vec((-4_i64..=4, -4_i64..=4), 2),
            k in -3_i64..=3,
            use_multiple in any::<bool>(),
        ) {
            let f = NumberField::cyclotomic(4);
            let p = vector(&f, &a);
            let q = if use_multiple { p.scale_integer(k) } else { vector(&f, &b) };
            prop_assert_eq!(
                p.collinear(&q).unwrap(),
                p.conjugate().collinear(&q.conjugate()).unwrap()
            );
        }
    }
}
