use super::params::ParameterSpace;
use super::symbolic::SymbolicVector;
use crate::error::AlgebraError;
use crate::math::{planar, Point};

/// A vector carried as a floating approximation and, in exact mode, a
/// symbolic representation that the approximation must agree with.
#[derive(Debug, Clone, PartialEq)]
pub struct DualVector {
    approx: Point,
    exact: Option<SymbolicVector>,
}

impl DualVector {
    /// A floating-only vector.
    #[must_use]
    pub fn floating(approx: Point) -> Self {
        Self {
            approx,
            exact: None,
        }
    }

    /// An exact vector with its approximation evaluated at the current parameters.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::DimensionMismatch`] if `exact` does not match `params`.
    pub fn exact(exact: SymbolicVector, params: &ParameterSpace) -> Result<Self, AlgebraError> {
        Ok(Self {
            approx: exact.evaluate(params)?,
            exact: Some(exact),
        })
    }

    #[must_use]
    pub fn approx(&self) -> Point {
        self.approx
    }

    #[must_use]
    pub fn symbolic(&self) -> Option<&SymbolicVector> {
        self.exact.as_ref()
    }

    pub(crate) fn symbolic_mut(&mut self) -> Option<&mut SymbolicVector> {
        self.exact.as_mut()
    }

    /// Overwrites the floating coordinate only.
    pub fn set_approx(&mut self, approx: Point) {
        self.approx = approx;
    }

    /// Re-derives the floating coordinate from the symbolic one.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::DimensionMismatch`] if the parameter count changed.
    pub fn refresh(&mut self, params: &ParameterSpace) -> Result<(), AlgebraError> {
        if let Some(exact) = &self.exact {
            self.approx = exact.evaluate(params)?;
        }
        Ok(())
    }

    /// Pads the symbolic part for `n` new parameters.
    pub fn pad(&mut self, n: usize) {
        if let Some(exact) = &mut self.exact {
            exact.pad(n);
        }
    }

    fn combine(
        &self,
        other: &Self,
        approx: Point,
        exact: impl FnOnce(&SymbolicVector, &SymbolicVector) -> Result<SymbolicVector, AlgebraError>,
    ) -> Result<Self, AlgebraError> {
        let exact = match (&self.exact, &other.exact) {
            (Some(a), Some(b)) => Some(exact(a, b)?),
            (None, None) => None,
            _ => return Err(AlgebraError::RepresentationMismatch),
        };
        Ok(Self { approx, exact })
    }

    /// Sum of both representations.
    ///
    /// # Errors
    ///
    /// Fails on mixed representations or differing parameter counts.
    pub fn try_add(&self, other: &Self) -> Result<Self, AlgebraError> {
        self.combine(other, self.approx + other.approx, SymbolicVector::try_add)
    }

    /// Difference of both representations.
    ///
    /// # Errors
    ///
    /// Fails on mixed representations or differing parameter counts.
    pub fn try_sub(&self, other: &Self) -> Result<Self, AlgebraError> {
        self.combine(other, self.approx - other.approx, SymbolicVector::try_sub)
    }

    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            approx: -self.approx,
            exact: self.exact.as_ref().map(SymbolicVector::neg),
        }
    }

    #[must_use]
    pub fn scale_integer(&self, k: i64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let kf = k as f64;
        Self {
            approx: self.approx * kf,
            exact: self.exact.as_ref().map(|v| v.scale_integer(k)),
        }
    }

    /// Reflects across the line spanned by `axis`, in both representations.
    ///
    /// # Errors
    ///
    /// Fails on mixed representations, or if the exact axis is not rigid.
    pub fn reflect(&self, axis: &Self) -> Result<Self, AlgebraError> {
        self.combine(
            axis,
            planar::reflect(self.approx, axis.approx),
            SymbolicVector::reflect,
        )
    }

    /// Asserts that the floating coordinate agrees with the symbolic one.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::Inconsistent`] if they differ by more than `epsilon`.
    pub fn check(&self, params: &ParameterSpace, epsilon: f64) -> Result<(), AlgebraError> {
        if let Some(exact) = &self.exact {
            let deviation = (self.approx - exact.evaluate(params)?).norm();
            if deviation > epsilon {
                return Err(AlgebraError::Inconsistent { deviation });
            }
        }
        Ok(())
    }

    /// Equality as the active arithmetic sees it: exact when both sides carry
    /// a symbolic part, otherwise floating within `epsilon`.
    #[must_use]
    pub fn matches(&self, other: &Self, epsilon: f64) -> bool {
        match (&self.exact, &other.exact) {
            (Some(a), Some(b)) => a == b,
            _ => (self.approx - other.approx).norm_sqr() < epsilon * epsilon,
        }
    }

    /// Returns `true` if the vector is zero: exactly in exact mode, within
    /// `epsilon` otherwise.
    #[must_use]
    pub fn vanishes(&self, epsilon: f64) -> bool {
        self.approx.norm() <= epsilon && self.exact.as_ref().map_or(true, SymbolicVector::is_zero)
    }
}
