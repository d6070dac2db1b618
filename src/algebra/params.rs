/// The shared set of free real deformation parameters.
///
/// A [`SymbolicVector`](super::SymbolicVector) of dimension `count() + 1`
/// carries one coefficient for the constant term followed by one coefficient
/// per parameter. Only the owning surface grows this space, and it pads every
/// stored vector when it does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSpace {
    values: Vec<f64>,
}

impl ParameterSpace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of free parameters.
    #[must_use]
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Number of coefficients in a vector over this space.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.values.len() + 1
    }

    /// Current values of the parameters, `t1..tn`.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Appends parameters and returns the coefficient index of the first one.
    pub(crate) fn extend(&mut self, values: &[f64]) -> usize {
        let first = self.values.len() + 1;
        self.values.extend_from_slice(values);
        first
    }
}
