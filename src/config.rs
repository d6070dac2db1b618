use crate::algebra::Arithmetic;
use crate::math::EPSILON;

/// Default cap on reflections performed by the completion loops.
pub const DEFAULT_MAX_REFLECTIONS: usize = 10_000;

/// Construction settings for a [`Surface`](crate::topology::Surface).
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Floating-only or exact arithmetic.
    pub arithmetic: Arithmetic,
    /// Record reflection provenance so points can be mapped back to the table.
    pub billiard: bool,
    /// Floating tolerance for closure and agreement checks.
    pub epsilon: f64,
    /// Reflections allowed before completion is declared divergent.
    pub max_reflections: usize,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            arithmetic: Arithmetic::Floating,
            billiard: false,
            epsilon: EPSILON,
            max_reflections: DEFAULT_MAX_REFLECTIONS,
        }
    }
}

impl SurfaceConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_arithmetic(mut self, arithmetic: Arithmetic) -> Self {
        self.arithmetic = arithmetic;
        self
    }

    #[must_use]
    pub fn with_billiard(mut self, billiard: bool) -> Self {
        self.billiard = billiard;
        self
    }

    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    #[must_use]
    pub fn with_max_reflections(mut self, max_reflections: usize) -> Self {
        self.max_reflections = max_reflections;
        self
    }
}
