//! Exact arithmetic: cyclotomic number fields, symbolic offset vectors over
//! a growable parameter space, and dual (exact + floating) vectors.

pub mod dual;
pub mod number_field;
pub mod params;
pub mod symbolic;

use std::rc::Rc;

pub use dual::DualVector;
pub use number_field::{cross_product, AlgebraicNumber, NumberField};
pub use params::ParameterSpace;
pub use symbolic::SymbolicVector;

/// The arithmetic a surface is built with, chosen once at construction.
#[derive(Debug, Clone, Default)]
pub enum Arithmetic {
    /// Floating coordinates only.
    #[default]
    Floating,
    /// Floating coordinates shadowed by exact coordinates in the given field.
    Exact(Rc<NumberField>),
}

impl Arithmetic {
    /// The number field, in exact mode.
    #[must_use]
    pub fn field(&self) -> Option<&Rc<NumberField>> {
        match self {
            Self::Floating => None,
            Self::Exact(field) => Some(field),
        }
    }

    #[must_use]
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}
