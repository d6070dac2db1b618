use std::f64::consts::PI;

use tracing::{debug, info};

use crate::error::Result;
use crate::topology::{EdgeId, Surface};

/// Ratio between the values of successive conjugate parameters.
const VALUE_RATIO: f64 = 3.1 / PI;

/// Closes the exact deformation space under complex conjugation.
///
/// For every parameter whose edge coefficients are not the conjugates of some
/// parameter's coefficients, a new parameter is added whose coefficient on
/// each edge is the conjugate of the original one. A parameter with real
/// coefficients everywhere is its own conjugate. The `k`-th new parameter
/// takes the value `max_perturb * (3.1 / π)^k`. Floating surfaces have no
/// parameters and are left alone. A failed run leaves the surface as it was.
pub struct PerturbConjugates {
    max_perturb: f64,
}

impl PerturbConjugates {
    /// Creates a new `PerturbConjugates` operation.
    #[must_use]
    pub fn new(max_perturb: f64) -> Self {
        Self { max_perturb }
    }

    /// Returns `true` if parameter `j` has the conjugate coefficient of
    /// parameter `k` on every edge.
    fn conjugate_pair(surface: &Surface, edges: &[EdgeId], j: usize, k: usize) -> Result<bool> {
        for &id in edges {
            let Some(vector) = surface.edge(id)?.vector.symbolic() else {
                return Ok(false);
            };
            if *vector.coefficient(j)? != vector.coefficient(k)?.conjugate() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Executes the operation, returning the number of parameters added.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge vector does not span the parameter space.
    pub fn execute(&self, surface: &mut Surface) -> Result<usize> {
        if !surface.arithmetic().is_exact() {
            return Ok(0);
        }
        surface.atomically(|draft| self.run(draft))
    }

    fn run(&self, surface: &mut Surface) -> Result<usize> {
        let edges: Vec<EdgeId> = surface.edges().map(|(id, _)| id).collect();
        let original = surface.params().count();

        let mut value = self.max_perturb;
        let mut added = 0;
        for i in 1..=original {
            let mut paired = false;
            for j in 1..=surface.params().count() {
                if Self::conjugate_pair(surface, &edges, i, j)? {
                    paired = true;
                    break;
                }
            }
            if paired {
                continue;
            }

            value *= VALUE_RATIO;
            let index = surface.add_parameters(&[value]);
            for &id in &edges {
                let edge = surface.edge_mut(id)?;
                if let Some(vector) = edge.vector.symbolic_mut() {
                    let conjugate = vector.coefficient(i)?.conjugate();
                    vector.set_coefficient(index, conjugate)?;
                }
            }
            added += 1;
            debug!(parameter = i, conjugate = index, value, "added conjugate parameter");
        }

        let params = surface.params().clone();
        for &id in &edges {
            surface.edge_mut(id)?.vector.refresh(&params)?;
        }
        info!(added, parameters = surface.params().count(), "closed deformations under conjugation");
        Ok(added)
    }
}
