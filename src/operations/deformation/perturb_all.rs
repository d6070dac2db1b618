use std::f64::consts::TAU;

use nalgebra::DMatrix;
use rand::Rng;
use tracing::info;

use crate::error::{AlgebraError, Result, TopologyError};
use crate::math::lattice::integer_kernel;
use crate::math::Point;
use crate::topology::{EdgeId, Surface};

/// Result of a perturbation: the rank of the constraint matrix and the
/// number of independent deformation directions used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perturbation {
    pub rank: usize,
    pub nullity: usize,
}

/// Randomly deforms the floating edge vectors within the space of
/// deformations that keep every face closed and every cone point consistent.
///
/// The constraints form an integer matrix with one column per edge, one row
/// per face (the signed boundary walk) and one row per vertex whose total
/// angle is not `2π` (the walk around its link). Each vector of an
/// LLL-reduced basis of its integer kernel is scaled to unit length and
/// weighted by a random complex magnitude with both parts in
/// `[0, max_perturb)`. Exact surfaces are refused, since their symbolic
/// coordinates would no longer agree with the moved approximations. A failed
/// run leaves the surface as it was.
pub struct PerturbAll {
    max_perturb: f64,
}

impl PerturbAll {
    /// Creates a new `PerturbAll` operation.
    #[must_use]
    pub fn new(max_perturb: f64) -> Self {
        Self { max_perturb }
    }

    fn constraint_rows(surface: &Surface, columns: usize) -> Result<Vec<Vec<i64>>> {
        let mut rows = Vec::new();
        for (_, face) in surface.faces() {
            let mut row = vec![0; columns];
            for oe in &face.boundary {
                row[surface.edge(oe.edge)?.index] += oe.sign.value();
            }
            rows.push(row);
        }
        for (_, vertex) in surface.vertices() {
            if (vertex.total_angle - TAU).abs() <= surface.epsilon() {
                continue;
            }
            let mut row = vec![0; columns];
            for &out in &vertex.out_edges {
                let link = surface.oriented(surface.next_ref(out)?)?;
                row[surface.edge(link.edge)?.index] += link.sign.value();
            }
            rows.push(row);
        }
        Ok(rows)
    }

    /// Executes the operation with randomness drawn from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MalformedInput`] for a negative or non-finite
    /// bound, [`AlgebraError::FloatingOnly`] on an exact surface, and
    /// propagates vertex cycle and lattice failures.
    pub fn execute<R: Rng + ?Sized>(&self, surface: &mut Surface, rng: &mut R) -> Result<Perturbation> {
        if !(self.max_perturb >= 0.0 && self.max_perturb.is_finite()) {
            return Err(TopologyError::MalformedInput(format!(
                "perturbation bound must be finite and nonnegative, got {}",
                self.max_perturb
            ))
            .into());
        }
        if surface.arithmetic().is_exact() {
            return Err(AlgebraError::FloatingOnly("PerturbAll").into());
        }
        surface.atomically(|draft| self.run(draft, rng))
    }

    fn run<R: Rng + ?Sized>(&self, surface: &mut Surface, rng: &mut R) -> Result<Perturbation> {
        surface.build_vertex_cycles()?;

        let edges: Vec<EdgeId> = surface.edges().map(|(id, _)| id).collect();
        for (index, &id) in edges.iter().enumerate() {
            surface.edge_mut(id)?.index = index;
        }
        let rows = Self::constraint_rows(surface, edges.len())?;
        let flat: Vec<i64> = rows.iter().flatten().copied().collect();
        let matrix = DMatrix::from_row_slice(rows.len(), edges.len(), &flat);
        let kernel = integer_kernel(&matrix)?;

        let mut delta = vec![Point::new(0.0, 0.0); edges.len()];
        for u in &kernel.basis {
            let weight = Point::new(
                self.max_perturb * rng.gen::<f64>(),
                self.max_perturb * rng.gen::<f64>(),
            );
            #[allow(clippy::cast_precision_loss)]
            let norm = u.iter().map(|&x| (x * x) as f64).sum::<f64>().sqrt();
            for (d, &x) in delta.iter_mut().zip(u) {
                #[allow(clippy::cast_precision_loss)]
                let x = x as f64;
                *d += weight * x / norm;
            }
        }

        for (&id, d) in edges.iter().zip(&delta) {
            let vector = &mut surface.edge_mut(id)?.vector;
            vector.set_approx(vector.approx() + d);
        }

        let result = Perturbation {
            rank: kernel.rank,
            nullity: kernel.nullity(),
        };
        info!(rank = result.rank, nullity = result.nullity, "perturbed edge vectors");
        Ok(result)
    }
}
