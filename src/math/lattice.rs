//! Integer lattice tools: exact integer kernels and LLL basis reduction.
//!
//! The kernel of an integer matrix is found by unimodular row reduction of
//! the transposed matrix augmented with the identity; the rows whose matrix
//! part vanishes carry a basis of the kernel. That basis is then LLL-reduced
//! so the deformation directions built from it are short.

use nalgebra::DMatrix;

use crate::error::AlgebraError;

/// Lovász constant used by [`lll_reduce`].
pub const LLL_DELTA: f64 = 0.75;

/// Integer kernel of a matrix, with the rank of the matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerKernel {
    /// Rank of the matrix.
    pub rank: usize,
    /// Reduced basis of `{ x ∈ ℤⁿ : M x = 0 }`, one vector per entry.
    pub basis: Vec<Vec<i64>>,
}

impl IntegerKernel {
    /// Dimension of the kernel.
    #[must_use]
    pub fn nullity(&self) -> usize {
        self.basis.len()
    }
}

fn checked_axpy(target: &mut [i128], source: &[i128], factor: i128) -> Result<(), AlgebraError> {
    for (t, &s) in target.iter_mut().zip(source) {
        *t = factor
            .checked_mul(s)
            .and_then(|v| t.checked_sub(v))
            .ok_or(AlgebraError::Overflow)?;
    }
    Ok(())
}

/// Computes the rank and an LLL-reduced integer kernel basis of `matrix`.
///
/// # Errors
///
/// Returns [`AlgebraError::Overflow`] if intermediate entries exceed the
/// integer range.
pub fn integer_kernel(matrix: &DMatrix<i64>) -> Result<IntegerKernel, AlgebraError> {
    let (rows, cols) = matrix.shape();

    // Row i holds column i of the matrix followed by the i-th unit vector.
    let mut work: Vec<Vec<i128>> = (0..cols)
        .map(|i| {
            let mut row = Vec::with_capacity(rows + cols);
            row.extend(matrix.column(i).iter().map(|&x| i128::from(x)));
            row.extend((0..cols).map(|j| i128::from(i == j)));
            row
        })
        .collect();

    let mut rank = 0;
    for c in 0..rows {
        if rank == cols {
            break;
        }
        loop {
            let pivot = (rank..cols)
                .filter(|&r| work[r][c] != 0)
                .min_by_key(|&r| work[r][c].abs());
            let Some(p) = pivot else {
                break;
            };
            work.swap(rank, p);
            let pivot_row = work[rank].clone();
            let mut cleared = true;
            for row in work.iter_mut().skip(rank + 1) {
                if row[c] == 0 {
                    continue;
                }
                let q = row[c] / pivot_row[c];
                if q != 0 {
                    checked_axpy(row, &pivot_row, q)?;
                }
                if row[c] != 0 {
                    cleared = false;
                }
            }
            if cleared {
                rank += 1;
                break;
            }
        }
    }

    let mut basis: Vec<Vec<i128>> = work[rank..].iter().map(|row| row[rows..].to_vec()).collect();
    lll_reduce(&mut basis, LLL_DELTA)?;

    let basis = basis
        .into_iter()
        .map(|v| {
            v.into_iter()
                .map(|x| i64::try_from(x).map_err(|_| AlgebraError::Overflow))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IntegerKernel { rank, basis })
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(v: &[i128]) -> Vec<f64> {
    v.iter().map(|&x| x as f64).collect()
}

fn dot_f64(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Gram–Schmidt coefficients `mu` and squared norms of the orthogonalised basis.
fn gram_schmidt(basis: &[Vec<i128>]) -> (Vec<Vec<f64>>, Vec<f64>) {
    let n = basis.len();
    let mut ortho: Vec<Vec<f64>> = Vec::with_capacity(n);
    let mut mu = vec![vec![0.0; n]; n];
    let mut norms = vec![0.0; n];
    for i in 0..n {
        let b = to_f64(&basis[i]);
        let mut star = b.clone();
        for j in 0..i {
            if norms[j] > 0.0 {
                mu[i][j] = dot_f64(&b, &ortho[j]) / norms[j];
                for (s, o) in star.iter_mut().zip(&ortho[j]) {
                    *s -= mu[i][j] * o;
                }
            }
        }
        norms[i] = dot_f64(&star, &star);
        ortho.push(star);
    }
    (mu, norms)
}

/// LLL-reduces a basis of linearly independent integer vectors in place.
///
/// # Errors
///
/// Returns [`AlgebraError::Overflow`] if a size-reduction step overflows.
#[allow(clippy::cast_possible_truncation)]
pub fn lll_reduce(basis: &mut [Vec<i128>], delta: f64) -> Result<(), AlgebraError> {
    let n = basis.len();
    if n < 2 {
        return Ok(());
    }
    let (mut mu, mut norms) = gram_schmidt(basis);
    let mut k = 1;
    while k < n {
        for j in (0..k).rev() {
            let q = mu[k][j].round();
            if q != 0.0 {
                let bj = basis[j].clone();
                checked_axpy(&mut basis[k], &bj, q as i128)?;
                (mu, norms) = gram_schmidt(basis);
            }
        }
        if norms[k] >= (delta - mu[k][k - 1] * mu[k][k - 1]) * norms[k - 1] {
            k += 1;
        } else {
            basis.swap(k, k - 1);
            (mu, norms) = gram_schmidt(basis);
            k = (k - 1).max(1);
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn apply(matrix: &DMatrix<i64>, v: &[i64]) -> Vec<i64> {
        (0..matrix.nrows())
            .map(|r| (0..matrix.ncols()).map(|c| matrix[(r, c)] * v[c]).sum())
            .collect()
    }

    #[test]
    fn kernel_of_single_row() {
        let m = DMatrix::from_row_slice(1, 3, &[1, 1, 1]);
        let kernel = integer_kernel(&m).unwrap();
        assert_eq!(kernel.rank, 1);
        assert_eq!(kernel.nullity(), 2);
        for v in &kernel.basis {
            assert_eq!(apply(&m, v), vec![0]);
            assert!(v.iter().any(|&x| x != 0));
        }
    }

    #[test]
    fn kernel_of_identity_is_trivial() {
        let m = DMatrix::from_row_slice(2, 2, &[1, 0, 0, 1]);
        let kernel = integer_kernel(&m).unwrap();
        assert_eq!(kernel.rank, 2);
        assert!(kernel.basis.is_empty());
    }

    #[test]
    fn dependent_rows_do_not_count_towards_rank() {
        let m = DMatrix::from_row_slice(3, 4, &[1, -1, 0, 0, 0, 1, -1, 0, 1, 0, -1, 0]);
        let kernel = integer_kernel(&m).unwrap();
        assert_eq!(kernel.rank, 2);
        assert_eq!(kernel.nullity(), 2);
        for v in &kernel.basis {
            assert!(apply(&m, v).iter().all(|&x| x == 0));
        }
    }

    #[test]
    fn lll_shortens_skewed_basis() {
        let mut basis = vec![vec![1_i128, 0], vec![7, 1]];
        lll_reduce(&mut basis, LLL_DELTA).unwrap();
        for v in &basis {
            let norm2: i128 = v.iter().map(|x| x * x).sum();
            assert_eq!(norm2, 1);
        }
    }
}
