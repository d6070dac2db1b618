use std::f64::consts::TAU;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::rc::Rc;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::AlgebraError;
use crate::math::Point;

/// A cyclotomic number field `Q(ζ)` with `ζ = e^{2πi/n}`.
///
/// Elements are stored as polynomials in `ζ` of degree below the degree of
/// the field, reduced modulo the n-th cyclotomic polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberField {
    order: u32,
    /// Monic minimal polynomial, lowest degree first.
    minpoly: Vec<i64>,
    generator: Point,
    /// Coefficients of `conj(ζ) = ζ^{n-1}` in the power basis.
    conjugate_generator: Vec<BigRational>,
}

/// Exact division of an integer polynomial by a monic divisor.
fn poly_div_monic(dividend: &[i64], divisor: &[i64]) -> Option<Vec<i64>> {
    let mut rem = dividend.to_vec();
    let dd = divisor.len() - 1;
    if rem.len() <= dd {
        return None;
    }
    let mut quotient = vec![0; rem.len() - dd];
    for k in (0..quotient.len()).rev() {
        let c = rem[k + dd];
        quotient[k] = c;
        for (j, &d) in divisor.iter().enumerate() {
            rem[k + j] -= c * d;
        }
    }
    rem.iter().all(|&r| r == 0).then_some(quotient)
}

/// The n-th cyclotomic polynomial, obtained by dividing `x^n - 1` by the
/// cyclotomic polynomials of every proper divisor of `n`.
#[must_use]
pub fn cyclotomic_polynomial(n: u32) -> Vec<i64> {
    let mut current = vec![0; n as usize + 1];
    current[0] = -1;
    current[n as usize] = 1;
    for d in 1..n {
        if n % d == 0 {
            let phi = cyclotomic_polynomial(d);
            if let Some(q) = poly_div_monic(&current, &phi) {
                current = q;
            }
        }
    }
    current
}

/// Reduces a polynomial with rational coefficients modulo a monic polynomial.
fn reduce(mut poly: Vec<BigRational>, minpoly: &[i64]) -> Vec<BigRational> {
    let degree = minpoly.len() - 1;
    while poly.len() > degree {
        let Some(top) = poly.pop() else { break };
        if top.is_zero() {
            continue;
        }
        let shift = poly.len() - degree;
        for (k, &m) in minpoly.iter().take(degree).enumerate() {
            poly[shift + k] -= &top * BigRational::from_integer(BigInt::from(m));
        }
    }
    poly.resize(degree, BigRational::zero());
    poly
}

fn poly_mul(a: &[BigRational], b: &[BigRational]) -> Vec<BigRational> {
    let mut out = vec![BigRational::zero(); a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        if x.is_zero() {
            continue;
        }
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

impl NumberField {
    /// Creates the cyclotomic field generated by a primitive n-th root of unity.
    ///
    /// `n = 0` is treated as `n = 1`, the rationals.
    #[must_use]
    pub fn cyclotomic(n: u32) -> Rc<Self> {
        let n = n.max(1);
        let minpoly = cyclotomic_polynomial(n);
        let angle = TAU / f64::from(n);
        let generator = Point::new(angle.cos(), angle.sin());

        // ζ^{n-1} reduced modulo the minimal polynomial.
        let mut power = vec![BigRational::zero(); n as usize];
        power[n as usize - 1] = BigRational::one();
        let conjugate_generator = reduce(power, &minpoly);

        Rc::new(Self {
            order: n,
            minpoly,
            generator,
            conjugate_generator,
        })
    }

    /// The `n` of `Q(ζ_n)`.
    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Degree of the field over `Q`.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.minpoly.len() - 1
    }

    /// Complex embedding of the generator.
    #[must_use]
    pub fn generator_embedding(&self) -> Point {
        self.generator
    }

    /// Monic minimal polynomial of the generator, lowest degree first.
    #[must_use]
    pub fn minimal_polynomial(&self) -> &[i64] {
        &self.minpoly
    }
}

/// An element of a [`NumberField`].
#[derive(Clone)]
pub struct AlgebraicNumber {
    field: Rc<NumberField>,
    coeffs: Vec<BigRational>,
}

impl AlgebraicNumber {
    /// The zero element.
    #[must_use]
    pub fn zero(field: &Rc<NumberField>) -> Self {
        Self {
            coeffs: vec![BigRational::zero(); field.degree()],
            field: Rc::clone(field),
        }
    }

    /// An integer, embedded in the field.
    #[must_use]
    pub fn from_integer(field: &Rc<NumberField>, n: i64) -> Self {
        Self::from_rational(field, BigRational::from_integer(BigInt::from(n)))
    }

    /// A rational number, embedded in the field.
    #[must_use]
    pub fn from_rational(field: &Rc<NumberField>, q: BigRational) -> Self {
        let mut x = Self::zero(field);
        x.coeffs[0] = q;
        x
    }

    /// The generator `ζ` raised to the power `k` (negative powers allowed).
    #[must_use]
    pub fn root_of_unity(field: &Rc<NumberField>, k: i64) -> Self {
        let n = i64::from(field.order());
        let k = usize::try_from(k.rem_euclid(n)).unwrap_or(0);
        let mut power = vec![BigRational::zero(); k + 1];
        power[k] = BigRational::one();
        Self {
            coeffs: reduce(power, &field.minpoly),
            field: Rc::clone(field),
        }
    }

    /// The generator `ζ` of the field.
    #[must_use]
    pub fn generator(field: &Rc<NumberField>) -> Self {
        Self::root_of_unity(field, 1)
    }

    /// Builds an element from power-basis coefficients; extra coefficients are reduced.
    #[must_use]
    pub fn from_coefficients(field: &Rc<NumberField>, coeffs: Vec<BigRational>) -> Self {
        let coeffs = if coeffs.is_empty() {
            vec![BigRational::zero()]
        } else {
            coeffs
        };
        Self {
            coeffs: reduce(coeffs, &field.minpoly),
            field: Rc::clone(field),
        }
    }

    /// The field this number belongs to.
    #[must_use]
    pub fn field(&self) -> &Rc<NumberField> {
        &self.field
    }

    /// Power-basis coefficients.
    #[must_use]
    pub fn coefficients(&self) -> &[BigRational] {
        &self.coeffs
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(Zero::is_zero)
    }

    /// Complex conjugate, obtained by substituting `ζ ↦ ζ^{n-1}`.
    #[must_use]
    pub fn conjugate(&self) -> Self {
        let zeta_bar = Self {
            coeffs: self.field.conjugate_generator.clone(),
            field: Rc::clone(&self.field),
        };
        // Horner evaluation at conj(ζ).
        let mut acc = Self::zero(&self.field);
        for c in self.coeffs.iter().rev() {
            acc = &acc * &zeta_bar;
            acc.coeffs[0] += c;
        }
        acc
    }

    /// Complex embedding of this number.
    #[must_use]
    pub fn to_complex(&self) -> Point {
        let mut acc = Point::new(0.0, 0.0);
        let mut power = Point::new(1.0, 0.0);
        for c in &self.coeffs {
            acc += power * c.to_f64().unwrap_or(f64::NAN);
            power *= self.field.generator;
        }
        acc
    }

    /// Multiplies by an integer.
    #[must_use]
    pub fn scale(&self, k: i64) -> Self {
        let k = BigRational::from_integer(BigInt::from(k));
        Self {
            coeffs: self.coeffs.iter().map(|c| c * &k).collect(),
            field: Rc::clone(&self.field),
        }
    }

    /// Divides by a nonzero integer.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::DivisionByZero`] if `k` is zero.
    pub fn div_integer(&self, k: i64) -> Result<Self, AlgebraError> {
        if k == 0 {
            return Err(AlgebraError::DivisionByZero);
        }
        let k = BigRational::from_integer(BigInt::from(k));
        Ok(Self {
            coeffs: self.coeffs.iter().map(|c| c / &k).collect(),
            field: Rc::clone(&self.field),
        })
    }

    /// Multiplicative inverse, by solving `self · x = 1` on the power basis.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::DivisionByZero`] for the zero element.
    pub fn inverse(&self) -> Result<Self, AlgebraError> {
        if self.is_zero() {
            return Err(AlgebraError::DivisionByZero);
        }
        let d = self.field.degree();

        // Column j of the system holds the coefficients of self · ζ^j.
        let mut columns = Vec::with_capacity(d);
        let mut current = self.clone();
        let zeta = Self::generator(&self.field);
        for _ in 0..d {
            columns.push(current.coeffs.clone());
            current = &current * &zeta;
        }
        let mut rows: Vec<Vec<BigRational>> = (0..d)
            .map(|i| {
                let mut row: Vec<BigRational> = columns.iter().map(|col| col[i].clone()).collect();
                row.push(if i == 0 {
                    BigRational::one()
                } else {
                    BigRational::zero()
                });
                row
            })
            .collect();

        for c in 0..d {
            let p = (c..d)
                .find(|&r| !rows[r][c].is_zero())
                .ok_or(AlgebraError::DivisionByZero)?;
            rows.swap(c, p);
            let pivot = rows[c][c].clone();
            for x in &mut rows[c] {
                *x /= &pivot;
            }
            let pivot_row = rows[c].clone();
            for (r, row) in rows.iter_mut().enumerate() {
                if r == c || row[c].is_zero() {
                    continue;
                }
                let factor = row[c].clone();
                for (x, y) in row.iter_mut().zip(&pivot_row) {
                    *x -= &factor * y;
                }
            }
        }

        Ok(Self {
            coeffs: rows.into_iter().map(|row| row[d].clone()).collect(),
            field: Rc::clone(&self.field),
        })
    }

    /// Division in the field.
    ///
    /// # Errors
    ///
    /// Returns [`AlgebraError::DivisionByZero`] if `other` is zero.
    pub fn checked_div(&self, other: &Self) -> Result<Self, AlgebraError> {
        Ok(self * &other.inverse()?)
    }

    /// Integer power.
    #[must_use]
    pub fn pow(&self, k: u32) -> Self {
        let mut acc = Self::from_integer(&self.field, 1);
        for _ in 0..k {
            acc = &acc * self;
        }
        acc
    }
}

/// The antisymmetric pairing `a·conj(b) − conj(a)·b`.
///
/// It vanishes exactly when `a` and `b` are real multiples of each other.
#[must_use]
pub fn cross_product(a: &AlgebraicNumber, b: &AlgebraicNumber) -> AlgebraicNumber {
    &(a * &b.conjugate()) - &(&a.conjugate() * b)
}

impl PartialEq for AlgebraicNumber {
    fn eq(&self, other: &Self) -> bool {
        self.field.order == other.field.order && self.coeffs == other.coeffs
    }
}

impl Eq for AlgebraicNumber {}

impl fmt::Debug for AlgebraicNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for AlgebraicNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        for (k, c) in self.coeffs.iter().enumerate() {
            if c.is_zero() {
                continue;
            }
            if wrote {
                write!(f, "{}", if c.is_negative() { " - " } else { " + " })?;
            } else if c.is_negative() {
                write!(f, "-")?;
            }
            match k {
                0 => write!(f, "{}", c.abs())?,
                1 => write!(f, "{}*z", c.abs())?,
                _ => write!(f, "{}*z^{k}", c.abs())?,
            }
            wrote = true;
        }
        if !wrote {
            write!(f, "0")?;
        }
        Ok(())
    }
}

impl Add for &AlgebraicNumber {
    type Output = AlgebraicNumber;

    fn add(self, rhs: Self) -> AlgebraicNumber {
        debug_assert_eq!(self.field.order, rhs.field.order);
        AlgebraicNumber {
            coeffs: self.coeffs.iter().zip(&rhs.coeffs).map(|(a, b)| a + b).collect(),
            field: Rc::clone(&self.field),
        }
    }
}

impl Sub for &AlgebraicNumber {
    type Output = AlgebraicNumber;

    fn sub(self, rhs: Self) -> AlgebraicNumber {
        debug_assert_eq!(self.field.order, rhs.field.order);
        AlgebraicNumber {
            coeffs: self.coeffs.iter().zip(&rhs.coeffs).map(|(a, b)| a - b).collect(),
            field: Rc::clone(&self.field),
        }
    }
}

impl Mul for &AlgebraicNumber {
    type Output = AlgebraicNumber;

    fn mul(self, rhs: Self) -> AlgebraicNumber {
        debug_assert_eq!(self.field.order, rhs.field.order);
        AlgebraicNumber {
            coeffs: reduce(poly_mul(&self.coeffs, &rhs.coeffs), &self.field.minpoly),
            field: Rc::clone(&self.field),
        }
    }
}

impl Neg for &AlgebraicNumber {
    type Output = AlgebraicNumber;

    fn neg(self) -> AlgebraicNumber {
        AlgebraicNumber {
            coeffs: self.coeffs.iter().map(|c| -c).collect(),
            field: Rc::clone(&self.field),
        }
    }
}
