use linfa::Float;
use ndarray::{Array2, ArrayView1, ArrayView2, Zip};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::encoding::MultiplierEncoding;
use crate::error::{QSvmError, Result};

/// A quadratic unconstrained binary optimization problem
///
/// The coefficients are stored as a dense upper triangular matrix: the
/// diagonal carries the linear terms, every interaction between a pair of
/// variables is folded into the cell above the diagonal and the strictly
/// lower triangle is identically zero.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct QuboProblem<F> {
    coefficients: Array2<F>,
}

impl<F: Float> QuboProblem<F> {
    /// Build the training problem of a soft margin support vector machine in
    /// its positionally encoded dual form
    ///
    /// With samples `n, m`, digits `k, j` and flat variable indices
    /// `i = n * digits + k`, the raw coefficient is
    ///
    /// `0.5 * base^(k + j) * t_n * t_m * (gram[n, m] + ridge) - delta(n, m) * delta(k, j) * base^k`
    ///
    /// where the first summand stems from the quadratic part of the dual and
    /// the second from the (negated) sum of multipliers. The raw matrix is
    /// then folded into the canonical upper triangular form.
    ///
    /// The cells are independent of each other, so the matrix is filled in
    /// parallel.
    pub fn from_dual(
        gram: ArrayView2<F>,
        signs: ArrayView1<F>,
        encoding: &MultiplierEncoding,
        ridge: F,
    ) -> Result<Self> {
        let nsamples = signs.len();
        if gram.nrows() != nsamples || gram.ncols() != nsamples {
            return Err(QSvmError::DimensionMismatch {
                expected: nsamples,
                actual: gram.nrows().max(gram.ncols()),
            });
        }

        let digits = encoding.digits();
        let nvariables = encoding.nvariables(nsamples);
        let half = F::cast(0.5);

        let raw = |i: usize, j: usize| {
            let (n, k) = (i / digits, i % digits);
            let (m, l) = (j / digits, j % digits);

            let quadratic = half
                * encoding.weight::<F>(k)
                * encoding.weight::<F>(l)
                * signs[n]
                * signs[m]
                * (gram[(n, m)] + ridge);

            if i == j {
                quadratic - encoding.weight::<F>(k)
            } else {
                quadratic
            }
        };

        let mut coefficients = Array2::zeros((nvariables, nvariables));
        Zip::indexed(&mut coefficients).par_for_each(|(i, j), cell| {
            *cell = match i.cmp(&j) {
                Ordering::Less => raw(i, j) + raw(j, i),
                Ordering::Equal => raw(i, i),
                Ordering::Greater => F::zero(),
            };
        });

        Ok(QuboProblem { coefficients })
    }

    /// Canonicalize an arbitrary square coefficient matrix
    ///
    /// Symmetric pairs are folded above the diagonal, so
    /// `[[1, 2], [3, 4]]` and `[[1, 5], [0, 4]]` describe the same problem.
    pub fn from_matrix(mut matrix: Array2<F>) -> Result<Self> {
        if matrix.nrows() != matrix.ncols() {
            return Err(QSvmError::DimensionMismatch {
                expected: matrix.nrows(),
                actual: matrix.ncols(),
            });
        }

        for i in 0..matrix.nrows() {
            for j in (i + 1)..matrix.ncols() {
                let mirrored = matrix[(j, i)];
                matrix[(i, j)] = matrix[(i, j)] + mirrored;
                matrix[(j, i)] = F::zero();
            }
        }

        Ok(QuboProblem {
            coefficients: matrix,
        })
    }

    pub fn nvariables(&self) -> usize {
        self.coefficients.nrows()
    }

    pub fn coefficient(&self, i: usize, j: usize) -> F {
        self.coefficients[(i, j)]
    }

    pub fn coefficients(&self) -> ArrayView2<F> {
        self.coefficients.view()
    }

    /// Iterator over the non-zero cells of the upper triangle, the sparse
    /// shape most samplers ingest
    pub fn nonzero(&self) -> impl Iterator<Item = ((usize, usize), F)> + '_ {
        self.coefficients
            .indexed_iter()
            .filter(|(_, value)| **value != F::zero())
            .map(|(index, value)| (index, *value))
    }

    /// Objective value of an assignment
    ///
    /// Fractional entries are evaluated as they are, which keeps the value
    /// meaningful for relaxations of the binary problem.
    pub fn energy(&self, assignment: ArrayView1<F>) -> F {
        let nvariables = self.nvariables();
        assert_eq!(
            assignment.len(),
            nvariables,
            "The assignment must contain one entry per problem variable."
        );

        let mut total = F::zero();
        for i in 0..nvariables {
            let a = assignment[i];
            if a == F::zero() {
                continue;
            }
            total = total + self.coefficients[(i, i)] * a * a;
            for j in (i + 1)..nvariables {
                total = total + self.coefficients[(i, j)] * a * assignment[j];
            }
        }
        total
    }
}
