//! # Support vector machines on binary optimizers
//!
//! `linfa-qsvm` trains a binary support vector machine by restating its soft
//! margin dual as a quadratic unconstrained binary optimization (QUBO)
//! problem. Every Lagrange multiplier is spread over a handful of binary
//! digits, the dual objective becomes an upper triangular coefficient matrix
//! over those digits and any device that minimizes such matrices, from a
//! local annealer to quantum hardware, can carry out the training. The
//! returned assignment is decoded back into multipliers, a bias is recovered
//! from the samples off the penalty bound and the result predicts like any
//! other kernel classifier.
//!
//! ## The Big Picture
//!
//! `linfa-qsvm` is a crate in the [`linfa`](https://crates.io/crates/linfa)
//! ecosystem, an effort to create a toolkit for classical Machine Learning
//! implemented in pure Rust, akin to Python's `scikit-learn`.
//!
//! ## Current state
//!
//! `linfa-qsvm` provides:
//! - linear and gaussian similarity measures
//! - positional encoding of the multipliers with a configurable base
//! - training through the [`Fit`](linfa::traits::Fit) trait with boolean
//!   targets
//! - a single spin flip [`SimulatedAnnealing`] sampler and an exact
//!   [`ExhaustiveSearch`] enumerator
//! - the [`MinimizationOracle`] trait to plug in external samplers, in
//!   particular remote annealing hardware
//!
//! ## Examples
//!
//! ```rust
//! use linfa::prelude::*;
//! use linfa_qsvm::{ExhaustiveSearch, QSvm};
//! use ndarray::array;
//!
//! # fn main() -> Result<(), linfa_qsvm::QSvmError> {
//! let dataset = Dataset::new(array![[1.0, 0.0], [0.0, 1.0]], array![true, false]);
//!
//! // spread every multiplier over two binary digits and train by exact
//! // enumeration of the resulting four variable problem
//! let model = QSvm::params()
//!     .digits(2)
//!     .penalty(3.0)
//!     .oracle(ExhaustiveSearch::new())
//!     .fit(&dataset)?;
//!
//! let prediction = model.predict(&array![[2.0, 0.0], [0.0, 2.0]]);
//! assert_eq!(prediction, array![true, false]);
//! # Ok(())
//! # }
//! ```
use linfa::Float;
use ndarray::{Array1, Array2, ArrayBase, Data, Ix1, Ix2};

use std::fmt;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

mod classification;
mod encoding;
pub mod error;
pub mod hyperparams;
mod kernel;
mod oracle;
mod qubo;

pub use encoding::MultiplierEncoding;
pub use error::{QSvmError, Result};
pub use hyperparams::{QSvmParams, QSvmValidParams};
pub use kernel::KernelMethod;
pub use oracle::{ExhaustiveSearch, MinimizationOracle, SimulatedAnnealing};
pub use qubo::QuboProblem;

/// Fitted support vector machine decoded from a QUBO assignment
///
/// Only samples with an active multiplier are retained; together with the
/// bias and the kernel method they make up the decision function. The
/// objective value attained by the minimization oracle is kept as a quality
/// diagnostic of the solution.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct QSvm<F: Float> {
    pub(crate) support_vectors: Array2<F>,
    pub(crate) alpha: Array1<F>,
    pub(crate) targets: Array1<F>,
    pub(crate) bias: F,
    pub(crate) kernel: KernelMethod<F>,
    pub(crate) energy: F,
}

impl<F: Float> QSvm<F> {
    /// The decoded multipliers of the support vectors
    pub fn alpha(&self) -> &Array1<F> {
        &self.alpha
    }

    /// The signed targets of the support vectors, `+1` for the positive
    /// class and `-1` for the negative one
    pub fn targets(&self) -> &Array1<F> {
        &self.targets
    }

    /// The retained training samples, one row per support vector
    pub fn support_vectors(&self) -> &Array2<F> {
        &self.support_vectors
    }

    /// The bias of the decision function
    pub fn bias(&self) -> F {
        self.bias
    }

    /// The similarity measure the model was trained with
    pub fn kernel_method(&self) -> &KernelMethod<F> {
        &self.kernel
    }

    /// The objective value of the assignment the oracle proposed, lower
    /// values mean a better solution of the training problem
    pub fn energy(&self) -> F {
        self.energy
    }

    /// Returns the number of support vectors
    pub fn nsupport(&self) -> usize {
        self.alpha.len()
    }

    /// Sums the weighted similarities between `sample` and every support
    /// vector, the decision function without its bias
    pub fn weighted_sum<D: Data<Elem = F>>(&self, sample: &ArrayBase<D, Ix1>) -> F {
        self.support_vectors
            .rows()
            .into_iter()
            .zip(self.alpha.iter().zip(self.targets.iter()))
            .map(|(vector, (alpha, sign))| {
                *alpha * *sign * self.kernel.similarity(vector, sample.view())
            })
            .sum()
    }

    /// Evaluate the decision function on every row of `records`
    ///
    /// The sign of a value decides the class, its magnitude measures how far
    /// the sample sits from the separating surface.
    pub fn decision_function<D: Data<Elem = F>>(&self, records: &ArrayBase<D, Ix2>) -> Array1<F> {
        records
            .rows()
            .into_iter()
            .map(|row| self.weighted_sum(&row) + self.bias)
            .collect()
    }
}

/// Display solution
///
/// The attained objective value and the number of retained support vectors
/// summarise how well the oracle solved the training problem.
impl<F: Float> fmt::Display for QSvm<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QUBO solution with energy {} using {} support vectors",
            self.energy,
            self.nsupport()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linfa::prelude::*;
    use ndarray::array;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<QSvm<f64>>();
        has_autotraits::<QSvmParams<f64, SimulatedAnnealing>>();
        has_autotraits::<QSvmError>();
        has_autotraits::<QuboProblem<f64>>();
    }

    #[test]
    fn display_summarises_the_solution() {
        let dataset = Dataset::new(array![[1., 0.], [0., 1.]], array![true, false]);
        let model = QSvm::params()
            .oracle(ExhaustiveSearch::new())
            .fit(&dataset)
            .unwrap();

        assert_eq!(
            model.to_string(),
            "QUBO solution with energy -1 using 2 support vectors"
        );
    }
}
