use linfa::{Float, ParamGuard};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::QSvmError;
use crate::kernel::KernelMethod;
use crate::oracle::SimulatedAnnealing;
use crate::QSvm;

/// A verified hyper-parameter set ready for training
///
/// See [`QSvmParams`](crate::QSvmParams) for more information.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct QSvmValidParams<F: Float, O> {
    base: usize,
    digits: usize,
    penalty: F,
    ridge: F,
    kernel: KernelMethod<F>,
    oracle: O,
}

impl<F: Float, O> QSvmValidParams<F, O> {
    pub fn base(&self) -> usize {
        self.base
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn penalty(&self) -> F {
        self.penalty
    }

    pub fn ridge(&self) -> F {
        self.ridge
    }

    pub fn kernel(&self) -> &KernelMethod<F> {
        &self.kernel
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }
}

/// Hyper-parameters of the binary encoded support vector machine
///
/// The set is checked right before the training problem is assembled, no
/// matrix work happens on invalid parameters.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct QSvmParams<F: Float, O>(pub(crate) QSvmValidParams<F, O>);

impl<F: Float> QSvmParams<F, SimulatedAnnealing> {
    /// Create a parameter set with the default values
    ///
    /// Defaults are provided if the optional parameters are not specified:
    /// * `base = 2`
    /// * `digits = 2`
    /// * `penalty = 3`
    /// * `ridge = 0`
    /// * `kernel = KernelMethod::Linear`
    /// * `oracle = SimulatedAnnealing::default()`
    pub fn new() -> Self {
        Self(QSvmValidParams {
            base: 2,
            digits: 2,
            penalty: F::cast(3.),
            ridge: F::zero(),
            kernel: KernelMethod::Linear,
            oracle: SimulatedAnnealing::default(),
        })
    }
}

impl<F: Float> Default for QSvmParams<F, SimulatedAnnealing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, O> QSvmParams<F, O> {
    /// Set the base of the positional multiplier encoding
    ///
    /// `base` must be at least `1`
    pub fn base(mut self, base: usize) -> Self {
        self.0.base = base;
        self
    }

    /// Set the number of binary digits spent on every multiplier
    ///
    /// `digits` must be at least `1`
    pub fn digits(mut self, digits: usize) -> Self {
        self.0.digits = digits;
        self
    }

    /// Set the misclassification penalty, the upper bound a multiplier is
    /// expected to stay below
    ///
    /// `penalty` must be positive and finite
    pub fn penalty(mut self, penalty: F) -> Self {
        self.0.penalty = penalty;
        self
    }

    /// Set the ridge added to every kernel entry while the training problem
    /// is assembled
    ///
    /// `ridge` must be non-negative and finite
    pub fn ridge(mut self, ridge: F) -> Self {
        self.0.ridge = ridge;
        self
    }

    /// Use the euclidean inner product as similarity measure
    pub fn linear_kernel(mut self) -> Self {
        self.0.kernel = KernelMethod::Linear;
        self
    }

    /// Use a gaussian similarity measure with the given coefficient
    ///
    /// `gamma` must be non-negative and finite
    pub fn gaussian_kernel(mut self, gamma: F) -> Self {
        self.0.kernel = KernelMethod::Gaussian(gamma);
        self
    }

    /// Set the similarity measure
    pub fn with_kernel(mut self, kernel: KernelMethod<F>) -> Self {
        self.0.kernel = kernel;
        self
    }

    /// Exchange the minimization oracle the training problem is handed to
    pub fn oracle<O2>(self, oracle: O2) -> QSvmParams<F, O2> {
        QSvmParams(QSvmValidParams {
            base: self.0.base,
            digits: self.0.digits,
            penalty: self.0.penalty,
            ridge: self.0.ridge,
            kernel: self.0.kernel,
            oracle,
        })
    }
}

impl<F: Float, O> ParamGuard for QSvmParams<F, O> {
    type Checked = QSvmValidParams<F, O>;
    type Error = QSvmError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.base < 1 {
            Err(QSvmError::InvalidBase(self.0.base))
        } else if self.0.digits < 1 {
            Err(QSvmError::InvalidDigits(self.0.digits))
        } else if !self.0.penalty.is_finite() || self.0.penalty <= F::zero() {
            Err(QSvmError::InvalidPenalty(self.0.penalty.to_f32().unwrap()))
        } else if !self.0.ridge.is_finite() || self.0.ridge < F::zero() {
            Err(QSvmError::InvalidRidge(self.0.ridge.to_f32().unwrap()))
        } else {
            self.0.kernel.validate()?;
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float> QSvm<F> {
    /// Create default hyperparameters, annealing the training problem with
    /// [`SimulatedAnnealing`](crate::SimulatedAnnealing)
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> QSvmParams<F, SimulatedAnnealing> {
        QSvmParams::new()
    }
}
