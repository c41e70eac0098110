use linfa::Float;
use ndarray::{Array2, ArrayBase, ArrayView1, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use std::ops::Mul;

use crate::error::{QSvmError, Result};

/// Similarity measure between two samples
///
/// Two variants are supported:
/// - Linear: `k(x, x') = <x, x'>`
/// - Gaussian(gamma): `k(x, x') = exp(-gamma * ||x - x'||)`, with the plain
///   (not squared) euclidean distance in the exponent
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub enum KernelMethod<F> {
    /// Euclidean inner product
    Linear,
    /// Gaussian(gamma): `exp(-gamma * ||x - x'||)`
    Gaussian(F),
}

impl<F: Float> KernelMethod<F> {
    pub fn similarity(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        match *self {
            KernelMethod::Linear => a.mul(&b).sum(),
            KernelMethod::Gaussian(gamma) => {
                let distance = a
                    .iter()
                    .zip(b.iter())
                    .map(|(x, y)| (*x - *y) * (*x - *y))
                    .sum::<F>()
                    .sqrt();

                (-gamma * distance).exp()
            }
        }
    }

    /// Map the scalar coefficient convention of the annealing literature to a
    /// kernel method
    ///
    /// A coefficient of `-1` selects the linear kernel, any non-negative
    /// finite coefficient selects the gaussian kernel. Everything else is
    /// rejected with [`QSvmError::InvalidGamma`](crate::QSvmError).
    pub fn from_gamma(gamma: F) -> Result<Self> {
        if gamma == -F::one() {
            Ok(KernelMethod::Linear)
        } else if gamma.is_finite() && gamma >= F::zero() {
            Ok(KernelMethod::Gaussian(gamma))
        } else {
            Err(QSvmError::InvalidGamma(gamma.to_f32().unwrap()))
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(*self, KernelMethod::Linear)
    }

    /// Compute the dense symmetric matrix of pairwise similarities
    pub fn gram<D: Data<Elem = F>>(&self, records: &ArrayBase<D, Ix2>) -> Array2<F> {
        let nsamples = records.nrows();
        let mut gram = Array2::zeros((nsamples, nsamples));

        for i in 0..nsamples {
            for j in i..nsamples {
                let value = self.similarity(records.row(i), records.row(j));
                gram[(i, j)] = value;
                gram[(j, i)] = value;
            }
        }

        gram
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match *self {
            KernelMethod::Gaussian(gamma) if !gamma.is_finite() || gamma < F::zero() => {
                Err(QSvmError::InvalidGamma(gamma.to_f32().unwrap()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn linear_is_the_inner_product() {
        let method = KernelMethod::Linear;
        let value = method.similarity(array![1., 2.].view(), array![3., 4.].view());
        assert_abs_diff_eq!(value, 11.);

        // self similarity is the squared norm
        let point = array![3., 4.];
        assert_abs_diff_eq!(method.similarity(point.view(), point.view()), 25.);
    }

    #[test]
    fn gaussian_uses_the_plain_euclidean_distance() {
        let method = KernelMethod::Gaussian(0.5);
        // ||(0,0) - (3,4)|| = 5
        let value = method.similarity(array![0., 0.].view(), array![3., 4.].view());
        assert_abs_diff_eq!(value, (-2.5f64).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(value, 0.082085, epsilon = 1e-6);
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = array![0.3, -1.2, 4.];
        let b = array![2.5, 0.7, -0.1];
        for method in [KernelMethod::Linear, KernelMethod::Gaussian(1.3)] {
            assert_abs_diff_eq!(
                method.similarity(a.view(), b.view()),
                method.similarity(b.view(), a.view()),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn gaussian_self_similarity_is_one() {
        let method = KernelMethod::Gaussian(2.);
        let a = array![1., -2., 3.];
        assert_abs_diff_eq!(method.similarity(a.view(), a.view()), 1.);
    }

    #[test]
    fn gamma_convention_is_honored() {
        assert_eq!(KernelMethod::from_gamma(-1.0f64).unwrap(), KernelMethod::Linear);
        assert_eq!(
            KernelMethod::from_gamma(0.5f64).unwrap(),
            KernelMethod::Gaussian(0.5)
        );
        assert!(matches!(
            KernelMethod::from_gamma(-0.5f64),
            Err(QSvmError::InvalidGamma(_))
        ));
        assert!(matches!(
            KernelMethod::from_gamma(f64::NAN),
            Err(QSvmError::InvalidGamma(_))
        ));
    }

    #[test]
    fn gram_is_symmetric_with_unit_diagonal_for_gaussian() {
        let records = array![[0., 0.], [3., 4.], [1., 1.]];
        let gram = KernelMethod::Gaussian(0.5).gram(&records);

        assert_eq!(gram.dim(), (3, 3));
        for i in 0..3 {
            assert_abs_diff_eq!(gram[(i, i)], 1.);
            for j in 0..3 {
                assert_abs_diff_eq!(gram[(i, j)], gram[(j, i)], epsilon = 1e-12);
            }
        }
        assert_abs_diff_eq!(gram[(0, 1)], (-2.5f64).exp(), epsilon = 1e-12);
    }
}
