use linfa::Float;
use ndarray::{Array1, ArrayView1};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{QSvmError, Result};

/// Positional encoding of the Lagrange multipliers
///
/// Every multiplier is spread over `digits` binary variables weighted by the
/// powers of `base`, so a multiplier can take any value in
/// `{0, 1, .., base^0 + base^1 + ..}`. The binary variables of sample `n`
/// occupy the contiguous index block `n * digits .. (n + 1) * digits`.
///
/// There is no forward encoder: the optimization searches directly over the
/// binary variables and only the decoding direction is ever needed.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiplierEncoding {
    base: usize,
    digits: usize,
}

impl MultiplierEncoding {
    pub fn new(base: usize, digits: usize) -> Result<Self> {
        if base < 1 {
            Err(QSvmError::InvalidBase(base))
        } else if digits < 1 {
            Err(QSvmError::InvalidDigits(digits))
        } else {
            Ok(MultiplierEncoding { base, digits })
        }
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    /// Weight `base^k` of the `k`-th binary variable of a sample
    pub fn weight<F: Float>(&self, k: usize) -> F {
        let base = F::cast(self.base);
        let mut weight = F::one();
        for _ in 0..k {
            weight = weight * base;
        }
        weight
    }

    /// Largest value a single decoded multiplier can reach
    pub fn upper_bound<F: Float>(&self) -> F {
        (0..self.digits).map(|k| self.weight(k)).sum()
    }

    /// Number of binary variables needed to encode `nsamples` multipliers
    pub fn nvariables(&self, nsamples: usize) -> usize {
        nsamples * self.digits
    }

    /// Collapse a binary assignment back into one multiplier per sample
    ///
    /// Entries may lie strictly between zero and one when the assignment
    /// stems from a relaxation, the weighted sum is formed either way.
    pub fn decode<F: Float>(
        &self,
        assignment: ArrayView1<F>,
        nsamples: usize,
    ) -> Result<Array1<F>> {
        let expected = self.nvariables(nsamples);
        if assignment.len() != expected {
            return Err(QSvmError::DimensionMismatch {
                expected,
                actual: assignment.len(),
            });
        }

        Ok(Array1::from_shape_fn(nsamples, |n| {
            (0..self.digits)
                .map(|k| self.weight::<F>(k) * assignment[n * self.digits + k])
                .sum()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn rejects_out_of_range_parameters() {
        assert!(matches!(
            MultiplierEncoding::new(0, 2),
            Err(QSvmError::InvalidBase(0))
        ));
        assert!(matches!(
            MultiplierEncoding::new(2, 0),
            Err(QSvmError::InvalidDigits(0))
        ));
    }

    #[test]
    fn weights_are_the_powers_of_the_base() {
        let encoding = MultiplierEncoding::new(3, 3).unwrap();
        assert_abs_diff_eq!(encoding.weight::<f64>(0), 1.);
        assert_abs_diff_eq!(encoding.weight::<f64>(1), 3.);
        assert_abs_diff_eq!(encoding.weight::<f64>(2), 9.);
        assert_abs_diff_eq!(encoding.upper_bound::<f64>(), 13.);
        assert_eq!(encoding.nvariables(2), 6);
    }

    #[test]
    fn decodes_blockwise() {
        let encoding = MultiplierEncoding::new(3, 3).unwrap();
        let assignment = array![1., 0., 1., 0., 1., 1.];
        let alpha = encoding.decode(assignment.view(), 2).unwrap();
        assert_abs_diff_eq!(alpha, array![10., 12.]);
    }

    #[test]
    fn all_zero_and_all_one_blocks_hit_the_bounds() {
        let encoding = MultiplierEncoding::new(2, 3).unwrap();
        let assignment = array![0., 0., 0., 1., 1., 1.];
        let alpha = encoding.decode(assignment.view(), 2).unwrap();
        assert_abs_diff_eq!(alpha[0], 0.);
        assert_abs_diff_eq!(alpha[1], encoding.upper_bound());
    }

    #[test]
    fn decoding_keeps_relaxed_values() {
        let encoding = MultiplierEncoding::new(2, 2).unwrap();
        let alpha = encoding.decode(array![0.5, 0.25, 0., 1.].view(), 2).unwrap();
        assert_abs_diff_eq!(alpha, array![1., 2.]);
    }

    #[test]
    fn wrong_assignment_length_is_reported() {
        let encoding = MultiplierEncoding::new(2, 2).unwrap();
        let result = encoding.decode(array![1., 0., 1.].view(), 2);
        assert!(matches!(
            result,
            Err(QSvmError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }
}
