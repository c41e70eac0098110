use linfa::dataset::AsSingleTargets;
use linfa::traits::{Fit, PredictInplace};
use linfa::{DatasetBase, Float};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};

use crate::encoding::MultiplierEncoding;
use crate::error::{QSvmError, Result};
use crate::hyperparams::QSvmValidParams;
use crate::oracle::MinimizationOracle;
use crate::qubo::QuboProblem;
use crate::QSvm;

/// Recover the bias from the decoded multipliers
///
/// Every sample is weighted by `alpha_n * (penalty - alpha_n)`, so only
/// multipliers strictly between zero and the penalty bound have a say. When
/// the weights sum to exactly zero no sample constrains the bias and the
/// solution is reported as degenerate.
fn calculate_bias<F: Float>(
    alpha: &Array1<F>,
    signs: &Array1<F>,
    gram: &Array2<F>,
    penalty: F,
) -> Result<F> {
    let weighted = alpha * signs;
    let margins = signs - &weighted.dot(gram);

    let mut numerator = F::zero();
    let mut denominator = F::zero();
    for (a, margin) in alpha.iter().zip(margins.iter()) {
        let weight = *a * (penalty - *a);
        numerator = numerator + weight * *margin;
        denominator = denominator + weight;
    }

    if denominator == F::zero() {
        return Err(QSvmError::DegenerateSolution(penalty.to_f32().unwrap()));
    }

    Ok(numerator / denominator)
}

impl<F: Float, O: MinimizationOracle<F>, D: Data<Elem = F>, T: AsSingleTargets<Elem = bool>>
    Fit<ArrayBase<D, Ix2>, T, QSvmError> for QSvmValidParams<F, O>
{
    type Object = QSvm<F>;

    /// Fit a support vector machine by handing its binary encoded dual to
    /// the minimization oracle.
    ///
    /// The records of `dataset` must have shape `(n_samples, n_features)`
    /// and the boolean targets shape `(n_samples)`, with `true` read as the
    /// positive class.
    ///
    /// Returns a fitted `QSvm` object holding the support vectors together
    /// with their multipliers, the bias and the attained objective value.
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        let records = dataset.records();
        let targets = dataset.as_single_targets();
        let nsamples = records.nrows();

        if nsamples == 0 {
            return Err(linfa::Error::NotEnoughSamples.into());
        }
        if targets.len() != nsamples {
            return Err(QSvmError::DimensionMismatch {
                expected: nsamples,
                actual: targets.len(),
            });
        }

        let signs = targets.mapv(|positive| if positive { F::one() } else { -F::one() });
        let encoding = MultiplierEncoding::new(self.base(), self.digits())?;
        let gram = self.kernel().gram(records);

        let problem = QuboProblem::from_dual(gram.view(), signs.view(), &encoding, self.ridge())?;
        let assignment = self.oracle().minimize(&problem)?;

        let alpha = encoding.decode(assignment.view(), nsamples)?;
        let energy = problem.energy(assignment.view());
        let bias = calculate_bias(&alpha, &signs, &gram, self.penalty())?;

        // only samples with an active multiplier shape the decision function
        let support: Vec<usize> = alpha
            .iter()
            .enumerate()
            .filter(|(_, a)| **a > F::zero())
            .map(|(n, _)| n)
            .collect();

        Ok(QSvm {
            support_vectors: records.select(Axis(0), &support),
            alpha: alpha.select(Axis(0), &support),
            targets: signs.select(Axis(0), &support),
            bias,
            kernel: *self.kernel(),
            energy,
        })
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<bool>> for QSvm<F> {
    /// Classify every row of `x`, with a non-negative decision value read as
    /// the positive class.
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<bool>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        assert_eq!(
            x.ncols(),
            self.support_vectors.ncols(),
            "Number of data features must match the number of features the model was trained with."
        );

        for (row, target) in x.rows().into_iter().zip(y.iter_mut()) {
            *target = self.weighted_sum(&row) + self.bias >= F::zero();
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<bool> {
        Array1::from_elem(x.nrows(), false)
    }
}
