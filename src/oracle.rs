use linfa::Float;
use ndarray::Array1;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{QSvmError, Result};
use crate::qubo::QuboProblem;

/// A black box that proposes a low energy assignment for a
/// [`QuboProblem`](crate::QuboProblem)
///
/// The returned assignment holds one value per problem variable. Bundled
/// implementations return plain bits, but relaxations of the binary problem
/// may return fractional values in `[0, 1]`; the decoding stage accepts both.
///
/// Implementations are free to be stochastic and are called exactly once per
/// training run: a failure is passed through to the caller as
/// [`QSvmError::Oracle`](crate::QSvmError) instead of being retried.
pub trait MinimizationOracle<F: Float> {
    fn minimize(&self, problem: &QuboProblem<F>) -> Result<Array1<F>>;
}

fn flip_delta<F: Float>(problem: &QuboProblem<F>, state: &[bool], variable: usize) -> F {
    let mut field = problem.coefficient(variable, variable);
    for i in 0..variable {
        if state[i] {
            field = field + problem.coefficient(i, variable);
        }
    }
    for j in (variable + 1)..state.len() {
        if state[j] {
            field = field + problem.coefficient(variable, j);
        }
    }

    if state[variable] {
        -field
    } else {
        field
    }
}

/// Inverse temperature window matched to the coupling scale of the problem,
/// so that early sweeps accept almost every move and late sweeps freeze
fn default_beta_range<F: Float>(problem: &QuboProblem<F>) -> (f64, f64) {
    let nvariables = problem.nvariables();
    let mut hottest = 0f64;
    let mut coldest = f64::INFINITY;

    for variable in 0..nvariables {
        let mut field = problem.coefficient(variable, variable).abs();
        for i in 0..variable {
            field = field + problem.coefficient(i, variable).abs();
        }
        for j in (variable + 1)..nvariables {
            field = field + problem.coefficient(variable, j).abs();
        }

        let field = field.to_f64().unwrap_or(f64::INFINITY);
        if field > 0. {
            hottest = hottest.max(field);
            coldest = coldest.min(field);
        }
    }

    if hottest == 0. || !coldest.is_finite() {
        // no coupling scale to derive the window from
        (0.1, 10.)
    } else {
        (2f64.ln() / hottest, 100f64.ln() / coldest)
    }
}

/// Single spin flip Metropolis annealer
///
/// Every read restarts from a uniformly random assignment and runs `sweeps`
/// passes over the variables while the inverse temperature grows
/// geometrically through `beta_range`. The best assignment observed across
/// all reads is returned.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedAnnealing {
    reads: usize,
    sweeps: usize,
    beta_range: Option<(f64, f64)>,
    seed: Option<u64>,
}

impl Default for SimulatedAnnealing {
    fn default() -> Self {
        SimulatedAnnealing {
            reads: 100,
            sweeps: 1000,
            beta_range: None,
            seed: None,
        }
    }
}

impl SimulatedAnnealing {
    /// Set the number of restarts from a fresh random assignment
    ///
    /// Defaults to `100` if not set
    pub fn reads(mut self, reads: usize) -> Self {
        self.reads = reads;
        self
    }

    /// Set the number of passes over all variables within one read
    ///
    /// Defaults to `1000` if not set
    pub fn sweeps(mut self, sweeps: usize) -> Self {
        self.sweeps = sweeps;
        self
    }

    /// Set the inverse temperature window of the geometric schedule
    ///
    /// If not set, the window is derived from the coupling scale of the
    /// problem at hand
    pub fn beta_range(mut self, start: f64, end: f64) -> Self {
        self.beta_range = Some((start, end));
        self
    }

    /// Seed the random number generator for reproducible runs
    ///
    /// If not set, the generator is seeded from entropy
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl<F: Float> MinimizationOracle<F> for SimulatedAnnealing {
    fn minimize(&self, problem: &QuboProblem<F>) -> Result<Array1<F>> {
        let nvariables = problem.nvariables();
        if nvariables == 0 {
            return Ok(Array1::zeros(0));
        }
        if self.reads == 0 || self.sweeps == 0 {
            return Err(QSvmError::Oracle(
                "at least one read and one sweep are required".into(),
            ));
        }

        let (beta_start, beta_end) = match self.beta_range {
            Some(range) => range,
            None => default_beta_range(problem),
        };
        if !beta_start.is_finite()
            || !beta_end.is_finite()
            || beta_start <= 0.
            || beta_end < beta_start
        {
            return Err(QSvmError::Oracle(
                format!(
                    "invalid inverse temperature window ({}, {})",
                    beta_start, beta_end
                )
                .into(),
            ));
        }

        let mut rng = match self.seed {
            Some(seed) => Xoshiro256Plus::seed_from_u64(seed),
            None => Xoshiro256Plus::from_entropy(),
        };

        let growth = F::cast(if self.sweeps > 1 {
            (beta_end / beta_start).powf(1. / (self.sweeps - 1) as f64)
        } else {
            1.
        });

        let mut state = vec![false; nvariables];
        let mut best_state = vec![false; nvariables];
        let mut best_energy = F::infinity();

        for _ in 0..self.reads {
            // random restart, tracking the energy incrementally from the
            // empty assignment upwards
            state.fill(false);
            let mut energy = F::zero();
            for variable in 0..nvariables {
                if rng.gen::<bool>() {
                    energy = energy + flip_delta(problem, &state, variable);
                    state[variable] = true;
                }
            }
            if energy < best_energy {
                best_energy = energy;
                best_state.copy_from_slice(&state);
            }

            let mut beta = F::cast(beta_start);
            for _ in 0..self.sweeps {
                for variable in 0..nvariables {
                    let delta = flip_delta(problem, &state, variable);
                    if delta <= F::zero() || F::cast(rng.gen::<f64>()) < (-beta * delta).exp() {
                        state[variable] = !state[variable];
                        energy = energy + delta;
                        if energy < best_energy {
                            best_energy = energy;
                            best_state.copy_from_slice(&state);
                        }
                    }
                }
                beta = beta * growth;
            }
        }

        Ok(best_state
            .iter()
            .map(|&bit| if bit { F::one() } else { F::zero() })
            .collect())
    }
}

/// Exact minimizer enumerating every assignment in Gray code order
///
/// Visiting the states in Gray code order means two consecutive assignments
/// differ in a single variable, so each step costs one coefficient column
/// scan instead of a full energy evaluation.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExhaustiveSearch;

impl ExhaustiveSearch {
    /// Problems with more variables than this are refused
    pub const MAX_VARIABLES: usize = 24;

    pub fn new() -> Self {
        ExhaustiveSearch
    }
}

impl<F: Float> MinimizationOracle<F> for ExhaustiveSearch {
    fn minimize(&self, problem: &QuboProblem<F>) -> Result<Array1<F>> {
        let nvariables = problem.nvariables();
        if nvariables > Self::MAX_VARIABLES {
            return Err(QSvmError::Oracle(
                format!(
                    "exhaustive enumeration over {} variables is intractable, the limit is {}",
                    nvariables,
                    Self::MAX_VARIABLES
                )
                .into(),
            ));
        }
        if nvariables == 0 {
            return Ok(Array1::zeros(0));
        }

        let mut state = vec![false; nvariables];
        let mut energy = F::zero();
        let mut best_state = state.clone();
        let mut best_energy = energy;

        for step in 1u64..(1u64 << nvariables) {
            let variable = step.trailing_zeros() as usize;
            energy = energy + flip_delta(problem, &state, variable);
            state[variable] = !state[variable];

            if energy < best_energy {
                best_energy = energy;
                best_state.copy_from_slice(&state);
            }
        }

        Ok(best_state
            .iter()
            .map(|&bit| if bit { F::one() } else { F::zero() })
            .collect())
    }
}
