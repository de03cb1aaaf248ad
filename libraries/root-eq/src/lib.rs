use num_traits::{real::Real, NumCast};
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, trace, warn};

pub mod derivative;
pub mod error;

pub use derivative::{Analytic, Backward, Central, Derivative, Forward};
pub use error::SolveError;

pub const DEFAULT_TOLERANCE: f64 = 1e-10;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
pub const DEFAULT_SINGULAR_THRESHOLD: f64 = 1e-12;
pub const DEFAULT_STEP: f64 = 1e-5;

/// Scalar function whose root is searched for.
pub trait RootEquation {
    type Scalar;
    fn root(&self, x: Self::Scalar) -> Self::Scalar;
}

/// Equation which also knows its exact derivative.
pub trait DiffEquation: RootEquation {
    fn diff(&self, x: Self::Scalar) -> Self::Scalar;
}

impl<Eq: RootEquation + ?Sized> RootEquation for &Eq {
    type Scalar = Eq::Scalar;

    fn root(&self, x: Self::Scalar) -> Self::Scalar {
        (**self).root(x)
    }
}

impl<Eq: DiffEquation + ?Sized> DiffEquation for &Eq {
    fn diff(&self, x: Self::Scalar) -> Self::Scalar {
        (**self).diff(x)
    }
}

/// Closure adapter for [`RootEquation`].
#[derive(Clone, Copy)]
pub struct FnEquation<F, S> {
    f: F,
    __scalar: PhantomData<fn(S) -> S>,
}

impl<F: Fn(S) -> S, S> FnEquation<F, S> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            __scalar: PhantomData,
        }
    }
}

impl<F: Fn(S) -> S, S> RootEquation for FnEquation<F, S> {
    type Scalar = S;

    fn root(&self, x: S) -> S {
        (self.f)(x)
    }
}

/// Closure adapter for [`DiffEquation`].
#[derive(Clone, Copy)]
pub struct FnDiffEquation<F, DF, S> {
    f: F,
    df: DF,
    __scalar: PhantomData<fn(S) -> S>,
}

impl<F: Fn(S) -> S, DF: Fn(S) -> S, S> FnDiffEquation<F, DF, S> {
    pub fn new(f: F, df: DF) -> Self {
        Self {
            f,
            df,
            __scalar: PhantomData,
        }
    }
}

impl<F: Fn(S) -> S, DF: Fn(S) -> S, S> RootEquation for FnDiffEquation<F, DF, S> {
    type Scalar = S;

    fn root(&self, x: S) -> S {
        (self.f)(x)
    }
}

impl<F: Fn(S) -> S, DF: Fn(S) -> S, S> DiffEquation for FnDiffEquation<F, DF, S> {
    fn diff(&self, x: S) -> S {
        (self.df)(x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution<S> {
    pub root: S,
    /// Number of iterations started, the successful one included.
    pub iterations: usize,
}

pub struct NewtonRaphson<Eq: RootEquation, D> {
    pub equation: Eq,
    pub derivative: D,
    pub tolerance: Eq::Scalar,
    pub max_iterations: usize,
    /// Derivatives with a smaller magnitude stop the iteration.
    pub singular_threshold: Eq::Scalar,
}

pub(crate) fn cast<S: Real>(value: f64) -> S {
    <S as NumCast>::from(value).unwrap_or_else(S::epsilon)
}

impl<Eq: RootEquation<Scalar: Real>, D> NewtonRaphson<Eq, D> {
    pub fn new(equation: Eq, derivative: D) -> Self {
        Self {
            equation,
            derivative,
            tolerance: cast(DEFAULT_TOLERANCE),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            singular_threshold: cast(DEFAULT_SINGULAR_THRESHOLD),
        }
    }

    pub fn with_tolerance(mut self, tolerance: Eq::Scalar) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_singular_threshold(mut self, singular_threshold: Eq::Scalar) -> Self {
        self.singular_threshold = singular_threshold;
        self
    }
}

impl<Eq, D> NewtonRaphson<Eq, D>
where
    Eq: RootEquation<Scalar: Real + fmt::Debug>,
    D: Derivative<Eq>,
{
    /// Iterates from `x` until the residual or the step falls under the tolerance.
    ///
    /// Every pass through the loop counts as one iteration, including the one in which the
    /// iteration stops, whether it converged or hit a vanishing derivative.
    pub fn solve(
        &self,
        mut x: Eq::Scalar,
    ) -> Result<Solution<Eq::Scalar>, SolveError<Eq::Scalar>> {
        for i in 0..self.max_iterations {
            let iterations = i + 1;
            let f = self.equation.root(x);
            if f.abs() < self.tolerance {
                debug!(?x, iterations, "Residual under tolerance");
                return Ok(Solution { root: x, iterations });
            }

            let df = self.derivative.derivative(&self.equation, x);
            trace!(iteration = iterations, ?x, ?f, ?df);
            if df.abs() < self.singular_threshold {
                warn!(?x, ?df, "Derivative too small, Newton-Raphson failed");
                return Err(SolveError::SingularDerivative {
                    x,
                    derivative: df,
                    iterations,
                });
            }

            let next = x - f / df;
            if (next - x).abs() < self.tolerance {
                debug!(x = ?next, iterations, "Step under tolerance");
                return Ok(Solution {
                    root: next,
                    iterations,
                });
            }
            x = next;
        }
        warn!(
            last = ?x,
            "Did not converge after {} iterations",
            self.max_iterations
        );
        Err(SolveError::NotConverged {
            last: x,
            iterations: self.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn parabola() -> impl DiffEquation<Scalar = f64> {
        FnDiffEquation::new(|x: f64| x * x - 2.0, |x: f64| 2.0 * x)
    }

    #[test]
    fn defaults_match_documented_values() {
        let solver = NewtonRaphson::new(parabola(), Analytic);
        assert_eq!(solver.tolerance, 1e-10);
        assert_eq!(solver.max_iterations, 100);
        assert_eq!(solver.singular_threshold, 1e-12);
    }

    #[test]
    fn sqrt_2_with_every_estimator() {
        let equation = parabola();
        let analytic = NewtonRaphson::new(&equation, Analytic).solve(1.5).unwrap();
        let forward = NewtonRaphson::new(&equation, Forward::default()).solve(1.5).unwrap();
        let backward = NewtonRaphson::new(&equation, Backward::default()).solve(1.5).unwrap();
        let central = NewtonRaphson::new(&equation, Central::default()).solve(1.5).unwrap();
        for solution in [analytic, forward, backward, central] {
            assert_abs_diff_eq!(solution.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
            assert!(solution.iterations < 10);
        }
    }

    #[test]
    fn exact_root_converges_on_first_iteration() {
        let solution = NewtonRaphson::new(parabola(), Analytic)
            .solve(std::f64::consts::SQRT_2)
            .unwrap();
        // f(sqrt 2) is a few ulps, far below the tolerance
        assert_eq!(solution.iterations, 1);
        assert_eq!(solution.root, std::f64::consts::SQRT_2);
    }

    #[test]
    fn zero_derivative_is_reported_as_singular() {
        let result = NewtonRaphson::new(parabola(), Analytic).solve(0.0);
        assert_eq!(
            result,
            Err(SolveError::SingularDerivative {
                x: 0.0,
                derivative: 0.0,
                iterations: 1,
            })
        );
    }

    #[test]
    fn singular_derivative_counts_the_failing_iteration() {
        // One full step from 2 lands on 0, where the derivative is flat
        let equation = FnDiffEquation::new(
            |x: f64| if x > 0.5 { x } else { 1.0 },
            |x: f64| if x > 0.5 { 1.0 } else { 0.0 },
        );
        let error = NewtonRaphson::new(equation, Analytic).solve(2.0).unwrap_err();
        assert!(matches!(error, SolveError::SingularDerivative { .. }));
        assert_eq!(error.iterations(), 2);
        assert_eq!(error.last_estimate(), 0.0);
    }

    #[test]
    fn zero_budget_returns_initial_guess() {
        let result = NewtonRaphson::new(parabola(), Analytic)
            .with_max_iterations(0)
            .solve(1.5);
        assert_eq!(
            result,
            Err(SolveError::NotConverged {
                last: 1.5,
                iterations: 0,
            })
        );
    }

    #[test]
    fn divergent_iteration_returns_last_estimate() {
        // Newton on cbrt(x) doubles and flips the iterate every step
        let equation = FnDiffEquation::new(
            |x: f64| x.cbrt(),
            |x: f64| 1.0 / (3.0 * x.cbrt().powi(2)),
        );
        let error = NewtonRaphson::new(equation, Analytic)
            .with_max_iterations(10)
            .solve(1.0)
            .unwrap_err();
        assert!(matches!(error, SolveError::NotConverged { .. }));
        assert_eq!(error.iterations(), 10);
        assert_relative_eq!(error.last_estimate(), 1024.0, max_relative = 1e-9);
    }

    #[test]
    fn repeated_solves_are_bit_identical() {
        let equation = FnEquation::new(|x: f64| x.powi(3) - x - 1.0);
        let solver = NewtonRaphson::new(equation, Central::default());
        let a = solver.solve(1.0).unwrap();
        let b = solver.solve(1.0).unwrap();
        assert_eq!(a.root.to_bits(), b.root.to_bits());
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn single_precision_scalar() {
        let equation = FnDiffEquation::new(|x: f32| x * x - 2.0, |x: f32| 2.0 * x);
        let solution = NewtonRaphson::new(equation, Analytic)
            .with_tolerance(1e-5)
            .solve(1.5)
            .unwrap();
        assert_abs_diff_eq!(solution.root, std::f32::consts::SQRT_2, epsilon = 1e-5);
    }

    #[test]
    fn error_messages() {
        let error = SolveError::NotConverged {
            last: 3.5,
            iterations: 100,
        };
        assert_eq!(
            error.to_string(),
            "Did not converge after 100 iterations; last x = 3.5"
        );
        let error = SolveError::SingularDerivative {
            x: 0.0,
            derivative: 0.0,
            iterations: 1,
        };
        assert_eq!(
            error.to_string(),
            "Derivative too small (0) at x = 0 after 1 iterations"
        );
    }
}
