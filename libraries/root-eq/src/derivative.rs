//! Derivative sources for the Newton-Raphson iteration.
//!
//! The finite-difference estimators only need `f`; [`Analytic`] requires the equation to
//! provide its exact derivative through [`DiffEquation`].

use crate::{cast, DiffEquation, RootEquation, DEFAULT_STEP};
use num_traits::real::Real;

pub trait Derivative<Eq: RootEquation> {
    fn derivative(&self, equation: &Eq, x: Eq::Scalar) -> Eq::Scalar;
}

/// `(f(x + h) - f(x)) / h`, first order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forward<S = f64> {
    pub step: S,
}

/// `(f(x) - f(x - h)) / h`, first order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backward<S = f64> {
    pub step: S,
}

/// `(f(x + h) - f(x - h)) / 2h`, second order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Central<S = f64> {
    pub step: S,
}

/// Exact derivative supplied by the equation itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Analytic;

macro_rules! impl_step_ctors {
    ($($ty:ident),*) => {$(
        impl<S: Real> Default for $ty<S> {
            fn default() -> Self {
                Self {
                    step: cast(DEFAULT_STEP),
                }
            }
        }

        impl<S> $ty<S> {
            pub const fn with_step(step: S) -> Self {
                Self { step }
            }
        }
    )*};
}

impl_step_ctors!(Forward, Backward, Central);

impl<Eq: RootEquation<Scalar: Real>> Derivative<Eq> for Forward<Eq::Scalar> {
    fn derivative(&self, equation: &Eq, x: Eq::Scalar) -> Eq::Scalar {
        (equation.root(x + self.step) - equation.root(x)) / self.step
    }
}

impl<Eq: RootEquation<Scalar: Real>> Derivative<Eq> for Backward<Eq::Scalar> {
    fn derivative(&self, equation: &Eq, x: Eq::Scalar) -> Eq::Scalar {
        (equation.root(x) - equation.root(x - self.step)) / self.step
    }
}

impl<Eq: RootEquation<Scalar: Real>> Derivative<Eq> for Central<Eq::Scalar> {
    fn derivative(&self, equation: &Eq, x: Eq::Scalar) -> Eq::Scalar {
        (equation.root(x + self.step) - equation.root(x - self.step)) / (self.step + self.step)
    }
}

impl<Eq: DiffEquation> Derivative<Eq> for Analytic {
    fn derivative(&self, equation: &Eq, x: Eq::Scalar) -> Eq::Scalar {
        equation.diff(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FnDiffEquation, FnEquation};
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    fn exp() -> FnEquation<fn(f64) -> f64, f64> {
        FnEquation::new(f64::exp as fn(f64) -> f64)
    }

    fn error<D: Derivative<FnEquation<fn(f64) -> f64, f64>>>(estimator: D, x: f64) -> f64 {
        (estimator.derivative(&exp(), x) - x.exp()).abs()
    }

    #[test]
    fn default_step_is_1e_minus_5() {
        assert_eq!(Forward::<f64>::default().step, 1e-5);
        assert_eq!(Backward::<f64>::default().step, 1e-5);
        assert_eq!(Central::<f64>::default().step, 1e-5);
    }

    #[test]
    fn forward_and_backward_are_biased_in_opposite_directions() {
        let forward = Forward::with_step(1e-3).derivative(&exp(), 0.5);
        let backward = Backward::with_step(1e-3).derivative(&exp(), 0.5);
        let exact = 0.5f64.exp();
        assert!(forward > exact);
        assert!(backward < exact);
    }

    #[test_case(1e-2; "coarse step")]
    #[test_case(1e-3; "medium step")]
    #[test_case(1e-4; "fine step")]
    fn one_sided_error_is_first_order(h: f64) {
        // |f''| = e^0.5 < 1.7, so the truncation error is below h
        assert!(error(Forward::with_step(h), 0.5) < h);
        assert!(error(Backward::with_step(h), 0.5) < h);
    }

    #[test]
    fn one_sided_error_shrinks_linearly_with_step() {
        let coarse = error(Forward::with_step(1e-2), 0.5);
        let fine = error(Forward::with_step(1e-3), 0.5);
        assert!(fine < coarse / 5.0);
        assert!(fine > coarse / 20.0);

        let coarse = error(Backward::with_step(1e-2), 0.5);
        let fine = error(Backward::with_step(1e-3), 0.5);
        assert!(fine < coarse / 5.0);
    }

    #[test]
    fn central_error_is_second_order() {
        let coarse = error(Central::with_step(1e-2), 0.5);
        let fine = error(Central::with_step(1e-3), 0.5);
        assert!(coarse < 1e-4);
        assert!(fine < 1e-6);
        assert!(fine < coarse / 50.0);
    }

    #[test]
    fn central_beats_one_sided_at_equal_step() {
        let h = 1e-3;
        assert!(error(Central::with_step(h), 0.5) < error(Forward::with_step(h), 0.5));
        assert!(error(Central::with_step(h), 0.5) < error(Backward::with_step(h), 0.5));
    }

    #[test]
    fn analytic_uses_supplied_derivative() {
        let equation = FnDiffEquation::new(|x: f64| x.sin(), |x: f64| x.cos());
        assert_abs_diff_eq!(Analytic.derivative(&equation, 1.0), 1.0f64.cos());
    }

    #[test]
    fn singular_function_propagates_non_finite_values() {
        let equation = FnEquation::new(|x: f64| 1.0 / x);
        let h = 1e-5;
        let forward = Forward::with_step(h).derivative(&equation, -h);
        assert!(!forward.is_finite());
        let central = Central::with_step(h).derivative(&equation, h);
        assert!(!central.is_finite());
    }
}
