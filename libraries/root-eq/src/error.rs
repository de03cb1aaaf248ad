use thiserror::Error;

/// Ways a Newton-Raphson solve can stop without finding a root.
///
/// Both variants carry the iteration count and the last estimate so the caller can decide
/// whether to retry from another starting point.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SolveError<S> {
    #[error("Derivative too small ({derivative}) at x = {x} after {iterations} iterations")]
    SingularDerivative {
        x: S,
        derivative: S,
        iterations: usize,
    },
    #[error("Did not converge after {iterations} iterations; last x = {last}")]
    NotConverged { last: S, iterations: usize },
}

impl<S: Copy> SolveError<S> {
    pub fn iterations(&self) -> usize {
        match self {
            Self::SingularDerivative { iterations, .. } | Self::NotConverged { iterations, .. } => {
                *iterations
            }
        }
    }

    pub fn last_estimate(&self) -> S {
        match self {
            Self::SingularDerivative { x, .. } => *x,
            Self::NotConverged { last, .. } => *last,
        }
    }
}
