use crate::config::SolverSettings;
use root_eq::{
    Analytic, Backward, Central, DiffEquation, Forward, RootEquation, Solution, SolveError,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;
use std::fmt;

pub type Outcome = Result<Solution<f64>, SolveError<f64>>;

/// `2^x - x^2`, roots at about -0.767, 2 and 4.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerSquare;

impl RootEquation for PowerSquare {
    type Scalar = f64;

    fn root(&self, x: f64) -> f64 {
        2f64.powf(x) - x * x
    }
}

impl DiffEquation for PowerSquare {
    fn diff(&self, x: f64) -> f64 {
        2f64.powf(x) * LN_2 - 2.0 * x
    }
}

/// `tan(x) - 1/x`, singular at 0 and at every pole of the tangent.
#[derive(Debug, Clone, Copy, Default)]
pub struct TanReciprocal;

impl RootEquation for TanReciprocal {
    type Scalar = f64;

    fn root(&self, x: f64) -> f64 {
        x.tan() - x.recip()
    }
}

impl DiffEquation for TanReciprocal {
    fn diff(&self, x: f64) -> f64 {
        x.cos().powi(2).recip() + x.powi(2).recip()
    }
}

/// `tan(x) - 1/2`
#[derive(Debug, Clone, Copy, Default)]
pub struct TanHalf;

impl RootEquation for TanHalf {
    type Scalar = f64;

    fn root(&self, x: f64) -> f64 {
        x.tan() - 0.5
    }
}

impl DiffEquation for TanHalf {
    fn diff(&self, x: f64) -> f64 {
        x.cos().powi(2).recip()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Problem {
    PowerSquare,
    TanReciprocal,
    TanHalf,
}

impl Problem {
    pub const ALL: [Self; 3] = [Self::PowerSquare, Self::TanReciprocal, Self::TanHalf];

    pub fn title(&self) -> &'static str {
        match self {
            Self::PowerSquare => "2^x = x^2 -> f(x) = 2^x - x^2",
            Self::TanReciprocal => "tan(x) = 1/x -> f(x) = tan(x) - 1/x",
            Self::TanHalf => "tan(x) = 1/2 -> f(x) = tan(x) - 1/2",
        }
    }

    pub fn default_guesses(&self) -> &'static [f64] {
        match self {
            Self::PowerSquare => &[-0.8, 2.0, 4.0],
            Self::TanReciprocal => &[0.5, 4.5, 7.7, 10.9, 14.1],
            Self::TanHalf => &[0.4, 3.6],
        }
    }

    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Self::PowerSquare => PowerSquare.root(x),
            Self::TanReciprocal => TanReciprocal.root(x),
            Self::TanHalf => TanHalf.root(x),
        }
    }

    pub fn solve(&self, method: Method, guess: f64, settings: &SolverSettings) -> Outcome {
        match self {
            Self::PowerSquare => method.solve(PowerSquare, guess, settings),
            Self::TanReciprocal => method.solve(TanReciprocal, guess, settings),
            Self::TanHalf => method.solve(TanHalf, guess, settings),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PowerSquare => "power-square",
            Self::TanReciprocal => "tan-reciprocal",
            Self::TanHalf => "tan-half",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    Forward,
    Backward,
    Central,
    Analytic,
}

impl Method {
    pub const ALL: [Self; 4] = [Self::Forward, Self::Backward, Self::Central, Self::Analytic];

    pub fn solve<Eq>(&self, equation: Eq, guess: f64, settings: &SolverSettings) -> Outcome
    where
        Eq: DiffEquation<Scalar = f64>,
    {
        let step = settings.step;
        match self {
            Self::Forward => settings.solver(equation, Forward::with_step(step)).solve(guess),
            Self::Backward => settings.solver(equation, Backward::with_step(step)).solve(guess),
            Self::Central => settings.solver(equation, Central::with_step(step)).solve(guess),
            Self::Analytic => settings.solver(equation, Analytic).solve(guess),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Forward => "Forward",
            Self::Backward => "Backward",
            Self::Central => "Central",
            Self::Analytic => "Analytic",
        };
        f.pad(name)
    }
}
