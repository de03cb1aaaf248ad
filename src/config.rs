use crate::error::ConfigError;
use crate::problems::{Method, Problem};
use root_eq::{
    NewtonRaphson, RootEquation, DEFAULT_MAX_ITERATIONS, DEFAULT_SINGULAR_THRESHOLD, DEFAULT_STEP,
    DEFAULT_TOLERANCE,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SolverSettings {
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Finite-difference step, ignored by the analytic method.
    pub step: f64,
    pub singular_threshold: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            step: DEFAULT_STEP,
            singular_threshold: DEFAULT_SINGULAR_THRESHOLD,
        }
    }
}

impl SolverSettings {
    pub fn solver<Eq, D>(&self, equation: Eq, derivative: D) -> NewtonRaphson<Eq, D>
    where
        Eq: RootEquation<Scalar = f64>,
    {
        NewtonRaphson::new(equation, derivative)
            .with_tolerance(self.tolerance)
            .with_max_iterations(self.max_iterations)
            .with_singular_threshold(self.singular_threshold)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("tolerance", self.tolerance),
            ("step", self.step),
            ("singular-threshold", self.singular_threshold),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidSetting(
                    name,
                    format!("expected a positive number, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProblemConfig {
    pub problem: Problem,
    pub guesses: Vec<f64>,
}

impl From<Problem> for ProblemConfig {
    fn from(problem: Problem) -> Self {
        Self {
            problem,
            guesses: problem.default_guesses().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    #[serde(default)]
    pub solver: SolverSettings,
    #[serde(default = "default_methods")]
    pub methods: Vec<Method>,
    pub problems: Vec<ProblemConfig>,
}

fn default_methods() -> Vec<Method> {
    Method::ALL.to_vec()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            solver: SolverSettings::default(),
            methods: default_methods(),
            problems: Problem::ALL.into_iter().map(ProblemConfig::from).collect(),
        }
    }
}

impl FromStr for Settings {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let settings: Self = serde_yaml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading settings from {}", path.display());
        fs::read_to_string(path)?.parse()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.solver.validate()?;
        if self.methods.is_empty() {
            return Err(ConfigError::InvalidSetting(
                "methods",
                "at least one method is required".to_string(),
            ));
        }
        if self.problems.is_empty() {
            return Err(ConfigError::InvalidSetting(
                "problems",
                "at least one problem is required".to_string(),
            ));
        }
        if let Some(config) = self.problems.iter().find(|p| p.guesses.is_empty()) {
            return Err(ConfigError::InvalidSetting(
                "guesses",
                format!("no initial guesses for {}", config.problem),
            ));
        }
        for config in &self.problems {
            if let Some(guess) = config.guesses.iter().find(|g| !g.is_finite()) {
                return Err(ConfigError::InvalidSetting(
                    "guesses",
                    format!("initial guess {guess} for {} is not finite", config.problem),
                ));
            }
        }
        Ok(())
    }
}
