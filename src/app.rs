use crate::config::{Settings, SolverSettings};
use crate::error::ConfigError;
use crate::problems::{Method, Problem};
use crate::report::Report;
use root_eq::SolveError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Default)]
pub(crate) struct RunSettings {
    pub(crate) config: Option<PathBuf>,
    /// Overrides the configured methods when not empty.
    pub(crate) methods: Vec<Method>,
}

#[derive(Debug)]
pub(crate) struct SolveSettings {
    pub(crate) problem: Problem,
    pub(crate) guess: f64,
    pub(crate) method: Method,
    pub(crate) tolerance: Option<f64>,
    pub(crate) max_iterations: Option<usize>,
    pub(crate) step: Option<f64>,
}

impl SolveSettings {
    fn solver_settings(&self) -> Result<SolverSettings, ConfigError> {
        let defaults = SolverSettings::default();
        let settings = SolverSettings {
            tolerance: self.tolerance.unwrap_or(defaults.tolerance),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            step: self.step.unwrap_or(defaults.step),
            ..defaults
        };
        settings.validate()?;
        Ok(settings)
    }
}

pub(crate) fn get_settings(run: &RunSettings) -> Result<Settings, ConfigError> {
    let mut settings = match &run.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if !run.methods.is_empty() {
        settings.methods = run.methods.clone();
    }
    Ok(settings)
}

pub(crate) fn run(run: RunSettings) -> ExitCode {
    let settings = match get_settings(&run) {
        Ok(settings) => settings,
        Err(err) => {
            error!("Cannot load settings: {err}");
            return ExitCode::FAILURE;
        }
    };
    print!("{}", Report::run(&settings));
    ExitCode::SUCCESS
}

pub(crate) fn solve(solve: SolveSettings) -> ExitCode {
    let settings = match solve.solver_settings() {
        Ok(settings) => settings,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    info!(problem = %solve.problem, method = %solve.method, guess = solve.guess);
    match solve.problem.solve(solve.method, solve.guess, &settings) {
        Ok(solution) => {
            println!(
                "x* = {:.10} | f(x*) = {:.2e} | iterations: {}",
                solution.root,
                solve.problem.eval(solution.root),
                solution.iterations
            );
            ExitCode::SUCCESS
        }
        Err(err @ SolveError::SingularDerivative { .. }) => {
            println!("{err}; try another initial guess");
            ExitCode::FAILURE
        }
        Err(err @ SolveError::NotConverged { .. }) => {
            println!("{err}");
            ExitCode::FAILURE
        }
    }
}

pub(crate) fn dump() -> ExitCode {
    match serde_yaml::to_string(&Settings::default()) {
        Ok(yaml) => {
            print!("{yaml}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Cannot serialize settings: {err}");
            ExitCode::FAILURE
        }
    }
}
