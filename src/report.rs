use crate::config::Settings;
use crate::problems::{Method, Outcome, Problem};
use root_eq::SolveError;
use std::fmt;
use tracing::info;

const WIDTH: usize = 70;

#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub method: Method,
    pub outcome: Outcome,
}

/// All methods tried from a single initial guess.
#[derive(Debug, Clone, PartialEq)]
pub struct GuessReport {
    pub guess: f64,
    pub trials: Vec<Trial>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProblemReport {
    pub problem: Problem,
    pub guesses: Vec<GuessReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub problems: Vec<ProblemReport>,
}

impl Report {
    pub fn run(settings: &Settings) -> Self {
        let problems = settings
            .problems
            .iter()
            .map(|config| {
                info!(
                    "Solving {} from {} initial guesses",
                    config.problem,
                    config.guesses.len()
                );
                let guesses = config
                    .guesses
                    .iter()
                    .map(|&guess| GuessReport {
                        guess,
                        trials: settings
                            .methods
                            .iter()
                            .map(|&method| Trial {
                                method,
                                outcome: config.problem.solve(method, guess, &settings.solver),
                            })
                            .collect(),
                    })
                    .collect();
                ProblemReport {
                    problem: config.problem,
                    guesses,
                }
            })
            .collect();
        Self { problems }
    }
}

fn write_trial(f: &mut fmt::Formatter, problem: Problem, trial: &Trial) -> fmt::Result {
    write!(f, "  {:<9}: ", trial.method)?;
    match &trial.outcome {
        Ok(solution) => writeln!(
            f,
            "x* = {:10.8} | f(x*) = {:9.2e} | iterations: {}",
            solution.root,
            problem.eval(solution.root),
            solution.iterations
        ),
        Err(SolveError::SingularDerivative { x, iterations, .. }) => writeln!(
            f,
            "derivative too small at x = {x:.8} (iteration {iterations})"
        ),
        Err(SolveError::NotConverged { last, iterations }) => writeln!(
            f,
            "did not converge after {iterations} iterations, last x = {last:.8}"
        ),
    }
}

impl fmt::Display for ProblemReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(WIDTH))?;
        writeln!(f, "{}", self.problem.title())?;
        writeln!(f, "{}", "=".repeat(WIDTH))?;
        for (i, guess) in self.guesses.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Root {} (initial guess: {})", i + 1, guess.guess)?;
            writeln!(f, "{}", "-".repeat(30))?;
            for trial in &guess.trials {
                write_trial(f, self.problem, trial)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Summary (iterations until convergence):")?;
        for (i, guess) in self.guesses.iter().enumerate() {
            let parts = guess
                .trials
                .iter()
                .map(|trial| match &trial.outcome {
                    Ok(solution) => format!("{} ({})", trial.method, solution.iterations),
                    Err(_) => format!("{} (failed)", trial.method),
                })
                .collect::<Vec<_>>();
            writeln!(f, "  Root {}: {}", i + 1, parts.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, problem) in self.problems.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{problem}")?;
        }
        Ok(())
    }
}
