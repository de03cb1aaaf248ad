use crate::app;
use crate::problems::{Method, Problem};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(clap::Parser)]
#[clap(about = "Newton-Raphson root finding with finite-difference derivatives")]
pub(crate) struct Cli {
    #[clap(subcommand)]
    command: CliCommand,
}

impl Cli {
    pub(crate) fn run(self) -> ExitCode {
        self.command.run()
    }
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Print the built-in configuration as YAML
    Dump,
    /// Compare derivative methods on every configured problem
    Run {
        /// YAML configuration; the built-in one is used when omitted
        #[clap(short, long)]
        config: Option<PathBuf>,
        /// Only run these methods
        #[clap(short, long, value_enum)]
        method: Vec<Method>,
    },
    /// Find a single root
    Solve {
        #[clap(short, long, value_enum)]
        problem: Problem,
        #[clap(short, long, allow_hyphen_values = true)]
        guess: f64,
        #[clap(short, long, value_enum, default_value_t = Method::Central)]
        method: Method,
        #[clap(short, long)]
        tolerance: Option<f64>,
        #[clap(long)]
        max_iterations: Option<usize>,
        #[clap(long)]
        step: Option<f64>,
    },
}

impl CliCommand {
    fn run(self) -> ExitCode {
        match self {
            Self::Dump => app::dump(),
            Self::Run { config, method } => app::run(app::RunSettings {
                config,
                methods: method,
            }),
            Self::Solve {
                problem,
                guess,
                method,
                tolerance,
                max_iterations,
                step,
            } => app::solve(app::SolveSettings {
                problem,
                guess,
                method,
                tolerance,
                max_iterations,
                step,
            }),
        }
    }
}
