use clap::Parser;
use solscout::{config::DEFAULT_PROJECT_ROOT, Project, ProjectPathsConfig};
use std::{io, path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;
use yansi::Paint;

#[derive(Debug, Parser)]
#[command(name = "solscout", version, about = "Compile a Solidity project and analyze it")]
struct Opts {
    /// The project root
    #[arg(short, long, default_value = DEFAULT_PROJECT_ROOT)]
    project: PathBuf,
    /// Use a truffle project as base
    #[arg(short, long)]
    truffle: bool,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    let filter = if opts.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let paths = if opts.truffle {
        ProjectPathsConfig::truffle(&opts.project)
    } else {
        ProjectPathsConfig::plain(&opts.project)
    };
    let project = Project::builder().paths(paths).build();

    match project.run(&mut io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", Paint::red(&err));
            ExitCode::FAILURE
        }
    }
}
