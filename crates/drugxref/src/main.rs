use anyhow::Result;
use clap::Parser;

use drugxref::cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    dispatch(cli.command)
}

fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            drugs,
            publications,
            trials,
            out_dir,
        } => drugxref::cli::run::run(&drugs, &publications, &trials, &out_dir),
        Commands::Validate { kind, files } => drugxref::cli::validate::run(&kind, &files),
        Commands::TopJournal { artifact } => drugxref::cli::journal::run(&artifact),
        Commands::Push { local, key, bucket } => {
            drugxref::cli::transfer::run_push(&local, &key, &bucket)
        }
        Commands::Pull { key, local, bucket } => {
            drugxref::cli::transfer::run_pull(&key, &local, &bucket)
        }
    }
}
