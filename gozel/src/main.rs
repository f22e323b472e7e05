//! Gozel - cross-compiles Go modules into native variants
//!
//! Usage:
//!   gozel list                          List variants from golang.yml
//!   gozel plan <variant> [--format json] Show the go invocation for a variant
//!   gozel build [variant...] [-j N]      Build variants

mod commands;

use clap::Parser;
use commands::{Cli, Commands};
use std::process;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "gozel=debug,convenient_golang=debug"
    } else {
        "gozel=info,convenient_golang=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let result = match cli.command {
        Commands::List => commands::list::execute(&cli.config).await,
        Commands::Plan { variant, format } => {
            commands::plan::execute(&cli.config, &variant, format).await
        }
        Commands::Build { variants, jobs } => {
            let jobs = jobs.unwrap_or_else(num_cpus::get);
            commands::build::execute(&cli.config, &variants, jobs).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
