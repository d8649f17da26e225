//! Mooring CLI - project resolution for Go web framework applications

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use mooring::core::Operation;
use mooring::util::diagnostic::{emit, emit_error, suggestions};
use mooring::{GlobalContext, ResolveError};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;
    let verbose = cli.verbose;

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ResolveError>() {
            Some(err) => {
                let mut diag = err.to_diagnostic();
                if !verbose {
                    diag = diag.with_suggestion(suggestions::VERBOSE);
                }
                emit(&diag, color);
            }
            None => emit_error(&format!("{:#}", e), &[], &[], color),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("mooring=debug")
    } else {
        EnvFilter::new("mooring=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let gctx = GlobalContext::new()?;

    let json = cli.json;
    match cli.command {
        Commands::New(args) => commands::new::execute(&gctx, args, json),
        Commands::Run(args) => commands::resolve::execute(&gctx, Operation::Run, args, json),
        Commands::Build(args) => commands::resolve::execute(&gctx, Operation::Build, args, json),
        Commands::Package(args) => {
            commands::resolve::execute(&gctx, Operation::Package, args, json)
        }
        Commands::Clean(args) => commands::resolve::execute(&gctx, Operation::Clean, args, json),
        Commands::Test(args) => commands::resolve::execute(&gctx, Operation::Test, args, json),
        Commands::Version(args) => commands::version::execute(&gctx, args, json),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
