//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Mooring - project resolution for Go web framework applications
#[derive(Parser)]
#[command(name = "mooring")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print the resolution as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new application directory
    New(NewArgs),

    /// Resolve an application for running
    Run(ResolveArgs),

    /// Resolve an application for building
    Build(ResolveArgs),

    /// Resolve an application for packaging
    Package(ResolveArgs),

    /// Resolve an application for cleaning
    Clean(ResolveArgs),

    /// Resolve an application for testing
    Test(ResolveArgs),

    /// Print tool, framework and toolchain versions
    Version(ResolveArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct NewArgs {
    /// Import path of the new application (e.g. github.com/you/app)
    pub import_path: String,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Import path or directory of the application (defaults to the current directory)
    #[arg(default_value = "")]
    pub import_path: String,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
