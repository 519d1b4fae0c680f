//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Inject layout-script generated fragments into static HTML
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Input directory holding HTML and layout scripts (relative to project root)
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub input: Option<PathBuf>,

    /// Config file path (default: veneer.toml)
    #[arg(short = 'C', long, default_value = "veneer.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Transform every HTML document into the output directory
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Serve the input directory, transforming HTML per request
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable verbose output for debugging
        #[arg(short = 'V', long)]
        verbose: bool,
    },

    /// Print the layout chain of an HTML document
    #[command(visible_alias = "r")]
    Resolve {
        /// HTML document (relative to the current directory)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        html: PathBuf,
    },
}

/// Build command arguments
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Clean output directory completely before building
    #[arg(short, long)]
    pub clean: bool,

    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }

    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }

    pub const fn is_verbose(&self) -> bool {
        match &self.command {
            Commands::Build { build_args } => build_args.verbose,
            Commands::Serve { verbose, .. } => *verbose,
            Commands::Resolve { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from(["veneer", "build", "-c", "-o", "out", "-V"]).unwrap();
        let Commands::Build { build_args } = &cli.command else {
            panic!("expected build");
        };
        assert!(build_args.clean);
        assert_eq!(build_args.output.as_deref(), Some(std::path::Path::new("out")));
        assert!(cli.is_verbose());
        assert_eq!(cli.config, PathBuf::from("veneer.toml"));
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["veneer", "-C", "site.toml", "s", "-p", "8080"]).unwrap();
        assert!(cli.is_serve());
        let Commands::Serve { port, interface, .. } = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(port, Some(8080));
        assert_eq!(interface, None);
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from(["veneer", "resolve", "site/index.html"]).unwrap();
        assert!(!cli.is_build() && !cli.is_verbose());
    }
}
