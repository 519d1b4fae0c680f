use anyhow::Result;
use clap::{ColorChoice, Parser};
use veneer::{
    cli::{self, Cli, Commands},
    config::{VeneerConfig, init_config},
    core,
};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = init_config(VeneerConfig::load(&cli)?);

    match &cli.command {
        Commands::Build { .. } => cli::build::build_site(&config, false),
        Commands::Serve { .. } => cli::serve::serve(),
        Commands::Resolve { html } => cli::resolve::resolve_chain(html, &config),
    }
}
