//! Command-line interface.
//!
//! - `args`: clap definitions
//! - `build`: one-shot build with the bundle loader
//! - `serve`: development server with the live loader
//! - `resolve`: layout chain diagnostics

mod args;
pub mod build;
pub mod resolve;
pub mod serve;

pub use args::{BuildArgs, Cli, Commands};
