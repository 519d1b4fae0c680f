//! Project configuration management for `veneer.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── layout     # [layout]
//! │   └── serve      # [serve]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # VeneerConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section    | Purpose                                          |
//! |------------|--------------------------------------------------|
//! | `[build]`  | Input/output directories, asset copying          |
//! | `[layout]` | Layout file names, fragment indent, module cache |
//! | `[serve]`  | Development server (interface, port)             |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{BuildConfig, LayoutConfig, ServeConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::cli::{Cli, Commands};
use crate::log;
use crate::utils::path::normalize_path;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing veneer.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VeneerConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl VeneerConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file; its parent directory is
    /// the project root. Without a config file the defaults apply relative
    /// to cwd, unless a non-default file name was requested explicitly.
    pub fn load(cli: &Cli) -> Result<Self> {
        crate::logger::set_verbose(cli.is_verbose());
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None if cli.config != Path::new(Self::DEFAULT_FILE) => {
                bail!(ConfigError::Validation(format!(
                    "config file '{}' not found",
                    cli.config.display()
                )));
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", Self::DEFAULT_FILE);
                Self {
                    config_path: cwd.join(&cli.config),
                    ..Self::default()
                }
            }
        };

        let root = config
            .config_path
            .parent()
            .map_or_else(|| cwd.clone(), Path::to_path_buf);
        config.finalize(cli, &root);
        config.validate()?;

        Ok(config)
    }

    pub const DEFAULT_FILE: &'static str = "veneer.toml";

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli, root: &Path) {
        Self::update_option(&mut self.build.input, cli.input.as_ref());
        self.apply_command_options(cli);
        self.normalize_paths(root);
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { build_args } => {
                Self::update_option(&mut self.build.output, build_args.output.as_ref());
                self.build.clean = build_args.clean;
            }
            Commands::Serve {
                interface, port, ..
            } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            Commands::Resolve { .. } => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Normalize all paths relative to root directory.
    fn normalize_paths(&mut self, root: &Path) {
        let root = normalize_path(root);
        self.config_path = normalize_path(&self.config_path);
        self.build.input = normalize_path(&root.join(&self.build.input));
        self.build.output = normalize_path(&root.join(&self.build.output));
        self.layout.normalize(&root);
        self.root = root;
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, collecting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.build.validate(&mut diag);
        self.layout.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> VeneerConfig {
    let (parsed, ignored) = VeneerConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(VeneerConfig::from_str("[build\ninput = \"site\"").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = VeneerConfig::default();
        assert_eq!(config.get_root(), Path::new(""));
        assert_eq!(config.build.input, PathBuf::from("site"));
        assert_eq!(config.serve.port, 5277);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[build]\ninput = \"www\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = VeneerConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.build.input, PathBuf::from("www"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_finalize_applies_cli_and_normalizes() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir(root.join("www")).unwrap();

        let cli = Cli::try_parse_from([
            "veneer", "--input", "www", "build", "-c", "-o", "public",
        ])
        .unwrap();
        let mut config = VeneerConfig {
            config_path: root.join("veneer.toml"),
            ..VeneerConfig::default()
        };
        config.finalize(&cli, root);

        let root = normalize_path(root);
        assert_eq!(config.get_root(), root);
        assert_eq!(config.build.input, root.join("www"));
        assert_eq!(config.build.output, root.join("public"));
        assert!(config.build.clean);
        assert_eq!(config.root_relative(root.join("www/a.html")), PathBuf::from("www/a.html"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from(["veneer", "serve", "-p", "9000", "-i", "0.0.0.0"]).unwrap();
        let mut config = VeneerConfig::default();
        config.apply_command_options(&cli);
        assert_eq!(config.serve.port, 9000);
        assert_eq!(config.serve.interface.to_string(), "0.0.0.0");
        assert_eq!(config.build.output, PathBuf::from("dist"));
    }
}
