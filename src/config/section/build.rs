//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! input = "site"      # HTML documents and layout scripts
//! output = "dist"     # Build output directory
//! assets = true       # Copy non-HTML files into the output
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{ConfigDiagnostics, FieldPath};

/// Build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory holding HTML documents; also the layout root.
    pub input: PathBuf,

    /// Directory receiving transformed documents.
    pub output: PathBuf,

    /// Copy files other than HTML and layout scripts.
    pub assets: bool,

    /// Clean output directory before building (CLI only).
    #[serde(skip)]
    pub clean: bool,
}

impl BuildConfig {
    pub const INPUT: FieldPath = FieldPath::new("build.input");
    pub const OUTPUT: FieldPath = FieldPath::new("build.output");

    /// Validate normalized (absolute) paths.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.input.is_dir() {
            diag.error_with_hint(
                Self::INPUT,
                format!("input directory `{}` does not exist", self.input.display()),
                "create it or point `build.input` at your HTML directory",
            );
        }

        if self.output == self.input {
            diag.error(Self::OUTPUT, "output directory must differ from input");
        } else if self.input.starts_with(&self.output) {
            diag.error_with_hint(
                Self::OUTPUT,
                "output directory must not contain the input directory",
                "cleaning the output would delete your sources",
            );
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input: "site".into(),
            output: "dist".into(),
            assets: true,
            clean: false,
        }
    }
}
