//! `[layout]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [layout]
//! global = "global.layout.lua"   # Global layout file name
//! extension = "layout.lua"       # Specific layout: page.html -> page.layout.lua
//! indent = 2                     # Extra indentation of injected fragments
//! cache_dir = "~/.cache/veneer"  # Checked layout modules (default: OS temp dir)
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cache::ModuleCache;
use crate::config::{ConfigDiagnostics, FieldPath};
use crate::layout::LayoutNames;
use crate::pipeline::DEFAULT_INDENT;

/// Layout script settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// File name of a directory's global layout.
    pub global: String,

    /// Extension replacing `html` for a document's specific layout.
    pub extension: String,

    /// Spaces added to the detected indentation of `<head>`/`<body>`.
    pub indent: usize,

    /// Directory for cached layout modules.
    pub cache_dir: Option<PathBuf>,
}

impl LayoutConfig {
    pub const GLOBAL: FieldPath = FieldPath::new("layout.global");
    pub const EXTENSION: FieldPath = FieldPath::new("layout.extension");
    pub const INDENT: FieldPath = FieldPath::new("layout.indent");

    pub const MAX_INDENT: usize = 16;

    pub fn names(&self) -> LayoutNames {
        LayoutNames::new(&self.global, &self.extension)
    }

    /// Configured cache directory, or the OS temp default.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(ModuleCache::default_dir)
    }

    /// Expand `~` and resolve a relative cache directory against `root`.
    pub fn normalize(&mut self, root: &Path) {
        if let Some(dir) = self.cache_dir.take() {
            let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
            let dir = PathBuf::from(expanded);
            self.cache_dir = Some(if dir.is_relative() { root.join(dir) } else { dir });
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, value) in [(Self::GLOBAL, &self.global), (Self::EXTENSION, &self.extension)] {
            if value.trim().is_empty() {
                diag.error(field, "must not be empty");
            } else if value.ends_with(".html") {
                diag.error(field, "must not end in `.html`");
            }
        }

        if self.extension.starts_with('.') {
            diag.error_with_hint(
                Self::EXTENSION,
                "must not start with `.`",
                format!("use `{}`", self.extension.trim_start_matches('.')),
            );
        }

        if self.indent > Self::MAX_INDENT {
            diag.error(
                Self::INDENT,
                format!("must be at most {} (got {})", Self::MAX_INDENT, self.indent),
            );
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            global: LayoutNames::DEFAULT_GLOBAL.to_owned(),
            extension: LayoutNames::DEFAULT_EXTENSION.to_owned(),
            indent: DEFAULT_INDENT,
            cache_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_layout_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.layout.names(), LayoutNames::default());
        assert_eq!(config.layout.indent, 2);
        assert_eq!(config.layout.cache_dir(), ModuleCache::default_dir());
    }

    #[test]
    fn test_layout_config_custom() {
        let config = test_parse_config(
            "[layout]\nglobal = \"_layout.lua\"\nextension = \"head.lua\"\nindent = 4",
        );
        assert_eq!(config.layout.names(), LayoutNames::new("_layout.lua", "head.lua"));
        assert_eq!(config.layout.indent, 4);
    }

    #[test]
    fn test_normalize_cache_dir() {
        let mut layout = LayoutConfig {
            cache_dir: Some(PathBuf::from(".cache/veneer")),
            ..LayoutConfig::default()
        };
        layout.normalize(Path::new("/srv/site"));
        assert_eq!(layout.cache_dir(), PathBuf::from("/srv/site/.cache/veneer"));

        let mut layout = LayoutConfig {
            cache_dir: Some(PathBuf::from("~/veneer")),
            ..LayoutConfig::default()
        };
        layout.normalize(Path::new("/srv/site"));
        assert!(layout.cache_dir().is_absolute() || std::env::var_os("HOME").is_none());
        assert!(!layout.cache_dir().starts_with("~"));
    }

    #[test]
    fn test_layout_validate() {
        let layout = LayoutConfig {
            global: String::new(),
            extension: ".page.html".to_owned(),
            indent: 32,
            cache_dir: None,
        };
        let mut diag = ConfigDiagnostics::new();
        layout.validate(&mut diag);

        let fields: Vec<_> = diag.errors().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                LayoutConfig::GLOBAL,
                LayoutConfig::EXTENSION,
                LayoutConfig::EXTENSION,
                LayoutConfig::INDENT,
            ]
        );

        let mut diag = ConfigDiagnostics::new();
        LayoutConfig::default().validate(&mut diag);
        assert!(diag.is_empty());
    }
}
