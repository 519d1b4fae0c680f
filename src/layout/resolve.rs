//! Layout discovery.
//!
//! For `site/blog/post.html` with root `site/`:
//!
//! ```text
//! site/global.layout.lua        (global, if present)
//! site/blog/global.layout.lua   (global, if present)
//! site/blog/post.layout.lua     (specific, existence checked at execution)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

/// Conventional layout file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutNames {
    /// File name of a global layout, looked up in every ancestor directory.
    pub global: String,
    /// Extension replacing `html` for a document's specific layout.
    pub extension: String,
}

impl LayoutNames {
    pub const DEFAULT_GLOBAL: &'static str = "global.layout.lua";
    pub const DEFAULT_EXTENSION: &'static str = "layout.lua";

    pub fn new(global: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            global: global.into(),
            extension: extension.into(),
        }
    }

    /// Whether `path` names a layout script (global or specific).
    pub fn is_layout_script(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| {
                name == self.global
                    || name
                        .strip_suffix(self.extension.as_str())
                        .is_some_and(|stem| stem.len() > 1 && stem.ends_with('.'))
            })
    }
}

impl Default for LayoutNames {
    fn default() -> Self {
        Self::new(Self::DEFAULT_GLOBAL, Self::DEFAULT_EXTENSION)
    }
}

/// Scope of a layout script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutRole {
    /// Applies to every document under its directory.
    Global,
    /// Applies to exactly one document.
    Specific,
}

impl fmt::Display for LayoutRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Global => "global",
            Self::Specific => "specific",
        })
    }
}

/// A layout script to execute for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutScript {
    pub path: PathBuf,
    pub role: LayoutRole,
}

impl LayoutScript {
    pub fn global(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            role: LayoutRole::Global,
        }
    }

    pub fn specific(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            role: LayoutRole::Specific,
        }
    }
}

/// Resolve the ordered layout chain for an HTML document.
///
/// Global layouts are collected while walking from the document's directory
/// up to `root` (inclusive) and returned root-to-leaf. The walk also stops at
/// the filesystem root, so documents outside `root` terminate safely. The
/// specific layout is always last.
pub fn resolve_layouts(html_path: &Path, root: &Path, names: &LayoutNames) -> Vec<LayoutScript> {
    let mut layouts = Vec::new();

    let mut current = html_path.parent();
    while let Some(dir) = current {
        let candidate = dir.join(&names.global);
        if candidate.is_file() {
            layouts.push(LayoutScript::global(candidate));
        }

        if dir == root {
            break;
        }
        current = dir.parent();
    }

    // Walk was leaf-to-root, ancestors must run first.
    layouts.reverse();
    layouts.push(LayoutScript::specific(specific_layout_path(
        html_path, names,
    )));
    layouts
}

/// `page.html` → `page.<extension>`
pub fn specific_layout_path(html_path: &Path, names: &LayoutNames) -> PathBuf {
    html_path.with_extension(&names.extension)
}
