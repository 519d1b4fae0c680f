//! Layout execution errors.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while loading or invoking a layout script.
///
/// This is the error object handed to registered error handlers.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Lua(#[from] mlua::Error),

    #[error("layout `{}` must return a function, found {found}", path.display())]
    NotAFunction { path: PathBuf, found: &'static str },

    #[error("failed to cache layout module `{}`", path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
