//! HTML transform hook.
//!
//! Receives a document's text and location, runs its layout chain and
//! returns the decorated document. Layout failures never escape: the
//! worst case is the original text.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::layout::{LayoutNames, LayoutSession, Loader, resolve_layouts};
use crate::log;
use crate::pipeline::{DEFAULT_INDENT, splice};

/// Where the document being transformed lives.
#[derive(Debug, Clone, Copy)]
pub enum DocumentSource<'a> {
    /// Request path relative to the root, e.g. `/blog/post.html`.
    Url(&'a str),
    /// Filesystem path of the document.
    File(&'a Path),
}

impl DocumentSource<'_> {
    /// Filesystem path of the document under `root`.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        match self {
            Self::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or_default();
                root.join(path.trim_start_matches('/'))
            }
            Self::File(path) => path.to_path_buf(),
        }
    }
}

/// Everything the hook needs besides the HTML text.
#[derive(Debug, Clone)]
pub struct TransformRequest<'a> {
    pub root: &'a Path,
    pub source: DocumentSource<'a>,
    pub loader: &'a Loader,
    pub names: &'a LayoutNames,
    pub indent: usize,
}

impl<'a> TransformRequest<'a> {
    pub fn new(
        root: &'a Path,
        source: DocumentSource<'a>,
        loader: &'a Loader,
        names: &'a LayoutNames,
    ) -> Self {
        Self {
            root,
            source,
            loader,
            names,
            indent: DEFAULT_INDENT,
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// Decorate `html` with the fragments of its layout chain.
///
/// Non-HTML documents are returned unchanged.
pub fn transform_html<'h>(html: &'h str, req: &TransformRequest<'_>) -> Cow<'h, str> {
    let path = req.source.resolve(req.root);
    if path.extension().is_none_or(|ext| ext != "html") {
        return Cow::Borrowed(html);
    }

    let session = match LayoutSession::new(req.loader) {
        Ok(session) => session,
        Err(e) => {
            log!("error"; "failed to prepare layout runtime: {}", e);
            return Cow::Borrowed(html);
        }
    };

    session.run_all(&resolve_layouts(&path, req.root, req.names));

    let fragments = session.finish();
    if fragments.is_empty() {
        return Cow::Borrowed(html);
    }
    Cow::Owned(splice(html, &fragments, req.indent))
}
