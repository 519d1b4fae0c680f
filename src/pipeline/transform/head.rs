//! Head fragment injector.
//!
//! Inserts collected `<head>` fragments right before `</head>`.

use regex::Regex;
use std::sync::LazyLock;

use super::{base_indent, indent_block, insert_before_close};

pub(super) static HEAD_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^([ \t]*)<head(?:\s[^>]*)?>").unwrap());
static HEAD_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</head\s*>").unwrap());

/// Injects `<head>` fragments.
pub struct HeadInjector<'a> {
    fragments: &'a [String],
    indent: usize,
}

impl<'a> HeadInjector<'a> {
    pub fn new(fragments: &'a [String], indent: usize) -> Self {
        Self { fragments, indent }
    }

    pub fn inject(&self, html: &str) -> String {
        if self.fragments.is_empty() {
            return html.to_owned();
        }

        let base = base_indent(html, &HEAD_OPEN);
        let prefix = format!("{base}{}", " ".repeat(self.indent));
        let block = indent_block(self.fragments, &prefix);
        if block.is_empty() {
            return html.to_owned();
        }

        insert_before_close(html, &HEAD_CLOSE, &block, base)
    }
}
