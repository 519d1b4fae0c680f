//! Body fragment injector.
//!
//! Inserts `body_start` fragments right after the opening `<body …>` tag and
//! `body_end` fragments right before `</body>`.

use regex::Regex;
use std::sync::LazyLock;

use super::{base_indent, indent_block, insert_before_close};

static BODY_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^([ \t]*)<body(?:\s[^>]*)?>").unwrap());
static BODY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<body(?:\s[^>]*)?>").unwrap());
static BODY_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</body\s*>").unwrap());

/// Injects `<body>` fragments at both ends.
pub struct BodyInjector<'a> {
    start: &'a [String],
    end: &'a [String],
    indent: usize,
}

impl<'a> BodyInjector<'a> {
    pub fn new(start: &'a [String], end: &'a [String], indent: usize) -> Self {
        Self { start, end, indent }
    }

    pub fn inject(&self, html: &str) -> String {
        if self.start.is_empty() && self.end.is_empty() {
            return html.to_owned();
        }

        let base = base_indent(html, &BODY_OPEN).to_owned();
        let prefix = format!("{base}{}", " ".repeat(self.indent));

        let html = self.inject_start(html, &prefix);
        let block = indent_block(self.end, &prefix);
        if block.is_empty() {
            return html;
        }
        insert_before_close(&html, &BODY_CLOSE, &block, &base)
    }

    fn inject_start(&self, html: &str, prefix: &str) -> String {
        let block = indent_block(self.start, prefix);
        let Some(tag) = BODY_TAG.find(html).filter(|_| !block.is_empty()) else {
            return html.to_owned();
        };

        let rest = &html[tag.end()..];
        let mut out = String::with_capacity(html.len() + block.len() + 2);
        out.push_str(&html[..tag.end()]);
        out.push('\n');
        out.push_str(&block);
        if !rest.starts_with('\n') {
            out.push('\n');
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn own(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_start_after_open_tag_with_attrs() {
        let start = own(&["<div id=\"app\"></div>"]);
        let out = BodyInjector::new(&start, &[], 2).inject("<body class=\"x\">\n  <p></p>\n</body>");
        assert_eq!(
            out,
            "<body class=\"x\">\n  <div id=\"app\"></div>\n  <p></p>\n</body>"
        );
    }

    #[test]
    fn test_start_on_same_line_content() {
        let start = own(&["a"]);
        let out = BodyInjector::new(&start, &[], 2).inject("<body><p></p></body>");
        assert_eq!(out, "<body>\n  a\n<p></p></body>");
    }

    #[test]
    fn test_end_order_preserved() {
        let end = own(&["<script src=\"/1.js\"></script>", "<script src=\"/2.js\"></script>"]);
        let out = BodyInjector::new(&[], &end, 2).inject("  <body>\n  </body>");
        assert_eq!(
            out,
            "  <body>\n    <script src=\"/1.js\"></script>\n    <script src=\"/2.js\"></script>\n  </body>"
        );
    }

    #[test]
    fn test_bodyless_document_unchanged() {
        let start = own(&["a"]);
        let html = "<p>no body</p>";
        assert_eq!(BodyInjector::new(&start, &start, 2).inject(html), html);
    }
}
