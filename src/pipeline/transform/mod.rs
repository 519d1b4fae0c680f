//! Text-level HTML splicing.
//!
//! Injection sites:
//!
//! - `head`: fragments before `</head>`
//! - `body`: fragments right after `<body …>` and before `</body>`
//!
//! Fragments are indented one level deeper than the opening tag of their
//! section. An empty fragment sequence leaves its site untouched.

mod body;
mod head;

use regex::Regex;

pub use body::BodyInjector;
pub use head::HeadInjector;

use crate::layout::Fragments;

/// Default indentation width for injected fragments.
pub const DEFAULT_INDENT: usize = 2;

/// Splice all collected fragments into `html`.
pub fn splice(html: &str, fragments: &Fragments, indent: usize) -> String {
    let html = HeadInjector::new(&fragments.head, indent).inject(html);
    BodyInjector::new(&fragments.body_start, &fragments.body_end, indent).inject(&html)
}

/// Leading whitespace of the line holding the first match of `open`
/// (capture group 1), or `""` when the tag is absent or not line-leading.
fn base_indent<'a>(html: &'a str, open: &Regex) -> &'a str {
    open.captures(html)
        .and_then(|c| c.get(1))
        .map_or("", |m| m.as_str())
}

/// Indent every fragment, then join them into one block.
///
/// Each fragment loses its own leading and trailing blank lines; fragments
/// left empty are dropped. Inner blank lines stay empty instead of carrying
/// trailing whitespace.
fn indent_block(fragments: &[String], prefix: &str) -> String {
    fragments
        .iter()
        .filter_map(|fragment| indent_fragment(fragment, prefix))
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent_fragment(fragment: &str, prefix: &str) -> Option<String> {
    let lines: Vec<&str> = fragment.lines().collect();
    let first = lines.iter().position(|l| !l.trim().is_empty())?;
    let last = lines.iter().rposition(|l| !l.trim().is_empty())?;

    let indented = lines[first..=last]
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    Some(indented)
}

/// Insert `block` before the first match of `close`.
///
/// A closing tag on its own line is re-emitted at `indent`; one sharing its
/// line with other content is moved to a fresh line.
fn insert_before_close(html: &str, close: &Regex, block: &str, indent: &str) -> String {
    let Some(tag) = close.find(html) else {
        return html.to_owned();
    };

    let line_start = html[..tag.start()].rfind('\n').map_or(0, |i| i + 1);
    let own_line = html[line_start..tag.start()].trim().is_empty();

    let mut out = String::with_capacity(html.len() + block.len() + indent.len() + 2);
    if own_line {
        out.push_str(&html[..line_start]);
    } else {
        out.push_str(&html[..tag.start()]);
        out.push('\n');
    }
    out.push_str(block);
    out.push('\n');
    out.push_str(indent);
    out.push_str(tag.as_str());
    out.push_str(&html[tag.end()..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(head: &[&str], start: &[&str], end: &[&str]) -> Fragments {
        let own = |v: &[&str]| v.iter().map(|s| (*s).to_owned()).collect();
        Fragments {
            head: own(head),
            body_start: own(start),
            body_end: own(end),
        }
    }

    #[test]
    fn test_two_head_fragments() {
        let out = splice("<head>\n</head>", &fragments(&["a", "b"], &[], &[]), 2);
        assert_eq!(out, "<head>\n  a\n  b\n</head>");
    }

    #[test]
    fn test_no_fragments_is_identity() {
        let html = "<html>\n  <head>\n  </head>\n  <body>\n  </body>\n</html>\n";
        assert_eq!(splice(html, &Fragments::default(), 2), html);
    }

    #[test]
    fn test_full_document() {
        let html = "\
<!DOCTYPE html>
<html>
  <head>
    <title>x</title>
  </head>
  <body>
    <p>hi</p>
  </body>
</html>
";
        let out = splice(
            html,
            &fragments(&["<meta charset=\"utf-8\" />"], &["<nav></nav>"], &["<script></script>"]),
            2,
        );
        assert_eq!(
            out,
            "\
<!DOCTYPE html>
<html>
  <head>
    <title>x</title>
    <meta charset=\"utf-8\" />
  </head>
  <body>
    <nav></nav>
    <p>hi</p>
    <script></script>
  </body>
</html>
"
        );
    }

    #[test]
    fn test_inline_close_tag_moves_to_new_line() {
        let out = splice(
            "<head><title>x</title></head><body></body>",
            &fragments(&["a"], &[], &["z"]),
            2,
        );
        assert_eq!(out, "<head><title>x</title>\n  a\n</head><body>\n  z\n</body>");
    }

    #[test]
    fn test_case_insensitive_tags() {
        let out = splice("<HEAD>\n</HEAD>", &fragments(&["a"], &[], &[]), 4);
        assert_eq!(out, "<HEAD>\n    a\n</HEAD>");
    }

    #[test]
    fn test_missing_sites_unchanged() {
        let html = "<p>fragment only</p>";
        assert_eq!(splice(html, &fragments(&["a"], &["b"], &["c"]), 2), html);
    }

    #[test]
    fn test_indent_block_trims_blank_edges() {
        let block = indent_block(&["\n<div>\n\n  <p></p>\n</div>\n".to_owned()], "  ");
        assert_eq!(block, "  <div>\n\n    <p></p>\n  </div>");
        assert_eq!(indent_block(&["   ".to_owned()], "  "), "");
    }

    #[test]
    fn test_blank_edges_trimmed_per_fragment() {
        let out = splice("<head>\n</head>", &fragments(&["<a>\n\n", "\n<b>"], &[], &[]), 2);
        assert_eq!(out, "<head>\n  <a>\n  <b>\n</head>");
    }

    #[test]
    fn test_blank_fragment_dropped_between_others() {
        let block = indent_block(
            &["<a>".to_owned(), " \n\n".to_owned(), "<p>\n\n</p>\n".to_owned()],
            "  ",
        );
        assert_eq!(block, "  <a>\n  <p>\n\n  </p>");
    }

    #[test]
    fn test_header_tag_not_mistaken_for_head() {
        assert_eq!(base_indent("    <header>\n  <head>", &head::HEAD_OPEN), "  ");
    }
}
