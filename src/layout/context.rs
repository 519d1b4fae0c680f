//! The mutable collection context handed to layout scripts.
//!
//! One [`LayoutContext`] exists per transform invocation. Fragment
//! sequences are append-only, so execution order is render order.

use std::fmt;
use std::rc::Rc;

use super::LayoutError;
use crate::html::{Attrs, CrossOrigin, attrs};

/// Callback notified when a layout fails.
pub type ErrorHandler = Rc<dyn Fn(&LayoutError)>;

/// Collected markup, ready for splicing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    /// Inserted before `</head>`.
    pub head: Vec<String>,
    /// Inserted right after `<body …>`.
    pub body_start: Vec<String>,
    /// Inserted before `</body>`.
    pub body_end: Vec<String>,
}

impl Fragments {
    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.body_start.is_empty() && self.body_end.is_empty()
    }
}

#[derive(Default)]
pub struct LayoutContext {
    fragments: Fragments,
    crossorigin: Option<CrossOrigin>,
    handlers: Vec<ErrorHandler>,
}

impl LayoutContext {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // head
    // ------------------------------------------------------------------------

    /// Append `<meta … />`.
    pub fn meta(&mut self, meta: impl Into<Attrs>) {
        let tag = render_tag("meta", &meta.into(), " />");
        self.fragments.head.push(tag);
    }

    /// Append `<link … />`, falling back to the default `crossorigin`.
    pub fn link(&mut self, link: impl Into<Attrs>) {
        let attrs = self.with_default_crossorigin(link.into());
        self.fragments.head.push(render_tag("link", &attrs, " />"));
    }

    /// Append `<script …></script>`, falling back to the default `crossorigin`.
    pub fn script(&mut self, script: impl Into<Attrs>) {
        let attrs = self.with_default_crossorigin(script.into());
        self.fragments
            .head
            .push(render_tag("script", &attrs, "></script>"));
    }

    /// Append markup to the head verbatim.
    pub fn raw(&mut self, html: impl Into<String>) {
        self.fragments.head.push(html.into());
    }

    /// Default `crossorigin` for later `link`/`script` calls.
    pub fn set_crossorigin(&mut self, value: CrossOrigin) {
        self.crossorigin = Some(value);
    }

    pub fn crossorigin(&self) -> Option<CrossOrigin> {
        self.crossorigin
    }

    fn with_default_crossorigin(&self, mut attrs: Attrs) -> Attrs {
        if !attrs.has("crossorigin")
            && let Some(value) = self.crossorigin
        {
            attrs.set("crossorigin", value);
        }
        attrs
    }

    // ------------------------------------------------------------------------
    // body
    // ------------------------------------------------------------------------

    pub fn body_start(&mut self, html: impl Into<String>) {
        self.fragments.body_start.push(html.into());
    }

    pub fn body_end(&mut self, html: impl Into<String>) {
        self.fragments.body_end.push(html.into());
    }

    // ------------------------------------------------------------------------
    // errors
    // ------------------------------------------------------------------------

    /// Register a handler for failures of this or any later layout.
    pub fn on_error(&mut self, handler: impl Fn(&LayoutError) + 'static) {
        self.handlers.push(Rc::new(handler));
    }

    /// Snapshot of the registered handlers, in registration order.
    ///
    /// Handlers may append to the context themselves, so callers invoke the
    /// snapshot instead of iterating while borrowed.
    pub fn handlers(&self) -> Vec<ErrorHandler> {
        self.handlers.clone()
    }

    // ------------------------------------------------------------------------
    // output
    // ------------------------------------------------------------------------

    pub fn fragments(&self) -> &Fragments {
        &self.fragments
    }

    /// Take the collected fragments and drop every handler.
    pub fn finish(&mut self) -> Fragments {
        self.handlers.clear();
        std::mem::take(&mut self.fragments)
    }
}

impl fmt::Debug for LayoutContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutContext")
            .field("fragments", &self.fragments)
            .field("crossorigin", &self.crossorigin)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

fn render_tag(name: &str, map: &Attrs, close: &str) -> String {
    let rendered = attrs(map);
    if rendered.is_empty() {
        format!("<{name}{close}")
    } else {
        format!("<{name} {rendered}{close}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{LinkAttrs, ScriptAttrs};
    use crate::meta;
    use std::cell::RefCell;

    #[test]
    fn test_head_tags() {
        let mut ctx = LayoutContext::new();
        ctx.meta(meta::charset("utf-8"));
        ctx.link(LinkAttrs::stylesheet("/main.css"));
        ctx.script(ScriptAttrs {
            defer: true,
            ..ScriptAttrs::src("/app.js")
        });
        ctx.raw("<style>body{}</style>");

        assert_eq!(
            ctx.fragments().head,
            vec![
                r#"<meta charset="utf-8" />"#,
                r#"<link rel="stylesheet" href="/main.css" />"#,
                r#"<script src="/app.js" defer></script>"#,
                "<style>body{}</style>",
            ]
        );
    }

    #[test]
    fn test_default_crossorigin_not_retroactive() {
        let mut ctx = LayoutContext::new();
        ctx.link(LinkAttrs::stylesheet("/before.css"));
        ctx.set_crossorigin(CrossOrigin::Anonymous);
        ctx.link(LinkAttrs::stylesheet("/after.css"));
        ctx.script(ScriptAttrs {
            crossorigin: Some(CrossOrigin::UseCredentials),
            ..ScriptAttrs::src("/own.js")
        });

        let head = &ctx.fragments().head;
        assert_eq!(head[0], r#"<link rel="stylesheet" href="/before.css" />"#);
        assert_eq!(
            head[1],
            r#"<link rel="stylesheet" href="/after.css" crossorigin="anonymous" />"#
        );
        assert_eq!(
            head[2],
            r#"<script src="/own.js" crossorigin="use-credentials"></script>"#
        );
    }

    #[test]
    fn test_empty_tags() {
        let mut ctx = LayoutContext::new();
        ctx.meta(Attrs::new());
        ctx.script(Attrs::new());
        assert_eq!(ctx.fragments().head, vec!["<meta />", "<script></script>"]);
    }

    #[test]
    fn test_body_fragments_keep_order() {
        let mut ctx = LayoutContext::new();
        ctx.body_start("<div id=\"a\"></div>");
        ctx.body_end("<script>1</script>");
        ctx.body_start("<div id=\"b\"></div>");

        let fragments = ctx.finish();
        assert_eq!(
            fragments.body_start,
            vec!["<div id=\"a\"></div>", "<div id=\"b\"></div>"]
        );
        assert_eq!(fragments.body_end, vec!["<script>1</script>"]);
        assert!(ctx.fragments().is_empty());
    }

    #[test]
    fn test_handlers_snapshot_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut ctx = LayoutContext::new();
        for id in 0..3 {
            let seen = Rc::clone(&seen);
            ctx.on_error(move |_| seen.borrow_mut().push(id));
        }

        let err = LayoutError::Lua(mlua::Error::RuntimeError("x".into()));
        for handler in ctx.handlers() {
            handler(&err);
        }
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);

        ctx.finish();
        assert!(ctx.handlers().is_empty());
    }
}
