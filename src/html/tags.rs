//! Typed descriptors for `<meta>`, `<link>` and `<script>` tags.

use std::fmt;
use std::str::FromStr;

use super::{AttrValue, Attrs};

/// Value of the `crossorigin` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossOrigin {
    Anonymous,
    UseCredentials,
}

impl CrossOrigin {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::UseCredentials => "use-credentials",
        }
    }
}

impl fmt::Display for CrossOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrossOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anonymous" => Ok(Self::Anonymous),
            "use-credentials" => Ok(Self::UseCredentials),
            other => Err(format!(
                "invalid crossorigin value `{other}` (expected \"anonymous\" or \"use-credentials\")"
            )),
        }
    }
}

impl From<CrossOrigin> for AttrValue {
    fn from(c: CrossOrigin) -> Self {
        Self::Text(c.as_str().to_owned())
    }
}

/// `<meta>` descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaAttrs {
    pub name: Option<String>,
    pub property: Option<String>,
    pub charset: Option<String>,
    pub content: Option<String>,
    pub http_equiv: Option<String>,
}

impl MetaAttrs {
    /// Canonical attribute order for `<meta>`.
    pub const ORDER: &'static [&'static str] =
        &["charset", "name", "property", "http-equiv", "content"];

    /// `name` + `content` pair.
    pub fn named(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// `property` + `content` pair (Open Graph).
    pub fn property(property: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            property: Some(property.into()),
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

impl From<&MetaAttrs> for Attrs {
    fn from(m: &MetaAttrs) -> Self {
        Attrs::new()
            .with("charset", m.charset.as_ref())
            .with("name", m.name.as_ref())
            .with("property", m.property.as_ref())
            .with("http-equiv", m.http_equiv.as_ref())
            .with("content", m.content.as_ref())
    }
}

impl From<MetaAttrs> for Attrs {
    fn from(m: MetaAttrs) -> Self {
        Self::from(&m)
    }
}

/// `<link>` descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkAttrs {
    pub rel: String,
    pub href: String,
    pub r#type: Option<String>,
    pub crossorigin: Option<CrossOrigin>,
}

impl LinkAttrs {
    /// Canonical attribute order for `<link>` (`crossorigin` is appended last).
    pub const ORDER: &'static [&'static str] = &["rel", "type", "href"];

    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            ..Self::default()
        }
    }

    pub fn stylesheet(href: impl Into<String>) -> Self {
        Self::new("stylesheet", href)
    }
}

impl From<&LinkAttrs> for Attrs {
    fn from(l: &LinkAttrs) -> Self {
        Attrs::new()
            .with("rel", &l.rel)
            .with("type", l.r#type.as_ref())
            .with("href", &l.href)
            .with("crossorigin", l.crossorigin)
    }
}

impl From<LinkAttrs> for Attrs {
    fn from(l: LinkAttrs) -> Self {
        Self::from(&l)
    }
}

/// `<script>` descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptAttrs {
    pub src: Option<String>,
    pub r#type: Option<String>,
    pub defer: bool,
    pub r#async: bool,
    pub crossorigin: Option<CrossOrigin>,
}

impl ScriptAttrs {
    /// Canonical attribute order for `<script>` (`crossorigin` is appended last).
    pub const ORDER: &'static [&'static str] = &["src", "type", "defer", "async"];

    pub fn src(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            ..Self::default()
        }
    }

    pub fn module(src: impl Into<String>) -> Self {
        Self {
            r#type: Some("module".to_owned()),
            ..Self::src(src)
        }
    }
}

impl From<&ScriptAttrs> for Attrs {
    fn from(s: &ScriptAttrs) -> Self {
        Attrs::new()
            .with("src", s.src.as_ref())
            .with("type", s.r#type.as_ref())
            .with("defer", s.defer)
            .with("async", s.r#async)
            .with("crossorigin", s.crossorigin)
    }
}

impl From<ScriptAttrs> for Attrs {
    fn from(s: ScriptAttrs) -> Self {
        Self::from(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::attrs;

    #[test]
    fn test_crossorigin_parse() {
        assert_eq!("anonymous".parse::<CrossOrigin>(), Ok(CrossOrigin::Anonymous));
        assert_eq!(
            "use-credentials".parse::<CrossOrigin>(),
            Ok(CrossOrigin::UseCredentials)
        );
        assert!("omit".parse::<CrossOrigin>().is_err());
    }

    #[test]
    fn test_meta_attrs_order() {
        let meta = MetaAttrs {
            content: Some("0; url=/".into()),
            http_equiv: Some("refresh".into()),
            ..MetaAttrs::default()
        };
        assert_eq!(
            attrs(&meta.into()),
            r#"http-equiv="refresh" content="0; url=/""#
        );
    }

    #[test]
    fn test_link_attrs() {
        let link = LinkAttrs {
            r#type: Some("text/css".into()),
            crossorigin: Some(CrossOrigin::Anonymous),
            ..LinkAttrs::stylesheet("/main.css")
        };
        assert_eq!(
            attrs(&link.into()),
            r#"rel="stylesheet" type="text/css" href="/main.css" crossorigin="anonymous""#
        );
    }

    #[test]
    fn test_script_attrs_flags() {
        let script = ScriptAttrs {
            defer: true,
            ..ScriptAttrs::module("/app.js")
        };
        assert_eq!(
            attrs(&script.into()),
            r#"src="/app.js" type="module" defer"#
        );
    }
}
