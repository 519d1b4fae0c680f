//! Attribute maps and serialization.
//!
//! An [`Attrs`] keeps insertion order, so serialization is deterministic:
//!
//! ```ignore
//! let a = Attrs::new().with("src", "/app.js").with("defer", true).with("async", false);
//! assert_eq!(attrs(&a), r#"src="/app.js" defer"#);
//! ```

use std::fmt;

/// A single attribute value.
///
/// `Absent` and `Bool(false)` are never rendered, `Bool(true)` renders as a
/// bare attribute name. Values are not escaped: layout authors are trusted.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Absent,
}

impl AttrValue {
    /// Whether this value produces any output.
    #[inline]
    pub fn is_rendered(&self) -> bool {
        !matches!(self, Self::Absent | Self::Bool(false))
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Number(n) => fmt_number(*n, f),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Absent => Ok(()),
        }
    }
}

/// Format a float the way JavaScript's `String(n)` does: shortest
/// round-trip digits, exponent form outside `[1e-6, 1e21)`, spelled-out
/// non-finite values.
fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("NaN");
    }
    if n.is_infinite() {
        return f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if n == 0.0 {
        return f.write_str("0");
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return write!(f, "{n}");
    }

    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => write!(f, "{mantissa}e+{power}"),
        _ => f.write_str(&exp),
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for AttrValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u32> for AttrValue {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Absent, Into::into)
    }
}

/// Ordered attribute map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs {
    entries: Vec<(String, AttrValue)>,
}

impl Attrs {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether `key` is present with a value other than `Absent`.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| *v != AttrValue::Absent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serialize an attribute map into a space-joined attribute string.
///
/// `Absent`/`false` entries are omitted, `true` renders the bare key,
/// everything else renders as `key="value"`.
pub fn attrs(map: &Attrs) -> String {
    map.iter()
        .filter(|(_, v)| v.is_rendered())
        .map(|(k, v)| match v {
            AttrValue::Bool(true) => k.to_owned(),
            _ => format!("{k}=\"{v}\""),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
