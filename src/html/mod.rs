//! HTML attribute maps and typed tag descriptors.
//!
//! - `attrs`: the [`Attrs`] map and its serializer ([`attrs()`])
//! - `tags`: [`MetaAttrs`], [`LinkAttrs`], [`ScriptAttrs`] and [`CrossOrigin`]

mod attrs;
mod tags;

pub use attrs::{AttrValue, Attrs, attrs};
pub use tags::{CrossOrigin, LinkAttrs, MetaAttrs, ScriptAttrs};
