//! HTML fragment pipeline.
//!
//! ```text
//! resolve chain ──► run layouts ──► Fragments ──► splice ──► HTML
//! ```
//!
//! Layout resolution and execution live in [`crate::layout`]; this module
//! only turns collected [`Fragments`](crate::layout::Fragments) into text.

pub mod transform;

pub use transform::{BodyInjector, DEFAULT_INDENT, HeadInjector, splice};
