//! Layout scripts.
//!
//! A layout is a Lua chunk returning a function. For each HTML document the
//! resolver builds a chain of global layouts plus one specific layout; the
//! executor runs the chain against a shared [`LayoutContext`] and hands the
//! collected [`Fragments`] to the splicer.
//!
//! - `resolve`: chain discovery ([`resolve_layouts`])
//! - `context`: fragment collection and error handlers
//! - `execute`: Lua state, loaders and chain execution
//! - `lua`: the `ctx` table and `veneer` library bindings

mod context;
mod error;
mod execute;
mod lua;
mod resolve;

pub use context::{ErrorHandler, Fragments, LayoutContext};
pub use error::LayoutError;
pub use execute::{LayoutOutcome, LayoutSession, Loader};
pub use resolve::{LayoutNames, LayoutRole, LayoutScript, resolve_layouts, specific_layout_path};
