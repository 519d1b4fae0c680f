//! Content-addressed cache for layout modules.
//!
//! - `hash`: [`ContentHash`] (blake3) of a layout script's source
//! - `module`: [`ModuleCache`], hash → verified artifact on disk

mod hash;
mod module;

pub use hash::ContentHash;
pub use module::ModuleCache;
