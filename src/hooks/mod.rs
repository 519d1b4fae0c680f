//! Integration hooks.
//!
//! - `transform`: the HTML transform hook shared by `build` and `serve`

mod transform;

pub use transform::{DocumentSource, TransformRequest, transform_html};
