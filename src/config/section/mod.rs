//! Configuration section definitions.
//!
//! Each module corresponds to a section in `veneer.toml`:
//!
//! | Module   | TOML Section | Purpose                                |
//! |----------|--------------|----------------------------------------|
//! | `build`  | `[build]`    | Input/output directories, asset copy   |
//! | `layout` | `[layout]`   | Layout file names, indent, module cache |
//! | `serve`  | `[serve]`    | Development server                     |

mod build;
mod layout;
mod serve;

pub use build::BuildConfig;
pub use layout::LayoutConfig;
pub use serve::ServeConfig;
