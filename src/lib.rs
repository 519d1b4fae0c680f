//! Veneer - inject layout-script generated fragments into static HTML.
//!
//! ```text
//! document.html ──► resolve chain ──► run layouts (Lua) ──► splice ──► HTML
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod hooks;
pub mod html;
pub mod layout;
pub mod logger;
pub mod meta;
pub mod pipeline;
pub mod utils;
