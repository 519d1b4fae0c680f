//! `veneer resolve`: print a document's layout chain.

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use std::io::{Write, stdout};
use std::path::Path;

use crate::{
    config::VeneerConfig,
    layout::{LayoutScript, resolve_layouts},
    utils::path::resolve_path,
};

/// Print the chain for `html` (cwd-relative, or relative to the input directory).
pub fn resolve_chain(html: &Path, config: &VeneerConfig) -> Result<()> {
    let input = &config.build.input;
    let path = resolve_path(html, input);
    if path.extension().is_none_or(|ext| ext != "html") {
        bail!("{} is not an HTML document", html.display());
    }

    let chain = resolve_layouts(&path, input, &config.layout.names());
    let mut out = stdout().lock();
    for script in &chain {
        writeln!(out, "{}", format_entry(script, config))?;
    }
    Ok(())
}

fn format_entry(script: &LayoutScript, config: &VeneerConfig) -> String {
    let path = config.root_relative(&script.path);
    let role = format!("{:<8}", script.role);
    if script.path.is_file() {
        format!("{} {}", role.green(), path.display())
    } else {
        format!("{} {} {}", role.dimmed(), path.display(), "(missing)".dimmed())
    }
}
