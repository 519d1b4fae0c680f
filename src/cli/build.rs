//! One-shot build.
//!
//! ```text
//! clean? ──► collect (jwalk) ──► html ──► transform (Bundle) ──► write
//!                               └─► assets ──► copy
//! ```
//!
//! A layout failure never fails the build, the document is written with
//! whatever fragments the rest of its chain produced. I/O errors do.

use anyhow::{Context, Result, anyhow};
use jwalk::WalkDir;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{
    cache::ModuleCache,
    config::VeneerConfig,
    core::is_shutdown,
    debug,
    hooks::{DocumentSource, TransformRequest, transform_html},
    layout::{LayoutNames, Loader},
    log,
    logger::ProgressLine,
    utils::{path::relative_to, plural_count},
};

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Files found in the input directory.
#[derive(Debug, Default)]
struct BuildFiles {
    html: Vec<PathBuf>,
    assets: Vec<PathBuf>,
}

/// Transform every document of the input directory into the output directory.
pub fn build_site(config: &VeneerConfig, quiet: bool) -> Result<()> {
    let input = &config.build.input;
    let output = &config.build.output;

    prepare_output(output, config.build.clean)?;

    let names = config.layout.names();
    let files = collect_build_files(config, &names);
    debug!(
        "build";
        "{} and {} under {}",
        plural_count(files.html.len(), "document"),
        plural_count(files.assets.len(), "asset"),
        config.root_relative(input).display()
    );

    create_parent_dirs(&files, input, output)?;

    let progress = (!quiet).then(|| {
        ProgressLine::new(&[("html", files.html.len()), ("assets", files.assets.len())])
    });

    let cache = ModuleCache::new(config.layout.cache_dir());
    debug!("cache"; "layout modules in {}", cache.dir().display());
    let loader = Loader::bundle(cache);

    let has_error = AtomicBool::new(false);
    let (html, assets) = rayon::join(
        || transform_documents(&files.html, config, &loader, &names, &has_error, progress.as_ref()),
        || copy_assets(&files.assets, config, &has_error, progress.as_ref()),
    );

    if let Some(p) = progress {
        p.finish();
    }
    html?;
    assets?;

    if !quiet {
        log!(
            "build";
            "{} written to {}",
            plural_count(files.html.len(), "document"),
            config.root_relative(output).display()
        );
    }
    Ok(())
}

/// Create the output directory, wiping it first on `--clean`.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

/// Walk the input directory, sorting files into documents and assets.
///
/// Layout scripts, the output directory and the module cache are skipped.
fn collect_build_files(config: &VeneerConfig, names: &LayoutNames) -> BuildFiles {
    let output = &config.build.output;
    let cache_dir = config.layout.cache_dir();
    let mut files = BuildFiles::default();

    let paths = WalkDir::new(&config.build.input)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.path())
        .filter(|p| !p.starts_with(output) && !p.starts_with(&cache_dir));

    for path in paths {
        if names.is_layout_script(&path) {
            continue;
        }
        if path.extension().is_some_and(|ext| ext == "html") {
            files.html.push(path);
        } else if config.build.assets {
            files.assets.push(path);
        }
    }

    files
}

/// Create every output directory up front, once each.
fn create_parent_dirs(files: &BuildFiles, input: &Path, output: &Path) -> Result<()> {
    let dirs: FxHashSet<PathBuf> = files
        .html
        .iter()
        .chain(&files.assets)
        .filter_map(|path| relative_to(path, input, output))
        .filter_map(|target| target.parent().map(Path::to_path_buf))
        .collect();

    for dir in dirs {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

fn transform_documents(
    files: &[PathBuf],
    config: &VeneerConfig,
    loader: &Loader,
    names: &LayoutNames,
    has_error: &AtomicBool,
    progress: Option<&ProgressLine>,
) -> Result<()> {
    let input = &config.build.input;

    files.par_iter().try_for_each(|path| {
        if is_shutdown() || has_error.load(Ordering::Relaxed) {
            return Err(anyhow!("Aborted"));
        }

        let result = (|| -> Result<()> {
            let target = output_path(path, config)?;
            let html = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;

            let req = TransformRequest::new(input, DocumentSource::File(path), loader, names)
                .with_indent(config.layout.indent);
            let out = transform_html(&html, &req);

            fs::write(&target, out.as_bytes())
                .with_context(|| format!("Failed to write {}", target.display()))
        })();

        if let Err(e) = result {
            if !has_error.swap(true, Ordering::Relaxed) {
                log!("error"; "{:#}", e);
            }
            return Err(anyhow!("Build failed"));
        }

        if let Some(p) = progress {
            p.inc("html");
        }
        Ok(())
    })
}

fn copy_assets(
    files: &[PathBuf],
    config: &VeneerConfig,
    has_error: &AtomicBool,
    progress: Option<&ProgressLine>,
) -> Result<()> {
    files.par_iter().try_for_each(|path| {
        if is_shutdown() || has_error.load(Ordering::Relaxed) {
            return Err(anyhow!("Aborted"));
        }

        let result = output_path(path, config).and_then(|target| {
            fs::copy(path, &target)
                .map(drop)
                .with_context(|| format!("Failed to copy {}", path.display()))
        });

        if let Err(e) = result {
            if !has_error.swap(true, Ordering::Relaxed) {
                log!("error"; "{:#}", e);
            }
            return Err(anyhow!("Build failed"));
        }

        if let Some(p) = progress {
            p.inc("assets");
        }
        Ok(())
    })
}

/// `input/a/b.html` → `output/a/b.html`
fn output_path(path: &Path, config: &VeneerConfig) -> Result<PathBuf> {
    relative_to(path, &config.build.input, &config.build.output)
        .ok_or_else(|| anyhow!("{} is outside the input directory", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildConfig, LayoutConfig};
    use tempfile::TempDir;

    const PAGE: &str = "<html>\n  <head>\n    <title>t</title>\n  </head>\n  <body>\n  </body>\n</html>\n";

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site(dir: &TempDir, assets: bool) -> VeneerConfig {
        let root = dir.path().to_path_buf();
        VeneerConfig {
            build: BuildConfig {
                input: root.join("site"),
                output: root.join("dist"),
                assets,
                clean: false,
            },
            layout: LayoutConfig {
                cache_dir: Some(root.join("cache")),
                ..LayoutConfig::default()
            },
            root,
            ..VeneerConfig::default()
        }
    }

    fn populate(input: &Path) {
        write(&input.join("index.html"), PAGE);
        write(&input.join("blog/post.html"), PAGE);
        write(&input.join("style.css"), "body {}");
        write(
            &input.join("global.layout.lua"),
            r#"return function(ctx) ctx.head.meta({ charset = "utf-8" }) end"#,
        );
        write(
            &input.join("blog/post.layout.lua"),
            r#"return function(ctx) ctx.body["end"]("<footer></footer>") end"#,
        );
    }

    #[test]
    fn test_build_site() {
        let dir = TempDir::new().unwrap();
        let config = site(&dir, true);
        populate(&config.build.input);

        build_site(&config, true).unwrap();

        let out = &config.build.output;
        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("    <meta charset=\"utf-8\" />\n  </head>"));
        assert!(!index.contains("<footer>"));

        let post = fs::read_to_string(out.join("blog/post.html")).unwrap();
        assert!(post.contains("<meta charset=\"utf-8\" />"));
        assert!(post.contains("    <footer></footer>\n  </body>"));

        assert_eq!(fs::read_to_string(out.join("style.css")).unwrap(), "body {}");
        assert!(!out.join("global.layout.lua").exists());
        assert!(!out.join("blog/post.layout.lua").exists());
    }

    #[test]
    fn test_assets_disabled() {
        let dir = TempDir::new().unwrap();
        let config = site(&dir, false);
        populate(&config.build.input);

        build_site(&config, true).unwrap();
        assert!(config.build.output.join("index.html").exists());
        assert!(!config.build.output.join("style.css").exists());
    }

    #[test]
    fn test_failing_layout_still_writes_document() {
        let dir = TempDir::new().unwrap();
        let config = site(&dir, true);
        write(&config.build.input.join("index.html"), PAGE);
        write(&config.build.input.join("index.layout.lua"), "return function(ctx) error('x') end");

        build_site(&config, true).unwrap();
        let out = fs::read_to_string(config.build.output.join("index.html")).unwrap();
        assert_eq!(out, PAGE);
    }

    #[test]
    fn test_clean_removes_stale_output() {
        let dir = TempDir::new().unwrap();
        let mut config = site(&dir, true);
        populate(&config.build.input);
        write(&config.build.output.join("stale.html"), "old");

        config.build.clean = true;
        build_site(&config, true).unwrap();
        assert!(!config.build.output.join("stale.html").exists());
        assert!(config.build.output.join("index.html").exists());
    }

    #[test]
    fn test_output_inside_input_is_skipped() {
        let dir = TempDir::new().unwrap();
        let mut config = site(&dir, true);
        populate(&config.build.input);
        config.build.output = config.build.input.join("dist");
        write(&config.build.output.join("old.html"), PAGE);

        let files = collect_build_files(&config, &config.layout.names());
        assert_eq!(files.html.len(), 2);
        assert!(files.html.iter().all(|p| !p.starts_with(&config.build.output)));
    }
}
