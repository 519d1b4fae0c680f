//! Development server.
//!
//! Serves the input directory directly. HTML documents run through the
//! transform hook on every request with the live loader, so edits to
//! documents and layout scripts show up on reload without a build.

mod lifecycle;
mod path;
mod response;

use anyhow::{Result, anyhow};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tiny_http::{Request, Server};

use crate::{
    config::{VeneerConfig, cfg},
    debug,
    hooks::{DocumentSource, TransformRequest, transform_html},
    layout::{LayoutNames, Loader},
    log,
};

/// Number of request worker threads.
const WORKERS: usize = 4;

/// Bind the HTTP server and run the request loop until shutdown.
pub fn serve() -> Result<()> {
    let config = cfg();
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server_for_shutdown(Arc::clone(&server));

    log!("serve"; "http://{}", addr);
    debug!("serve"; "serving {}", config.root_relative(&config.build.input).display());

    run_request_loop(&server, &config)
}

fn run_request_loop(server: &Server, config: &Arc<VeneerConfig>) -> Result<()> {
    // Layout execution blocks its worker, other requests keep flowing.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(WORKERS)
        .build()
        .map_err(|e| anyhow!("failed to create thread pool: {e}"))?;
    let names = Arc::new(config.layout.names());

    for request in server.incoming_requests() {
        let config = Arc::clone(config);
        let names = Arc::clone(&names);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config, &names) {
                log!("serve"; "request error: {e}");
            }
        });
    }

    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &VeneerConfig, names: &LayoutNames) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    if !response::is_read_request(&request) {
        return response::respond_method_not_allowed(request);
    }

    let root = &config.build.input;
    let Some(path) = path::resolve_path(request.url(), root).filter(|p| !names.is_layout_script(p))
    else {
        debug!("serve"; "404 {}", request.url());
        return response::respond_not_found(request, not_found_page(root, config, names));
    };

    if is_html(&path) {
        let html = render(&path, root, config, names)?;
        return response::respond_html(request, html);
    }

    response::respond_file(request, &path)
}

/// Read and transform one HTML document.
fn render(path: &Path, root: &Path, config: &VeneerConfig, names: &LayoutNames) -> Result<String> {
    let html = fs::read_to_string(path)?;
    let loader = Loader::Live;
    let req = TransformRequest::new(root, DocumentSource::File(path), &loader, names)
        .with_indent(config.layout.indent);
    Ok(transform_html(&html, &req).into_owned())
}

/// `404.html` in the input root, transformed like any other page.
fn not_found_page(root: &Path, config: &VeneerConfig, names: &LayoutNames) -> Option<String> {
    let page = root.join("404.html");
    page.is_file()
        .then(|| render(&page, root, config, names).ok())
        .flatten()
}

fn is_html(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "html")
}
