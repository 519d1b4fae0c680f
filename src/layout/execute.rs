//! Layout execution.
//!
//! A [`LayoutSession`] owns one Lua state and one [`LayoutContext`] for a
//! single transform. Scripts run strictly in chain order; a failing script
//! is reported and the chain continues.
//!
//! ```text
//! NotFound ──► skipped silently
//! Found ──► load (Live | Bundle) ──► invoke ──► Ran
//!                    │                  │
//!                    └──── error ───────┴──► log + notify handlers ──► Failed
//! ```

use mlua::{ChunkMode, Function, Lua, Table, Value};
use std::cell::{RefCell, RefMut};
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use super::lua::{self, SharedContext};
use super::{Fragments, LayoutContext, LayoutError, LayoutScript};
use crate::cache::{ContentHash, ModuleCache};
use crate::logger;
use crate::{debug, log};

/// How layout sources become callable functions.
#[derive(Debug, Clone)]
pub enum Loader {
    /// Evaluate the source directly on every run (development).
    Live,
    /// Syntax-check once per content hash, then load the cached artifact.
    Bundle(Arc<ModuleCache>),
}

impl Loader {
    pub fn bundle(cache: ModuleCache) -> Self {
        Self::Bundle(Arc::new(cache))
    }

    fn load(&self, lua: &Lua, path: &Path) -> Result<Function, LayoutError> {
        let source = read(path)?;
        let value = match self {
            Self::Live => lua
                .load(source.as_slice())
                .set_name(chunk_name(path))
                .set_mode(ChunkMode::Text)
                .into_function()?
                .call::<Value>(())?,
            Self::Bundle(cache) => {
                let hash = ContentHash::of_module(&source);
                let module = cache.get_or_compile(hash, || compile(lua, path, &source))?;
                lua.load(module.as_slice())
                    .set_name(chunk_name(path))
                    .set_mode(ChunkMode::Text)
                    .into_function()?
                    .call::<Value>(())?
            }
        };

        match value {
            Value::Function(f) => Ok(f),
            other => Err(LayoutError::NotAFunction {
                path: path.to_path_buf(),
                found: other.type_name(),
            }),
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>, LayoutError> {
    fs::read(path).map_err(|source| LayoutError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn chunk_name(path: &Path) -> String {
    format!("@{}", path.display())
}

/// Syntax-check a layout source without running it.
fn compile(lua: &Lua, path: &Path, source: &[u8]) -> Result<Vec<u8>, LayoutError> {
    lua.load(source)
        .set_name(chunk_name(path))
        .set_mode(ChunkMode::Text)
        .into_function()?;
    Ok(source.to_vec())
}

/// Result of running one layout reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutOutcome {
    /// No file at the referenced path.
    Skipped,
    Ran,
    /// Loading or invocation failed; handlers were notified.
    Failed,
}

/// One Lua state plus the context shared by every layout of a document.
pub struct LayoutSession {
    lua: Lua,
    loader: Loader,
    ctx: SharedContext,
    api: Table,
    base_path: String,
}

impl LayoutSession {
    pub fn new(loader: &Loader) -> Result<Self, LayoutError> {
        let lua = Lua::new();
        lua::install_prelude(&lua)?;

        let package: Table = lua.globals().get("package")?;
        let base_path: String = package.get("path")?;

        let ctx: SharedContext = Rc::new(RefCell::new(LayoutContext::new()));
        let api = lua::context_table(&lua, &ctx)?;

        Ok(Self {
            lua,
            loader: loader.clone(),
            ctx,
            api,
            base_path,
        })
    }

    /// Direct access to the context, e.g. to register Rust error handlers.
    pub fn context(&self) -> RefMut<'_, LayoutContext> {
        self.ctx.borrow_mut()
    }

    /// Run every script of a chain in order.
    pub fn run_all(&self, scripts: &[LayoutScript]) -> Vec<LayoutOutcome> {
        scripts.iter().map(|script| self.run(script)).collect()
    }

    /// Run one layout script.
    pub fn run(&self, script: &LayoutScript) -> LayoutOutcome {
        if !script.path.is_file() {
            debug!("layout"; "no {} layout at {}", script.role, script.path.display());
            return LayoutOutcome::Skipped;
        }

        let name = script
            .path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        log!("layout"; "layout found ({name})");
        logger::detail(&script.path.display().to_string());

        match self.invoke(&script.path) {
            Ok(()) => LayoutOutcome::Ran,
            Err(err) => {
                log!("error"; "{}", err);
                self.notify(&err);
                LayoutOutcome::Failed
            }
        }
    }

    fn invoke(&self, path: &Path) -> Result<(), LayoutError> {
        lua::set_search_dir(&self.lua, &self.base_path, path.parent())?;
        let layout = self.loader.load(&self.lua, path)?;
        layout.call::<()>(self.api.clone())?;
        Ok(())
    }

    /// Call every registered handler; the context is not borrowed meanwhile,
    /// so handlers may append fragments.
    fn notify(&self, err: &LayoutError) {
        let handlers = self.ctx.borrow().handlers();
        for handler in handlers {
            handler(err);
        }
    }

    /// Release handlers and hand back the collected fragments.
    pub fn finish(self) -> Fragments {
        self.ctx.borrow_mut().finish()
    }
}

impl Drop for LayoutSession {
    fn drop(&mut self) {
        // Lua handlers hold the state that holds the context.
        if let Ok(mut ctx) = self.ctx.try_borrow_mut() {
            ctx.finish();
        }
    }
}
