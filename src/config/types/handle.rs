//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads from server worker threads.

use crate::config::VeneerConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<VeneerConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(VeneerConfig::default()));

#[inline]
pub fn cfg() -> Arc<VeneerConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: VeneerConfig) -> Arc<VeneerConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
