// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! sgbridge configuration.
//!
//! - **Static**: compile-time defaults for the built-in catalogue.
//! - **Dynamic**: [`RuntimeConfig`], a process-wide snapshot swapped
//!   atomically with `ArcSwap`. Readers never block writers. It also owns
//!   the rayon pool that machine inference runs on, sized from
//!   `num_threads`.
//!
//! The runtime snapshot is seeded from the environment on first access:
//!
//! | Variable | Meaning |
//! |---|---|
//! | `SGBRIDGE_NUM_THREADS` | worker threads used by machine inference |
//! | `SGBRIDGE_CSV_DELIMITER` | single-byte delimiter for CSV files |

use std::sync::{Arc, OnceLock};

use arc_swap::{ArcSwap, ArcSwapOption};
use rayon::ThreadPool;

use crate::error::{Error, Result};

// =======================================================================
// Catalogue defaults
// =======================================================================

/// Kernel cache size (MB) of freshly built kernels.
pub const DEFAULT_CACHE_SIZE: i32 = 10;

/// Neighbour count of a freshly built KNN.
pub const DEFAULT_NEIGHBOURS: i32 = 3;

/// `log_width` of a freshly built Gaussian kernel (width 2.0).
pub const DEFAULT_LOG_WIDTH: f64 = 0.0;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';

// =======================================================================
// Environment
// =======================================================================

pub const ENV_NUM_THREADS: &str = "SGBRIDGE_NUM_THREADS";
pub const ENV_CSV_DELIMITER: &str = "SGBRIDGE_CSV_DELIMITER";

/// One immutable configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Worker threads for inference, at least 1.
    pub num_threads: usize,
    pub csv_delimiter: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
            csv_delimiter: DEFAULT_CSV_DELIMITER,
        }
    }
}

impl Settings {
    /// Defaults overridden by the environment. Unparseable values are
    /// ignored with a warning.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(raw) = std::env::var(ENV_NUM_THREADS) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => settings.num_threads = n,
                _ => log::warn!("[config] ignoring {}={:?}", ENV_NUM_THREADS, raw),
            }
        }

        if let Ok(raw) = std::env::var(ENV_CSV_DELIMITER) {
            match raw.as_bytes() {
                [byte] => settings.csv_delimiter = *byte,
                _ => log::warn!("[config] ignoring {}={:?}", ENV_CSV_DELIMITER, raw),
            }
        }

        settings
    }
}

/// Process-wide runtime configuration.
pub struct RuntimeConfig {
    settings: ArcSwap<Settings>,
    /// Inference pool; built on first use, replaced on `set_num_threads`.
    pool: ArcSwapOption<ThreadPool>,
}

fn build_pool(num_threads: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("sgbridge-worker-{}", i))
        .build()
        .map_err(|e| Error::Collaborator(format!("Failed to create thread pool: {}", e)))
}

static RUNTIME: OnceLock<RuntimeConfig> = OnceLock::new();

impl RuntimeConfig {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: ArcSwap::from_pointee(settings),
            pool: ArcSwapOption::empty(),
        }
    }

    /// Global instance, seeded from the environment on first call.
    pub fn global() -> &'static RuntimeConfig {
        RUNTIME.get_or_init(|| {
            let settings = Settings::from_env();
            log::debug!("[config] runtime settings {:?}", settings);
            Self::new(settings)
        })
    }

    /// Current snapshot.
    pub fn settings(&self) -> Arc<Settings> {
        self.settings.load_full()
    }

    /// Worker pool sized from the current `num_threads`.
    pub fn thread_pool(&self) -> Result<Arc<ThreadPool>> {
        if let Some(pool) = self.pool.load_full() {
            return Ok(pool);
        }
        let pool = Arc::new(build_pool(self.settings().num_threads)?);
        self.pool.store(Some(Arc::clone(&pool)));
        Ok(pool)
    }

    /// Values below 1 are clamped to 1. Replaces the worker pool; work
    /// already running keeps the pool it started on.
    pub fn set_num_threads(&self, n: usize) {
        let n = n.max(1);
        self.settings.rcu(|current| Settings {
            num_threads: n,
            ..Settings::clone(current)
        });
        match build_pool(n) {
            Ok(pool) => self.pool.store(Some(Arc::new(pool))),
            Err(e) => {
                // Next thread_pool() call retries
                log::warn!("[config] {}", e);
                self.pool.store(None);
            }
        }
        log::debug!("[config] num_threads = {}", n);
    }

    pub fn set_csv_delimiter(&self, delimiter: u8) {
        self.settings.rcu(|current| Settings {
            csv_delimiter: delimiter,
            ..Settings::clone(current)
        });
    }
}

/// Set the global inference thread count.
pub fn set_num_threads(n: usize) {
    RuntimeConfig::global().set_num_threads(n);
}
