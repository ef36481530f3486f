//! Configuration read by the product entry points

use std::sync::Arc;

use tracing::warn;

use crate::backend::{self, BlasThreads};

/// Environment variable overriding [`MatmulConfig::n_threads`]
pub const ENV_NUM_THREADS: &str = "SPDM_NUM_THREADS";

/// Environment variable overriding [`MatmulConfig::sort_in_place`]
pub const ENV_INPLACE_SORT: &str = "SPDM_INPLACE_SORT";

/// Configuration for the product kernels
#[derive(Debug, Clone)]
pub struct MatmulConfig {
    /// Number of worker threads requested; clamped to at least one and to
    /// the number of independent rows of each product
    pub n_threads: usize,

    /// Whether sparse operands that must be sorted for a merge-join are
    /// sorted in place (mutating the caller's data) instead of through a
    /// private copy
    pub sort_in_place: bool,

    /// Backend whose thread count is pinned to one during each call
    pub blas: Arc<dyn BlasThreads>,
}

impl Default for MatmulConfig {
    fn default() -> Self {
        Self {
            n_threads: num_cpus::get(), // Use all available cores
            sort_in_place: false,
            blas: backend::global(),
        }
    }
}

impl MatmulConfig {
    /// Default configuration with overrides taken from the environment
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(ENV_NUM_THREADS) {
            match raw.trim().parse::<usize>() {
                Ok(n) => config.n_threads = n,
                Err(err) => warn!(%raw, %err, "ignoring unparsable {}", ENV_NUM_THREADS),
            }
        }

        if let Ok(raw) = std::env::var(ENV_INPLACE_SORT) {
            match parse_flag(&raw) {
                Some(flag) => config.sort_in_place = flag,
                None => warn!(%raw, "ignoring unparsable {}", ENV_INPLACE_SORT),
            }
        }

        config
    }

    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }

    pub fn with_sort_in_place(mut self, sort_in_place: bool) -> Self {
        self.sort_in_place = sort_in_place;
        self
    }

    pub fn with_blas(mut self, blas: Arc<dyn BlasThreads>) -> Self {
        self.blas = blas;
        self
    }

    /// Threads to use for a product with `units` independent rows
    pub fn effective_threads(&self, units: usize) -> usize {
        self.n_threads.max(1).min(units.max(1))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
