//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::TaxTableRegistry;

/// Shared application state.
///
/// Holds the tax table registry, which is read-only once loaded and shared
/// across all request handlers.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<TaxTableRegistry>,
}

impl AppState {
    /// Creates a new application state around a loaded registry.
    pub fn new(registry: TaxTableRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Returns a reference to the tax table registry.
    pub fn registry(&self) -> &TaxTableRegistry {
        &self.registry
    }
}
