//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor. The field registry is immutable after startup
//! and shared without locking.

use std::sync::Arc;

use vfield_core::FieldRegistry;

/// Port used when `PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 8080;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
}

impl AppConfig {
    /// Build configuration from the environment (`PORT`).
    pub fn from_env() -> Self {
        Self::from_port_var(std::env::var("PORT").ok().as_deref())
    }

    fn from_port_var(port: Option<&str>) -> Self {
        let port = port.and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_PORT);
        Self { port }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<FieldRegistry<()>>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(registry: FieldRegistry<()>, config: AppConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            config,
        }
    }
}
