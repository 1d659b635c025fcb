//! Application state management

use kinship::core::Kinship;

use crate::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Kinship service facade
    pub kinship: Kinship,

    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    /// Create new application state
    pub fn new(kinship: Kinship, config: ServerConfig) -> Self {
        Self { kinship, config }
    }
}
