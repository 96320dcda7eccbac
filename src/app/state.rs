//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::RelayController;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub controller: Arc<RelayController>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let controller = Arc::new(RelayController::new(config.confetti_seed));

        Self {
            config: Arc::new(config),
            controller,
        }
    }
}
