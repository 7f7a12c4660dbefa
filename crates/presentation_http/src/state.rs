//! Application state shared across handlers

use std::sync::Arc;

use application::SimulationService;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Cache lookup, generation, and administration
    pub simulations: Arc<SimulationService>,
}

impl AppState {
    pub fn new(simulations: SimulationService) -> Self {
        Self {
            simulations: Arc::new(simulations),
        }
    }
}
