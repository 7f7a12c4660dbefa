//! Application services - Use case implementations

pub mod generation_service;
pub mod simulation_service;

pub use generation_service::{SimulationGenerator, render_prompt, strip_code_fence};
pub use simulation_service::{
    CacheLookup, CachedSimulation, ClearReport, GenerateOutcome, SimulationPage,
    SimulationService,
};
