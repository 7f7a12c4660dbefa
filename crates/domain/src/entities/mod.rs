//! Domain entities

mod simulation;
mod statistics;

pub use simulation::{
    DEFAULT_SIMULATION_TYPE, NewSimulation, SimulationDescriptor, SimulationEntry,
};
pub use statistics::{MOST_ACCESSED_LIMIT, MostAccessed, SimulationStatistics};
