// State management and generation markers

pub mod manager;
pub mod marker;

pub use manager::StateManager;
pub use marker::{GenerationMarker, GenerationMarkerBuilder, GenerationStatus};
