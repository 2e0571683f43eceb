//! Battle lifecycle: state, scheduling, action execution and settlement.

pub mod actions;
pub mod engine;
pub mod scheduler;
pub mod settings;
pub mod settlement;
pub mod state;

pub use actions::*;
pub use engine::*;
pub use scheduler::*;
pub use settings::*;
pub use settlement::*;
pub use state::*;
