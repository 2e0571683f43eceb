//! Enemies, initiative, damage, capture and unit AI.

pub mod ai;
pub mod capture;
pub mod resolver;
pub mod roster;
pub mod types;

pub use ai::*;
pub use capture::*;
pub use resolver::*;
pub use roster::*;
pub use types::*;
