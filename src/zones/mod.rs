//! Zone catalog and enemy group generation.

pub mod data;
pub mod generation;

pub use data::*;
pub use generation::*;
