//! Consumables, drops and equipment bonuses.

pub mod catalog;
pub mod drops;
pub mod equipment;

pub use catalog::*;
pub use drops::*;
pub use equipment::*;
