//! Player, companions, stats and progression.

pub mod attributes;
pub mod combatant;
pub mod companion;
pub mod derived_stats;
pub mod element;
pub mod party;
pub mod player;
pub mod progression;
pub mod skills;

pub use attributes::*;
pub use combatant::*;
pub use companion::*;
pub use derived_stats::*;
pub use element::*;
pub use party::*;
pub use player::*;
pub use progression::*;
pub use skills::*;
