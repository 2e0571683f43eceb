//! Wendao - turn-based battle engine for a cultivation RPG.
//!
//! The engine runs on a logical millisecond clock: callers advance it
//! explicitly, or hand it to the async driver behind the `runtime` feature.

pub mod battle;
pub mod character;
pub mod combat;
pub mod core;
pub mod items;
pub mod zones;

#[cfg(feature = "runtime")]
pub mod driver;
