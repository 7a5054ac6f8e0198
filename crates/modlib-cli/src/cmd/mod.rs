//! Command implementations.

pub mod list;
pub mod mods;
pub mod pack;
