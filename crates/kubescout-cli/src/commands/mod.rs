//! Command implementations

pub mod check;
pub mod presets;
pub mod resolve;
pub mod serve;
