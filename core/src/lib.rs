//! # Trellis Core
//!
//! Math and profiling utilities shared by the Trellis crates.

pub mod math;
pub mod profiling;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
