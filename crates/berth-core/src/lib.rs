//! Berth Core
//!
//! Geometry primitives, logging setup, hash collections and profiling hooks shared by the
//! berth docking crates.

pub mod alloc;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
