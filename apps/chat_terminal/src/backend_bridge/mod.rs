//! Backend worker: owns the async runtime and performs every network call.

pub mod commands;
pub mod runtime;
