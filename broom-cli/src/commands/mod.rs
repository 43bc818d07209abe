//! Command implementations for the pybr CLI.

pub mod analyze;
