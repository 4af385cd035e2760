//! Adapter implementations for analysis ports.

pub mod fs;
pub mod memory;
