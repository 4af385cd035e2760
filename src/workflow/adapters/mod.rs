//! Adapter implementations of workflow ports.

pub mod timer;
