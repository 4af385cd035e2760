//! Step definitions for data cleaning workflow scenarios.

mod given;
mod then;
mod when;
pub mod world;
