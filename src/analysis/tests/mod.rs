//! Unit tests for the analysis bounded context.

mod store_tests;
