//! Unit tests for the workflow bounded context.

mod domain_tests;
