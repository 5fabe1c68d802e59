//! Test helpers module
//!
//! Shared setup for the integration tests: an in-memory test context,
//! generated request data and a user repository that can be made to fail.

#![allow(dead_code)]

pub mod failing_repository;
pub mod test_context;
pub mod test_data;

pub use failing_repository::*;
pub use test_context::*;
pub use test_data::*;
