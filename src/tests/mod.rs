//! Crate-level test suites: shared fixtures, cross-module unit tests, and
//! property tests.

pub mod common;
mod unit;
