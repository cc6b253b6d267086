//! Unit tests that exercise more than one module at a time.

mod client_tests;
mod list_view_tests;
