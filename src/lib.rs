/// Baleen Console - terminal admin client for the Baleen S-124 service.
///
/// Browses navigational-warning datasets and SECOM subscribers, tails the
/// backend log buffer and shows system information over the backend REST API.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
