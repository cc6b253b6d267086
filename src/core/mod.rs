//! Console core: backend client, view controllers and local persistence.
//!
//! Nothing in here touches the terminal; the `tui` module drives these types.

pub mod api;
pub mod confirm;
pub mod detail;
pub mod format;
pub mod list_view;
pub mod logging;
pub mod polling;
pub mod preferences;
