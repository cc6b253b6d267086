//! Reusable rendering pieces shared by the views.

pub mod confirm_dialog;
pub mod paged_table;
