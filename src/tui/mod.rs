//! Terminal UI: Elm-style event loop, layout, sidebar and the four views.

pub mod app;
pub mod events;
pub mod layout;
pub mod services;
pub mod sidebar;
pub mod theme;
pub mod views;
pub mod widgets;
