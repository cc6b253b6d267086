pub mod about;
pub mod datasets;
pub mod logs;
pub mod subscribers;
