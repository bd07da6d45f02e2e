pub mod actions;
pub mod commands;
pub mod dispatch;
pub mod telemetry;
