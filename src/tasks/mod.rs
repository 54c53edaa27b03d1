//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod alert_relay;
pub mod sweep;

// Re-export main functions
pub use alert_relay::alert_relay_task;
pub use sweep::sweep_task;
