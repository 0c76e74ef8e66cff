//! HTTP API: presentation adapter over inventory sessions.

pub mod app;
pub mod context;
pub mod middleware;
