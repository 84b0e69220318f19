//! HTTP boundary for the CIN console authorization gate.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
