//! Application layer: ports, polling, configuration, and use-case services.

pub mod config;
pub mod poll;
pub mod ports;
pub mod services;
