//! Unit tests for netverify CLI
//!
//! These tests drive the application services through fixture gateways and
//! run fast without external I/O.

mod dns_service;
mod egress_service;
mod helpers;
