//! vigil-api: REST API server for vigil
//!
//! This crate provides the HTTP surface of the daemon:
//! - The aggregate liveness verdict
//! - Endpoint and failure introspection
//! - Self-test probe targets

pub mod rest;

pub use rest::create_router;
