//! ghexporter server library entry.
//!
//! This crate wires configuration, the upstream client, the collection
//! pipeline and the HTTP surface into a cohesive exporter. It is intended to
//! be consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod collector;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod upstream;
