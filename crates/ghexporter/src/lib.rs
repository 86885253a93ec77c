//! Top-level facade crate for ghexporter.
//!
//! Re-exports the core domain types and the server library so users can depend on a single crate.

pub mod core {
    pub use ghexporter_core::*;
}

pub mod server {
    pub use ghexporter_server::*;
}
