//! crates/domains/src/lib.rs
//!
//! The models, identity type, error type and port traits shared by every
//! other Inkwell crate. No I/O happens here.

pub mod errors;
pub mod identity;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use identity::*;
pub use models::*;
pub use ports::*;
