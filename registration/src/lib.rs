//! Registration form client.
//!
//! Validates user registration input, submits valid records to the user
//! service over HTTP, and reports a status message. The `registration` binary
//! wires these pieces to the terminal.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::TraceId;
