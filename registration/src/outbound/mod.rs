//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **users_api**: reqwest-backed client for the remote user service
//!
//! Adapters translate between domain types and wire representations. They
//! contain no business logic.

pub mod users_api;
