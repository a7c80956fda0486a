//! User service outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `UserRegistry`
//! port.

mod dto;
mod http_registry;

pub use http_registry::{DEFAULT_ERROR_BODY_TIMEOUT, HttpUserRegistry, USERS_PATH, users_endpoint};
