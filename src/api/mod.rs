//! REST API client module for the Sentinel backend.
//!
//! This module provides the `ApiClient` for the authentication and host
//! search endpoints. Protected endpoints use JWT bearer token
//! authentication obtained through `/login`; calls made without a token
//! are rejected locally without touching the network.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
