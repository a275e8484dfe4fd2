//! Data models for host intelligence records.
//!
//! This module contains the data structures used to represent search
//! results from the Sentinel backend:
//!
//! - `HostInfo`, `ServiceBanner`, `HostLocation`: host records and banners
//! - `FilterQuery`: the multi-field filter search request

pub mod host;
pub mod search;

pub use host::{HostInfo, HostLocation, ServiceBanner};
pub use search::FilterQuery;
