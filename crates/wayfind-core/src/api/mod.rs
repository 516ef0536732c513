//! Remote access module for the wayfind API.
//!
//! This module provides the `RemoteSource` trait every data facade is
//! written against, the reqwest-backed `HttpRemote` used in production, and
//! the `ApiError` taxonomy shared by all fetch paths.

pub mod client;
pub mod error;
pub mod remote;

#[cfg(test)]
pub(crate) mod fake;

pub use client::HttpRemote;
pub use error::{ApiError, ApiResult};
pub use remote::{resource_path, Method, RemoteRequest, RemoteResponse, RemoteSource};
