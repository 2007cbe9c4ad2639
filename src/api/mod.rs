//! API layer for communicating with the newsroom CMS.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests against the CMS REST endpoints, and the `ApiError` taxonomy
//! every layer above reports in.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
