//! HTTP client module for the upstream score API.
//!
//! One bounded-timeout GET per poll cycle. All failures map to a typed
//! `ApiError`; the caller decides when to retry.

pub mod client;
pub mod error;

pub use client::ScoreClient;
pub use error::ApiError;
