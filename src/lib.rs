//! jobsync - authenticated collection synchronization for a job board API.
//!
//! This crate keeps the applied-jobs, saved-jobs, companies and admin-jobs
//! collections of a signed-in user mirrored into a shared store, with
//! debounced refreshes and session-expiry handling.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing services, use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "jobsync";
