//! # fleetmon-api - Fleet Controller Client
//!
//! HTTP access to the warehouse fleet controller: route construction,
//! wire formats, request helpers, and the typed [`FleetApi`] trait.
//!
//! Depends on [`fleetmon_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Routes
//! - [`Route`] - One controller endpoint with its parameters
//! - [`MoveDirection`], [`RotateDirection`] - Movement directions as the wire encodes them
//!
//! ### Client
//! - [`ApiClient`] - `fetch_json`, `fire_and_forget`, `fetch_json_until`
//! - [`RetryPolicy`] - Attempt budget and spacing for readiness polling
//! - [`retry_until()`] - The retry loop on its own
//!
//! ### Operations
//! - [`FleetApi`] - Typed controller operations (`Send` futures)
//!
//! ### Test helpers (`test-helpers` feature)
//! - `test_utils::FakeFleetApi` - Scripted controller that records calls

pub mod client;
pub mod fleet_api;
pub mod protocol;
pub mod routes;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use client::{
    retry_until, ApiClient, RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY,
};
pub use fleet_api::FleetApi;
pub use routes::{MoveDirection, RotateDirection, Route};
