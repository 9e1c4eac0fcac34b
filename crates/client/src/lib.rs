//! `tradedesk-client` — authenticated access to the back-office REST API.
//!
//! Every request passes through a fixed chain of stages: credential injection
//! before dispatch, and the session-expiry redirect after a failed response.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod profile;

pub use catalog::verify_permission_catalog;
pub use client::{ApiClient, ApiClientBuilder};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use pipeline::{BearerAuth, RequestStage, ResponseStage, UnauthorizedRedirect};
pub use profile::{fetch_identity, hydrate_session};
