//! `tradedesk-core` — identifiers and errors shared by every TradeDesk crate.
//!
//! This crate has no knowledge of HTTP, sessions or rendering.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{RecordKey, RoleId, TenantId, UserId};
