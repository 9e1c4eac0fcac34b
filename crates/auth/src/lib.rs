//! `tradedesk-auth` — pure access evaluation for the TradeDesk back-office.
//!
//! This crate is intentionally decoupled from HTTP, sessions and rendering:
//! every decision is a synchronous function of an in-memory identity snapshot.

pub mod authorize;
pub mod catalog;
pub mod identity;
pub mod permissions;
pub mod roles;

pub use authorize::{
    AuthzError, has_all_permissions, has_any_permission, has_permission, is_admin,
    require_permission,
};
pub use catalog::{CatalogError, CatalogReport, Permission, validate_catalog};
pub use identity::Identity;
pub use permissions::{Codename, GrantedPermission};
pub use roles::Role;
