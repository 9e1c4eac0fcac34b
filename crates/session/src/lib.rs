//! `tradedesk-session` — the identity provider contract and route gating.
//!
//! The session store is the single producer of identity state; everything
//! else reads it through a [`SessionHandle`]. The [`RouteGuard`] turns a
//! session snapshot plus a route's allowed roles into a rendering decision.

pub mod credential;
pub mod guard;
pub mod navigation;
pub mod routes;
pub mod store;

pub use credential::{CredentialSource, SessionCredential};
pub use guard::{ForbiddenReason, GuardConfig, GuardOutcome, RouteGuard, evaluate_guard};
pub use navigation::{Navigation, Navigator, RecordingNavigator};
pub use routes::RoutePolicy;
pub use store::{SessionHandle, SessionSnapshot, SessionStore};
