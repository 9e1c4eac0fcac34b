//! Route/action guard.
//!
//! `Loading -> {Unauthenticated, Authorized, Forbidden}`. The decision itself
//! ([`evaluate_guard`]) is pure; [`RouteGuard`] adds the navigation side
//! effects, issued at most once per transition.

use std::collections::BTreeSet;

use serde::Serialize;

use tradedesk_auth::is_admin;

use crate::navigation::Navigator;
use crate::store::{SessionHandle, SessionSnapshot};

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_FALLBACK_PATH: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuardOutcome {
    /// Identity (or its role) is still being resolved. Render a neutral
    /// waiting state.
    Loading,
    /// No identity. Render nothing; the guard redirects to login.
    Unauthenticated,
    /// Render the protected content.
    Authorized,
    /// Render the access-denied view. No redirect is forced.
    Forbidden { reason: ForbiddenReason },
}

impl GuardOutcome {
    pub fn renders_content(&self) -> bool {
        matches!(self, GuardOutcome::Authorized)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "role", rename_all = "snake_case")]
pub enum ForbiddenReason {
    RoleNotAllowed(String),
    Inactive,
}

/// Decide what a protected route renders for the given session.
///
/// Checks are ordered so that an unresolved session or role never produces
/// `Forbidden`.
pub fn evaluate_guard(snapshot: &SessionSnapshot, allowed_roles: &BTreeSet<String>) -> GuardOutcome {
    if snapshot.is_loading {
        return GuardOutcome::Loading;
    }

    let Some(identity) = snapshot.identity.as_ref() else {
        return GuardOutcome::Unauthenticated;
    };

    if is_admin(Some(identity)) {
        return GuardOutcome::Authorized;
    }

    if !identity.is_active {
        return GuardOutcome::Forbidden {
            reason: ForbiddenReason::Inactive,
        };
    }

    match identity.role_name() {
        None => GuardOutcome::Loading,
        Some(role) if allowed_roles.contains(role) => GuardOutcome::Authorized,
        Some(role) => GuardOutcome::Forbidden {
            reason: ForbiddenReason::RoleNotAllowed(role.to_string()),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    pub allowed_roles: BTreeSet<String>,
    pub login_path: String,
    /// Safe location offered by the access-denied view.
    pub fallback_path: String,
}

impl GuardConfig {
    pub fn new<I, S>(allowed_roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_roles: allowed_roles.into_iter().map(Into::into).collect(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            fallback_path: DEFAULT_FALLBACK_PATH.to_string(),
        }
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn with_fallback_path(mut self, path: impl Into<String>) -> Self {
        self.fallback_path = path.into();
        self
    }
}

/// Stateful guard for one mounted route.
///
/// Call [`RouteGuard::render`] whenever the session or the configuration
/// changes; re-rendering with unchanged inputs has no side effects.
pub struct RouteGuard<N> {
    config: GuardConfig,
    navigator: N,
    last: Option<GuardOutcome>,
}

impl<N: Navigator> RouteGuard<N> {
    pub fn new(config: GuardConfig, navigator: N) -> Self {
        Self {
            config,
            navigator,
            last: None,
        }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Last rendered outcome, if any.
    pub fn outcome(&self) -> Option<&GuardOutcome> {
        self.last.as_ref()
    }

    pub fn set_allowed_roles<I, S>(&mut self, allowed_roles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allowed_roles = allowed_roles.into_iter().map(Into::into).collect();
    }

    pub fn render(&mut self, snapshot: &SessionSnapshot) -> GuardOutcome {
        let outcome = evaluate_guard(snapshot, &self.config.allowed_roles);

        if self.last.as_ref() != Some(&outcome) {
            tracing::debug!(?outcome, previous = ?self.last, "guard transition");
            if outcome == GuardOutcome::Unauthenticated {
                self.navigator.push(&self.config.login_path);
            }
        }

        self.last = Some(outcome.clone());
        outcome
    }

    pub fn render_session(&mut self, session: &SessionHandle) -> GuardOutcome {
        self.render(&session.snapshot())
    }

    /// User chose to leave the access-denied view. Returns whether a
    /// navigation was issued.
    pub fn leave_forbidden(&mut self) -> bool {
        if !matches!(self.last, Some(GuardOutcome::Forbidden { .. })) {
            return false;
        }
        self.navigator.push(&self.config.fallback_path);
        // Leaving settles the guard; the next render re-derives the outcome.
        self.last = None;
        true
    }
}
