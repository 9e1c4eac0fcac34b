//! Access Evaluator.
//!
//! - No IO
//! - No panics
//! - No role special-casing: the Admin bypass is applied by callers
//!   (route guard, session) on top of these checks, via [`is_admin`].

use thiserror::Error;

use crate::Identity;
use crate::roles::ADMIN;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("no authenticated identity")]
    Unauthenticated,

    #[error("identity is inactive")]
    Inactive,

    #[error("identity has no role")]
    NoRole,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Check that `identity` holds `codename`, with the reason when it does not.
///
/// `identity` is `None` while the session is unresolved or signed out.
pub fn require_permission(
    identity: Option<&Identity>,
    codename: impl AsRef<str>,
) -> Result<(), AuthzError> {
    let codename = codename.as_ref();
    let identity = identity.ok_or(AuthzError::Unauthenticated)?;

    if !identity.is_active {
        return Err(AuthzError::Inactive);
    }

    let role = identity.role.as_ref().ok_or(AuthzError::NoRole)?;

    if role.grants(codename) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(codename.to_string()))
    }
}

/// Whether the identity's role grants the permission named `codename`.
///
/// Codenames unknown to the server (or to the client catalog) never match.
pub fn has_permission(identity: Option<&Identity>, codename: impl AsRef<str>) -> bool {
    let granted = require_permission(identity, codename.as_ref()).is_ok();
    tracing::trace!(codename = codename.as_ref(), granted, "permission check");
    granted
}

/// True iff at least one of `codenames` is granted. Empty input is `false`.
pub fn has_any_permission<I>(identity: Option<&Identity>, codenames: I) -> bool
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    codenames.into_iter().any(|c| has_permission(identity, c))
}

/// True iff every one of `codenames` is granted. Empty input is `true`.
///
/// The asymmetry with [`has_any_permission`] is intentional (universal vs.
/// existential quantification over an empty set); callers gating on an empty
/// requirement list get access.
pub fn has_all_permissions<I>(identity: Option<&Identity>, codenames: I) -> bool
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    codenames.into_iter().all(|c| has_permission(identity, c))
}

/// Whether the identity holds the distinguished Admin role.
///
/// Inactive identities are never treated as admin.
pub fn is_admin(identity: Option<&Identity>) -> bool {
    identity
        .filter(|i| i.is_active)
        .and_then(Identity::role_name)
        .is_some_and(|name| name == ADMIN)
}
