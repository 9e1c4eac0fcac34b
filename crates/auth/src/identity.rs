use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradedesk_core::{TenantId, UserId};

use crate::Role;

/// The authenticated actor, as returned by the profile endpoint.
///
/// Identities are produced by the identity provider and are read-only to the
/// rest of the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,

    pub username: String,

    #[serde(default)]
    pub email: String,

    /// Company the user belongs to.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,

    #[serde(default)]
    pub role: Option<Role>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Identity {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: String::new(),
            tenant_id: None,
            role: None,
            is_active: true,
            date_joined: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Role name, if a non-empty one has been resolved.
    pub fn role_name(&self) -> Option<&str> {
        self.role
            .as_ref()
            .map(|r| r.name.as_str())
            .filter(|name| !name.is_empty())
    }
}
