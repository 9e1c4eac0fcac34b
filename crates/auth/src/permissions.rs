use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission codename as granted by the server (e.g. `"view_shipment"`).
///
/// Codenames are compared byte-for-byte. A codename the client does not know
/// is kept as-is; it simply never matches a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Codename(Cow<'static, str>);

impl Codename {
    pub fn new(codename: impl Into<Cow<'static, str>>) -> Self {
        Self(codename.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Codename {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&'static str> for Codename {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for Codename {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<crate::Permission> for Codename {
    fn from(value: crate::Permission) -> Self {
        Self(Cow::Borrowed(value.codename()))
    }
}

impl core::fmt::Display for Codename {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A permission entry inside a role, in the shape the API returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedPermission {
    pub codename: Codename,

    /// Human readable label ("Can view shipment"); display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl GrantedPermission {
    pub fn new(codename: impl Into<Codename>) -> Self {
        Self {
            codename: codename.into(),
            name: None,
        }
    }
}

impl From<crate::Permission> for GrantedPermission {
    fn from(value: crate::Permission) -> Self {
        Self::new(value)
    }
}
