//! Identifiers of server-owned records.
//!
//! The back office decides how its primary keys look. Integer autoincrement
//! keys, UUIDs and opaque slugs are all accepted and echoed back unchanged;
//! nothing in the client interprets them beyond equality and display.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// A record's primary key in the form the API sent it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordKey {
    Int(i64),
    Uuid(Uuid),
    Text(String),
}

impl RecordKey {
    /// Most specific reading of `s`: integer, then UUID, then opaque text.
    /// Blank input is not a key.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(n) = s.parse::<i64>() {
            return Some(Self::Int(n));
        }
        Some(match Uuid::from_str(s) {
            Ok(uuid) => Self::Uuid(uuid),
            Err(_) => Self::Text(s.to_string()),
        })
    }
}

impl core::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Uuid(uuid) => write!(f, "{uuid}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for RecordKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| DomainError::invalid_id("blank record key"))
    }
}

macro_rules! record_id {
    ($(#[$meta:meta])* $t:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(RecordKey);

        impl $t {
            /// A fresh UUIDv7-keyed id for fixtures; real ids come from the server.
            pub fn new() -> Self {
                Self(RecordKey::Uuid(Uuid::now_v7()))
            }

            pub fn key(&self) -> &RecordKey {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<RecordKey> for $t {
            fn from(key: RecordKey) -> Self {
                Self(key)
            }
        }

        impl From<i64> for $t {
            fn from(n: i64) -> Self {
                Self(RecordKey::Int(n))
            }
        }

        impl From<Uuid> for $t {
            fn from(uuid: Uuid) -> Self {
                Self(RecordKey::Uuid(uuid))
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                RecordKey::parse(s).map(Self).ok_or_else(|| {
                    DomainError::invalid_id(format!("{}: blank record key", stringify!($t)))
                })
            }
        }
    };
}

record_id! {
    /// Tenant (the company a user works for).
    TenantId
}

record_id! {
    /// User account (the acting identity).
    UserId
}

record_id!(RoleId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_key_shape_the_server_uses() {
        let ids: Vec<UserId> =
            serde_json::from_value(serde_json::json!([42, "0190f5b2-7c1e-7d3a-9b2f-3c4d5e6f7a8b", "u-amina"]))
                .unwrap();

        assert_eq!(ids[0], UserId::from(42_i64));
        assert!(matches!(ids[1].key(), RecordKey::Uuid(_)));
        assert_eq!(ids[2].key(), &RecordKey::Text("u-amina".to_string()));
    }

    #[test]
    fn serializes_in_the_shape_it_arrived() {
        let json = serde_json::json!([7, "slug-7"]);
        let ids: Vec<RoleId> = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&ids).unwrap(), json);
    }

    #[test]
    fn parse_prefers_the_most_specific_shape() {
        assert_eq!(" 15 ".parse::<TenantId>().unwrap(), TenantId::from(15_i64));

        let uuid = Uuid::now_v7();
        assert_eq!(uuid.to_string().parse::<TenantId>().unwrap(), TenantId::from(uuid));

        let id = UserId::new();
        assert_eq!(id.to_string().parse::<UserId>().unwrap(), id);
    }

    #[test]
    fn blank_id_names_the_type() {
        let err = "  ".parse::<RoleId>().unwrap_err();
        let DomainError::InvalidId(msg) = err else {
            panic!("expected InvalidId");
        };
        assert!(msg.starts_with("RoleId:"));
    }
}
