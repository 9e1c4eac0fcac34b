use std::sync::Arc;

use async_trait::async_trait;

use tradedesk_core::{DomainError, DomainResult};

/// Opaque bearer token proving the current session to the API.
///
/// Owned by the external identity provider. `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    pub fn new(token: impl Into<String>) -> DomainResult<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("bearer token must not be empty"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::validation("bearer token must not contain whitespace"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl core::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SessionCredential(<redacted>)")
    }
}

/// Where the request pipeline obtains the credential, once per request.
///
/// Implementations must return the provider's *current* value; callers never
/// cache it across requests.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn current_credential(&self) -> Option<SessionCredential>;
}

#[async_trait]
impl<S> CredentialSource for Arc<S>
where
    S: CredentialSource + ?Sized,
{
    async fn current_credential(&self) -> Option<SessionCredential> {
        (**self).current_credential().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_tokens() {
        assert!(SessionCredential::new("").is_err());
        assert!(SessionCredential::new("   ").is_err());
        assert!(SessionCredential::new("abc def").is_err());
    }

    #[test]
    fn trims_and_formats_bearer_value() {
        let cred = SessionCredential::new("  tok-123\n").unwrap();
        assert_eq!(cred.expose(), "tok-123");
        assert_eq!(cred.bearer_value(), "Bearer tok-123");
    }

    #[test]
    fn debug_is_redacted() {
        let cred = SessionCredential::new("super-secret").unwrap();
        assert!(!format!("{cred:?}").contains("super-secret"));
    }
}
