//! Session state: one producer ([`SessionStore`]), many read-only consumers
//! ([`SessionHandle`]).

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use tradedesk_auth::{Identity, has_permission, is_admin};

use crate::credential::{CredentialSource, SessionCredential};

/// Point-in-time view of the session, as seen by guards and components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Identity resolution has not completed yet.
    pub is_loading: bool,
    pub identity: Option<Identity>,
}

impl SessionSnapshot {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            identity: None,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self {
            is_loading: false,
            identity: Some(identity),
        }
    }

    pub fn role_name(&self) -> Option<&str> {
        self.identity.as_ref().and_then(Identity::role_name)
    }

    pub fn is_admin(&self) -> bool {
        is_admin(self.identity.as_ref())
    }

    /// Action-level gate: Admin bypass, otherwise the role must grant `codename`.
    pub fn can(&self, codename: impl AsRef<str>) -> bool {
        let identity = self.identity.as_ref();
        is_admin(identity) || has_permission(identity, codename)
    }
}

#[derive(Debug, Default)]
struct SessionState {
    snapshot: SessionSnapshot,
    credential: Option<SessionCredential>,
}

/// Producer side of the identity provider contract.
///
/// Only the identity provider integration should hold this; hand out
/// [`SessionHandle`]s to everything else.
#[derive(Debug)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionState>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// A fresh store starts in the loading state.
    pub fn new() -> Self {
        let state = SessionState {
            snapshot: SessionSnapshot::loading(),
            credential: None,
        };
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Identity resolution (re)started; the previous identity is kept until
    /// resolution finishes.
    pub fn begin_loading(&self) {
        self.update(|s| s.snapshot.is_loading = true);
        tracing::debug!("session loading");
    }

    /// Resolution finished with an identity. The credential is left as-is.
    pub fn set_identity(&self, identity: Identity) {
        log_resolved(&identity);
        self.update(|s| s.snapshot = SessionSnapshot::signed_in(identity));
    }

    /// Resolution finished without an identity.
    pub fn finish_anonymous(&self) {
        self.update(|s| s.snapshot = SessionSnapshot::anonymous());
        tracing::info!("session resolved anonymous");
    }

    /// Identity and credential become visible to handles together.
    pub fn sign_in(&self, identity: Identity, credential: SessionCredential) {
        log_resolved(&identity);
        self.update(|s| {
            s.credential = Some(credential);
            s.snapshot = SessionSnapshot::signed_in(identity);
        });
    }

    /// The provider rotated or refreshed the token.
    pub fn rotate_credential(&self, credential: Option<SessionCredential>) {
        let present = credential.is_some();
        self.update(|s| s.credential = credential);
        tracing::debug!(present, "session credential rotated");
    }

    pub fn sign_out(&self) {
        self.update(|s| *s = SessionState::default());
        tracing::info!("session signed out");
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        match self.inner.write() {
            Ok(mut state) => f(&mut *state),
            Err(_) => tracing::warn!("session lock poisoned, update dropped"),
        }
    }
}

fn log_resolved(identity: &Identity) {
    tracing::info!(
        user_id = %identity.id,
        role = identity.role_name().unwrap_or("<none>"),
        "session identity resolved"
    );
}

/// Read-only consumer view of the session.
///
/// A poisoned lock reads as "no session".
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<SessionState>>,
}

impl SessionHandle {
    pub fn snapshot(&self) -> SessionSnapshot {
        match self.inner.read() {
            Ok(state) => state.snapshot.clone(),
            Err(_) => SessionSnapshot::anonymous(),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.snapshot().identity
    }

    pub fn role_name(&self) -> Option<String> {
        self.snapshot().role_name().map(str::to_string)
    }

    pub fn is_admin(&self) -> bool {
        self.snapshot().is_admin()
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot().is_loading
    }

    pub fn can(&self, codename: impl AsRef<str>) -> bool {
        self.snapshot().can(codename)
    }

    fn credential(&self) -> Option<SessionCredential> {
        self.inner.read().ok()?.credential.clone()
    }
}

#[async_trait]
impl CredentialSource for SessionHandle {
    async fn current_credential(&self) -> Option<SessionCredential> {
        self.credential()
    }
}

#[cfg(test)]
mod tests {
    use tradedesk_auth::roles::{ADMIN, SALES_AGENT};
    use tradedesk_auth::{Permission, Role};
    use tradedesk_core::UserId;

    use super::*;

    fn sales_agent() -> Identity {
        Identity::new(UserId::new(), "efua")
            .with_role(Role::new(SALES_AGENT).with_permissions([Permission::ViewSale]))
    }

    #[test]
    fn new_store_is_loading() {
        let store = SessionStore::new();
        let handle = store.handle();
        assert!(handle.is_loading());
        assert!(handle.identity().is_none());
    }

    #[test]
    fn handles_observe_producer_updates() {
        let store = SessionStore::new();
        let handle = store.handle();

        store.set_identity(sales_agent());
        assert!(!handle.is_loading());
        assert_eq!(handle.role_name().as_deref(), Some(SALES_AGENT));

        store.sign_out();
        assert!(handle.identity().is_none());
        assert!(!handle.is_loading());
    }

    #[test]
    fn begin_loading_keeps_previous_identity() {
        let store = SessionStore::new();
        store.set_identity(sales_agent());
        store.begin_loading();

        let snap = store.handle().snapshot();
        assert!(snap.is_loading);
        assert!(snap.identity.is_some());
    }

    #[test]
    fn can_applies_admin_bypass() {
        let admin = SessionSnapshot::signed_in(
            Identity::new(UserId::new(), "root").with_role(Role::new(ADMIN)),
        );
        assert!(admin.can(Permission::DeleteLedgerEntry));

        let agent = SessionSnapshot::signed_in(sales_agent());
        assert!(agent.can(Permission::ViewSale));
        assert!(!agent.can(Permission::DeleteLedgerEntry));

        assert!(!SessionSnapshot::loading().can(Permission::ViewSale));
    }

    #[test]
    fn sign_in_publishes_identity_and_credential_together() {
        let store = SessionStore::new();
        let sign_in_as = |name: &str| {
            store.sign_in(
                Identity::new(UserId::new(), name),
                SessionCredential::new(name).unwrap(),
            );
        };
        sign_in_as("ama");

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let inner = Arc::clone(&store.inner);
                scope.spawn(move || {
                    for _ in 0..2_000 {
                        let state = inner.read().unwrap();
                        let user = state.snapshot.identity.as_ref().map(|i| i.username.clone());
                        let token = state.credential.as_ref().map(|c| c.expose().to_string());
                        assert_eq!(user, token);
                    }
                });
            }
            for i in 0..2_000 {
                sign_in_as(if i % 2 == 0 { "kojo" } else { "ama" });
            }
        });
    }

    #[test]
    fn poisoned_store_reads_as_signed_out() {
        let store = SessionStore::new();
        store.sign_in(sales_agent(), SessionCredential::new("tok").unwrap());

        let inner = Arc::clone(&store.inner);
        let _ = std::thread::spawn(move || {
            let _guard = inner.write().unwrap();
            panic!("writer crashed while holding the session lock");
        })
        .join();

        store.sign_out();
        store.set_identity(sales_agent());

        let handle = store.handle();
        assert!(handle.identity().is_none());
        assert!(!handle.is_loading());
        assert!(handle.credential().is_none());
        assert!(!handle.can(Permission::ViewSale));
    }

    #[tokio::test]
    async fn credential_is_read_live() {
        let store = SessionStore::new();
        let handle = store.handle();
        assert!(handle.current_credential().await.is_none());

        store.sign_in(sales_agent(), SessionCredential::new("first").unwrap());
        assert_eq!(handle.current_credential().await.unwrap().expose(), "first");

        store.rotate_credential(Some(SessionCredential::new("second").unwrap()));
        assert_eq!(handle.current_credential().await.unwrap().expose(), "second");

        store.sign_out();
        assert!(handle.current_credential().await.is_none());
    }
}
