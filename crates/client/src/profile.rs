//! Session hydration from the API's profile endpoint.

use tradedesk_auth::Identity;
use tradedesk_session::SessionStore;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Fetch the identity the current credential belongs to.
pub async fn fetch_identity(client: &ApiClient) -> Result<Identity, ApiError> {
    client.get(&client.config().profile_path).await
}

/// Resolve the session's identity and publish it to `store`.
///
/// The store is always left resolved (not loading). A 401 signs the session
/// out, dropping the rejected credential; the pipeline has already redirected
/// to login by then. Any other failure leaves the session anonymous with its
/// credential intact. Every failure is still returned to the caller.
pub async fn hydrate_session(client: &ApiClient, store: &SessionStore) -> Result<Identity, ApiError> {
    store.begin_loading();

    match fetch_identity(client).await {
        Ok(identity) => {
            store.set_identity(identity.clone());
            Ok(identity)
        }
        Err(e) if e.is_unauthorized() => {
            store.sign_out();
            Err(e)
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not resolve session identity");
            store.finish_anonymous();
            Err(e)
        }
    }
}
