//! Interceptor stages of the request pipeline.
//!
//! Request stages run in order before dispatch; response stages run in order
//! after it. A response stage may observe and react, but the value it returns
//! is what the caller receives.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Request, Response, StatusCode};

use tradedesk_session::{CredentialSource, Navigator};

use crate::error::ApiError;

#[async_trait]
pub trait RequestStage: Send + Sync {
    async fn on_request(&self, request: Request) -> Result<Request, ApiError>;
}

pub trait ResponseStage: Send + Sync {
    fn on_success(&self, response: Response) -> Response {
        response
    }

    fn on_failure(&self, error: ApiError) -> ApiError {
        error
    }
}

/// Attaches `Authorization: Bearer <token>` from the credential source.
///
/// The credential is fetched anew for every request. Without one, the
/// request goes out with no `Authorization` header at all.
pub struct BearerAuth<C> {
    credentials: C,
}

impl<C: CredentialSource> BearerAuth<C> {
    pub fn new(credentials: C) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl<C: CredentialSource> RequestStage for BearerAuth<C> {
    async fn on_request(&self, mut request: Request) -> Result<Request, ApiError> {
        match self.credentials.current_credential().await {
            Some(credential) => {
                let mut value = HeaderValue::from_str(&credential.bearer_value())
                    .map_err(|_| ApiError::InvalidCredential)?;
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            None => {
                request.headers_mut().remove(AUTHORIZATION);
                tracing::debug!(url = %request.url(), "no session credential; sending unauthenticated");
            }
        }
        Ok(request)
    }
}

/// Sends the user to the login page when the API rejects the session.
///
/// The error is returned unchanged: callers still see the failed call.
pub struct UnauthorizedRedirect<N> {
    navigator: N,
    login_path: String,
}

impl<N: Navigator> UnauthorizedRedirect<N> {
    pub fn new(navigator: N, login_path: impl Into<String>) -> Self {
        Self {
            navigator,
            login_path: login_path.into(),
        }
    }
}

impl<N: Navigator> ResponseStage for UnauthorizedRedirect<N> {
    fn on_failure(&self, error: ApiError) -> ApiError {
        if error.status() == Some(StatusCode::UNAUTHORIZED) {
            tracing::warn!(login_path = %self.login_path, "session rejected by API; redirecting to login");
            self.navigator.hard_redirect(&self.login_path);
        }
        error
    }
}
