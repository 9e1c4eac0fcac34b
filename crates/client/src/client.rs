use std::sync::Arc;

use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use tradedesk_session::{CredentialSource, Navigator};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::pipeline::{BearerAuth, RequestStage, ResponseStage, UnauthorizedRedirect};

/// HTTP client for the back-office API.
///
/// Cheap to clone; clones share the connection pool and the stage chain.
/// Calls are independent: no retries, no queueing, no deduplication.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    request_stages: Arc<[Arc<dyn RequestStage>]>,
    response_stages: Arc<[Arc<dyn ResponseStage>]>,
}

impl core::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_url", &self.config.api_url.as_str())
            .field("request_stages", &self.request_stages.len())
            .field("response_stages", &self.response_stages.len())
            .finish()
    }
}

impl ApiClient {
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            request_stages: Vec::new(),
            response_stages: Vec::new(),
        }
    }

    /// Standard pipeline: bearer credential injection, then the 401 redirect.
    pub fn authenticated<C, N>(
        config: ClientConfig,
        credentials: C,
        navigator: N,
    ) -> Result<Self, ApiError>
    where
        C: CredentialSource + 'static,
        N: Navigator + 'static,
    {
        let login_path = config.login_path.clone();
        Self::builder(config)
            .request_stage(BearerAuth::new(credentials))
            .response_stage(UnauthorizedRedirect::new(navigator, login_path))
            .build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        decode(response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PUT, path, Some(body)).await?;
        decode(response).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PATCH, path, Some(body)).await?;
        decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, None::<&()>).await?;
        Ok(())
    }

    /// Run one request through the full pipeline and return the raw 2xx
    /// response. Any other status becomes [`ApiError::Status`] carrying the
    /// undecoded body.
    pub async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.config.endpoint(path)?;
        let mut builder = self.http.request(method.clone(), url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let mut request = builder
            .build()
            .map_err(|e| ApiError::Build(e.to_string()))?;

        for stage in self.request_stages.iter() {
            request = stage.on_request(request).await?;
        }

        tracing::debug!(%method, path, "dispatching API request");

        let outcome = match self.http.execute(request).await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status();
                tracing::debug!(%method, path, %status, "API request failed");
                match response.bytes().await {
                    Ok(body) => Err(ApiError::Status { status, body }),
                    Err(e) => Err(ApiError::Transport {
                        status: Some(status),
                        reason: format!("reading {status} response body: {e}"),
                    }),
                }
            }
            Err(e) => Err(ApiError::transport(e.to_string())),
        };

        self.after_response(outcome)
    }

    fn after_response(&self, outcome: Result<Response, ApiError>) -> Result<Response, ApiError> {
        match outcome {
            Ok(response) => Ok(self
                .response_stages
                .iter()
                .fold(response, |r, stage| stage.on_success(r))),
            Err(error) => Err(self
                .response_stages
                .iter()
                .fold(error, |e, stage| stage.on_failure(e))),
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::transport(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Assembles an [`ApiClient`]; stages run in the order they are added.
pub struct ApiClientBuilder {
    config: ClientConfig,
    request_stages: Vec<Arc<dyn RequestStage>>,
    response_stages: Vec<Arc<dyn ResponseStage>>,
}

impl ApiClientBuilder {
    pub fn request_stage(mut self, stage: impl RequestStage + 'static) -> Self {
        self.request_stages.push(Arc::new(stage));
        self
    }

    pub fn response_stage(mut self, stage: impl ResponseStage + 'static) -> Self {
        self.response_stages.push(Arc::new(stage));
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tradedesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Build(e.to_string()))?;

        Ok(ApiClient {
            http,
            config: Arc::new(self.config),
            request_stages: self.request_stages.into(),
            response_stages: self.response_stages.into(),
        })
    }
}
