use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ConsoleConfig;
use crate::errors::{AppError, AppResult, Operation};
use crate::models::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::models::user::Identity;
use crate::session::AuthBackend;

/// The one HTTP wrapper every backend call goes through.
///
/// It knows nothing about the session: callers pass the bearer token in, and
/// get failures back already translated into [`AppError`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpClient {
    pub fn new(config: &ConsoleConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| AppError::configuration(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, token: &str) -> AppResult<T> {
        let request = self.request(Method::GET, path)?.bearer_auth(token);
        self.send(request, Operation::Authenticated).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, token: &str, body: &B) -> AppResult<()> {
        let request = self.request(Method::POST, path)?.bearer_auth(token).json(body);
        self.send_discarding(request, Operation::Authenticated).await
    }

    fn request(&self, method: Method, path: &str) -> AppResult<RequestBuilder> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| AppError::configuration(format!("invalid request path {path}: {err}")))?;
        tracing::debug!(method = %method, url = %url, "backend request");
        Ok(self.http.request(method, url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, operation: Operation) -> AppResult<T> {
        let bytes = self.execute(request, operation).await?;
        let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
        serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|err| AppError::server(format!("unexpected response body at {}: {}", err.path(), err.inner())))
    }

    async fn send_discarding(&self, request: RequestBuilder, operation: Operation) -> AppResult<()> {
        self.execute(request, operation).await.map(|_| ())
    }

    async fn execute(&self, request: RequestBuilder, operation: Operation) -> AppResult<Vec<u8>> {
        let response = request.send().await.map_err(|err| {
            tracing::warn!(error = %err, "backend unreachable");
            AppError::from(err)
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if status.is_success() {
            return Ok(bytes.to_vec());
        }

        let body = String::from_utf8_lossy(&bytes);
        tracing::debug!(status = %status, body = %body, "backend returned an error status");
        Err(AppError::from_status(operation, status, &body))
    }
}

#[async_trait]
impl AuthBackend for HttpClient {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        let request = self.request(Method::POST, "auth/login")?.json(request);
        self.send(request, Operation::Login).await
    }

    async fn register(&self, request: &RegisterRequest) -> AppResult<()> {
        let request = self.request(Method::POST, "auth/register")?.json(request);
        self.send_discarding(request, Operation::Register).await
    }

    async fn whoami(&self, token: &str) -> AppResult<Identity> {
        self.get("auth/me", token).await
    }
}
