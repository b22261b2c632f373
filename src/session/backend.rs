use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::models::user::Identity;

/// Token-issuing side of the backend as seen by the session manager.
///
/// Implementations translate every failure into the [`crate::errors::AppError`]
/// taxonomy; transport errors never leak through.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for a token and the user's profile.
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse>;

    /// Create an account. The created identity is not needed by callers.
    async fn register(&self, request: &RegisterRequest) -> AppResult<()>;

    /// Resolve a bearer token into the identity it belongs to.
    async fn whoami(&self, token: &str) -> AppResult<Identity>;
}
