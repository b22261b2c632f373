use reqwest::StatusCode;
use serde::Deserialize;

pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("account locked: {0}")]
    AccountLocked(String),
    #[error("token expired or invalid")]
    TokenExpiredOrInvalid,
    #[error("duplicate account: {0}")]
    DuplicateAccount(String),
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    #[error("not authorized: {0}")]
    NotAuthorizedForAction(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("network or server error: {0}")]
    NetworkOrServerError(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("token storage error: {0}")]
    Storage(String),
    #[error("superseded by a newer session operation")]
    Superseded,
}

/// Which backend call produced a failing response. The same status code means
/// different things depending on where it came from (a 403 on login is a locked
/// account, a 403 anywhere else is a missing permission).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Register,
    Authenticated,
}

impl AppError {
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited(message.into())
    }

    pub fn account_locked(message: impl Into<String>) -> Self {
        Self::AccountLocked(message.into())
    }

    pub fn duplicate_account(message: impl Into<String>) -> Self {
        Self::DuplicateAccount(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::NotAuthorizedForAction(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::NetworkOrServerError(message.into())
    }

    pub fn unknown_role(tag: impl Into<String>) -> Self {
        Self::UnknownRole(tag.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Translate a non-success HTTP response into the error taxonomy.
    pub fn from_status(operation: Operation, status: StatusCode, body: &str) -> Self {
        let message = server_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        });

        match (operation, status.as_u16()) {
            (Operation::Login, 401) => AppError::InvalidCredentials,
            (Operation::Login, 429) => AppError::rate_limited(message),
            (Operation::Login, 403) => AppError::account_locked(message),
            (Operation::Register, 400) | (Operation::Register, 422) => AppError::validation(message),
            (Operation::Register, 409) => AppError::duplicate_account(message),
            (Operation::Authenticated, 401) => AppError::TokenExpiredOrInvalid,
            (Operation::Authenticated, 403) => AppError::forbidden(message),
            (_, 400) | (_, 422) => AppError::validation(message),
            (_, 404) => AppError::not_found(message),
            (_, 429) => AppError::rate_limited(message),
            _ => AppError::server(format!("{} {}", status.as_u16(), message)),
        }
    }

    /// Stable machine-readable code for each kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::RateLimited(_) => "rate_limited",
            AppError::AccountLocked(_) => "account_locked",
            AppError::TokenExpiredOrInvalid => "token_expired_or_invalid",
            AppError::DuplicateAccount(_) => "duplicate_account",
            AppError::ValidationFailed(_) => "validation_failed",
            AppError::NotAuthorizedForAction(_) => "not_authorized",
            AppError::NotFound(_) => "not_found",
            AppError::NetworkOrServerError(_) => "network_or_server",
            AppError::UnknownRole(_) => "unknown_role",
            AppError::Configuration(_) => "configuration",
            AppError::Storage(_) => "storage",
            AppError::Superseded => "superseded",
        }
    }

    /// Message shown to the person at the keyboard.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Invalid username or password. Please try again.".to_string(),
            AppError::RateLimited(_) => "Too many login attempts. Please try again later.".to_string(),
            AppError::AccountLocked(_) => "Account is temporarily locked. Contact support.".to_string(),
            AppError::TokenExpiredOrInvalid => "Your session has expired. Please log in again.".to_string(),
            AppError::DuplicateAccount(_) => {
                "Username or email already exists. Please choose different ones.".to_string()
            }
            AppError::ValidationFailed(detail) => format!("Validation failed: {detail}"),
            AppError::NotAuthorizedForAction(_) => "You are not allowed to perform this action.".to_string(),
            AppError::NotFound(detail) => format!("Not found: {detail}"),
            AppError::NetworkOrServerError(detail) => {
                format!("Request failed ({detail}). Please contact support.")
            }
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        Self::NetworkOrServerError(value.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error", alias = "title")]
    message: Option<String>,
}

/// Pull a human-readable message out of an error body. Backends answer either with
/// a bare string or a `{ "message": .. }` object.
fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(trimmed) {
        return parsed.message.filter(|m| !m.is_empty());
    }
    if let Ok(text) = serde_json::from_str::<String>(trimmed) {
        return Some(text);
    }

    Some(trimmed.to_string())
}
