//! Resource calls made on behalf of the logged-in user.
//!
//! All of them go through [`Console::fetch`] / [`Console::submit`], which attach
//! the session's bearer token and tear the session down when the backend
//! rejects it.

mod logs;
mod messages;
mod users;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::app::Console;
use crate::errors::{AppError, AppResult};

impl Console {
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let token = self.session.bearer()?;
        let result = self.http.get(path, &token).await;
        self.intercept(&token, result)
    }

    pub(crate) async fn submit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> AppResult<()> {
        let token = self.session.bearer()?;
        let result = self.http.post(path, &token, body).await;
        self.intercept(&token, result)
    }

    fn intercept<T>(&self, token: &str, result: AppResult<T>) -> AppResult<T> {
        if let Err(AppError::TokenExpiredOrInvalid) = &result {
            self.session.invalidate(token);
        }
        result
    }
}

/// User names end up as a path segment.
fn check_path_segment(value: &str) -> AppResult<()> {
    if value.is_empty() || value.chars().any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace()) {
        return Err(AppError::validation(format!("invalid user name: {value:?}")));
    }
    Ok(())
}
