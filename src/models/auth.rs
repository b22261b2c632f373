use serde::{Deserialize, Serialize};

use super::user::Identity;
use crate::authz::Role;
use crate::errors::{AppError, AppResult};

const MIN_PASSWORD_LENGTH: usize = 8;
const PASSWORD_SPECIALS: &str = "@$!%*?&";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        check_length("userName", &self.user_name, 3, 50)?;
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::validation(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub new_token: String,
    pub user_info: Identity,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub address: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [("firstName", &self.first_name), ("lastName", &self.last_name)] {
            check_length(field, value, 2, 50)?;
            if !value.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace()) {
                return Err(AppError::validation(format!(
                    "{field} can only contain letters and spaces"
                )));
            }
        }

        check_length("userName", &self.user_name, 3, 30)?;
        if !self.user_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AppError::validation(
                "userName can only contain letters, numbers, and underscores",
            ));
        }

        check_length("email", &self.email, 1, 100)?;
        if !looks_like_email(&self.email) {
            return Err(AppError::validation("email must be a valid email address"));
        }

        check_password_strength(&self.password)?;
        check_length("address", &self.address, 10, 200)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub user_name: String,
    pub new_role: Role,
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> AppResult<()> {
    let len = value.trim().chars().count();
    if len < min {
        return Err(AppError::validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    if len > max {
        return Err(AppError::validation(format!(
            "{field} must not exceed {max} characters"
        )));
    }
    Ok(())
}

fn check_password_strength(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let strong = password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if !strong {
        return Err(AppError::validation(
            "password must contain uppercase, lowercase, number, and special character",
        ));
    }
    Ok(())
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .rsplit_once('.')
            .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
            .unwrap_or(false)
}
