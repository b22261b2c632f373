use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::utils::utc_now;

/// Claims the console cares about. The signature belongs to the backend and
/// cannot be verified here; these values only drive local short-circuits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
    pub sub: Option<String>,
    pub exp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenShape {
    /// Blank or not usable as an HTTP header value.
    Malformed,
    /// A JWT whose `exp` is in the past.
    Expired { at: DateTime<Utc> },
    /// A JWT that is still within its lifetime.
    Live { expires_at: Option<DateTime<Utc>> },
    /// Not a JWT; only the backend can judge it.
    Opaque,
}

pub fn inspect(token: &str) -> TokenShape {
    inspect_at(token, utc_now())
}

pub fn inspect_at(token: &str, now: DateTime<Utc>) -> TokenShape {
    if token.trim().is_empty() || !token.bytes().all(|b| b.is_ascii_graphic()) {
        return TokenShape::Malformed;
    }

    let claims = match decode_unverified(token) {
        Some(claims) => claims,
        None => return TokenShape::Opaque,
    };

    match claims.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single()) {
        Some(at) if at <= now => TokenShape::Expired { at },
        expires_at => TokenShape::Live { expires_at },
    }
}

fn decode_unverified(token: &str) -> Option<Claims> {
    if token.split('.').count() != 3 {
        return None;
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}
