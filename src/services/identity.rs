//! Recover the GitHub username from a session token.
//!
//! SECURITY
//! ========
//! Without `USER_TOKEN_SECRET` the payload is base64-decoded and trusted as-is;
//! the only protection is the remote auth check that ran first. With a secret
//! the token must be an HS256 JWT whose signature verifies before any claim is
//! read.

use base64::Engine as _;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

/// Claims the page needs from the session token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub github_user: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("token signature rejected: {0}")]
    Signature(String),
    #[error("token has no githubUser claim")]
    MissingUser,
}

pub struct IdentityDecoder {
    key: Option<DecodingKey>,
    validation: Validation,
}

impl IdentityDecoder {
    /// Build a decoder; `Some(secret)` enables signature verification.
    #[must_use]
    pub fn new(secret: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Upstream tokens carry no `exp`.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        Self { key: secret.map(|s| DecodingKey::from_secret(s.as_bytes())), validation }
    }

    #[must_use]
    pub fn verifies_signature(&self) -> bool {
        self.key.is_some()
    }

    /// Decode `token` and return its claims.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the token is not a three-part JWT, its
    /// payload is not JSON, the signature does not verify (verified mode), or
    /// `githubUser` is missing or empty.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, IdentityError> {
        let claims = match &self.key {
            Some(key) => jsonwebtoken::decode::<SessionClaims>(token, key, &self.validation)
                .map(|data| data.claims)
                .map_err(|e| match e.kind() {
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => IdentityError::Signature(e.to_string()),
                    jsonwebtoken::errors::ErrorKind::Json(_) => IdentityError::MissingUser,
                    _ => IdentityError::Malformed(e.to_string()),
                })?,
            None => decode_unverified(token)?,
        };

        if claims.github_user.trim().is_empty() {
            return Err(IdentityError::MissingUser);
        }
        Ok(claims)
    }
}

fn decode_unverified(token: &str) -> Result<SessionClaims, IdentityError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(IdentityError::Malformed("expected three dot-separated segments".into()));
    }
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| IdentityError::Malformed(format!("base64 decode failed: {e}")))?;
    let value: serde_json::Value =
        serde_json::from_slice(&payload).map_err(|e| IdentityError::Malformed(format!("JSON parse failed: {e}")))?;
    serde_json::from_value(value).map_err(|_| IdentityError::MissingUser)
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
