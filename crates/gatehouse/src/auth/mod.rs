//! Registration, login and profile flows.
//!
//! These compose the graphical password core (palette, codec, credential
//! verifier) with the user store and session provider. Nothing is written
//! to a store until the graphical password has been decoded and hashed.

mod login;
mod profile;
mod register;

pub use self::login::LoginRequest;
pub use self::register::RegisterRequest;

use chromakey_common::{
    AuthError, CanonicalPassword, CredentialRecord, CredentialVerifier, Palette,
    constants::limits,
};
use regex::Regex;
use std::sync::{Arc, LazyLock};

use crate::session::SessionProvider;
use crate::store::UserStore;

/// Authentication flows over pluggable stores
#[derive(Clone)]
pub struct AuthService {
    palette: Arc<Palette>,
    verifier: Arc<CredentialVerifier>,
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionProvider>,
}

impl AuthService {
    pub fn new(
        palette: Arc<Palette>,
        verifier: Arc<CredentialVerifier>,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            palette,
            verifier,
            users,
            sessions,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    pub fn session_ttl_secs(&self) -> u64 {
        self.sessions.ttl_secs()
    }

    /// Hash on the blocking pool
    async fn hash(&self, password: CanonicalPassword) -> Result<CredentialRecord, AuthError> {
        let verifier = self.verifier.clone();
        tokio::task::spawn_blocking(move || verifier.hash_for_storage(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("hashing task failed: {e}")))?
            .map_err(AuthError::from)
    }

    /// Verify on the blocking pool. `None` burns a decoy verification so an
    /// unknown user costs as much as a known one.
    async fn verify(
        &self,
        password: CanonicalPassword,
        record: Option<CredentialRecord>,
    ) -> Result<bool, AuthError> {
        let verifier = self.verifier.clone();
        tokio::task::spawn_blocking(move || match record {
            Some(record) => verifier.verify(&password, &record).unwrap_or_else(|e| {
                tracing::error!(error = %e, "Stored credential is unreadable");
                false
            }),
            None => verifier.verify_against_decoy(&password),
        })
        .await
        .map_err(|e| AuthError::Internal(format!("verification task failed: {e}")))
    }
}

// Compiled once; `None` only if a pattern fails to compile, which rejects all input
static USERNAME_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").ok());
static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

pub fn valid_username(username: &str) -> bool {
    (limits::USERNAME_MIN..=limits::USERNAME_MAX).contains(&username.len())
        && USERNAME_RE.as_ref().is_some_and(|re| re.is_match(username))
}

pub fn valid_email(email: &str) -> bool {
    email.len() <= limits::EMAIL_MAX
        && EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

/// Trimmed full name, if it fits the limits
pub fn normalize_full_name(full_name: &str) -> Result<String, AuthError> {
    let trimmed = full_name.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > limits::FULL_NAME_MAX {
        return Err(AuthError::InvalidInput(format!(
            "full name must be 1 to {} characters",
            limits::FULL_NAME_MAX
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_bio(bio: &str) -> Result<(), AuthError> {
    if bio.chars().count() > limits::BIO_MAX {
        return Err(AuthError::InvalidInput(format!(
            "bio must be at most {} characters",
            limits::BIO_MAX
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::session::MemorySessionStore;
    use crate::store::MemoryUserStore;
    use chromakey_common::HashParams;
    use serde_json::{Value, json};

    pub fn service() -> AuthService {
        AuthService::new(
            Arc::new(Palette::standard().unwrap()),
            Arc::new(
                CredentialVerifier::new(HashParams {
                    memory_kib: 1024,
                    iterations: 1,
                    parallelism: 1,
                })
                .unwrap(),
            ),
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemorySessionStore::new(300)),
        )
    }

    /// `[["#FF0000","#00FF00"]]`, canonical password "ab"
    pub fn red_green() -> Value {
        json!([["#FF0000", "#00FF00"]])
    }

    /// `[["#00FF00","#FF0000"]]`, canonical password "ba"
    pub fn green_red() -> Value {
        json!([["#00FF00", "#FF0000"]])
    }

    pub fn register_request(username: &str, email: &str, password: Value) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            full_name: "John Doe".to_string(),
            graphical_password: password,
        }
    }

    pub fn login_request(username: &str, password: Value) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            graphical_password: password,
        }
    }
}
