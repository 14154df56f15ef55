use chromakey_common::{
    AuthError, CanonicalPassword, CodecError, GraphicalPasswordInput, User, decode,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::AuthService;

/// Login payload
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    /// Color pairs, either as a JSON list or a JSON string holding one
    pub graphical_password: Value,
}

/// A successful login
#[derive(Debug)]
pub struct LoginOutcome {
    pub user: User,
    /// Raw session token for the client
    pub token: String,
}

impl AuthService {
    /// Authenticate and open a session.
    ///
    /// Malformed or empty input is reported as such before the user is
    /// looked up, so it says nothing about the username. Every other
    /// failure (unknown user, unknown color, wrong password) is the same
    /// `InvalidCredentials`.
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AuthError> {
        let input = GraphicalPasswordInput::from_value(&request.graphical_password)?;
        let password = match decode(self.palette(), &input) {
            Ok(password) => Some(password),
            Err(CodecError::UnknownColor(_)) => None,
            Err(e) => return Err(e.into()),
        };

        let user = self.users.find_by_username(request.username.trim()).await?;

        let verified = match (&user, password) {
            (Some(user), Some(password)) => {
                self.verify(password, Some(user.credential.clone())).await?
            }
            (_, password) => {
                let password = password.unwrap_or_else(|| CanonicalPassword::new(""));
                self.verify(password, None).await?
            }
        };

        let user = match user {
            Some(user) if verified => user,
            _ => {
                warn!("Login failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self.sessions.establish(user.id).await?;
        info!(user_id = user.id, "Login succeeded");

        Ok(LoginOutcome { user, token })
    }

    /// End the session behind `token`
    #[instrument(skip_all)]
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.clear(token).await?;
        debug!("Session cleared");
        Ok(())
    }
}
