use chromakey_common::{AuthError, ProfileUpdate, User};
use tracing::{info, instrument};

use super::{AuthService, normalize_full_name, validate_bio};

impl AuthService {
    /// The user behind a session token
    pub async fn current_user(&self, token: Option<&str>) -> Result<User, AuthError> {
        let Some(token) = token else {
            return Err(AuthError::Unauthenticated);
        };
        let Some(user_id) = self.sessions.current_user(token).await? else {
            return Err(AuthError::Unauthenticated);
        };

        // A session can outlive its user record
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }

    /// Edit the profile of the session user
    #[instrument(skip_all)]
    pub async fn update_profile(
        &self,
        token: Option<&str>,
        mut update: ProfileUpdate,
    ) -> Result<User, AuthError> {
        if let Some(full_name) = update.full_name.as_deref() {
            update.full_name = Some(normalize_full_name(full_name)?);
        }
        if let Some(bio) = update.bio.as_deref() {
            validate_bio(bio)?;
        }

        let user = self.current_user(token).await?;
        let updated = self
            .users
            .update_profile(user.id, update)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        info!(user_id = updated.id, "Profile updated");

        Ok(updated)
    }
}
