use chromakey_common::{AuthError, GraphicalPasswordInput, NewUser, User, decode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::{AuthService, normalize_full_name, valid_email, valid_username};

/// Registration payload
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    /// Color pairs, either as a JSON list or a JSON string holding one
    pub graphical_password: Value,
}

impl AuthService {
    /// Register a new user.
    ///
    /// Fails closed: a codec or field validation error aborts before any
    /// store write. Duplicate usernames/emails come back from the store as
    /// `DuplicateIdentity`.
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let input = GraphicalPasswordInput::from_value(&request.graphical_password)?;
        let password = decode(self.palette(), &input).inspect_err(|e| {
            warn!(kind = e.kind(), "Registration rejected: invalid graphical password");
        })?;

        let username = request.username.trim().to_string();
        if !valid_username(&username) {
            return Err(AuthError::InvalidInput(
                "username must be 3 to 32 characters of letters, digits, '.', '_' or '-'"
                    .to_string(),
            ));
        }
        let email = request.email.trim().to_string();
        if !valid_email(&email) {
            return Err(AuthError::InvalidInput("invalid email address".to_string()));
        }
        let full_name = normalize_full_name(&request.full_name)?;

        let credential = self.hash(password).await?;

        let user = self
            .users
            .create(NewUser {
                username,
                email,
                full_name,
                credential,
            })
            .await
            .inspect_err(|e| warn!(error = %e, "Registration rejected by user store"))?;

        info!(user_id = user.id, pairs = input.len(), "User registered");

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use chromakey_common::{AuthError, CodecError, IdentityField};
    use serde_json::json;

    #[tokio::test]
    async fn test_register_stores_only_hash() {
        let service = service();
        let user = service
            .register(register_request("john123", "john@gmail.com", red_green()))
            .await
            .unwrap();

        assert_eq!(user.username, "john123");
        assert!(user.credential.as_str().starts_with("$argon2id$"));
        assert!(!user.credential.as_str().contains("#FF0000"));

        let stored = service.users.find_by_username("john123").await.unwrap().unwrap();
        assert_eq!(stored.credential, user.credential);
    }

    #[tokio::test]
    async fn test_register_accepts_string_form() {
        let service = service();
        let password = json!(r##"[["#FF0000","#00FF00"],["#0000FF","#FFFF00"]]"##);
        let result = service
            .register(register_request("john123", "john@gmail.com", password))
            .await;
        tokio_test::assert_ok!(result);
    }

    #[tokio::test]
    async fn test_register_codec_errors_write_nothing() {
        let service = service();
        let cases = [
            (json!([]), "empty_input"),
            (json!([["#FF0000"]]), "malformed_input"),
            (json!("not json"), "malformed_input"),
            (json!([["#FF0000", "#ABCDEF"]]), "unknown_color"),
        ];

        for (password, kind) in cases {
            let err = service
                .register(register_request("john123", "john@gmail.com", password))
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::Codec(_)));
            assert_eq!(err.kind(), kind);
        }

        assert!(service.users.find_by_username("john123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_empty_is_empty_input() {
        let err = service()
            .register(register_request("john123", "john@gmail.com", json!([])))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Codec(CodecError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_register_field_validation() {
        let service = service();

        let err = service
            .register(register_request("x", "john@gmail.com", red_green()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));

        let err = service
            .register(register_request("john123", "not-an-email", red_green()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));

        let mut request = register_request("john123", "john@gmail.com", red_green());
        request.full_name = "  ".to_string();
        let err = service.register(request).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_register_duplicates() {
        let service = service();
        service
            .register(register_request("john123", "john@gmail.com", red_green()))
            .await
            .unwrap();

        let err = service
            .register(register_request("john123", "other@gmail.com", green_red()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::DuplicateIdentity(IdentityField::Username)
        ));

        let err = service
            .register(register_request("jane", "John@Gmail.com", green_red()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateIdentity(IdentityField::Email)));
    }
}
