//! Core types shared across Chromakey components.

use serde::{Deserialize, Serialize};

/// User identifier allocated by the user store
pub type UserId = u64;

/// A color code such as `#FF0000`.
///
/// Values are canonicalized on construction: surrounding whitespace is
/// removed and hex digits are upper-cased, so `" #ff0000"` and `"#FF0000"`
/// are the same code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ColorCode(String);

impl ColorCode {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for `#` followed by exactly six hex digits
    pub fn is_well_formed(&self) -> bool {
        let Some(hex) = self.0.strip_prefix('#') else {
            return false;
        };
        hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl From<String> for ColorCode {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for ColorCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<ColorCode> for String {
    fn from(value: ColorCode) -> Self {
        value.0
    }
}

impl std::fmt::Display for ColorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One selection in the graphical password UI.
///
/// Serialized as a two element array `[inner, outer]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(ColorCode, ColorCode)", into = "(ColorCode, ColorCode)")]
pub struct ColorPair {
    pub inner: ColorCode,
    pub outer: ColorCode,
}

impl ColorPair {
    pub fn new(inner: impl Into<ColorCode>, outer: impl Into<ColorCode>) -> Self {
        Self {
            inner: inner.into(),
            outer: outer.into(),
        }
    }
}

impl From<(ColorCode, ColorCode)> for ColorPair {
    fn from((inner, outer): (ColorCode, ColorCode)) -> Self {
        Self { inner, outer }
    }
}

impl From<ColorPair> for (ColorCode, ColorCode) {
    fn from(pair: ColorPair) -> Self {
        (pair.inner, pair.outer)
    }
}

/// Character password derived from a graphical password.
///
/// This is the secret that gets hashed; it is never serialized and its
/// `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct CanonicalPassword(String);

impl CanonicalPassword {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for CanonicalPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CanonicalPassword(<redacted>)")
    }
}

/// Salted one-way hash of a [`CanonicalPassword`] in PHC string format.
/// The only form of the secret that is ever persisted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialRecord(String);

impl CredentialRecord {
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CredentialRecord(<redacted>)")
    }
}

/// Persisted user record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub credential: CredentialRecord,
    /// Registration timestamp (Unix epoch seconds)
    pub created_at: i64,
}

impl User {
    /// Public projection (no credential)
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            bio: self.bio.clone(),
            created_at: self.created_at,
        }
    }
}

/// User data returned to API clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: i64,
}

/// Fields for a user about to be created
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub credential: CredentialRecord,
}

impl NewUser {
    /// Materialize the record once the store has allocated an id
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            full_name: self.full_name,
            bio: None,
            credential: self.credential,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Profile edits. `None` leaves a field unchanged; an empty bio clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    pub fn apply(self, user: &mut User) {
        if let Some(full_name) = self.full_name {
            user.full_name = full_name;
        }
        if let Some(bio) = self.bio {
            user.bio = if bio.is_empty() { None } else { Some(bio) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_code_canonical_form() {
        assert_eq!(ColorCode::new(" #ff00aa "), ColorCode::new("#FF00AA"));
        assert!(ColorCode::new("#ff00aa").is_well_formed());
        assert!(!ColorCode::new("FF00AA").is_well_formed());
        assert!(!ColorCode::new("#FF00A").is_well_formed());
        assert!(!ColorCode::new("#GG0000").is_well_formed());
    }

    #[test]
    fn test_color_pair_serializes_as_array() {
        let pair = ColorPair::new("#ff0000", "#00FF00");
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, r##"["#FF0000","#00FF00"]"##);
    }

    #[test]
    fn test_secrets_are_redacted() {
        let password = CanonicalPassword::new("abcd");
        assert!(!format!("{password:?}").contains("abcd"));

        let record = CredentialRecord::from_phc("$argon2id$v=19$secret");
        assert!(!format!("{record:?}").contains("secret"));
    }

    #[test]
    fn test_user_view_omits_credential() {
        let user = NewUser {
            username: "john123".into(),
            email: "john@example.com".into(),
            full_name: "John Doe".into(),
            credential: CredentialRecord::from_phc("$argon2id$hash"),
        }
        .into_user(7);

        let json = serde_json::to_value(user.view()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["username"], "john123");
        assert!(json.get("credential").is_none());
        assert!(json.get("bio").is_none());
    }

    #[test]
    fn test_profile_update_apply() {
        let mut user = NewUser {
            username: "john123".into(),
            email: "john@example.com".into(),
            full_name: "John Doe".into(),
            credential: CredentialRecord::from_phc("x"),
        }
        .into_user(1);

        ProfileUpdate {
            full_name: None,
            bio: Some("Painter".into()),
        }
        .apply(&mut user);
        assert_eq!(user.full_name, "John Doe");
        assert_eq!(user.bio.as_deref(), Some("Painter"));

        ProfileUpdate {
            full_name: Some("Johnny".into()),
            bio: Some(String::new()),
        }
        .apply(&mut user);
        assert_eq!(user.full_name, "Johnny");
        assert_eq!(user.bio, None);
    }
}
