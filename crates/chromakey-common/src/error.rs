//! Common error types for Chromakey components.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected palette tables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("palette has {symbols} symbols but {colors} colors")]
    LengthMismatch { symbols: usize, colors: usize },

    #[error("palette is empty")]
    Empty,

    #[error("symbol {0:?} appears more than once")]
    DuplicateSymbol(char),

    #[error("color {0} appears more than once")]
    DuplicateColor(String),

    #[error("invalid color code {0:?} (expected #RRGGBB)")]
    InvalidColor(String),
}

/// Graphical password codec failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input could not be read as a list of color pairs
    #[error("malformed graphical password: {0}")]
    MalformedInput(String),

    /// No pairs were submitted
    #[error("graphical password is empty")]
    EmptyInput,

    /// A color code is not part of the palette
    #[error("unknown color {0:?}")]
    UnknownColor(String),

    /// A character has no color in the palette (encode direction)
    #[error("unknown symbol {0:?}")]
    UnknownSymbol(char),
}

impl CodecError {
    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "malformed_input",
            Self::EmptyInput => "empty_input",
            Self::UnknownColor(_) => "unknown_color",
            Self::UnknownSymbol(_) => "unknown_symbol",
        }
    }
}

/// Credential hashing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// Hash parameters were rejected
    #[error("invalid hashing parameters: {0}")]
    Params(String),

    /// Hash computation failed
    #[error("failed to hash credential: {0}")]
    Hash(String),

    /// A stored record is not a parsable hash string
    #[error("stored credential record is malformed: {0}")]
    MalformedRecord(String),
}

/// Identity field that collided with an existing user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityField {
    Username,
    Email,
}

impl std::fmt::Display for IdentityField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Username => f.write_str("username"),
            Self::Email => f.write_str("email"),
        }
    }
}

/// Flow-level errors surfaced to API callers
#[derive(Debug, Error)]
pub enum AuthError {
    /// Profile field validation failed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Graphical password could not be decoded
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Unknown user or wrong graphical password; the two are never distinguished
    #[error("Invalid username or graphical password")]
    InvalidCredentials,

    /// No valid session
    #[error("Authentication required")]
    Unauthenticated,

    /// Username or email already registered
    #[error("A user with this {0} already exists")]
    DuplicateIdentity(IdentityField),

    /// User/session store unavailable
    #[error("Store error: {0}")]
    Store(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Codec(_) => 400,
            Self::InvalidCredentials => 401,
            Self::Unauthenticated => 401,
            Self::DuplicateIdentity(_) => 409,
            Self::Store(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable kind, used as the `error` field of responses
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Codec(e) => e.kind(),
            Self::InvalidCredentials => "invalid_credentials",
            Self::Unauthenticated => "unauthenticated",
            Self::DuplicateIdentity(_) => "duplicate_identity",
            Self::Store(_) => "store_unavailable",
            Self::Internal(_) => "internal",
        }
    }

    /// Returns true if this error should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        Self::Internal(err.to_string())
    }
}
