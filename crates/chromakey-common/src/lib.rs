//! # Chromakey Common
//!
//! The graphical password core shared across Chromakey components.
//!
//! ## Modules
//! - `palette` - Fixed symbol/color bijection
//! - `codec` - Color pair sequence to canonical password
//! - `credential` - Salted Argon2id hashing and verification
//! - `types` - Core data structures (ColorPair, User, etc.)
//! - `error` - Common error types
//! - `constants` - Shared configuration constants

pub mod codec;
pub mod constants;
pub mod credential;
pub mod error;
pub mod palette;
pub mod types;

pub use codec::{GraphicalPasswordInput, decode, encode};
pub use credential::{CredentialVerifier, HashParams};
pub use error::{AuthError, CodecError, CredentialError, IdentityField, PaletteError};
pub use palette::Palette;
pub use types::*;
