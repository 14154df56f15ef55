//! Shared constants for Chromakey components.

/// Default Redis connection URL
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default Gatehouse HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Default session validity (24 hours)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

/// Longest accepted session validity (365 days)
pub const MAX_SESSION_TTL_SECS: u64 = 365 * 86_400;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "chromakey_session";

/// Number of colors in one graphical password selection
pub const PAIR_ARITY: usize = 2;

/// Symbols of the standard palette, in mapping order.
pub const STANDARD_SYMBOLS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Colors of the standard palette. Position `i` maps to symbol `i` of
/// [`STANDARD_SYMBOLS`]; reordering invalidates every stored credential.
pub const STANDARD_COLORS: [&str; 62] = [
    "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
    "#FFA500", "#800080", "#008000", "#FFC0CB", "#A52A2A", "#FFD700",
    "#FF4500", "#DA70D6", "#7FFF00", "#4682B4", "#FF69B4", "#9ACD32",
    "#20B2AA", "#9932CC", "#FFDAB9", "#00CED1", "#FF6347", "#ADFF2F",
    "#BA55D3", "#98FB98", "#F08080", "#7B68EE", "#FFE4B5", "#40E0D0",
    "#C71585", "#66CDAA", "#FFDEAD", "#00FA9A", "#DC143C", "#F0E68C",
    "#6495ED", "#FFF0F5", "#228B22", "#DAA520", "#6A5ACD", "#F5DEB3",
    "#4169E1", "#FA8072", "#2E8B57", "#EEE8AA", "#B22222", "#87CEEB",
    "#9400D3", "#F4A460", "#6B8E23", "#FFB6C1", "#483D8B", "#FF8C00",
    "#90EE90", "#BC8F8F", "#8B008B", "#556B2F", "#FFEBCD", "#1E90FF",
    "#FFFACD", "#D2691E",
];

/// Profile field limits
pub mod limits {
    /// Minimum username length
    pub const USERNAME_MIN: usize = 3;

    /// Maximum username length
    pub const USERNAME_MAX: usize = 32;

    /// Maximum email length
    pub const EMAIL_MAX: usize = 254;

    /// Maximum full name length (after trimming)
    pub const FULL_NAME_MAX: usize = 100;

    /// Maximum bio length
    pub const BIO_MAX: usize = 500;
}

/// Redis key prefixes
pub mod redis_keys {
    /// User record: user:{id}
    pub const USER_PREFIX: &str = "user:";

    /// Username index: username:{username} -> id
    pub const USERNAME_PREFIX: &str = "username:";

    /// Email index: email:{lowercased email} -> id
    pub const EMAIL_PREFIX: &str = "email:";

    /// User id sequence
    pub const USER_ID_SEQUENCE: &str = "users:next_id";

    /// Session: session:{sha256(token)}
    pub const SESSION_PREFIX: &str = "session:";
}
