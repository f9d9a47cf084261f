use serde::{Deserialize, Serialize};

/// Watermark embedded in decrypted mini-program user data.
///
/// Carries the AppID that encrypted the payload, so callers can confirm the
/// data was issued for their own mini program.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Watermark {
    /// Timestamp when data was encrypted
    pub timestamp: i64,
    /// AppID that encrypted the data
    pub appid: String,
}
