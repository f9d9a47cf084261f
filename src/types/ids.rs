use std::fmt;

use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::crypto::CipherKey;
use crate::error::CryptoError;

/// Length of the EncodingAESKey configured on the WeChat console.
pub const ENCODING_AES_KEY_LEN: usize = 43;

// The platform generates keys whose last character carries non-zero
// trailing bits, which the strict standard engine rejects.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Server token shared with the platform for callback signatures
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Result<Self, String> {
        let token = token.into();
        if token.is_empty() {
            return Err("Token must not be empty".to_string());
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&"[REDACTED]").finish()
    }
}

/// EncodingAESKey (43 base64 characters without the trailing `=`)
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodingAesKey(String);

impl EncodingAesKey {
    pub fn new(key: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        if key.len() != ENCODING_AES_KEY_LEN {
            return Err(format!(
                "EncodingAESKey must be {} characters, got {}",
                ENCODING_AES_KEY_LEN,
                key.len()
            ));
        }
        if !key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
        {
            return Err("EncodingAESKey must only contain base64 characters".to_string());
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes the 32-byte AES key by appending the missing `=`.
    pub fn decode(&self) -> Result<CipherKey, CryptoError> {
        let padded = format!("{}=", self.0);
        let bytes = LENIENT_BASE64
            .decode(padded)
            .map_err(CryptoError::base64("EncodingAESKey"))?;
        if bytes.len() != 32 {
            return Err(CryptoError::KeySetup(format!(
                "EncodingAESKey must decode to 32 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(CipherKey::new(bytes))
    }
}

impl fmt::Debug for EncodingAesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EncodingAesKey").field(&"[REDACTED]").finish()
    }
}

/// Identity embedded in every callback frame: the AppID, CorpID or SuiteID
/// the message is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiverId(String);

impl ReceiverId {
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.is_empty() {
            return Err("ReceiverId must not be empty".to_string());
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
