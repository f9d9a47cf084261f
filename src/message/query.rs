use percent_encoding::percent_decode_str;

use super::envelope::CallbackEnvelope;
use crate::error::CryptoError;

/// Query parameters of a callback request.
///
/// Values are percent-decoded. A `+` is kept as-is rather than read as a
/// space, because base64 fields (`echostr`) may carry it unescaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackQuery {
    pub timestamp: String,
    pub nonce: String,
    pub signature: Option<String>,
    pub msg_signature: Option<String>,
    pub echostr: Option<String>,
    pub encrypt_type: Option<String>,
    pub openid: Option<String>,
}

impl CallbackQuery {
    /// Parse a raw query string (without the leading `?`).
    pub fn parse(query: &str) -> Result<Self, CryptoError> {
        let mut timestamp = None;
        let mut nonce = None;
        let mut parsed = Self::default();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = percent_decode_str(value)
                .decode_utf8()
                .map_err(|_| CryptoError::InvalidQuery(format!("{} is not valid UTF-8", key)))?
                .into_owned();

            match key {
                "timestamp" => timestamp = Some(value),
                "nonce" => nonce = Some(value),
                "signature" => parsed.signature = Some(value),
                "msg_signature" => parsed.msg_signature = Some(value),
                "echostr" => parsed.echostr = Some(value),
                "encrypt_type" => parsed.encrypt_type = Some(value),
                "openid" => parsed.openid = Some(value),
                _ => {}
            }
        }

        parsed.timestamp = timestamp.ok_or(CryptoError::MissingField("timestamp"))?;
        parsed.nonce = nonce.ok_or(CryptoError::MissingField("nonce"))?;
        Ok(parsed)
    }

    pub fn from_uri(uri: &http::Uri) -> Result<Self, CryptoError> {
        Self::parse(uri.query().unwrap_or(""))
    }

    /// Whether the platform sent this callback in safe (AES) mode.
    pub fn is_encrypted(&self) -> bool {
        self.encrypt_type.as_deref() == Some("aes")
    }

    /// Pair the query's signing fields with a ciphertext taken from the body.
    pub fn envelope(&self, encrypt: impl Into<String>) -> Result<CallbackEnvelope, CryptoError> {
        let msg_signature = self
            .msg_signature
            .as_deref()
            .ok_or(CryptoError::MissingField("msg_signature"))?;
        Ok(CallbackEnvelope::new(
            self.timestamp.as_str(),
            self.nonce.as_str(),
            msg_signature,
            encrypt,
        ))
    }
}
