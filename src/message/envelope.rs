use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// An inbound encrypted callback, as received from the platform.
///
/// The timestamp is kept as the decimal string that was received because
/// the signature covers its exact text.
///
/// The declared identity travels inside the encrypted frame, so it is not
/// part of the envelope. It is read during decryption, checked against the
/// configured receiver id and returned as [`DecryptedMessage::receiver_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEnvelope {
    timestamp: String,
    nonce: String,
    msg_signature: String,
    encrypt: String,
}

impl CallbackEnvelope {
    pub fn new(
        timestamp: impl Into<String>,
        nonce: impl Into<String>,
        msg_signature: impl Into<String>,
        encrypt: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            nonce: nonce.into(),
            msg_signature: msg_signature.into(),
            encrypt: encrypt.into(),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn msg_signature(&self) -> &str {
        &self.msg_signature
    }

    /// Base64 ciphertext.
    pub fn encrypt(&self) -> &str {
        &self.encrypt
    }
}

/// Verified and decrypted callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedMessage {
    pub payload: Vec<u8>,
    /// Identity declared inside the frame; already checked against the
    /// configured receiver id.
    pub receiver_id: String,
}

impl DecryptedMessage {
    pub fn payload_str(&self) -> Result<&str, CryptoError> {
        std::str::from_utf8(&self.payload)
            .map_err(|_| CryptoError::FrameCorrupt("payload is not valid UTF-8".to_string()))
    }
}

/// Encrypted body of a JSON-format callback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EncryptedBody {
    #[serde(rename = "ToUserName", default)]
    pub to_user_name: Option<String>,
    #[serde(rename = "Encrypt")]
    pub encrypt: String,
}

/// Encrypted and signed reply, ready to be returned to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackReply {
    #[serde(rename = "Encrypt")]
    pub encrypt: String,
    #[serde(rename = "MsgSignature")]
    pub msg_signature: String,
    #[serde(rename = "TimeStamp")]
    pub timestamp: i64,
    #[serde(rename = "Nonce")]
    pub nonce: String,
}

impl CallbackReply {
    /// Render the XML reply envelope.
    pub fn to_xml(&self) -> String {
        format!(
            "<xml><Encrypt><![CDATA[{}]]></Encrypt><MsgSignature><![CDATA[{}]]></MsgSignature><TimeStamp>{}</TimeStamp><Nonce><![CDATA[{}]]></Nonce></xml>",
            self.encrypt, self.msg_signature, self.timestamp, self.nonce
        )
    }

    /// Render the JSON reply envelope.
    pub fn to_json(&self) -> Result<String, CryptoError> {
        Ok(serde_json::to_string(self)?)
    }
}
