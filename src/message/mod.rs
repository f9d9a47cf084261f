//! Callback message encryption and signatures
//!
//! Implements the "safe mode" protocol the platform uses for pushed events
//! and replies:
//!
//! - **Inbound**: verify `msg_signature = SHA1(sort(token, timestamp, nonce, encrypt))`,
//!   AES-256-CBC decrypt `encrypt` (IV = first 16 key bytes, PKCS#7 to 32 bytes),
//!   unframe and check the receiver id.
//! - **Outbound**: frame the payload with 16 random bytes, encrypt, base64
//!   encode and sign with a fresh timestamp and nonce.
//!
//! Each call is independent. No replay window is kept here; a transport
//! that needs replay protection should track recently seen nonces.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wechat_crypto::message::{CallbackQuery, MessageCrypto};
//! use wechat_crypto::types::{EncodingAesKey, ReceiverId, Token};
//!
//! let crypto = MessageCrypto::builder()
//!     .token(Token::new("token")?)
//!     .encoding_aes_key(EncodingAesKey::new(encoding_aes_key)?)
//!     .receiver_id(ReceiverId::new("wx1234567890abcdef")?)
//!     .build()?;
//!
//! let query = CallbackQuery::from_uri(request.uri())?;
//! let message = crypto.decrypt_message(query.envelope(body.encrypt)?)?;
//! let reply = crypto.encrypt_message(b"<xml>...</xml>")?;
//! ```

mod builder;
mod envelope;
mod frame;
mod query;
pub mod signature;

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use log::{debug, warn};
use rand::{CryptoRng, RngCore};

use crate::crypto::{BlockCrypto, CbcCrypto, CipherKey, PaddingMode, BLOCK_SIZE};
use crate::error::CryptoError;
use crate::random::{self, SecureRandom};
use crate::types::{EncodingAesKey, ReceiverId, Token};

pub use builder::MessageCryptoBuilder;
pub use envelope::{CallbackEnvelope, CallbackReply, DecryptedMessage, EncryptedBody};
pub use query::CallbackQuery;

/// Callback crypto for one configured account.
///
/// Immutable after construction and safe to share across threads.
pub struct MessageCrypto {
    token: Token,
    key: CipherKey,
    receiver_id: ReceiverId,
}

impl fmt::Debug for MessageCrypto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageCrypto")
            .field("token", &self.token)
            .field("key", &self.key)
            .field("receiver_id", &self.receiver_id)
            .finish()
    }
}

impl MessageCrypto {
    pub fn builder() -> MessageCryptoBuilder {
        MessageCryptoBuilder::default()
    }

    pub fn new(
        token: Token,
        encoding_aes_key: &EncodingAesKey,
        receiver_id: ReceiverId,
    ) -> Result<Self, CryptoError> {
        Ok(Self {
            token,
            key: encoding_aes_key.decode()?,
            receiver_id,
        })
    }

    pub fn receiver_id(&self) -> &ReceiverId {
        &self.receiver_id
    }

    fn cipher(&self) -> CbcCrypto<'_> {
        CbcCrypto::new(
            &self.key,
            &self.key.as_bytes()[..BLOCK_SIZE],
            PaddingMode::Pkcs7,
        )
    }

    /// Signature over `(token, timestamp, nonce, encrypt)`.
    pub fn signature(&self, timestamp: &str, nonce: &str, encrypt: &str) -> String {
        signature::sign(&[self.token.as_str(), timestamp, nonce, encrypt])
    }

    /// Answer the plain-mode server URL check.
    ///
    /// Returns the `echostr` to echo back when `signature` matches
    /// `(token, timestamp, nonce)`.
    pub fn verify_url<'q>(&self, query: &'q CallbackQuery) -> Result<&'q str, CryptoError> {
        let provided = query
            .signature
            .as_deref()
            .ok_or(CryptoError::MissingField("signature"))?;
        let echostr = query
            .echostr
            .as_deref()
            .ok_or(CryptoError::MissingField("echostr"))?;

        if !signature::verify(
            &[self.token.as_str(), &query.timestamp, &query.nonce],
            provided,
        ) {
            warn!("[WechatCrypto] URL verification signature mismatch");
            return Err(CryptoError::SignatureMismatch);
        }
        Ok(echostr)
    }

    /// Answer the safe-mode server URL check, where `echostr` is itself an
    /// encrypted frame signed with `msg_signature`.
    pub fn decrypt_echostr(&self, query: &CallbackQuery) -> Result<String, CryptoError> {
        let echostr = query
            .echostr
            .as_deref()
            .ok_or(CryptoError::MissingField("echostr"))?;
        let message = self.decrypt_message(query.envelope(echostr)?)?;
        Ok(message.payload_str()?.to_string())
    }

    /// Verify, decrypt and unframe an inbound callback.
    pub fn decrypt_message(
        &self,
        envelope: CallbackEnvelope,
    ) -> Result<DecryptedMessage, CryptoError> {
        debug!(
            "[WechatCrypto] received callback ({} bytes encrypted)",
            envelope.encrypt().len()
        );

        if !signature::verify(
            &[
                self.token.as_str(),
                envelope.timestamp(),
                envelope.nonce(),
                envelope.encrypt(),
            ],
            envelope.msg_signature(),
        ) {
            warn!("[WechatCrypto] callback msg_signature mismatch");
            return Err(CryptoError::SignatureMismatch);
        }
        debug!("[WechatCrypto] signature checked");

        let ciphertext = BASE64
            .decode(envelope.encrypt())
            .map_err(CryptoError::base64("Encrypt"))?;
        let plain = self.cipher().decrypt(&ciphertext).map_err(|e| {
            debug!("[WechatCrypto] callback decryption failed: {}", e);
            CryptoError::DecryptionFailed
        })?;
        debug!("[WechatCrypto] decrypted");

        let (payload, receiver_id) = frame::decode(&plain)?;
        if receiver_id != self.receiver_id.as_str() {
            warn!("[WechatCrypto] callback addressed to another receiver");
            return Err(CryptoError::IdentityMismatch {
                expected: self.receiver_id.as_str().to_string(),
                actual: receiver_id,
            });
        }
        debug!("[WechatCrypto] unframed {} byte payload", payload.len());

        Ok(DecryptedMessage {
            payload,
            receiver_id,
        })
    }

    /// Encrypt and sign a reply with OS randomness and the current time.
    pub fn encrypt_message(&self, payload: &[u8]) -> Result<CallbackReply, CryptoError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        self.encrypt_message_with(&mut SecureRandom::rng(), timestamp, payload)
    }

    /// Encrypt and sign a reply with an injected randomness source and
    /// timestamp.
    pub fn encrypt_message_with<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        timestamp: i64,
        payload: &[u8],
    ) -> Result<CallbackReply, CryptoError> {
        let prefix = random::bytes::<{ frame::RANDOM_LEN }, R>(rng);
        let framed = frame::encode(&prefix, payload, self.receiver_id.as_str());

        let encrypt = BASE64.encode(self.cipher().encrypt(&framed)?);
        let nonce = random::nonce(rng);
        let timestamp_str = timestamp.to_string();
        let msg_signature = self.signature(&timestamp_str, &nonce, &encrypt);
        debug!(
            "[WechatCrypto] signed reply ({} byte payload)",
            payload.len()
        );

        Ok(CallbackReply {
            encrypt,
            msg_signature,
            timestamp,
            nonce,
        })
    }
}
