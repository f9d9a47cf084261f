//! WeChat SDK cryptography for Rust
//!
//! The cryptographic layer shared by the Official Account, Mini Program,
//! Open Platform and WeChat Pay APIs. Transport, retries and endpoint
//! catalogs live elsewhere; this crate only turns bytes into bytes.
//!
//! ## Components
//!
//! | Component | Module |
//! |-----------|--------|
//! | Block padding (Zero, PKCS#5, PKCS#7) | [`crypto::padding`] |
//! | AES-CBC / AES-ECB engines | [`crypto::aes`] |
//! | RSA keys (PKCS#1, PKCS#8, X.509, PFX) | [`crypto::rsa`] |
//! | Callback message encryption and signatures | [`message`] |
//! | Mini-program user data | [`crypto::user_data`] |
//! | Refund notifications | [`crypto::refund`] |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wechat_crypto::message::{CallbackEnvelope, MessageCrypto};
//! use wechat_crypto::types::{EncodingAesKey, ReceiverId, Token};
//!
//! let crypto = MessageCrypto::builder()
//!     .token(Token::new("your_token")?)
//!     .encoding_aes_key(EncodingAesKey::new("your_43_character_encoding_aes_key_xxxxxxxx")?)
//!     .receiver_id(ReceiverId::new("wx1234567890abcdef")?)
//!     .build()?;
//!
//! // Inbound push
//! let envelope = CallbackEnvelope::new(timestamp, nonce, msg_signature, encrypt);
//! let message = crypto.decrypt_message(envelope)?;
//! println!("{}", message.payload_str()?);
//!
//! // Outbound reply
//! let reply = crypto.encrypt_message(b"<xml>...</xml>")?;
//! let body = reply.to_xml();
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`CryptoError`]:
//!
//! ```rust,ignore
//! use wechat_crypto::CryptoError;
//!
//! match crypto.decrypt_message(envelope) {
//!     Ok(message) => { /* handle message */ }
//!     Err(CryptoError::SignatureMismatch) => { /* reject: forged or stale */ }
//!     Err(CryptoError::IdentityMismatch { expected, actual }) => {
//!         eprintln!("message for {} delivered to {}", actual, expected);
//!     }
//!     Err(e) => eprintln!("callback rejected: {}", e),
//! }
//! ```

pub mod crypto;
pub mod error;
pub mod message;
pub mod random;
pub mod types;

pub use error::CryptoError;
pub use message::MessageCrypto;
