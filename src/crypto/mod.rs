//! Cryptography primitives for the WeChat platform
//!
//! - [`padding`] - Zero / PKCS#5 / PKCS#7 block padding
//! - [`aes`] - AES-CBC and (interop-only) AES-ECB engines
//! - [`rsa`] - RSA key loading, encryption and signatures
//! - [`user_data`] - Mini-program encrypted user data
//! - [`refund`] - WeChat Pay refund notifications
//!
//! ## Security
//!
//! Session keys, API keys and AES keys should be handled securely and never
//! exposed to client-side code. [`CipherKey`] wipes its buffer on drop.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wechat_crypto::crypto::{BlockCrypto, CbcCrypto, CipherKey, PaddingMode};
//!
//! let key = CipherKey::new(key_bytes);
//! let cbc = CbcCrypto::new(&key, &iv, PaddingMode::Pkcs5);
//! let ciphertext = cbc.encrypt(b"hello")?;
//! assert_eq!(cbc.decrypt(&ciphertext)?, b"hello");
//! ```

pub mod aes;
mod ecb;
pub mod padding;
pub mod refund;
pub mod rsa;
pub mod user_data;

pub use crate::types::Watermark;
pub use self::aes::{BlockCrypto, CbcCrypto, CipherKey, EcbCrypto, BLOCK_SIZE};
pub use self::padding::{pad, unpad, PaddingMode};
pub use self::refund::decrypt_refund_notify;
pub use self::rsa::{DigestAlgorithm, PrivateKey, PublicKey, RsaKey};
pub use self::user_data::{decrypt_user_data, verify_watermark, DecryptedUserData};
