//! WeChat Pay refund notification decryption
//!
//! The `req_info` field of a refund notification is AES-256-ECB encrypted
//! with PKCS#7 padding. The key is the lowercase hex MD5 of the merchant API
//! key, used as 32 ASCII bytes.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use md5::{Digest, Md5};

use super::aes::{BlockCrypto, CipherKey, EcbCrypto};
use super::padding::PaddingMode;
use crate::error::CryptoError;

fn refund_key(api_key: &str) -> CipherKey {
    CipherKey::new(hex::encode(Md5::digest(api_key.as_bytes())).into_bytes())
}

/// Decrypt the base64 `req_info` of a refund notification into its XML.
pub fn decrypt_refund_notify(api_key: &str, req_info: &str) -> Result<Vec<u8>, CryptoError> {
    let ciphertext = BASE64
        .decode(req_info)
        .map_err(CryptoError::base64("req_info"))?;

    let key = refund_key(api_key);
    EcbCrypto::new(&key, PaddingMode::Pkcs7).decrypt(&ciphertext)
}
