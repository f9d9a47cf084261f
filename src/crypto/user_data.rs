//! AES-128-CBC decryption for WeChat encrypted user data

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::aes::{BlockCrypto, CbcCrypto, CipherKey};
use super::padding::PaddingMode;
use crate::error::CryptoError;
use crate::types::Watermark;

/// Decrypted user data with watermark
#[derive(Debug, Clone, serde::Deserialize)]
pub struct DecryptedUserData {
    /// Sensitive user data fields vary by scenario
    /// Common fields include: openId, unionId, nickName, gender, etc.
    #[serde(flatten)]
    pub data: serde_json::Value,
    /// Watermark for verification
    pub watermark: Watermark,
}

/// Decrypt WeChat encrypted user data
///
/// WeChat encrypts sensitive user data using AES-128-CBC with:
/// - Key: session_key (base64 decoded, 16 bytes)
/// - IV: iv sent alongside the data (base64 decoded, 16 bytes)
/// - Padding: PKCS#7
///
/// # Arguments
/// * `session_key` - Base64 encoded session key from login
/// * `encrypted_data` - Base64 encoded encrypted data from client
/// * `iv` - Base64 encoded IV from client
pub fn decrypt_user_data(
    session_key: &str,
    encrypted_data: &str,
    iv: &str,
) -> Result<DecryptedUserData, CryptoError> {
    let key = CipherKey::new(
        BASE64
            .decode(session_key)
            .map_err(CryptoError::base64("session_key"))?,
    );
    let encrypted = BASE64
        .decode(encrypted_data)
        .map_err(CryptoError::base64("encrypted_data"))?;
    let iv_bytes = BASE64.decode(iv).map_err(CryptoError::base64("iv"))?;

    // Session keys are always AES-128
    if key.len() != 16 {
        return Err(CryptoError::KeySetup(format!(
            "Invalid session_key length: expected 16, got {}",
            key.len()
        )));
    }

    let decrypted = CbcCrypto::new(&key, &iv_bytes, PaddingMode::Pkcs7).decrypt(&encrypted)?;
    Ok(serde_json::from_slice(&decrypted)?)
}

/// Verify watermark appid matches expected appid
pub fn verify_watermark(data: &DecryptedUserData, expected_appid: &str) -> Result<(), CryptoError> {
    if data.watermark.appid != expected_appid {
        return Err(CryptoError::IdentityMismatch {
            expected: expected_appid.to_string(),
            actual: data.watermark.appid.clone(),
        });
    }
    Ok(())
}
