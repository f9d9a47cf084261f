use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use wechat_crypto::crypto::{
    decrypt_user_data, verify_watermark, BlockCrypto, CbcCrypto, CipherKey, DecryptedUserData,
    PaddingMode, Watermark,
};
use wechat_crypto::CryptoError;

const SESSION_KEY: [u8; 16] = *b"1234567890123456";
const IV: [u8; 16] = *b"abcdefghijklmnop";

/// Encrypts `plaintext` the way the mini-program client does.
fn encrypt_user_data(plaintext: &str) -> (String, String, String) {
    let encrypted = CipherKey::scoped(SESSION_KEY.to_vec(), |key| {
        CbcCrypto::new(key, &IV, PaddingMode::Pkcs7)
            .encrypt(plaintext.as_bytes())
            .unwrap()
    });
    (
        BASE64.encode(SESSION_KEY),
        BASE64.encode(encrypted),
        BASE64.encode(IV),
    )
}

fn sample_data(appid: &str) -> DecryptedUserData {
    DecryptedUserData {
        data: serde_json::json!({"openId": "o123"}),
        watermark: Watermark {
            timestamp: 1234567890,
            appid: appid.to_string(),
        },
    }
}

#[test]
fn test_decrypt_phone_number() {
    let plaintext = r#"{"phoneNumber":"13800138000","purePhoneNumber":"13800138000","countryCode":"86","watermark":{"timestamp":1700000000,"appid":"wx1234567890abcdef"}}"#;
    let (session_key, encrypted_data, iv) = encrypt_user_data(plaintext);

    let data = decrypt_user_data(&session_key, &encrypted_data, &iv).unwrap();
    assert_eq!(data.data["phoneNumber"], "13800138000");
    assert_eq!(data.data["countryCode"], "86");
    assert_eq!(data.watermark.timestamp, 1700000000);
    verify_watermark(&data, "wx1234567890abcdef").unwrap();
}

#[test]
fn test_decrypt_user_info() {
    let plaintext = r#"{"openId":"oGZUI0egBJY1zhBYw2KhdUfwVJJE","nickName":"Band","gender":1,"unionId":"ocMvos6NjeKLIBqg5Mr9QjxrP1FA","watermark":{"timestamp":1477314187,"appid":"wx4f4bc4dec97d474b"}}"#;
    let (session_key, encrypted_data, iv) = encrypt_user_data(plaintext);

    let data = decrypt_user_data(&session_key, &encrypted_data, &iv).unwrap();
    assert_eq!(data.data["nickName"], "Band");
    assert_eq!(data.data["gender"], 1);
    assert_eq!(data.watermark.appid, "wx4f4bc4dec97d474b");
}

#[test]
fn test_block_aligned_plaintext() {
    // 48 bytes: PKCS#7 adds a whole block
    let plaintext = r#"{"a":"1","watermark":{"timestamp":1,"appid":""}}"#;
    assert_eq!(plaintext.len(), 48);
    let (session_key, encrypted_data, iv) = encrypt_user_data(plaintext);
    let encrypted = BASE64.decode(&encrypted_data).unwrap();
    assert_eq!(encrypted.len(), 64);

    let data = decrypt_user_data(&session_key, &encrypted_data, &iv).unwrap();
    assert_eq!(data.data["a"], "1");
}

#[test]
fn test_missing_watermark_is_json_error() {
    let (session_key, encrypted_data, iv) = encrypt_user_data(r#"{"openId":"o123"}"#);
    let err = decrypt_user_data(&session_key, &encrypted_data, &iv).unwrap_err();
    assert!(matches!(err, CryptoError::Json(_)));
}

#[test]
fn test_wrong_session_key_is_rejected() {
    let (_, encrypted_data, iv) = encrypt_user_data(r#"{"watermark":{"timestamp":1,"appid":"wx"}}"#);
    let other_key = BASE64.encode(b"6543210987654321");
    assert!(decrypt_user_data(&other_key, &encrypted_data, &iv).is_err());
}

#[test]
fn test_invalid_base64_iv() {
    let result = decrypt_user_data(
        "MTIzNDU2Nzg5MDEyMzQ1Ng==",
        "MTIzNDU2Nzg5MDEyMzQ1Ng==",
        "not-valid!!!",
    );
    assert!(matches!(result, Err(CryptoError::Base64 { field: "iv", .. })));
}

#[test]
fn test_invalid_key_length() {
    let result = decrypt_user_data(
        "MTIzNDU2Nzg5",
        "MTIzNDU2Nzg5MDEyMzQ1Ng==",
        "MTIzNDU2Nzg5MDEyMzQ1Ng==",
    );
    let err = result.unwrap_err();
    assert!(matches!(&err, CryptoError::KeySetup(_)));
    assert!(err.to_string().contains("session_key"));
}

#[test]
fn test_invalid_iv_length() {
    let result = decrypt_user_data(
        "MTIzNDU2Nzg5MDEyMzQ1Ng==",
        "MTIzNDU2Nzg5MDEyMzQ1Ng==",
        "MTIzNDU2",
    );
    assert!(matches!(
        result,
        Err(CryptoError::InvalidIvLength {
            expected: 16,
            actual: 6
        })
    ));
}

#[test]
fn test_partial_block_encrypted_data() {
    let result = decrypt_user_data(
        "MTIzNDU2Nzg5MDEyMzQ1Ng==",
        "MTIzNDU2Nzg5",
        "MTIzNDU2Nzg5MDEyMzQ1Ng==",
    );
    assert!(matches!(result, Err(CryptoError::InvalidBlockLength(9))));
}

#[test]
fn test_empty_session_key() {
    let result = decrypt_user_data("", "data", "MTIzNDU2Nzg5MDEyMzQ1Ng==");
    assert!(result.is_err());
}

#[test]
fn test_verify_watermark_success() {
    assert!(verify_watermark(&sample_data("wx1234567890"), "wx1234567890").is_ok());
}

#[test]
fn test_verify_watermark_mismatch() {
    let err = verify_watermark(&sample_data("wx1234567890"), "wx9999999999").unwrap_err();
    match err {
        CryptoError::IdentityMismatch { expected, actual } => {
            assert_eq!(expected, "wx9999999999");
            assert_eq!(actual, "wx1234567890");
        }
        other => panic!("expected IdentityMismatch, got {:?}", other),
    }
}
