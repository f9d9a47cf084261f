use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use wechat_crypto::crypto::{
    decrypt_refund_notify, BlockCrypto, CbcCrypto, CipherKey, EcbCrypto, PaddingMode,
};
use wechat_crypto::CryptoError;

// NIST SP 800-38A, F.1.1 / F.2.1
const NIST_KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";
const NIST_IV: &str = "000102030405060708090a0b0c0d0e0f";
const NIST_PLAIN: &str = "6bc1bee22e409f96e93d7e117393172a";
const NIST_ECB: &str = "3ad77bb40d7a3660a89ecaf32466ef97";
const NIST_CBC: &str = "7649abac8119b246cee98e9b12e9197d";

fn unhex(s: &str) -> Vec<u8> {
    hex::decode(s).unwrap()
}

fn plaintext(len: usize) -> Vec<u8> {
    // No zero bytes, so zero padding round-trips too
    (0..len).map(|i| (i % 251) as u8 + 1).collect()
}

fn lengths() -> impl Iterator<Item = usize> {
    (0..=64).chain((65..4096).step_by(37)).chain([4095, 4096])
}

#[test]
fn test_cbc_known_answer() {
    let key = CipherKey::new(unhex(NIST_KEY));
    let iv = unhex(NIST_IV);
    let ciphertext = CbcCrypto::new(&key, &iv, PaddingMode::Pkcs5)
        .encrypt(&unhex(NIST_PLAIN))
        .unwrap();
    assert_eq!(ciphertext.len(), 32);
    assert_eq!(hex::encode(&ciphertext[..16]), NIST_CBC);
}

#[test]
fn test_ecb_known_answer() {
    let key = CipherKey::new(unhex(NIST_KEY));
    let ciphertext = EcbCrypto::new(&key, PaddingMode::Pkcs5)
        .encrypt(&unhex(NIST_PLAIN))
        .unwrap();
    assert_eq!(hex::encode(&ciphertext[..16]), NIST_ECB);
}

#[test]
fn test_ecb_identical_blocks_leak() {
    let key = CipherKey::new(vec![3u8; 32]);
    let ciphertext = EcbCrypto::new(&key, PaddingMode::Pkcs5)
        .encrypt(&[0x41u8; 32])
        .unwrap();
    assert_eq!(ciphertext[..16], ciphertext[16..32]);
}

#[test]
fn test_cbc_round_trip_all_modes() {
    let iv = [9u8; 16];
    for key_len in [16usize, 24, 32] {
        let key = CipherKey::new(vec![0x42u8; key_len]);
        for mode in [PaddingMode::Zero, PaddingMode::Pkcs5, PaddingMode::Pkcs7] {
            if key_len == 24 && mode == PaddingMode::Pkcs7 {
                continue;
            }
            let cbc = CbcCrypto::new(&key, &iv, mode);
            for len in lengths() {
                let data = plaintext(len);
                let ciphertext = cbc.encrypt(&data).unwrap();
                assert_eq!(
                    cbc.decrypt(&ciphertext).unwrap(),
                    data,
                    "key {} mode {:?} len {}",
                    key_len,
                    mode,
                    len
                );
            }
        }
    }
}

#[test]
fn test_ecb_round_trip_all_modes() {
    for key_len in [16usize, 24, 32] {
        let key = CipherKey::new(vec![0x24u8; key_len]);
        for mode in [PaddingMode::Zero, PaddingMode::Pkcs5, PaddingMode::Pkcs7] {
            if key_len == 24 && mode == PaddingMode::Pkcs7 {
                continue;
            }
            let ecb = EcbCrypto::new(&key, mode);
            for len in lengths() {
                let data = plaintext(len);
                let ciphertext = ecb.encrypt(&data).unwrap();
                assert_eq!(
                    ecb.decrypt(&ciphertext).unwrap(),
                    data,
                    "key {} mode {:?} len {}",
                    key_len,
                    mode,
                    len
                );
            }
        }
    }
}

#[test]
fn test_engines_behind_trait_object() {
    let key = CipherKey::new(vec![1u8; 16]);
    let iv = [2u8; 16];
    let engines: Vec<Box<dyn BlockCrypto + '_>> = vec![
        Box::new(CbcCrypto::new(&key, &iv, PaddingMode::Pkcs5)),
        Box::new(EcbCrypto::new(&key, PaddingMode::Pkcs5)),
    ];
    for engine in &engines {
        let ciphertext = engine.encrypt(b"dyn").unwrap();
        assert_eq!(engine.decrypt(&ciphertext).unwrap(), b"dyn");
    }
}

#[test]
fn test_engine_shared_across_threads() {
    let key = CipherKey::new(vec![5u8; 32]);
    let iv = [6u8; 16];
    let cbc = CbcCrypto::new(&key, &iv, PaddingMode::Pkcs7);
    let cbc = &cbc;

    std::thread::scope(|s| {
        for t in 0..4u8 {
            s.spawn(move || {
                let data = vec![t + 1; 100];
                let ciphertext = cbc.encrypt(&data).unwrap();
                assert_eq!(cbc.decrypt(&ciphertext).unwrap(), data);
            });
        }
    });
}

#[test]
fn test_cbc_decrypt_partial_block() {
    let key = CipherKey::new(vec![1u8; 16]);
    let iv = [0u8; 16];
    let err = CbcCrypto::new(&key, &iv, PaddingMode::Pkcs5)
        .decrypt(&[0u8; 17])
        .unwrap_err();
    assert!(matches!(err, CryptoError::InvalidBlockLength(17)));
}

#[test]
fn test_cbc_decrypt_invalid_iv() {
    let key = CipherKey::new(vec![1u8; 16]);
    let err = CbcCrypto::new(&key, &[0u8; 8], PaddingMode::Pkcs5)
        .decrypt(&[0u8; 16])
        .unwrap_err();
    assert!(matches!(
        err,
        CryptoError::InvalidIvLength {
            expected: 16,
            actual: 8
        }
    ));
}

#[test]
fn test_ecb_invalid_key() {
    let key = CipherKey::new(vec![1u8; 20]);
    let err = EcbCrypto::new(&key, PaddingMode::Pkcs5)
        .encrypt(b"data")
        .unwrap_err();
    assert!(matches!(err, CryptoError::KeySetup(_)));
}

#[test]
fn test_decrypt_tolerates_malformed_padding() {
    let key = CipherKey::new(vec![8u8; 16]);
    let raw = EcbCrypto::new(&key, PaddingMode::Zero)
        .encrypt(b"0123456789abcdeX")
        .unwrap();
    // 'X' (0x58) is out of range for PKCS#5, so nothing is stripped
    let plain = EcbCrypto::new(&key, PaddingMode::Pkcs5)
        .decrypt(&raw[..16])
        .unwrap();
    assert_eq!(plain, b"0123456789abcdeX");
}

#[test]
fn test_refund_notify_vector() {
    let req_info = "WBzGpzQuNpcFxIlFjUUD9BfnwwNUlVAs7bwvgHME4/T2/Xx0C8vCuMlc0+vdxg8AMdRxTtpTbL3BoVDCPCeLJOTirl8lnUJqK/+IcT+ILU5QwoyDIeSmDaComiQqDN/waFiWwswhV9KJT6rcU4dqvebr3sHuORLPtPog/+J6Ogo=";
    let plain = decrypt_refund_notify("192006250b4c09247ec02edce69f6a2d", req_info).unwrap();
    assert_eq!(
        plain,
        b"<root><out_refund_no><![CDATA[R20211001]]></out_refund_no><refund_status><![CDATA[SUCCESS]]></refund_status></root>"
    );
}

#[test]
fn test_refund_notify_block_aligned_garbage() {
    // No integrity check: garbage decrypts and the XML parse rejects it
    let req_info = BASE64.encode([0u8; 32]);
    let plain = decrypt_refund_notify("wrong", &req_info).unwrap();
    assert!(!plain.starts_with(b"<root>"));
}
