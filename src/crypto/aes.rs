//! AES engines in CBC and ECB mode
//!
//! Both engines borrow a [`CipherKey`] and implement [`BlockCrypto`]. The AES
//! variant follows the key length: 16, 24 or 32 bytes select AES-128, AES-192
//! or AES-256. Engines hold no mutable state, so one instance can serve any
//! number of concurrent calls.
//!
//! Note that [`PaddingMode::Pkcs7`] pads to the key length. With AES-192 this
//! produces 24-byte multiples, which CBC and ECB reject with
//! [`CryptoError::InvalidBlockLength`].

use std::fmt;

use aes::cipher::block_padding::NoPadding;
use aes::cipher::{
    BlockCipher, BlockDecrypt, BlockDecryptMut, BlockEncrypt, BlockEncryptMut, KeyInit,
    KeyIvInit,
};
use aes::{Aes128, Aes192, Aes256};
use zeroize::Zeroizing;

use super::ecb::Ecb;
use super::padding::{self, PaddingMode};
use crate::error::CryptoError;

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

macro_rules! with_aes {
    ($key:expr, $op:ident($($arg:expr),*)) => {
        match $key.len() {
            16 => $op::<Aes128>($key, $($arg),*),
            24 => $op::<Aes192>($key, $($arg),*),
            32 => $op::<Aes256>($key, $($arg),*),
            n => Err(invalid_key_length(n)),
        }
    };
}

/// Symmetric encryption capability shared by the CBC and ECB engines.
pub trait BlockCrypto: Send + Sync {
    /// Pads and encrypts `plaintext`.
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decrypts `ciphertext` and removes the padding.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// AES key material, wiped from memory when dropped.
pub struct CipherKey(Zeroizing<Vec<u8>>);

impl CipherKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    /// Runs `f` with a key built from `bytes` and wipes it afterwards.
    ///
    /// Nothing borrowed from the key can outlive the closure, so an engine
    /// built inside it cannot retain the key past the call.
    ///
    /// ```rust,ignore
    /// let ciphertext = CipherKey::scoped(key_bytes, |key| {
    ///     CbcCrypto::new(key, &iv, PaddingMode::Pkcs5).encrypt(b"data")
    /// })?;
    /// ```
    pub fn scoped<T>(bytes: impl Into<Vec<u8>>, f: impl FnOnce(&CipherKey) -> T) -> T {
        let key = Self::new(bytes);
        f(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CipherKey").field(&"[REDACTED]").finish()
    }
}

fn invalid_key_length(len: usize) -> CryptoError {
    CryptoError::KeySetup(format!(
        "invalid AES key length: expected 16, 24 or 32, got {}",
        len
    ))
}

fn check_key(key: &[u8]) -> Result<usize, CryptoError> {
    match key.len() {
        16 | 24 | 32 => Ok(key.len()),
        n => Err(invalid_key_length(n)),
    }
}

fn check_iv(iv: &[u8]) -> Result<(), CryptoError> {
    if iv.len() != BLOCK_SIZE {
        return Err(CryptoError::InvalidIvLength {
            expected: BLOCK_SIZE,
            actual: iv.len(),
        });
    }
    Ok(())
}

fn check_full_blocks(buf: &[u8]) -> Result<(), CryptoError> {
    if buf.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::InvalidBlockLength(buf.len()));
    }
    Ok(())
}

fn pad_for(key_len: usize, plaintext: &[u8], mode: PaddingMode) -> Result<Vec<u8>, CryptoError> {
    let pad_size = mode.pad_size(BLOCK_SIZE, key_len);
    let padded = padding::pad(plaintext.to_vec(), pad_size, mode)?;
    check_full_blocks(&padded)?;
    Ok(padded)
}

fn cbc_encrypt<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let len = buf.len();
    cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CryptoError::KeySetup("cannot initialize AES-CBC encryptor".to_string()))?
        .encrypt_padded_mut::<NoPadding>(buf, len)
        .map_err(|_| CryptoError::InvalidBlockLength(len))?;
    Ok(())
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let len = buf.len();
    cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CryptoError::KeySetup("cannot initialize AES-CBC decryptor".to_string()))?
        .decrypt_padded_mut::<NoPadding>(buf)
        .map_err(|_| CryptoError::InvalidBlockLength(len))?;
    Ok(())
}

fn ecb_encrypt<C>(key: &[u8], buf: &mut [u8]) -> Result<(), CryptoError>
where
    C: BlockEncrypt + KeyInit,
{
    let cipher = C::new_from_slice(key).map_err(|_| invalid_key_length(key.len()))?;
    Ecb::new(cipher).encrypt_blocks(buf)
}

fn ecb_decrypt<C>(key: &[u8], buf: &mut [u8]) -> Result<(), CryptoError>
where
    C: BlockDecrypt + KeyInit,
{
    let cipher = C::new_from_slice(key).map_err(|_| invalid_key_length(key.len()))?;
    Ecb::new(cipher).decrypt_blocks(buf)
}

/// AES in cipher block chaining mode.
#[derive(Debug, Clone, Copy)]
pub struct CbcCrypto<'k> {
    key: &'k CipherKey,
    iv: &'k [u8],
    mode: PaddingMode,
}

impl<'k> CbcCrypto<'k> {
    /// Key and IV lengths are checked on every call, before any block work.
    pub fn new(key: &'k CipherKey, iv: &'k [u8], mode: PaddingMode) -> Self {
        Self { key, iv, mode }
    }
}

impl BlockCrypto for CbcCrypto<'_> {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let key = self.key.as_bytes();
        let key_len = check_key(key)?;
        check_iv(self.iv)?;

        let mut buf = pad_for(key_len, plaintext, self.mode)?;
        with_aes!(key, cbc_encrypt(self.iv, &mut buf))?;
        Ok(buf)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let key = self.key.as_bytes();
        let key_len = check_key(key)?;
        check_iv(self.iv)?;
        check_full_blocks(ciphertext)?;

        let mut buf = ciphertext.to_vec();
        with_aes!(key, cbc_decrypt(self.iv, &mut buf))?;
        Ok(padding::unpad(
            buf,
            self.mode.pad_size(BLOCK_SIZE, key_len),
            self.mode,
        ))
    }
}

/// AES in electronic code book mode.
///
/// **Insecure, interop only**: identical plaintext blocks encrypt to identical
/// ciphertext blocks. Use [`CbcCrypto`] unless a counterparty mandates ECB.
#[derive(Debug, Clone, Copy)]
pub struct EcbCrypto<'k> {
    key: &'k CipherKey,
    mode: PaddingMode,
}

impl<'k> EcbCrypto<'k> {
    pub fn new(key: &'k CipherKey, mode: PaddingMode) -> Self {
        Self { key, mode }
    }
}

impl BlockCrypto for EcbCrypto<'_> {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let key = self.key.as_bytes();
        let key_len = check_key(key)?;

        let mut buf = pad_for(key_len, plaintext, self.mode)?;
        with_aes!(key, ecb_encrypt(&mut buf))?;
        Ok(buf)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let key = self.key.as_bytes();
        let key_len = check_key(key)?;

        let mut buf = ciphertext.to_vec();
        with_aes!(key, ecb_decrypt(&mut buf))?;
        Ok(padding::unpad(
            buf,
            self.mode.pad_size(BLOCK_SIZE, key_len),
            self.mode,
        ))
    }
}
