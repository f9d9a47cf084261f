//! Electronic code book block mode
//!
//! **Insecure, interop only.** ECB encrypts every block independently, so
//! identical plaintext blocks produce identical ciphertext blocks. It exists
//! here because WeChat Pay refund notifications are encrypted with
//! AES-256-ECB; do not use it for anything new. RustCrypto ships no ECB
//! mode, so this adapter drives the raw block cipher.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, BlockSizeUser};

use crate::error::CryptoError;

/// ECB adapter over any block cipher.
pub(crate) struct Ecb<C> {
    cipher: C,
}

impl<C: BlockSizeUser> Ecb<C> {
    pub(crate) fn new(cipher: C) -> Self {
        Self { cipher }
    }

    /// Rejects partial blocks before any block is touched.
    fn check_full_blocks(buf: &[u8]) -> Result<(), CryptoError> {
        if buf.len() % C::block_size() != 0 {
            return Err(CryptoError::InvalidBlockLength(buf.len()));
        }
        Ok(())
    }
}

impl<C: BlockEncrypt> Ecb<C> {
    pub(crate) fn encrypt_blocks(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        Self::check_full_blocks(buf)?;
        for block in buf.chunks_exact_mut(C::block_size()) {
            self.cipher.encrypt_block(GenericArray::from_mut_slice(block));
        }
        Ok(())
    }
}

impl<C: BlockDecrypt> Ecb<C> {
    pub(crate) fn decrypt_blocks(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        Self::check_full_blocks(buf)?;
        for block in buf.chunks_exact_mut(C::block_size()) {
            self.cipher.decrypt_block(GenericArray::from_mut_slice(block));
        }
        Ok(())
    }
}
