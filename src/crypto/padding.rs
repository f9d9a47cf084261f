//! Byte-level block padding
//!
//! Three schemes are supported. Both PKCS variants always pad: a block-aligned
//! input gains one full block. Zero padding also always pads, which makes it
//! ambiguous for plaintext that ends in `0x00` bytes; unpadding strips every
//! trailing zero.
//!
//! ## PKCS#7 pads to the key length
//!
//! [`PaddingMode::Pkcs7`] pads to the length of the AES key, not to the AES
//! block size. With a 32-byte key that means 1..=32 bytes of padding, which is
//! what the WeChat callback protocol expects. [`PaddingMode::Pkcs5`] is the
//! textbook block-size variant.

use crate::error::CryptoError;

/// Largest padding size whose length still fits the PKCS length byte.
pub const MAX_PAD_SIZE: usize = 255;

/// Padding scheme applied before encryption and removed after decryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaddingMode {
    /// Zero bytes up to the block size.
    Zero,
    /// `N` bytes of value `N`, sized to the cipher block.
    Pkcs5,
    /// `N` bytes of value `N`, sized to the key length.
    Pkcs7,
}

impl PaddingMode {
    /// Padding granularity used by this mode for a given cipher.
    pub fn pad_size(self, block_size: usize, key_len: usize) -> usize {
        match self {
            PaddingMode::Zero | PaddingMode::Pkcs5 => block_size,
            PaddingMode::Pkcs7 => key_len,
        }
    }
}

/// Append padding so that `data.len()` becomes a multiple of `block_size`.
///
/// `block_size` must be in `1..=`[`MAX_PAD_SIZE`], otherwise
/// [`CryptoError::InvalidPaddingSize`] is returned for every mode.
pub fn pad(
    mut data: Vec<u8>,
    block_size: usize,
    mode: PaddingMode,
) -> Result<Vec<u8>, CryptoError> {
    if !(1..=MAX_PAD_SIZE).contains(&block_size) {
        return Err(CryptoError::InvalidPaddingSize(block_size));
    }

    let padding = block_size - data.len() % block_size;
    let fill = match mode {
        PaddingMode::Zero => 0,
        PaddingMode::Pkcs5 | PaddingMode::Pkcs7 => padding as u8,
    };
    data.resize(data.len() + padding, fill);
    Ok(data)
}

/// Remove padding added by [`pad`].
///
/// For the PKCS modes a trailing length byte of `0` or greater than
/// `block_size` means no padding is present and the input is returned as-is.
/// Callers rely on this to tolerate malformed trailers instead of failing the
/// whole decryption.
pub fn unpad(mut data: Vec<u8>, block_size: usize, mode: PaddingMode) -> Vec<u8> {
    match mode {
        PaddingMode::Zero => {
            let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            data.truncate(end);
        }
        PaddingMode::Pkcs5 | PaddingMode::Pkcs7 => {
            let Some(&last) = data.last() else {
                return data;
            };
            let padding = last as usize;
            // A length byte larger than the buffer cannot be padding either.
            if (1..=block_size).contains(&padding) && padding <= data.len() {
                data.truncate(data.len() - padding);
            }
        }
    }
    data
}
