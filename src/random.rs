//! Cryptographically secure randomness.
//!
//! Every random value the crate produces (frame prefixes, reply nonces) is
//! drawn through these helpers from a caller-supplied `RngCore + CryptoRng`.
//! Production code passes [`SecureRandom::rng`]; tests pass a seeded
//! `StdRng` to get reproducible output.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// Length of the nonce sent with outbound replies, in hex characters.
pub const NONCE_LEN: usize = 16;

/// OS-provided entropy source.
pub struct SecureRandom;

impl SecureRandom {
    pub fn rng() -> OsRng {
        OsRng
    }
}

/// Fill a buffer with random bytes.
pub fn fill<R: RngCore + CryptoRng + ?Sized>(rng: &mut R, dest: &mut [u8]) {
    rng.fill_bytes(dest);
}

/// Generate a fixed-size array of random bytes.
pub fn bytes<const N: usize, R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> [u8; N] {
    let mut buf = [0u8; N];
    fill(rng, &mut buf);
    buf
}

/// Generate a fresh nonce of [`NONCE_LEN`] lowercase hex characters.
pub fn nonce<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> String {
    hex::encode(bytes::<{ NONCE_LEN / 2 }, R>(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_nonce_format() {
        let nonce = nonce(&mut SecureRandom::rng());
        assert_eq!(nonce.len(), NONCE_LEN);
        assert!(nonce.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    }

    #[test]
    fn test_nonces_are_unique() {
        let mut rng = SecureRandom::rng();
        let a = nonce(&mut rng);
        let b = nonce(&mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a: [u8; 16] = bytes(&mut StdRng::seed_from_u64(7));
        let b: [u8; 16] = bytes(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fill() {
        let mut buf = [0u8; 32];
        fill(&mut SecureRandom::rng(), &mut buf);
        assert!(!buf.iter().all(|&b| b == 0));
    }
}
