//! SHA-1 callback signatures.
//!
//! The platform signs a callback by sorting its string fields
//! lexicographically, concatenating them and taking the lowercase hex SHA-1.
//! Plain-mode requests sign `(token, timestamp, nonce)`; encrypted messages
//! add the base64 ciphertext.

use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

/// Compute the signature over `items`.
pub fn sign(items: &[&str]) -> String {
    let mut items = items.to_vec();
    items.sort_unstable();

    let digest = Sha1::digest(items.concat().as_bytes());
    hex::encode(digest)
}

/// Check `signature` against the one computed over `items`, in constant time.
pub fn verify(items: &[&str], signature: &str) -> bool {
    let expected = sign(items);
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}
