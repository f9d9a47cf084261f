//! Plaintext framing of callback messages.
//!
//! ```text
//! random (16) | payload length (4, big endian) | payload | receiver id
//! ```

use crate::error::CryptoError;

pub(crate) const RANDOM_LEN: usize = 16;
const HEADER_LEN: usize = RANDOM_LEN + 4;

pub(crate) fn encode(random: &[u8; RANDOM_LEN], payload: &[u8], receiver_id: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len() + receiver_id.len());
    frame.extend_from_slice(random);
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);
    frame.extend_from_slice(receiver_id.as_bytes());
    frame
}

/// Splits a frame into its payload and declared receiver id.
pub(crate) fn decode(frame: &[u8]) -> Result<(Vec<u8>, String), CryptoError> {
    if frame.len() < HEADER_LEN {
        return Err(CryptoError::FrameCorrupt(format!(
            "frame is {} bytes, shorter than the {}-byte header",
            frame.len(),
            HEADER_LEN
        )));
    }

    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&frame[RANDOM_LEN..HEADER_LEN]);
    let declared = u32::from_be_bytes(len_bytes) as usize;

    let body = &frame[HEADER_LEN..];
    if declared > body.len() {
        return Err(CryptoError::FrameCorrupt(format!(
            "declared payload length {} exceeds remaining {} bytes",
            declared,
            body.len()
        )));
    }

    let (payload, receiver_id) = body.split_at(declared);
    let receiver_id = String::from_utf8(receiver_id.to_vec())
        .map_err(|_| CryptoError::FrameCorrupt("receiver id is not valid UTF-8".to_string()))?;

    Ok((payload.to_vec(), receiver_id))
}
