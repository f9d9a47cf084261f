use thiserror::Error;

/// Error type shared by every cryptographic operation in the crate.
///
/// Messages identify the failing stage but never echo key bytes, tokens or
/// plaintext.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Key setup failed: {0}")]
    KeySetup(String),

    #[error("Invalid IV length: expected {expected}, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    #[error("Input length {0} is not a whole number of blocks")]
    InvalidBlockLength(usize),

    #[error("Invalid padding size {0}: expected 1 to 255")]
    InvalidPaddingSize(usize),

    #[error("Malformed callback query: {0}")]
    InvalidQuery(String),

    #[error("Unrecognized key format: {0}")]
    UnrecognizedKeyFormat(String),

    #[error("Key type mismatch: expected an RSA {0}")]
    KeyTypeMismatch(&'static str),

    /// Carries no detail about the cause.
    #[error("Decryption failed")]
    DecryptionFailed,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Unsupported digest: {0}")]
    UnsupportedDigest(String),

    #[error("Signature verification failed: signature invalid")]
    SignatureInvalid,

    #[error("Message signature mismatch")]
    SignatureMismatch,

    #[error("Receiver id mismatch: expected {expected}, got {actual}")]
    IdentityMismatch { expected: String, actual: String },

    #[error("Frame corrupt: {0}")]
    FrameCorrupt(String),

    #[error("Missing callback field: {0}")]
    MissingField(&'static str),

    #[error("Invalid base64 in {field}: {source}")]
    Base64 {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CryptoError {
    pub(crate) fn base64(field: &'static str) -> impl FnOnce(base64::DecodeError) -> Self {
        move |source| CryptoError::Base64 { field, source }
    }
}
