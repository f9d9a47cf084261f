use crate::error::CryptoError;
use crate::types::{EncodingAesKey, ReceiverId, Token};

use super::MessageCrypto;

#[must_use]
#[derive(Debug, Default)]
pub struct MessageCryptoBuilder {
    token: Option<Token>,
    encoding_aes_key: Option<EncodingAesKey>,
    receiver_id: Option<ReceiverId>,
}

impl MessageCryptoBuilder {
    pub fn token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    pub fn encoding_aes_key(mut self, key: EncodingAesKey) -> Self {
        self.encoding_aes_key = Some(key);
        self
    }

    pub fn receiver_id(mut self, receiver_id: ReceiverId) -> Self {
        self.receiver_id = Some(receiver_id);
        self
    }

    pub fn build(self) -> Result<MessageCrypto, CryptoError> {
        let token = self
            .token
            .ok_or_else(|| CryptoError::Config("token is required".to_string()))?;
        let encoding_aes_key = self
            .encoding_aes_key
            .ok_or_else(|| CryptoError::Config("encoding_aes_key is required".to_string()))?;
        let receiver_id = self
            .receiver_id
            .ok_or_else(|| CryptoError::Config("receiver_id is required".to_string()))?;

        MessageCrypto::new(token, &encoding_aes_key, receiver_id)
    }
}
