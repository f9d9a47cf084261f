//! RSA key loading, encryption and PKCS#1 v1.5 signatures
//!
//! Keys are loaded once at setup and are immutable afterwards. Supported
//! sources:
//!
//! | Source | Loader |
//! |--------|--------|
//! | PEM `RSA PRIVATE KEY` (PKCS#1) | [`PrivateKey::from_pem`] |
//! | PEM `PRIVATE KEY` (PKCS#8) | [`PrivateKey::from_pem`] |
//! | PFX / P12 archive + password | [`PrivateKey::from_pfx`] |
//! | PEM `PUBLIC KEY` (SubjectPublicKeyInfo) | [`PublicKey::from_pem`] |
//! | DER X.509 certificate | [`PublicKey::from_der_certificate`] |
//! | PEM `CERTIFICATE` | [`PublicKey::from_pem_certificate`] |
//!
//! OAEP uses SHA-1 for both the label hash and MGF1, as required by the
//! WeChat Pay sensitive-field encryption. Private-key operations (decrypt and
//! sign) are blinded with a fresh factor from `OsRng` on every call.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::der::asn1::ObjectIdentifier;
use rsa::pkcs8::der::oid::AssociatedOid;
use rsa::pkcs8::der::pem;
use rsa::pkcs8::{DecodePublicKey, PrivateKeyInfo, SubjectPublicKeyInfoRef};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use x509_cert::der::{Decode, Encode};
use x509_cert::Certificate;
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// `rsaEncryption` from PKCS#1.
const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

const PKCS1_PRIVATE_KEY: &str = "RSA PRIVATE KEY";
const PKCS8_PRIVATE_KEY: &str = "PRIVATE KEY";
const PKCS1_PUBLIC_KEY: &str = "RSA PUBLIC KEY";
const SPKI_PUBLIC_KEY: &str = "PUBLIC KEY";
const CERTIFICATE: &str = "CERTIFICATE";

/// Hash applied to the data before a PKCS#1 v1.5 signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    /// Recognized but not built into this crate.
    Sha3_256,
    /// Recognized but not built into this crate.
    Sha3_512,
}

impl DigestAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "MD5",
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha224 => "SHA-224",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
            DigestAlgorithm::Sha3_256 => "SHA3-256",
            DigestAlgorithm::Sha3_512 => "SHA3-512",
        }
    }

    /// Hashes `data` and returns it together with the matching signature
    /// scheme.
    fn prehash(self, data: &[u8]) -> Result<(Pkcs1v15Sign, Vec<u8>), CryptoError> {
        fn with<D: Digest + AssociatedOid>(data: &[u8]) -> (Pkcs1v15Sign, Vec<u8>) {
            (Pkcs1v15Sign::new::<D>(), D::digest(data).to_vec())
        }

        match self {
            DigestAlgorithm::Md5 => Ok(with::<md5::Md5>(data)),
            DigestAlgorithm::Sha1 => Ok(with::<Sha1>(data)),
            DigestAlgorithm::Sha224 => Ok(with::<Sha224>(data)),
            DigestAlgorithm::Sha256 => Ok(with::<Sha256>(data)),
            DigestAlgorithm::Sha384 => Ok(with::<Sha384>(data)),
            DigestAlgorithm::Sha512 => Ok(with::<Sha512>(data)),
            DigestAlgorithm::Sha3_256 | DigestAlgorithm::Sha3_512 => Err(
                CryptoError::UnsupportedDigest(format!("{} is unavailable", self.name())),
            ),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CryptoError;

    /// Accepts names such as `SHA256`, `sha-256` or `SHA3_256`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match normalized.as_str() {
            "MD5" => Ok(DigestAlgorithm::Md5),
            "SHA1" => Ok(DigestAlgorithm::Sha1),
            "SHA224" => Ok(DigestAlgorithm::Sha224),
            "SHA256" => Ok(DigestAlgorithm::Sha256),
            "SHA384" => Ok(DigestAlgorithm::Sha384),
            "SHA512" => Ok(DigestAlgorithm::Sha512),
            "SHA3256" => Ok(DigestAlgorithm::Sha3_256),
            "SHA3512" => Ok(DigestAlgorithm::Sha3_512),
            _ => Err(CryptoError::UnsupportedDigest(s.to_string())),
        }
    }
}

fn decode_pem(pem_block: &[u8]) -> Result<(&str, Zeroizing<Vec<u8>>), CryptoError> {
    let (label, der) = pem::decode_vec(pem_block)
        .map_err(|e| CryptoError::UnrecognizedKeyFormat(format!("no PEM data is found: {}", e)))?;
    Ok((label, Zeroizing::new(der)))
}

fn malformed(what: &str, err: impl fmt::Display) -> CryptoError {
    CryptoError::UnrecognizedKeyFormat(format!("malformed {}: {}", what, err))
}

/// RSA private key. Decrypts and signs; never serialized back out.
pub struct PrivateKey {
    key: RsaPrivateKey,
}

impl PrivateKey {
    /// Loads a PEM block, choosing PKCS#1 or PKCS#8 from its header.
    pub fn from_pem(pem_block: &[u8]) -> Result<Self, CryptoError> {
        let (label, der) = decode_pem(pem_block)?;
        match label {
            PKCS1_PRIVATE_KEY => Self::from_pkcs1_der(&der),
            PKCS8_PRIVATE_KEY => Self::from_pkcs8_der(&der),
            other => Err(CryptoError::UnrecognizedKeyFormat(format!(
                "unexpected PEM block type for a private key: {}",
                other
            ))),
        }
    }

    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self, CryptoError> {
        let pem_block = Zeroizing::new(fs::read(path)?);
        Self::from_pem(&pem_block)
    }

    pub fn from_pkcs1_der(der: &[u8]) -> Result<Self, CryptoError> {
        let key = RsaPrivateKey::from_pkcs1_der(der).map_err(|e| malformed("PKCS#1 key", e))?;
        debug!("[WechatCrypto] loaded PKCS#1 private key");
        Ok(Self { key })
    }

    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self, CryptoError> {
        let info = PrivateKeyInfo::try_from(der).map_err(|e| malformed("PKCS#8 key", e))?;
        if info.algorithm.oid != RSA_ENCRYPTION {
            return Err(CryptoError::KeyTypeMismatch("private key"));
        }
        let key = RsaPrivateKey::try_from(info).map_err(|e| malformed("PKCS#8 key", e))?;
        debug!("[WechatCrypto] loaded PKCS#8 private key");
        Ok(Self { key })
    }

    /// Extracts the first private key from a PFX (PKCS#12) archive.
    pub fn from_pfx(pfx_der: &[u8], password: &str) -> Result<Self, CryptoError> {
        let pfx = p12::PFX::parse(pfx_der).map_err(|e| malformed("PFX archive", format!("{:?}", e)))?;
        if !pfx.verify_mac(password) {
            return Err(CryptoError::UnrecognizedKeyFormat(
                "PFX integrity check failed (wrong password?)".to_string(),
            ));
        }

        let mut bags = pfx
            .key_bags(password)
            .map_err(|e| malformed("PFX key bag", format!("{:?}", e)))?;
        if bags.is_empty() {
            return Err(CryptoError::UnrecognizedKeyFormat(
                "PFX archive holds no private key".to_string(),
            ));
        }
        let key_der = Zeroizing::new(bags.swap_remove(0));
        Self::from_pkcs8_der(&key_der)
    }

    pub fn from_pfx_file(path: impl AsRef<Path>, password: &str) -> Result<Self, CryptoError> {
        let pfx_der = fs::read(path)?;
        Self::from_pfx(&pfx_der, password)
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            key: self.key.to_public_key(),
        }
    }

    /// Decrypts with PKCS#1 v1.5 padding.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.key
            .decrypt_blinded(&mut OsRng, Pkcs1v15Encrypt, ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)
    }

    /// Decrypts with OAEP (SHA-1).
    pub fn decrypt_oaep(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.key
            .decrypt_blinded(&mut OsRng, Oaep::new::<Sha1>(), ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)
    }

    /// Hashes `data` with `digest` and signs it with PKCS#1 v1.5.
    pub fn sign(&self, digest: DigestAlgorithm, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (scheme, hashed) = digest.prehash(data)?;
        self.key
            .sign_with_rng(&mut OsRng, scheme, &hashed)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bits", &(self.key.size() * 8))
            .finish_non_exhaustive()
    }
}

/// RSA public key. Encrypts and verifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    key: RsaPublicKey,
}

impl PublicKey {
    /// Loads a PEM block: `PUBLIC KEY`, `RSA PUBLIC KEY` or `CERTIFICATE`.
    pub fn from_pem(pem_block: &[u8]) -> Result<Self, CryptoError> {
        let (label, der) = decode_pem(pem_block)?;
        match label {
            SPKI_PUBLIC_KEY => Self::from_spki_der(&der),
            PKCS1_PUBLIC_KEY => {
                let key =
                    RsaPublicKey::from_pkcs1_der(&der).map_err(|e| malformed("PKCS#1 key", e))?;
                Ok(Self { key })
            }
            CERTIFICATE => Self::from_der_certificate(&der),
            other => Err(CryptoError::UnrecognizedKeyFormat(format!(
                "unexpected PEM block type for a public key: {}",
                other
            ))),
        }
    }

    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self, CryptoError> {
        Self::from_pem(&fs::read(path)?)
    }

    pub fn from_spki_der(der: &[u8]) -> Result<Self, CryptoError> {
        let spki = SubjectPublicKeyInfoRef::try_from(der)
            .map_err(|e| malformed("SubjectPublicKeyInfo", e))?;
        if spki.algorithm.oid != RSA_ENCRYPTION {
            return Err(CryptoError::KeyTypeMismatch("public key"));
        }
        let key = RsaPublicKey::try_from(spki).map_err(|e| malformed("RSA public key", e))?;
        Ok(Self { key })
    }

    /// Extracts the public key of a DER-encoded X.509 certificate.
    ///
    /// A `.cer` file in PEM form can be converted with
    /// `openssl x509 -in cert.pem -outform der -out cert.der`.
    pub fn from_der_certificate(der: &[u8]) -> Result<Self, CryptoError> {
        let cert = Certificate::from_der(der).map_err(|e| malformed("certificate", e))?;
        let spki = &cert.tbs_certificate.subject_public_key_info;
        if spki.algorithm.oid != RSA_ENCRYPTION {
            return Err(CryptoError::KeyTypeMismatch("certificate"));
        }
        let spki_der = spki.to_der().map_err(|e| malformed("certificate", e))?;
        let key = RsaPublicKey::from_public_key_der(&spki_der)
            .map_err(|e| malformed("certificate public key", e))?;
        debug!("[WechatCrypto] loaded public key from certificate");
        Ok(Self { key })
    }

    pub fn from_der_file(path: impl AsRef<Path>) -> Result<Self, CryptoError> {
        Self::from_der_certificate(&fs::read(path)?)
    }

    /// Loads a PEM `CERTIFICATE` block.
    pub fn from_pem_certificate(pem_block: &[u8]) -> Result<Self, CryptoError> {
        let (label, der) = decode_pem(pem_block)?;
        if label != CERTIFICATE {
            return Err(CryptoError::UnrecognizedKeyFormat(format!(
                "expected a CERTIFICATE block, got {}",
                label
            )));
        }
        Self::from_der_certificate(&der)
    }

    /// Modulus size in bytes.
    pub fn size(&self) -> usize {
        self.key.size()
    }

    /// Encrypts with PKCS#1 v1.5 padding.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.key
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, plaintext)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
    }

    /// Encrypts with OAEP (SHA-1).
    pub fn encrypt_oaep(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.key
            .encrypt(&mut OsRng, Oaep::new::<Sha1>(), plaintext)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
    }

    /// Verifies a PKCS#1 v1.5 `signature` over `data`.
    ///
    /// A signature that does not match yields [`CryptoError::SignatureInvalid`];
    /// other errors mean the check could not run.
    pub fn verify(
        &self,
        digest: DigestAlgorithm,
        data: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError> {
        let (scheme, hashed) = digest.prehash(data)?;
        self.key
            .verify(scheme, &hashed, signature)
            .map_err(|_| CryptoError::SignatureInvalid)
    }
}

/// Either half of an RSA key pair.
#[derive(Debug)]
pub enum RsaKey {
    Private(PrivateKey),
    Public(PublicKey),
}

impl RsaKey {
    /// Loads any supported PEM block and tags it by capability.
    pub fn from_pem(pem_block: &[u8]) -> Result<Self, CryptoError> {
        let (label, _) = decode_pem(pem_block)?;
        match label {
            PKCS1_PRIVATE_KEY | PKCS8_PRIVATE_KEY => PrivateKey::from_pem(pem_block).map(Self::Private),
            _ => PublicKey::from_pem(pem_block).map(Self::Public),
        }
    }

    pub fn as_private(&self) -> Option<&PrivateKey> {
        match self {
            RsaKey::Private(key) => Some(key),
            RsaKey::Public(_) => None,
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, RsaKey::Private(_))
    }

    /// The public half; derived when this is a private key.
    pub fn public_key(&self) -> PublicKey {
        match self {
            RsaKey::Private(key) => key.public_key(),
            RsaKey::Public(key) => key.clone(),
        }
    }
}

impl From<PrivateKey> for RsaKey {
    fn from(key: PrivateKey) -> Self {
        RsaKey::Private(key)
    }
}

impl From<PublicKey> for RsaKey {
    fn from(key: PublicKey) -> Self {
        RsaKey::Public(key)
    }
}
