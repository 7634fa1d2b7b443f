//! RS256 key resolution for JWT signing and verification
//!
//! Two key pairs are configured, addressed by the `kid` header of a token:
//!
//! | kid   | signing key        | verification key |
//! |-------|--------------------|------------------|
//! | `"0"` | `rsa_private_key`  | `rsa_public_key` |
//! | `"1"` | `cert_private_key` | `certificate`    |
//!
//! Keys are loaded once and never change afterwards, so a resolver can be
//! shared freely between request handlers.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use x509_cert::der::{Decode, DecodePem};
use x509_cert::Certificate;

use crate::domain::entities::token::JWT_ALGORITHM;
use crate::errors::TokenError;

/// Key id of the plain RSA key pair
pub const RSA_KEY_ID: &str = "0";
/// Key id of the certificate-backed key pair
pub const CERTIFICATE_KEY_ID: &str = "1";

pub const RSA_PRIVATE_KEY_FILE: &str = "rsa_private_key";
pub const CERT_PRIVATE_KEY_FILE: &str = "cert_private_key";
pub const RSA_PUBLIC_KEY_FILE: &str = "rsa_public_key";
pub const CERTIFICATE_FILE: &str = "certificate";

const PEM_PREFIX: &[u8] = b"-----BEGIN";

/// Subject of the throwaway token signed while checking a key pair
const KEY_CHECK_SUBJECT: &str = "key-check";

#[derive(Clone)]
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

#[derive(Serialize, Deserialize)]
struct KeyCheckClaims {
    sub: String,
}

impl KeyPair {
    /// Signs a throwaway token and verifies it with the other half.
    ///
    /// DER keys are only parsed when first used, so this is the point where
    /// garbage bytes and mismatched pairs surface. The failing file is named
    /// by whichever half rejected the token.
    fn check(&self, kid: &str, private_file: &str, public_file: &str) -> Result<(), TokenError> {
        let mut header = Header::new(JWT_ALGORITHM);
        header.kid = Some(kid.to_string());
        let claims = KeyCheckClaims {
            sub: KEY_CHECK_SUBJECT.to_string(),
        };
        let compact = encode(&header, &claims, &self.encoding)
            .map_err(|e| load_error(private_file, format!("Unusable private key: {}", e)))?;

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        decode::<KeyCheckClaims>(&compact, &self.decoding, &validation).map_err(|e| {
            load_error(
                public_file,
                format!("Public key does not match {}: {}", private_file, e),
            )
        })?;

        Ok(())
    }
}

/// Immutable table from key id to signing and verification keys
#[derive(Clone)]
pub struct KeyResolver {
    keys: BTreeMap<String, KeyPair>,
    key_dir: Option<PathBuf>,
}

impl fmt::Debug for KeyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyResolver")
            .field("key_ids", &self.keys.keys().collect::<Vec<_>>())
            .field("key_dir", &self.key_dir)
            .finish()
    }
}

impl KeyResolver {
    /// Loads both key pairs from `key_dir`.
    ///
    /// # Errors
    ///
    /// `TokenError::KeyLoadError` naming the first file that is missing,
    /// unreadable or not a usable RSA key.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sk_core::services::token::KeyResolver;
    ///
    /// let keys = KeyResolver::load("JWT").expect("Failed to load keys");
    /// assert!(keys.signing_key("0").is_ok());
    /// ```
    pub fn load<P: AsRef<Path>>(key_dir: P) -> Result<Self, TokenError> {
        let key_dir = key_dir.as_ref();

        let rsa_private = read_key_file(&key_dir.join(RSA_PRIVATE_KEY_FILE))?;
        let cert_private = read_key_file(&key_dir.join(CERT_PRIVATE_KEY_FILE))?;
        let rsa_public = read_key_file(&key_dir.join(RSA_PUBLIC_KEY_FILE))?;
        let certificate = read_key_file(&key_dir.join(CERTIFICATE_FILE))?;

        let mut resolver = Self::from_bytes(&rsa_private, &rsa_public, &cert_private, &certificate)
            .map_err(|err| match err {
                TokenError::KeyLoadError { path, message } => TokenError::KeyLoadError {
                    path: key_dir.join(path).display().to_string(),
                    message,
                },
                other => other,
            })?;
        resolver.key_dir = Some(key_dir.to_path_buf());

        tracing::info!(key_dir = %key_dir.display(), "loaded JWT key material");
        Ok(resolver)
    }

    /// Builds the resolver from raw key bytes (PEM or DER)
    pub fn from_bytes(
        rsa_private_key: &[u8],
        rsa_public_key: &[u8],
        cert_private_key: &[u8],
        certificate: &[u8],
    ) -> Result<Self, TokenError> {
        let rsa = KeyPair {
            encoding: encoding_key(rsa_private_key, RSA_PRIVATE_KEY_FILE)?,
            decoding: public_key(rsa_public_key, RSA_PUBLIC_KEY_FILE)?,
        };
        rsa.check(RSA_KEY_ID, RSA_PRIVATE_KEY_FILE, RSA_PUBLIC_KEY_FILE)?;

        let cert = KeyPair {
            encoding: encoding_key(cert_private_key, CERT_PRIVATE_KEY_FILE)?,
            decoding: certificate_key(certificate, CERTIFICATE_FILE)?,
        };
        cert.check(CERTIFICATE_KEY_ID, CERT_PRIVATE_KEY_FILE, CERTIFICATE_FILE)?;

        let mut keys = BTreeMap::new();
        keys.insert(RSA_KEY_ID.to_string(), rsa);
        keys.insert(CERTIFICATE_KEY_ID.to_string(), cert);

        Ok(Self {
            keys,
            key_dir: None,
        })
    }

    /// Creates a resolver from PEM strings (useful for testing or embedded keys)
    pub fn from_pem_strings(
        rsa_private_key: &str,
        rsa_public_key: &str,
        cert_private_key: &str,
        certificate: &str,
    ) -> Result<Self, TokenError> {
        Self::from_bytes(
            rsa_private_key.as_bytes(),
            rsa_public_key.as_bytes(),
            cert_private_key.as_bytes(),
            certificate.as_bytes(),
        )
    }

    /// Returns the key used to sign tokens carrying `kid`
    pub fn signing_key(&self, kid: &str) -> Result<&EncodingKey, TokenError> {
        self.keys
            .get(kid)
            .map(|pair| &pair.encoding)
            .ok_or_else(|| TokenError::UnknownKeyId {
                kid: kid.to_string(),
            })
    }

    /// Returns the key used to verify tokens carrying `kid`
    pub fn verification_key(&self, kid: &str) -> Result<&DecodingKey, TokenError> {
        self.keys
            .get(kid)
            .map(|pair| &pair.decoding)
            .ok_or_else(|| TokenError::UnknownKeyId {
                kid: kid.to_string(),
            })
    }

    /// Configured key ids in ascending order
    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Directory the keys were loaded from, `None` for in-memory keys
    pub fn key_dir(&self) -> Option<&Path> {
        self.key_dir.as_deref()
    }
}

fn read_key_file(path: &Path) -> Result<Vec<u8>, TokenError> {
    fs::read(path).map_err(|e| TokenError::KeyLoadError {
        path: path.display().to_string(),
        message: format!("Failed to read key file: {}", e),
    })
}

fn is_pem(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(PEM_PREFIX)
}

fn load_error(name: &str, message: String) -> TokenError {
    TokenError::KeyLoadError {
        path: name.to_string(),
        message,
    }
}

fn encoding_key(bytes: &[u8], name: &str) -> Result<EncodingKey, TokenError> {
    if is_pem(bytes) {
        EncodingKey::from_rsa_pem(bytes)
            .map_err(|e| load_error(name, format!("Invalid private key format: {}", e)))
    } else {
        // Validated by KeyPair::check
        Ok(EncodingKey::from_rsa_der(bytes))
    }
}

fn public_key(bytes: &[u8], name: &str) -> Result<DecodingKey, TokenError> {
    if is_pem(bytes) {
        DecodingKey::from_rsa_pem(bytes)
            .map_err(|e| load_error(name, format!("Invalid public key format: {}", e)))
    } else {
        Ok(DecodingKey::from_rsa_der(bytes))
    }
}

fn certificate_key(bytes: &[u8], name: &str) -> Result<DecodingKey, TokenError> {
    let parsed = if is_pem(bytes) {
        Certificate::from_pem(bytes)
    } else {
        Certificate::from_der(bytes)
    };
    let certificate =
        parsed.map_err(|e| load_error(name, format!("Invalid certificate: {}", e)))?;

    // The SubjectPublicKeyInfo bit string of an RSA key is a PKCS#1 RSAPublicKey
    let public_key = certificate
        .tbs_certificate
        .subject_public_key_info
        .subject_public_key
        .raw_bytes();
    if public_key.is_empty() {
        return Err(load_error(name, "Certificate carries no public key".to_string()));
    }

    Ok(DecodingKey::from_rsa_der(public_key))
}
