/*
 * Responsibility
 * - RSA key material (private key for signing, public key for verification)
 * - Load once at startup from an inline PEM or a PEM file
 * - Key material is never printable via Debug
 */
use std::{fmt, fs, path::PathBuf};

use jsonwebtoken::{DecodingKey, EncodingKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyLoadError {
    #[error("reading {which} key from {path}: {source}")]
    Read {
        which: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{which} key source is empty")]
    Empty { which: &'static str },

    #[error("parsing {which} key: {source}")]
    Parse {
        which: &'static str,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

/// Where a PEM-encoded key comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeySource {
    /// PEM text (env vars may carry `\n` escapes, the caller unescapes them).
    Pem(String),
    File(PathBuf),
}

impl KeySource {
    fn read(&self, which: &'static str) -> Result<String, KeyLoadError> {
        let pem = match self {
            KeySource::Pem(pem) => pem.clone(),
            KeySource::File(path) => fs::read_to_string(path).map_err(|source| KeyLoadError::Read {
                which,
                path: path.display().to_string(),
                source,
            })?,
        };

        if pem.trim().is_empty() {
            return Err(KeyLoadError::Empty { which });
        }
        Ok(pem)
    }
}

/// Signing / verification keys. Immutable after `load`.
#[derive(Clone)]
pub struct KeyPair {
    signing: EncodingKey,
    verification: DecodingKey,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair").finish_non_exhaustive()
    }
}

impl KeyPair {
    /// Both keys must parse as RSA keys (PKCS#1 or PKCS#8 / SPKI PEM).
    ///
    /// The pair is assumed to match; a mismatched pair only shows up as every
    /// issued token failing validation.
    pub fn load(private: &KeySource, public: &KeySource) -> Result<Self, KeyLoadError> {
        let private_pem = private.read("private")?;
        let signing = EncodingKey::from_rsa_pem(private_pem.as_bytes()).map_err(|source| {
            KeyLoadError::Parse {
                which: "private",
                source,
            }
        })?;

        let public_pem = public.read("public")?;
        let verification = DecodingKey::from_rsa_pem(public_pem.as_bytes()).map_err(|source| {
            KeyLoadError::Parse {
                which: "public",
                source,
            }
        })?;

        Ok(Self {
            signing,
            verification,
        })
    }

    pub(crate) fn signing_key(&self) -> &EncodingKey {
        &self.signing
    }

    pub(crate) fn verification_key(&self) -> &DecodingKey {
        &self.verification
    }
}
