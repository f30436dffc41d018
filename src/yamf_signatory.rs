// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tagged public key values: `varu64(algorithm_id) ∥ varu64(key_length) ∥ key_bytes`.

use std::fmt;

use thiserror::Error;

use crate::varu64::{self, Varu64Error};

/// Numeric tag identifying the Ed25519 variant.
pub const ED25519_TAG: u64 = 0;

/// Public key length of the Ed25519 variant, in bytes.
pub const ED25519_PUBLIC_KEY_LEN: usize = 32;

/// Encoded size of the tag and length varu64 fields for the current registry: both the algorithm
/// tag (`0`) and the length (`32`) are `<= 247` and so each always takes the varu64 codec's
/// single-byte direct form, not its full 9-byte worst case.
const TAG_AND_LENGTH_OVERHEAD: usize = 2;

/// Largest encoded size of a [`YamfSignatory`] for the current registry.
pub const MAX_YAMF_SIGNATORY_SIZE: usize = TAG_AND_LENGTH_OVERHEAD + ED25519_PUBLIC_KEY_LEN;

/// A tagged public key, identifying the author of a log.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum YamfSignatory {
    Ed25519([u8; ED25519_PUBLIC_KEY_LEN]),
}

impl YamfSignatory {
    pub fn key_bytes(&self) -> &[u8] {
        match self {
            YamfSignatory::Ed25519(bytes) => bytes.as_slice(),
        }
    }

    pub fn encode(&self, out: &mut [u8]) -> Result<usize, YamfSignatoryError> {
        let key = self.key_bytes();
        let mut offset = 0;

        offset += varu64::encode(ED25519_TAG, &mut out[offset..])
            .map_err(|source| YamfSignatoryError::Encode { source })?;
        offset += varu64::encode(key.len() as u64, &mut out[offset..])
            .map_err(|source| YamfSignatoryError::Encode { source })?;

        let end = offset + key.len();
        if out.len() < end {
            return Err(YamfSignatoryError::Encode {
                source: Varu64Error::BufferTooSmall {
                    needed: end,
                    available: out.len(),
                },
            });
        }
        out[offset..end].copy_from_slice(key);

        Ok(end)
    }

    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), YamfSignatoryError> {
        let (tag, mut offset) =
            varu64::decode(bytes).map_err(|source| YamfSignatoryError::Decode { source })?;

        let (length, len_size) = varu64::decode(&bytes[offset..])
            .map_err(|source| YamfSignatoryError::Decode { source })?;
        offset += len_size;

        match tag {
            ED25519_TAG => {
                if length as usize != ED25519_PUBLIC_KEY_LEN {
                    return Err(YamfSignatoryError::UnexpectedLength {
                        tag,
                        expected: ED25519_PUBLIC_KEY_LEN,
                        found: length,
                    });
                }
                let end = offset + ED25519_PUBLIC_KEY_LEN;
                if bytes.len() < end {
                    return Err(YamfSignatoryError::Decode {
                        source: Varu64Error::InputTooShort,
                    });
                }
                let mut key = [0u8; ED25519_PUBLIC_KEY_LEN];
                key.copy_from_slice(&bytes[offset..end]);
                Ok((YamfSignatory::Ed25519(key), end))
            }
            unknown => Err(YamfSignatoryError::UnknownTag(unknown)),
        }
    }
}

impl AsRef<[u8]> for YamfSignatory {
    fn as_ref(&self) -> &[u8] {
        self.key_bytes()
    }
}

impl TryFrom<&[u8]> for YamfSignatory {
    type Error = YamfSignatoryError;

    /// Builds an `Ed25519` signatory directly from a raw, untagged public key.
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let key: [u8; ED25519_PUBLIC_KEY_LEN] =
            value
                .try_into()
                .map_err(|_| YamfSignatoryError::UnexpectedLength {
                    tag: ED25519_TAG,
                    expected: ED25519_PUBLIC_KEY_LEN,
                    found: value.len() as u64,
                })?;
        Ok(YamfSignatory::Ed25519(key))
    }
}

impl fmt::Debug for YamfSignatory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("YamfSignatory")
            .field(&hex::encode(self.key_bytes()))
            .finish()
    }
}

impl fmt::Display for YamfSignatory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.key_bytes()))
    }
}

impl From<ed25519_dalek::VerifyingKey> for YamfSignatory {
    fn from(value: ed25519_dalek::VerifyingKey) -> Self {
        YamfSignatory::Ed25519(value.to_bytes())
    }
}

impl TryFrom<&YamfSignatory> for ed25519_dalek::VerifyingKey {
    type Error = ed25519_dalek::SignatureError;

    fn try_from(value: &YamfSignatory) -> Result<Self, Self::Error> {
        match value {
            YamfSignatory::Ed25519(bytes) => ed25519_dalek::VerifyingKey::from_bytes(bytes),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum YamfSignatoryError {
    #[error("unknown signatory algorithm tag {0}")]
    UnknownTag(u64),

    #[error("signatory algorithm {tag} expects a {expected}-byte key, length field said {found}")]
    UnexpectedLength { tag: u64, expected: usize, found: u64 },

    #[error("failed to encode signatory: {source}")]
    Encode { source: Varu64Error },

    #[error("failed to decode signatory: {source}")]
    Decode { source: Varu64Error },
}
