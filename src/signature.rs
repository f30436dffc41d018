// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tagged signature values: `varu64(algorithm_id) ∥ varu64(signature_length) ∥ signature_bytes`.

use std::fmt;

use thiserror::Error;

use crate::varu64::{self, Varu64Error};

/// Numeric tag identifying the Ed25519 variant.
pub const ED25519_TAG: u64 = 0;

/// Signature length of the Ed25519 variant, in bytes.
pub const ED25519_SIGNATURE_LEN: usize = 64;

/// Encoded size of the tag and length varu64 fields for the current registry: both the algorithm
/// tag (`0`) and the length (`64`) are `<= 247` and so each always takes the varu64 codec's
/// single-byte direct form, not its full 9-byte worst case.
const TAG_AND_LENGTH_OVERHEAD: usize = 2;

/// Largest encoded size of a [`Signature`] for the current registry.
pub const MAX_SIGNATURE_SIZE: usize = TAG_AND_LENGTH_OVERHEAD + ED25519_SIGNATURE_LEN;

/// A tagged digital signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Signature {
    Ed25519([u8; ED25519_SIGNATURE_LEN]),
}

impl Signature {
    pub fn signature_bytes(&self) -> &[u8] {
        match self {
            Signature::Ed25519(bytes) => bytes.as_slice(),
        }
    }

    pub fn encode(&self, out: &mut [u8]) -> Result<usize, SignatureError> {
        let sig = self.signature_bytes();
        let mut offset = 0;

        offset += varu64::encode(ED25519_TAG, &mut out[offset..])
            .map_err(|source| SignatureError::Encode { source })?;
        offset += varu64::encode(sig.len() as u64, &mut out[offset..])
            .map_err(|source| SignatureError::Encode { source })?;

        let end = offset + sig.len();
        if out.len() < end {
            return Err(SignatureError::Encode {
                source: Varu64Error::BufferTooSmall {
                    needed: end,
                    available: out.len(),
                },
            });
        }
        out[offset..end].copy_from_slice(sig);

        Ok(end)
    }

    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), SignatureError> {
        let (tag, mut offset) =
            varu64::decode(bytes).map_err(|source| SignatureError::Decode { source })?;

        let (length, len_size) = varu64::decode(&bytes[offset..])
            .map_err(|source| SignatureError::Decode { source })?;
        offset += len_size;

        match tag {
            ED25519_TAG => {
                if length as usize != ED25519_SIGNATURE_LEN {
                    return Err(SignatureError::UnexpectedLength {
                        tag,
                        expected: ED25519_SIGNATURE_LEN,
                        found: length,
                    });
                }
                let end = offset + ED25519_SIGNATURE_LEN;
                if bytes.len() < end {
                    return Err(SignatureError::Decode {
                        source: Varu64Error::InputTooShort,
                    });
                }
                let mut sig = [0u8; ED25519_SIGNATURE_LEN];
                sig.copy_from_slice(&bytes[offset..end]);
                Ok((Signature::Ed25519(sig), end))
            }
            unknown => Err(SignatureError::UnknownTag(unknown)),
        }
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        self.signature_bytes()
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = SignatureError;

    /// Builds an `Ed25519` signature directly from raw, untagged signature bytes.
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let sig: [u8; ED25519_SIGNATURE_LEN] =
            value.try_into().map_err(|_| SignatureError::UnexpectedLength {
                tag: ED25519_TAG,
                expected: ED25519_SIGNATURE_LEN,
                found: value.len() as u64,
            })?;
        Ok(Signature::Ed25519(sig))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signature")
            .field(&hex::encode(self.signature_bytes()))
            .finish()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.signature_bytes()))
    }
}

impl From<ed25519_dalek::Signature> for Signature {
    fn from(value: ed25519_dalek::Signature) -> Self {
        Signature::Ed25519(value.to_bytes())
    }
}

impl From<&Signature> for ed25519_dalek::Signature {
    fn from(value: &Signature) -> Self {
        match value {
            Signature::Ed25519(bytes) => ed25519_dalek::Signature::from_bytes(bytes),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("unknown signature algorithm tag {0}")]
    UnknownTag(u64),

    #[error("signature algorithm {tag} expects a {expected}-byte signature, length field said {found}")]
    UnexpectedLength { tag: u64, expected: usize, found: u64 },

    #[error("failed to encode signature: {source}")]
    Encode { source: Varu64Error },

    #[error("failed to decode signature: {source}")]
    Decode { source: Varu64Error },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let sig = Signature::Ed25519([9u8; ED25519_SIGNATURE_LEN]);
        let mut buf = [0u8; MAX_SIGNATURE_SIZE];
        let n = sig.encode(&mut buf).unwrap();
        let (decoded, consumed) = Signature::decode(&buf[..n]).unwrap();
        assert_eq!(consumed, n);
        assert_eq!(decoded, sig);
    }

    #[test]
    fn rejects_unknown_tag() {
        let mut bytes = vec![3u8, 64];
        bytes.extend_from_slice(&[0u8; 64]);
        assert_eq!(
            Signature::decode(&bytes),
            Err(SignatureError::UnknownTag(3))
        );
    }

    #[test]
    fn try_from_raw_bytes() {
        let sig = Signature::Ed25519([9u8; ED25519_SIGNATURE_LEN]);
        let raw = sig.as_ref().to_vec();
        assert_eq!(Signature::try_from(raw.as_slice()).unwrap(), sig);
        assert!(Signature::try_from([0u8; 10].as_slice()).is_err());
    }
}
