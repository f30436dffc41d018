// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tagged hash values: `varu64(algorithm_id) ∥ varu64(digest_length) ∥ digest_bytes`.
//!
//! The length prefix is redundant for the current registry (each variant has a fixed digest
//! size) but is still written and checked on read, so a future variant with a different length
//! can be added without changing the wire shape.

use std::fmt;

use blake2::Blake2b512;
use blake2::digest::Digest;
use thiserror::Error;

use crate::varu64::{self, Varu64Error};

/// Numeric tag identifying the BLAKE2b-512 variant.
pub const BLAKE2B_TAG: u64 = 0;

/// Digest length of the BLAKE2b-512 variant, in bytes.
pub const BLAKE2B_DIGEST_LEN: usize = 64;

/// Encoded size of the tag and length varu64 fields for the current registry: both the algorithm
/// tag (`0`) and the length (`32`/`64`) are `<= 247` and so each always takes the varu64 codec's
/// single-byte direct form, not its full 9-byte worst case.
const TAG_AND_LENGTH_OVERHEAD: usize = 2;

/// Largest encoded size of a [`YamfHash`] for the current registry.
pub const MAX_YAMF_HASH_SIZE: usize = TAG_AND_LENGTH_OVERHEAD + BLAKE2B_DIGEST_LEN;

/// A tagged hash digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum YamfHash {
    Blake2b([u8; BLAKE2B_DIGEST_LEN]),
}

impl YamfHash {
    /// Hashes `bytes` with BLAKE2b-512.
    pub fn new_blake2b(bytes: &[u8]) -> Self {
        let mut hasher = Blake2b512::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        let mut out = [0u8; BLAKE2B_DIGEST_LEN];
        out.copy_from_slice(&digest);
        YamfHash::Blake2b(out)
    }

    /// Raw digest bytes, without the algorithm tag or length prefix.
    pub fn digest_bytes(&self) -> &[u8] {
        match self {
            YamfHash::Blake2b(digest) => digest.as_slice(),
        }
    }

    /// Encodes the tagged hash into `out`, returning the number of bytes written.
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, YamfHashError> {
        let digest = self.digest_bytes();
        let mut offset = 0;

        offset += varu64::encode(BLAKE2B_TAG, &mut out[offset..])
            .map_err(|source| YamfHashError::Encode { source })?;
        offset += varu64::encode(digest.len() as u64, &mut out[offset..])
            .map_err(|source| YamfHashError::Encode { source })?;

        let end = offset + digest.len();
        if out.len() < end {
            return Err(YamfHashError::Encode {
                source: Varu64Error::BufferTooSmall {
                    needed: end,
                    available: out.len(),
                },
            });
        }
        out[offset..end].copy_from_slice(digest);

        Ok(end)
    }

    /// Decodes a tagged hash from the front of `bytes`, returning the value and the number of
    /// bytes consumed.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), YamfHashError> {
        let (tag, mut offset) =
            varu64::decode(bytes).map_err(|source| YamfHashError::Decode { source })?;

        let (length, len_size) = varu64::decode(&bytes[offset..])
            .map_err(|source| YamfHashError::Decode { source })?;
        offset += len_size;

        match tag {
            BLAKE2B_TAG => {
                if length as usize != BLAKE2B_DIGEST_LEN {
                    return Err(YamfHashError::UnexpectedLength {
                        tag,
                        expected: BLAKE2B_DIGEST_LEN,
                        found: length,
                    });
                }
                let end = offset + BLAKE2B_DIGEST_LEN;
                if bytes.len() < end {
                    return Err(YamfHashError::Decode {
                        source: Varu64Error::InputTooShort,
                    });
                }
                let mut digest = [0u8; BLAKE2B_DIGEST_LEN];
                digest.copy_from_slice(&bytes[offset..end]);
                Ok((YamfHash::Blake2b(digest), end))
            }
            unknown => Err(YamfHashError::UnknownTag(unknown)),
        }
    }
}

impl AsRef<[u8]> for YamfHash {
    fn as_ref(&self) -> &[u8] {
        self.digest_bytes()
    }
}

impl TryFrom<&[u8]> for YamfHash {
    type Error = YamfHashError;

    /// Builds a `Blake2b` hash directly from a raw, untagged digest (e.g. one this crate just
    /// computed itself), without going through the tagged wire encoding.
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let digest: [u8; BLAKE2B_DIGEST_LEN] =
            value.try_into().map_err(|_| YamfHashError::UnexpectedLength {
                tag: BLAKE2B_TAG,
                expected: BLAKE2B_DIGEST_LEN,
                found: value.len() as u64,
            })?;
        Ok(YamfHash::Blake2b(digest))
    }
}

impl fmt::Debug for YamfHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("YamfHash").field(&hex::encode(self.digest_bytes())).finish()
    }
}

impl fmt::Display for YamfHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.digest_bytes()))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum YamfHashError {
    #[error("unknown hash algorithm tag {0}")]
    UnknownTag(u64),

    #[error("hash algorithm {tag} expects a {expected}-byte digest, length field said {found}")]
    UnexpectedLength { tag: u64, expected: usize, found: u64 },

    #[error("failed to encode hash: {source}")]
    Encode { source: Varu64Error },

    #[error("failed to decode hash: {source}")]
    Decode { source: Varu64Error },
}
