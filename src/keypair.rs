// SPDX-License-Identifier: AGPL-3.0-or-later

//! Ed25519 keypairs used to sign and verify entries.

use ed25519_dalek::Signer;
use rand::rngs::OsRng;

use crate::error::Error;
use crate::signature::Signature;
use crate::yamf_signatory::{ED25519_PUBLIC_KEY_LEN, YamfSignatory};

/// An Ed25519 keypair capable of signing entries for a log.
///
/// Constructing one from raw bytes is where [`Error::PublishWithoutKeypair`] and
/// [`Error::PublishWithoutSecretKey`] originate, keeping [`crate::publish::publish`] itself free
/// of `Option` handling while still giving a caller assembling its arguments from separate,
/// possibly-absent public/secret key byte slices (as an FFI boundary over raw pointers would) the
/// exact error semantics the format specifies.
#[derive(Clone)]
pub struct Keypair(ed25519_dalek::SigningKey);

impl Keypair {
    /// Generates a new keypair using the system's CSPRNG.
    pub fn generate() -> Self {
        let mut csprng = OsRng;
        Self(ed25519_dalek::SigningKey::generate(&mut csprng))
    }

    /// Builds a keypair from raw public/secret key bytes, as they would arrive across an FFI
    /// boundary: either may be absent.
    pub fn from_raw_parts(
        public_key: Option<&[u8; ED25519_PUBLIC_KEY_LEN]>,
        secret_key: Option<&[u8; 32]>,
    ) -> Result<Self, Error> {
        if public_key.is_none() {
            return Err(Error::PublishWithoutKeypair);
        }
        let secret_key = secret_key.ok_or(Error::PublishWithoutSecretKey)?;

        let signing_key = ed25519_dalek::SigningKey::from_bytes(secret_key);
        Ok(Self(signing_key))
    }

    /// This keypair's public key, tagged for the wire format.
    pub fn public_key(&self) -> YamfSignatory {
        self.0.verifying_key().into()
    }

    /// Signs `bytes`, producing a tagged signature.
    pub fn sign(&self, bytes: &[u8]) -> Signature {
        self.0.sign(bytes).into()
    }
}

impl From<ed25519_dalek::SigningKey> for Keypair {
    fn from(value: ed25519_dalek::SigningKey) -> Self {
        Self(value)
    }
}
