// SPDX-License-Identifier: AGPL-3.0-or-later

//! Signed, hash-linked, per-author append-only log entries.
//!
//! An entry is the atomic unit of a Bamboo log: it carries a payload hash, links back to the
//! previous entry in the same log, and links sideways to an earlier entry chosen by the
//! [`lipmaa`] skip-list function so any entry can be certified from the newest one in
//! `O(log n)` fetches instead of `O(n)`. Everything here is no-std-friendly in spirit: encode
//! and decode work against caller-owned byte slices and never allocate on the hot path (the
//! `_to_vec`/`to_bytes` convenience wrappers are the only places a `Vec` appears).
//!
//! ```
//! use bamboo_core::{keypair::Keypair, publish, verify};
//!
//! let keypair = Keypair::generate();
//! let genesis = publish::publish_to_vec(&keypair, 0, b"hello", false, 0, None, None).unwrap();
//! verify::verify(&genesis, b"hello", None, None).unwrap();
//! ```

pub mod entry;
pub mod error;
pub mod keypair;
pub mod lipmaa;
pub mod publish;
pub mod signature;
pub mod varu64;
pub mod verify;
pub mod yamf_hash;
pub mod yamf_signatory;

pub use entry::{Entry, SignedEntry, MAX_ENTRY_SIZE};
pub use error::Error;
pub use keypair::Keypair;
pub use lipmaa::lipmaa;
pub use publish::{publish, publish_to_vec};
pub use signature::Signature;
pub use verify::verify;
pub use yamf_hash::YamfHash;
pub use yamf_signatory::YamfSignatory;
