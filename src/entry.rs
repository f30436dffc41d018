// SPDX-License-Identifier: AGPL-3.0-or-later

//! The entry record and its wire codec.
//!
//! [`Entry`] holds everything that is signed over (the signing pre-image). [`SignedEntry`] adds
//! the signature that turns it into a published, verifiable log entry. This mirrors the
//! unsigned/signed header split this codebase already uses for its CBOR-based operation format,
//! generalized here to Bamboo's fixed binary layout (spec field order, normative and bit-exact
//! with upstream implementations):
//!
//! 1. `is_end_of_feed` (1 byte, `0x00`/`0x01`)
//! 2. `payload_hash` (tagged [`YamfHash`])
//! 3. `payload_length` (varu64)
//! 4. `author` (tagged [`YamfSignatory`])
//! 5. `log_id` (varu64)
//! 6. `seq_num` (varu64)
//! 7. `backlink` (tagged [`YamfHash`], present iff `seq_num > 1`)
//! 8. `lipmaa_link` (tagged [`YamfHash`], present iff `lipmaa(seq_num) != seq_num - 1`)
//! 9. `sig` (tagged [`Signature`], only on [`SignedEntry`])

use crate::error::Error;
use crate::lipmaa::lipmaa;
use crate::signature::{MAX_SIGNATURE_SIZE, Signature};
use crate::varu64::{self, MAX_VARU64_SIZE};
use crate::yamf_hash::{MAX_YAMF_HASH_SIZE, YamfHash};
use crate::yamf_signatory::{MAX_YAMF_SIGNATORY_SIZE, YamfSignatory};

/// Largest possible encoded size of a [`SignedEntry`] for the current algorithm registry:
/// the `is_end_of_feed` byte, one signature, one signatory, three hashes (payload, backlink,
/// lipmaa link) — each already budgeting its own 1-byte tag and 1-byte length overhead via
/// `MAX_SIGNATURE_SIZE`/`MAX_YAMF_SIGNATORY_SIZE`/`MAX_YAMF_HASH_SIZE` — and three free-standing
/// varu64 fields (payload length, log id, seq num) which, unlike the tag/length prefixes above,
/// carry no registry-fixed value and so are sized to the codec's full 9-byte worst case.
pub const MAX_ENTRY_SIZE: usize =
    1 + MAX_SIGNATURE_SIZE + MAX_YAMF_SIGNATORY_SIZE + 3 * MAX_YAMF_HASH_SIZE + 3 * MAX_VARU64_SIZE;

/// The unsigned content of an entry: everything the signature commits to.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Entry {
    pub log_id: u64,
    pub is_end_of_feed: bool,
    pub payload_hash: YamfHash,
    pub payload_length: u64,
    pub author: YamfSignatory,
    pub seq_num: u64,
    pub backlink: Option<YamfHash>,
    pub lipmaa_link: Option<YamfHash>,
}

impl Entry {
    /// Whether this entry's seq number stores an explicit lipmaa link, per spec: present iff
    /// `lipmaa(seq_num) != seq_num - 1`. When they coincide only the backlink is stored; a reader
    /// can recover the implied lipmaa link from the backlink alone.
    pub fn stores_lipmaa_link(&self) -> bool {
        self.seq_num > 1 && lipmaa(self.seq_num) != self.seq_num - 1
    }

    /// Encodes the signing pre-image (fields 1–8) into `out`, returning the number of bytes
    /// written.
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, Error> {
        let mut offset = 0;

        offset += write_end_of_feed_byte(self.is_end_of_feed, &mut out[offset..])?;

        offset += self
            .payload_hash
            .encode(&mut out[offset..])
            .map_err(|source| Error::EncodePayloadHashError { source })?;

        offset += varu64::encode(self.payload_length, &mut out[offset..])
            .map_err(|source| Error::EncodePayloadLengthError { source })?;

        offset += self
            .author
            .encode(&mut out[offset..])
            .map_err(|source| Error::EncodeAuthorError { source })?;

        offset += varu64::encode(self.log_id, &mut out[offset..])
            .map_err(|source| Error::EncodeLogIdError { source })?;

        offset += varu64::encode(self.seq_num, &mut out[offset..])
            .map_err(|source| Error::EncodeSeqError { source })?;

        if self.seq_num > 1 {
            let backlink = self
                .backlink
                .as_ref()
                .expect("seq_num > 1 entries always carry a backlink");
            offset += backlink
                .encode(&mut out[offset..])
                .map_err(|source| Error::EncodeBacklinkError { source })?;

            if self.stores_lipmaa_link() {
                let lipmaa_link = self
                    .lipmaa_link
                    .as_ref()
                    .expect("stores_lipmaa_link() implies lipmaa_link is set");
                offset += lipmaa_link
                    .encode(&mut out[offset..])
                    .map_err(|source| Error::EncodeLipmaaError { source })?;
            }
        }

        Ok(offset)
    }

    /// Encodes the signing pre-image into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; MAX_ENTRY_SIZE];
        let len = self.encode(&mut buf).expect("scratch buffer is large enough");
        buf.truncate(len);
        buf
    }
}

/// A fully formed, signed log entry: a [`Entry`] plus the [`Signature`] over it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct SignedEntry {
    pub entry: Entry,
    pub sig: Signature,
}

impl SignedEntry {
    /// Encodes the complete entry (fields 1–9) into `out`, returning the number of bytes written.
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, Error> {
        let mut offset = self.entry.encode(out)?;
        offset += self
            .sig
            .encode(&mut out[offset..])
            .map_err(|source| Error::EncodeSigError { source })?;
        Ok(offset)
    }

    /// Encodes the complete entry into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; MAX_ENTRY_SIZE];
        let len = self.encode(&mut buf).expect("scratch buffer is large enough");
        buf.truncate(len);
        buf
    }
}

fn write_end_of_feed_byte(is_end_of_feed: bool, out: &mut [u8]) -> Result<usize, Error> {
    if out.is_empty() {
        return Err(Error::EncodeBufferLength {
            needed: 1,
            available: 0,
        });
    }
    out[0] = if is_end_of_feed { 0x01 } else { 0x00 };
    Ok(1)
}

/// Parses a byte slice into a [`SignedEntry`], validating the wire format as it goes.
pub fn decode(bytes: &[u8]) -> Result<SignedEntry, Error> {
    if bytes.is_empty() {
        return Err(Error::InputIsLengthZero);
    }

    let mut offset = 0;

    let is_end_of_feed = match bytes[0] {
        0x00 => false,
        0x01 => true,
        _ => return Err(Error::IsEndOfFeedError),
    };
    offset += 1;

    let (payload_hash, n) =
        YamfHash::decode(&bytes[offset..]).map_err(|source| Error::DecodePayloadHashError { source })?;
    offset += n;

    let (payload_length, n) = varu64::decode(&bytes[offset..])
        .map_err(|source| Error::DecodePayloadLengthError { source })?;
    offset += n;

    let (author, n) =
        YamfSignatory::decode(&bytes[offset..]).map_err(|source| Error::DecodeAuthorError { source })?;
    offset += n;

    let (log_id, n) =
        varu64::decode(&bytes[offset..]).map_err(|source| Error::DecodeLogIdError { source })?;
    offset += n;

    let (seq_num, n) =
        varu64::decode(&bytes[offset..]).map_err(|source| Error::DecodeSeqError { source })?;
    offset += n;

    if seq_num == 0 {
        return Err(Error::SeqIsZero);
    }

    let mut backlink = None;
    let mut lipmaa_link = None;

    if seq_num > 1 {
        let (hash, n) = YamfHash::decode(&bytes[offset..])
            .map_err(|source| Error::DecodeBacklinkError { source })?;
        offset += n;
        backlink = Some(hash);

        if lipmaa(seq_num) != seq_num - 1 {
            let (hash, n) = YamfHash::decode(&bytes[offset..])
                .map_err(|source| Error::DecodeLipmaaError { source })?;
            offset += n;
            lipmaa_link = Some(hash);
        }
    }

    let (sig, n) =
        Signature::decode(&bytes[offset..]).map_err(|source| Error::DecodeSigError { source })?;
    offset += n;
    let _ = offset; // trailing bytes after the signature are not an error at this layer

    Ok(SignedEntry {
        entry: Entry {
            log_id,
            is_end_of_feed,
            payload_hash,
            payload_length,
            author,
            seq_num,
            backlink,
            lipmaa_link,
        },
        sig,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::Keypair;

    fn genesis_entry(author: YamfSignatory) -> Entry {
        Entry {
            log_id: 0,
            is_end_of_feed: false,
            payload_hash: YamfHash::new_blake2b(b""),
            payload_length: 0,
            author,
            seq_num: 1,
            backlink: None,
            lipmaa_link: None,
        }
    }

    #[test]
    fn genesis_round_trips() {
        let keypair = Keypair::generate();
        let entry = genesis_entry(keypair.public_key());
        let sig = keypair.sign(&entry.to_bytes());
        let signed = SignedEntry { entry, sig };

        let bytes = signed.to_bytes();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, signed);
    }

    #[test]
    fn seq_2_stores_backlink_only() {
        let keypair = Keypair::generate();
        let mut entry = genesis_entry(keypair.public_key());
        entry.seq_num = 2;
        entry.backlink = Some(YamfHash::new_blake2b(b"seq1"));
        assert!(!entry.stores_lipmaa_link());

        let sig = keypair.sign(&entry.to_bytes());
        let signed = SignedEntry { entry, sig };
        let decoded = decode(&signed.to_bytes()).unwrap();
        assert!(decoded.entry.backlink.is_some());
        assert!(decoded.entry.lipmaa_link.is_none());
    }

    #[test]
    fn seq_4_stores_both_links() {
        let keypair = Keypair::generate();
        let mut entry = genesis_entry(keypair.public_key());
        entry.seq_num = 4;
        entry.backlink = Some(YamfHash::new_blake2b(b"seq3"));
        entry.lipmaa_link = Some(YamfHash::new_blake2b(b"seq1"));
        assert!(entry.stores_lipmaa_link());

        let sig = keypair.sign(&entry.to_bytes());
        let signed = SignedEntry { entry, sig };
        let decoded = decode(&signed.to_bytes()).unwrap();
        assert!(decoded.entry.backlink.is_some());
        assert!(decoded.entry.lipmaa_link.is_some());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(decode(&[]), Err(Error::InputIsLengthZero));
    }

    #[test]
    fn seq_zero_is_rejected() {
        // is_end_of_feed=0, payload_hash of "", payload_length=0, author, log_id=0, seq_num=0
        let keypair = Keypair::generate();
        let mut bytes = vec![0x00u8];
        bytes.extend_from_slice(&YamfHash::new_blake2b(b"").to_bytes_for_test());
        bytes.push(0); // payload_length = 0
        let mut author_buf = [0u8; MAX_YAMF_SIGNATORY_SIZE];
        let n = keypair.public_key().encode(&mut author_buf).unwrap();
        bytes.extend_from_slice(&author_buf[..n]);
        bytes.push(0); // log_id = 0
        bytes.push(0); // seq_num = 0

        assert_eq!(decode(&bytes), Err(Error::SeqIsZero));
    }

    #[test]
    fn unknown_hash_tag_is_rejected() {
        let mut bytes = vec![0x00u8, 0xffu8, 64];
        bytes.extend_from_slice(&[0u8; 64]);
        assert!(matches!(
            decode(&bytes),
            Err(Error::DecodePayloadHashError { .. })
        ));
    }

    impl YamfHash {
        fn to_bytes_for_test(&self) -> Vec<u8> {
            let mut buf = [0u8; MAX_YAMF_HASH_SIZE];
            let n = self.encode(&mut buf).unwrap();
            buf[..n].to_vec()
        }
    }
}
