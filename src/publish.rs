// SPDX-License-Identifier: AGPL-3.0-or-later

//! Building and signing a new entry to append to a log.

use crate::entry::{self, Entry, SignedEntry, MAX_ENTRY_SIZE};
use crate::error::Error;
use crate::keypair::Keypair;
use crate::lipmaa::lipmaa;
use crate::yamf_hash::YamfHash;

/// Builds, signs, and encodes the next entry for a log into `out`, returning the number of bytes
/// written.
///
/// `backlink_bytes` and `lipmaa_link_bytes` are the encoded bytes of the previous entries this
/// new entry must link to (not just their hashes) so their `log_id`, `author`, and
/// `is_end_of_feed` fields can be checked against the entry being built. Both are required
/// whenever `last_seq_num > 0`; pass `None` for both only when publishing the genesis entry.
#[allow(clippy::too_many_arguments)]
pub fn publish(
    out: &mut [u8],
    keypair: &Keypair,
    log_id: u64,
    payload: &[u8],
    is_end_of_feed: bool,
    last_seq_num: u64,
    backlink_bytes: Option<&[u8]>,
    lipmaa_link_bytes: Option<&[u8]>,
) -> Result<usize, Error> {
    let seq_num = last_seq_num + 1;
    let author = keypair.public_key();

    let mut backlink = None;
    let mut lipmaa_link = None;

    if seq_num > 1 {
        let backlink_bytes =
            backlink_bytes.ok_or(Error::PublishWithoutBacklinkEntry { seq: seq_num })?;
        let decoded_backlink = entry::decode(backlink_bytes)?;

        if decoded_backlink.entry.is_end_of_feed {
            return Err(Error::PublishAfterEndOfFeed);
        }
        if decoded_backlink.entry.log_id != log_id {
            return Err(Error::PublishWithIncorrectLogId {
                expected: log_id,
                found: decoded_backlink.entry.log_id,
            });
        }
        if decoded_backlink.entry.author != author {
            return Err(Error::PublishAuthorMismatch);
        }

        backlink = Some(YamfHash::new_blake2b(backlink_bytes));

        if lipmaa(seq_num) != seq_num - 1 {
            let lipmaa_link_bytes =
                lipmaa_link_bytes.ok_or(Error::PublishWithoutLipmaaEntry { seq: seq_num })?;
            let decoded_lipmaa = entry::decode(lipmaa_link_bytes)?;

            if decoded_lipmaa.entry.log_id != log_id {
                return Err(Error::PublishWithIncorrectLogId {
                    expected: log_id,
                    found: decoded_lipmaa.entry.log_id,
                });
            }
            if decoded_lipmaa.entry.author != author {
                return Err(Error::PublishAuthorMismatch);
            }

            lipmaa_link = Some(YamfHash::new_blake2b(lipmaa_link_bytes));
        }
    }

    let new_entry = Entry {
        log_id,
        is_end_of_feed,
        payload_hash: YamfHash::new_blake2b(payload),
        payload_length: payload.len() as u64,
        author,
        seq_num,
        backlink,
        lipmaa_link,
    };

    let sig = keypair.sign(&new_entry.to_bytes());
    let signed = SignedEntry {
        entry: new_entry,
        sig,
    };

    signed.encode(out)
}

/// Like [`publish`] but returns a freshly allocated buffer.
#[allow(clippy::too_many_arguments)]
pub fn publish_to_vec(
    keypair: &Keypair,
    log_id: u64,
    payload: &[u8],
    is_end_of_feed: bool,
    last_seq_num: u64,
    backlink_bytes: Option<&[u8]>,
    lipmaa_link_bytes: Option<&[u8]>,
) -> Result<Vec<u8>, Error> {
    let mut buf = vec![0u8; MAX_ENTRY_SIZE];
    let len = publish(
        &mut buf,
        keypair,
        log_id,
        payload,
        is_end_of_feed,
        last_seq_num,
        backlink_bytes,
        lipmaa_link_bytes,
    )?;
    buf.truncate(len);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publishes_genesis_entry() {
        let keypair = Keypair::generate();
        let bytes = publish_to_vec(&keypair, 0, b"hello", false, 0, None, None).unwrap();
        let decoded = entry::decode(&bytes).unwrap();
        assert_eq!(decoded.entry.seq_num, 1);
        assert!(decoded.entry.backlink.is_none());
        assert!(decoded.entry.lipmaa_link.is_none());
    }

    #[test]
    fn publishes_a_short_chain() {
        let keypair = Keypair::generate();
        let mut log: Vec<Vec<u8>> = Vec::new();

        for seq in 1..=5u64 {
            let last_seq = seq - 1;
            let backlink = log.last().map(|e: &Vec<u8>| e.as_slice());
            let lipmaa_seq = lipmaa(seq);
            let lipmaa_bytes = if lipmaa_seq != seq - 1 && seq > 1 {
                Some(log[(lipmaa_seq - 1) as usize].as_slice())
            } else {
                None
            };

            let bytes = publish_to_vec(
                &keypair,
                0,
                format!("payload {seq}").as_bytes(),
                false,
                last_seq,
                backlink,
                lipmaa_bytes,
            )
            .unwrap();

            let decoded = entry::decode(&bytes).unwrap();
            assert_eq!(decoded.entry.seq_num, seq);
            log.push(bytes);
        }
    }

    #[test]
    fn rejects_missing_backlink() {
        let keypair = Keypair::generate();
        let err = publish_to_vec(&keypair, 0, b"hello", false, 1, None, None).unwrap_err();
        assert_eq!(err, Error::PublishWithoutBacklinkEntry { seq: 2 });
    }

    #[test]
    fn rejects_publish_after_end_of_feed() {
        let keypair = Keypair::generate();
        let genesis = publish_to_vec(&keypair, 0, b"hello", true, 0, None, None).unwrap();
        let err = publish_to_vec(&keypair, 0, b"world", false, 1, Some(&genesis), None)
            .unwrap_err();
        assert_eq!(err, Error::PublishAfterEndOfFeed);
    }

    #[test]
    fn rejects_wrong_log_id() {
        let keypair = Keypair::generate();
        let genesis = publish_to_vec(&keypair, 0, b"hello", false, 0, None, None).unwrap();
        let err = publish_to_vec(&keypair, 1, b"world", false, 1, Some(&genesis), None)
            .unwrap_err();
        assert_eq!(
            err,
            Error::PublishWithIncorrectLogId {
                expected: 1,
                found: 0
            }
        );
    }

    #[test]
    fn rejects_author_mismatch() {
        let alice = Keypair::generate();
        let bob = Keypair::generate();
        let genesis = publish_to_vec(&alice, 0, b"hello", false, 0, None, None).unwrap();
        let err = publish_to_vec(&bob, 0, b"world", false, 1, Some(&genesis), None).unwrap_err();
        assert_eq!(err, Error::PublishAuthorMismatch);
    }
}
