// SPDX-License-Identifier: AGPL-3.0-or-later

//! The exhaustive error taxonomy for encode, decode, publish, and verify.
//!
//! Every failure reachable from the three core operations is one variant of this type. Where the
//! failure originates in a sub-codec (varu64, a tagged hash/signatory/signature), that error is
//! embedded as a `#[source]` field rather than flattened into a string, so callers can match on
//! the exact cause.

use thiserror::Error;

use crate::signature::SignatureError;
use crate::varu64::Varu64Error;
use crate::yamf_hash::YamfHashError;
use crate::yamf_signatory::YamfSignatoryError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // --- Encode ---
    #[error("output buffer too small: needed {needed} bytes, have {available}")]
    EncodeBufferLength { needed: usize, available: usize },

    #[error("failed to encode payload hash: {source}")]
    EncodePayloadHashError {
        #[source]
        source: YamfHashError,
    },

    #[error("failed to encode author: {source}")]
    EncodeAuthorError {
        #[source]
        source: YamfSignatoryError,
    },

    #[error("failed to encode payload length: {source}")]
    EncodePayloadLengthError {
        #[source]
        source: Varu64Error,
    },

    #[error("failed to encode log id: {source}")]
    EncodeLogIdError {
        #[source]
        source: Varu64Error,
    },

    #[error("failed to encode seq num: {source}")]
    EncodeSeqError {
        #[source]
        source: Varu64Error,
    },

    #[error("failed to encode backlink: {source}")]
    EncodeBacklinkError {
        #[source]
        source: YamfHashError,
    },

    #[error("failed to encode lipmaa link: {source}")]
    EncodeLipmaaError {
        #[source]
        source: YamfHashError,
    },

    #[error("failed to encode signature: {source}")]
    EncodeSigError {
        #[source]
        source: SignatureError,
    },

    // --- Decode ---
    #[error("input is empty")]
    InputIsLengthZero,

    #[error("the `is_end_of_feed` byte was not 0x00 or 0x01")]
    IsEndOfFeedError,

    #[error("failed to decode payload hash: {source}")]
    DecodePayloadHashError {
        #[source]
        source: YamfHashError,
    },

    #[error("failed to decode payload length: {source}")]
    DecodePayloadLengthError {
        #[source]
        source: Varu64Error,
    },

    #[error("failed to decode author: {source}")]
    DecodeAuthorError {
        #[source]
        source: YamfSignatoryError,
    },

    #[error("failed to decode log id: {source}")]
    DecodeLogIdError {
        #[source]
        source: Varu64Error,
    },

    #[error("failed to decode seq num: {source}")]
    DecodeSeqError {
        #[source]
        source: Varu64Error,
    },

    #[error("seq num was 0, but the genesis entry is seq 1")]
    SeqIsZero,

    #[error("failed to decode backlink: {source}")]
    DecodeBacklinkError {
        #[source]
        source: YamfHashError,
    },

    #[error("failed to decode lipmaa link: {source}")]
    DecodeLipmaaError {
        #[source]
        source: YamfHashError,
    },

    #[error("failed to decode signature: {source}")]
    DecodeSigError {
        #[source]
        source: SignatureError,
    },

    // --- Publish ---
    #[error("publish requires a public key")]
    PublishWithoutKeypair,

    #[error("publish requires a secret key")]
    PublishWithoutSecretKey,

    #[error("cannot publish: the given backlink entry already ended its feed")]
    PublishAfterEndOfFeed,

    #[error("cannot publish: the given backlink entry has log id {found}, expected {expected}")]
    PublishWithIncorrectLogId { expected: u64, found: u64 },

    #[error("cannot publish: the given backlink entry's author does not match the publishing keypair")]
    PublishAuthorMismatch,

    #[error("publishing seq {seq} requires a lipmaa-link entry, but none was given")]
    PublishWithoutLipmaaEntry { seq: u64 },

    #[error("publishing seq {seq} requires a backlink entry, but none was given")]
    PublishWithoutBacklinkEntry { seq: u64 },

    // --- Verify ---
    #[error("signature does not match the entry's claimed author")]
    InvalidSignature,

    #[error("payload hash does not match the given payload")]
    PayloadHashDidNotMatch,

    #[error("payload length does not match the given payload")]
    PayloadLengthDidNotMatch,

    #[error("entry has seq > 1 but no backlink entry bytes were given")]
    BacklinkEntryMissing,

    #[error("backlink entry bytes do not hash to the entry's claimed backlink")]
    BacklinkHashDoesNotMatch,

    #[error("backlink entry has a different log id than the entry being verified")]
    BacklinkLogIdMismatch,

    #[error("backlink entry has a different author than the entry being verified")]
    BacklinkAuthorMismatch,

    #[error("the backlink entry already ended its feed")]
    PublishedAfterEndOfFeed,

    #[error("entry requires a lipmaa-link entry but none was given")]
    LipmaaLinkEntryMissing,

    #[error("lipmaa-link entry bytes do not hash to the entry's claimed lipmaa link")]
    LipmaaLinkHashDoesNotMatch,

    #[error("lipmaa-link entry has a different log id than the entry being verified")]
    LipmaaLogIdMismatch,

    #[error("lipmaa-link entry has a different author than the entry being verified")]
    LipmaaAuthorMismatch,
}
