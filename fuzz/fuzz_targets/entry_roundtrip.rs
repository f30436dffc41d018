#![no_main]

use arbitrary::Arbitrary;
use bamboo_core::keypair::Keypair;
use bamboo_core::{entry, publish, verify};

use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    seed: [u8; 32],
    payload: Vec<u8>,
    is_end_of_feed: bool,
}

fuzz_target!(|input: Input| {
    let signing_key = ed25519_dalek::SigningKey::from_bytes(&input.seed);
    let keypair: Keypair = signing_key.into();

    let bytes = publish::publish_to_vec(
        &keypair,
        0,
        &input.payload,
        input.is_end_of_feed,
        0,
        None,
        None,
    )
    .expect("publishing a genesis entry never fails");

    verify::verify(&bytes, &input.payload, None, None)
        .expect("a freshly published entry always verifies against its own payload");

    let decoded = entry::decode(&bytes).expect("a freshly published entry always decodes");
    assert_eq!(decoded.to_bytes(), bytes);
});
