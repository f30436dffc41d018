//! A minimal example showing basic usage of the core bamboo types.
//!
//! We generate a keypair, publish a genesis entry carrying a payload, and then verify it: check
//! the signature and confirm the payload hashes match what the entry claims.
use bamboo_core::keypair::Keypair;
use bamboo_core::{publish, verify};

fn main() {
    let keypair = Keypair::generate();

    let payload = b"Hello, Bamboo!";
    let entry_bytes = publish::publish_to_vec(&keypair, 0, payload, false, 0, None, None)
        .expect("publishing the genesis entry");

    verify::verify(&entry_bytes, payload, None, None).expect("verifying the genesis entry");
}
