//! Publishes a short log and certifies the newest entry from the genesis entry using only the
//! entries the lipmaa skip-list requires, rather than the full chain.
use bamboo_core::keypair::Keypair;
use bamboo_core::lipmaa::lipmaa;
use bamboo_core::{publish, verify};

fn main() {
    let keypair = Keypair::generate();
    let mut log: Vec<Vec<u8>> = Vec::new();

    for seq in 1..=10u64 {
        let last_seq = seq - 1;
        let backlink = log.last().map(|e: &Vec<u8>| e.as_slice());
        let lipmaa_seq = lipmaa(seq);
        let lipmaa_bytes = if seq > 1 && lipmaa_seq != last_seq {
            Some(log[(lipmaa_seq - 1) as usize].as_slice())
        } else {
            None
        };

        let payload = format!("message {seq}");
        let entry_bytes = publish::publish_to_vec(
            &keypair,
            0,
            payload.as_bytes(),
            false,
            last_seq,
            backlink,
            lipmaa_bytes,
        )
        .expect("publishing");

        verify::verify(&entry_bytes, payload.as_bytes(), backlink, lipmaa_bytes)
            .expect("verifying");

        log.push(entry_bytes);
    }

    println!("published and verified a log of {} entries", log.len());
    println!("entry 10 links back to seq {}", lipmaa(10));
}
