#![no_main]

use bamboo_core::entry;

use libfuzzer_sys::fuzz_target;

// decode() must never panic on arbitrary bytes, however malformed.
fuzz_target!(|data: &[u8]| {
    let _ = entry::decode(data);
});
