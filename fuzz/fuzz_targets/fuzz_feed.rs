#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Malformed feeds must error, never panic, and whatever parses
        // must survive modeling however extreme its amounts.
        if let Ok(batch) = billfold::feed::parse_batch(s) {
            for invoice in &batch {
                let _ = billfold::core::build_tax_model(invoice);
            }
        }
    }
});
