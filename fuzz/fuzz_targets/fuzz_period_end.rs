#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Impossible dates come back as None, never as a panic.
        let _ = billfold::core::parse_period_end(s);
        let _ = billfold::feed::parse_feed_datetime(s);
    }
});
