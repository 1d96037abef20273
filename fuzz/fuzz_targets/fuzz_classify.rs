#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Any line name must classify without panicking, and the
        // canonical service name is never empty.
        let _ = billfold::core::classify_line(s);
        let _ = billfold::core::is_credit_like(s);
        assert!(!billfold::core::canonical_service_name(s).as_str().is_empty());
    }
});
