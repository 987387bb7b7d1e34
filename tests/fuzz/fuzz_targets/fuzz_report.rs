#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parser must not panic on any input.
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = pwsummary::parse_report(text);
    }
});
