#![no_main]
use libfuzzer_sys::fuzz_target;
use pwsummary::render::RenderOptions;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Anything that parses must render.
    if let Ok(report) = pwsummary::parse_report(text) {
        let _ = pwsummary::render_report_summary(&report, &RenderOptions::default());
    }
});
