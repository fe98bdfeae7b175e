#![no_main]

use anchor_scroll::SyncConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 4096 {
        return;
    }

    // Parsing must never panic, and accepted configs must validate.
    if let Ok(config) = SyncConfig::from_json(text) {
        assert!(config.validate().is_ok());
        assert!(config.offset_px >= 0.0 && config.offset_px.is_finite());
    }
});
