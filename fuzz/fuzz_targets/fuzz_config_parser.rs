//! Fuzz target for `polguard.toml` parsing and resolution.
//!
//! Goal: The parser should **never panic** on any input.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use polguard_settings::{Overrides, parse_config_toml, resolve_config};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data)
        && let Ok(cfg) = parse_config_toml(text)
    {
        let _ = resolve_config(cfg, Overrides::default());
    }
});
