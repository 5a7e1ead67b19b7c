//! Fuzz target for inventory JSON parsing.
//!
//! Goal: The parser should **never panic** on any input.
//! It may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_inventory_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use polguard_inventory::{Exclusions, into_refs, parse_inventory};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data)
        && let Ok(artifacts) = parse_inventory(text)
    {
        let refs = into_refs(artifacts);
        for artifact in &refs {
            let _ = artifact.display_name();
            let _ = artifact.coordinates();
            let _ = artifact.has_licenses(&["GPL-2.0-only".to_string()]);
        }
        if let Ok(exclusions) = Exclusions::new(&["pkg:maven/**".to_string()]) {
            let _ = exclusions.apply(refs);
        }
    }
});
