//! Fuzz target for package URL parsing.
//!
//! Goal: parsing never panics, and canonical forms are fixed points: parsing a
//! canonicalized purl yields the same canonical string. Violation hashes are built from
//! canonical coordinates, so a drifting canonical form would change hashes between runs.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_purl_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use polguard_types::Purl;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data)
        && let Ok(purl) = Purl::parse(text)
    {
        let canonical = purl.canonicalize();
        let reparsed = Purl::parse(&canonical).expect("canonical purl parses");
        assert_eq!(reparsed.canonicalize(), canonical);
        let _ = purl.package_key();
    }
});
