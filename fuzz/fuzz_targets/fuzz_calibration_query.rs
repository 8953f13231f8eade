//! Fuzz target: `calibration::parse_fields` and the store's atomic apply.
//!
//! cargo fuzz run fuzz_calibration_query

#![no_main]

use libfuzzer_sys::fuzz_target;
use weatherstation::calibration::{CalibrationStore, OFFSET_KEYS, THRESHOLD_KEYS, parse_fields};

fuzz_target!(|data: &[u8]| {
    let Ok(query) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_fields(query, &THRESHOLD_KEYS);
    let _ = parse_fields(query, &OFFSET_KEYS);

    let mut store = CalibrationStore::default();
    let before = store.snapshot();
    if store.apply_thresholds(query).is_err() {
        assert_eq!(store.snapshot(), before, "rejected update must not mutate");
    }
});
