#![no_main]
use festfriend_protocol::{normalize_wire_id, GroupId, IdError};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|raw: i64| {
    let normalized = normalize_wire_id(raw);

    // Normalization only ever shifts negatives up by 2^16
    if raw >= 0 {
        assert_eq!(normalized, raw);
    } else {
        assert_eq!(normalized, raw + 65_536);
    }

    match GroupId::from_wire(raw) {
        Ok(id) => assert_eq!(i64::from(id.get()), normalized),
        Err(IdError::OutOfRange(n)) => {
            assert_eq!(n, normalized);
            assert!(!(0..=65_535).contains(&n));
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
});
