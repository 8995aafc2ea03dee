#![no_main]
use libfuzzer_sys::fuzz_target;

// Fuzz the front door of the schema pipeline: arbitrary JSON bytes, decoded
// into a serde_json::Value and handed to Schema::from_value. Since the input
// isn't constrained to be schema-shaped at all, this mostly exercises the
// TypeMismatch/IllegalKeyword/InvalidForm paths, but a corpus seeded with
// real schemas will also reach verify().
fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        if let Ok(schema) = jtd_validate::Schema::from_value(&value) {
            let _ = schema.verify();
        }
    }
});
