#![no_main]
use libfuzzer_sys::fuzz_target;

// Fuzz the validator proper: the first half of the input is parsed as a
// schema, the second half as an instance to validate against it. We only
// care about schemas that pass verify(); anything else is out of scope
// (construction and verification have their own fuzz target).
fuzz_target!(|data: (&[u8], &[u8])| {
    let (schema_bytes, instance_bytes) = data;

    let schema = match serde_json::from_slice::<serde_json::Value>(schema_bytes)
        .ok()
        .and_then(|v| jtd_validate::Schema::from_value(&v).ok())
        .and_then(|s| s.verify().ok())
    {
        Some(schema) => schema,
        None => return,
    };

    if let Ok(instance) = serde_json::from_slice::<serde_json::Value>(instance_bytes) {
        let _ = jtd_validate::validate(
            &schema,
            &instance,
            jtd_validate::ValidateOptions::new().with_max_depth(64),
        );
    }
});
