#![no_main]

use campaign::{Combination, ParamValue};
use libfuzzer_sys::fuzz_target;
use matrix::{parse_config_values, ConfigTemplate};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let template = ConfigTemplate::new(text);

    // Untouched templates render byte for byte.
    assert_eq!(template.render(&Combination::new()), text);

    // Override the first key and make sure the result still parses.
    if let Some(key) = template.keys().next().map(str::to_string) {
        let mut overrides = Combination::new();
        overrides.set(key.clone(), ParamValue::Float(1.25));
        let rendered = template.render(&overrides);
        assert!(rendered.contains(&format!("{key} 1.25")));
        let _ = parse_config_values(&rendered);
    }
});
