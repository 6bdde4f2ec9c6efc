#![no_main]

use aggregate::{check_enemy_drone_alive, parse_statestore, AggregateOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(samples) = parse_statestore(text) {
        let report = check_enemy_drone_alive(&samples, &AggregateOptions::default());
        assert_eq!(report.ticks, samples.len());
        assert!(report.moving_ticks <= report.ticks);
    }
});
