#![no_main]

use aggregate::{get_overhead_info, AggregateOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(series) = get_overhead_info(text, &AggregateOptions::default()) {
        assert_eq!(series.absolute_overhead_per_tick.len(), series.len());
        assert_eq!(series.relative_overhead_per_tick.len(), series.len());
    }
});
