#![no_main]

use libfuzzer_sys::fuzz_target;
use modbus_accessor::parse_response;

fuzz_target!(|data: &[u8]| {
    if let Ok(parsed) = parse_response(data) {
        assert_eq!(parsed.raw_content().len(), parsed.content().len());
        assert_eq!(parsed.function().to_u8(), data[0]);
    }
});
