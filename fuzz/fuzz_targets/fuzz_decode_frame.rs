#![no_main]

use libfuzzer_sys::fuzz_target;
use modbus_accessor::{decode_frame, parse_response};

fuzz_target!(|data: &[u8]| {
    if let Ok(pdu) = decode_frame(data) {
        assert!(7 + pdu.len() <= data.len());
        let _ = parse_response(&pdu);
    }
});
