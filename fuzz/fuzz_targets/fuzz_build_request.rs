#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use modbus_accessor::{build_request, encode_frame, Accessor};

#[derive(Debug, Arbitrary)]
struct Input {
    function: u8,
    starting_address: u16,
    count_or_value: u16,
    write_value: Option<u16>,
    reverse: bool,
}

fuzz_target!(|input: Input| {
    let Ok(accessor) = Accessor::from_raw(
        input.function,
        input.starting_address,
        "fuzz",
        input.count_or_value,
        input.reverse,
    ) else {
        return;
    };
    let accessor = match input.write_value {
        Some(v) => accessor.with_write_value(v),
        None => accessor,
    };

    if let Ok(request) = build_request(&accessor) {
        assert_eq!(request.as_bytes()[0], input.function);
        assert!(accessor.span_end() <= 255);
        let frame = encode_frame(1, 1, request.as_bytes());
        assert_eq!(frame.len(), 7 + request.len());
    }
});
