//! # PDU Request Builder
//!
//! Turns an [`Accessor`] into the PDU bytes a device expects.
//!
//! Every accessor must first fit the accessor window: the starting address
//! and `starting_address + count_or_value` are both at most
//! [`ACCESSOR_ADDRESS_LIMIT`]. Each function code then applies its own
//! limits:
//!
//! | Function | `count_or_value` | Layout |
//! |----------|------------------|--------|
//! | FC01/FC02 | 1..=2000 | `[fc, addr, count]` |
//! | FC03 | 1..=125 | `[fc, addr, count]` |
//! | FC04 | 1..=0x7D | `[fc, addr, count]` |
//! | FC05 | 1..=2000, mapped to ON/OFF | `[fc, addr, 0xFF00 or 0x0000]` |
//! | FC06 | 1..=65535, address >= 1 | `[fc, addr, value]` |
//! | FC0F | 1..=45063 | `[fc, addr, count, n, n]`, `n = count / 8 + 1` |
//! | FC10 | 1..=0x7B, address >= 1, write value required | `[fc, addr, count, count * 2, value]` |
//!
//! 16-bit fields are big-endian.

use tracing::debug;

use crate::accessor::Accessor;
use crate::constants::*;
use crate::error::{ModbusError, ModbusResult};
use crate::pdu::{ModbusPdu, PduBuilder};
use crate::protocol::FunctionCode;

/// A function code with its assembled PDU, ready for framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduRequest {
    function: FunctionCode,
    pdu: ModbusPdu,
}

impl PduRequest {
    #[inline]
    pub fn function(&self) -> FunctionCode {
        self.function
    }

    #[inline]
    pub fn pdu(&self) -> &ModbusPdu {
        &self.pdu
    }

    /// PDU bytes, function code first.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.pdu.as_slice()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pdu.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pdu.is_empty()
    }
}

/// Build the request PDU for an accessor.
///
/// # Errors
///
/// - [`ModbusError::Validation`] when the address or count/value is out of range
/// - [`ModbusError::Unsupported`] for FC22, FC23 and FC24
/// - [`ModbusError::ErrorCodeRequest`] for exception function codes
///
/// # Example
///
/// ```rust
/// use modbus_accessor::{build_request, Accessor};
///
/// let request = build_request(&Accessor::holding_registers(0x6B, "flow", 3)).unwrap();
/// assert_eq!(request.as_bytes(), &[0x03, 0x00, 0x6B, 0x00, 0x03]);
/// ```
pub fn build_request(accessor: &Accessor) -> ModbusResult<PduRequest> {
    let function = accessor.function();
    let address = accessor.starting_address();
    let count = accessor.count_or_value();

    if u32::from(address) > ACCESSOR_ADDRESS_LIMIT || accessor.span_end() > ACCESSOR_ADDRESS_LIMIT
    {
        return Err(ModbusError::validation(
            function.to_u8(),
            format!(
                "address {} + count {} is outside 0..={}",
                address, count, ACCESSOR_ADDRESS_LIMIT
            ),
        ));
    }

    let pdu = match function {
        FunctionCode::ReadCoils | FunctionCode::ReadDiscreteInputs => {
            check_count(function, count, MAX_READ_COILS)?;
            read_layout(function, address, count)?
        }
        FunctionCode::ReadHoldingRegisters => {
            check_count(function, count, MAX_READ_HOLDING_REGISTERS)?;
            read_layout(function, address, count)?
        }
        FunctionCode::ReadInputRegisters => {
            // address <= 0xFFFF holds for every u16
            check_count(function, count, MAX_READ_INPUT_REGISTERS)?;
            read_layout(function, address, count)?
        }
        FunctionCode::WriteSingleCoil => {
            let state = single_coil_state(function, count)?;
            PduBuilder::new()
                .function_code(function)?
                .address(address)?
                .quantity(state)?
                .build()
        }
        FunctionCode::WriteSingleRegister => {
            check_nonzero_address(function, address)?;
            // u16 caps the value at 65535
            check_count(function, count, u16::MAX)?;
            PduBuilder::new()
                .function_code(function)?
                .address(address)?
                .quantity(count)?
                .build()
        }
        FunctionCode::WriteMultipleCoils => {
            check_count(function, count, MAX_WRITE_COILS)?;
            let byte_count = multiple_coils_byte_count(count);
            PduBuilder::new()
                .function_code(function)?
                .address(address)?
                .quantity(count)?
                .byte(byte_count)?
                .byte(byte_count)?
                .build()
        }
        FunctionCode::WriteMultipleRegisters => {
            check_nonzero_address(function, address)?;
            check_count(function, count, MAX_WRITE_REGISTERS)?;
            let value = accessor.write_value().ok_or_else(|| {
                ModbusError::validation(function.to_u8(), "write value is required")
            })?;
            // count <= 0x7B keeps count * 2 within one byte
            let byte_count = (count * 2) as u8;
            PduBuilder::new()
                .function_code(function)?
                .address(address)?
                .quantity(count)?
                .byte(byte_count)?
                .quantity(value)?
                .build()
        }
        FunctionCode::MaskWriteRegister
        | FunctionCode::ReadWriteMultipleRegisters
        | FunctionCode::ReadFifoQueue => {
            return Err(ModbusError::Unsupported {
                function: function.to_u8(),
            })
        }
        FunctionCode::ErrorReadingCoils
        | FunctionCode::ErrorReadingDiscreteInputs
        | FunctionCode::ErrorReadingHoldingRegisters
        | FunctionCode::ErrorReadingInputRegisters
        | FunctionCode::ErrorWritingSingleCoil
        | FunctionCode::ErrorWritingSingleRegister
        | FunctionCode::ErrorWritingMultipleCoils
        | FunctionCode::ErrorWritingMultipleRegisters => {
            return Err(ModbusError::ErrorCodeRequest {
                code: function.to_u8(),
            })
        }
    };

    debug!(
        "Request for '{}': {} addr={} count_or_value={} bytes={:02X?}",
        accessor.name(),
        function,
        address,
        count,
        pdu.as_slice()
    );

    Ok(PduRequest { function, pdu })
}

/// Byte count field for FC0F.
///
/// Always `count / 8 + 1`, one more than `ceil(count / 8)` whenever the count
/// is a multiple of eight.
#[inline]
pub fn multiple_coils_byte_count(count: u16) -> u8 {
    (count / 8 + 1) as u8
}

fn read_layout(function: FunctionCode, address: u16, count: u16) -> ModbusResult<ModbusPdu> {
    Ok(PduBuilder::new()
        .function_code(function)?
        .address(address)?
        .quantity(count)?
        .build())
}

fn check_count(function: FunctionCode, count: u16, max: u16) -> ModbusResult<()> {
    if count < 1 || count > max {
        return Err(ModbusError::validation(
            function.to_u8(),
            format!("{} count/value {} is outside 1..={}", function.name(), count, max),
        ));
    }
    Ok(())
}

/// FC05 output value for a count/value field.
///
/// The accessor window caps reachable values at 255, so the 0xFF00 bound
/// only fires when this is called on its own.
fn single_coil_state(function: FunctionCode, value: u16) -> ModbusResult<u16> {
    check_count(function, value, MAX_READ_COILS)?;
    if value > MAX_SINGLE_COIL_VALUE {
        return Err(ModbusError::validation(
            function.to_u8(),
            format!("coil value {} exceeds 0x{:04X}", value, MAX_SINGLE_COIL_VALUE),
        ));
    }
    Ok(if value >= 1 { COIL_ON } else { COIL_OFF })
}

fn check_nonzero_address(function: FunctionCode, address: u16) -> ModbusResult<()> {
    if address < 1 {
        return Err(ModbusError::validation(
            function.to_u8(),
            format!("{} requires a starting address >= 1", function.name()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acc(function: FunctionCode, address: u16, count: u16) -> Accessor {
        Accessor::new(function, address, "test", count, true)
    }

    fn is_validation(result: ModbusResult<PduRequest>) -> bool {
        matches!(result, Err(ModbusError::Validation { .. }))
    }

    #[test]
    fn test_single_coil_state_bounds() {
        let fc = FunctionCode::WriteSingleCoil;
        assert_eq!(single_coil_state(fc, 1), Ok(COIL_ON));
        assert_eq!(single_coil_state(fc, 2000), Ok(COIL_ON));
        assert!(single_coil_state(fc, 0).is_err());
        assert!(single_coil_state(fc, 2001).is_err());
        assert!(single_coil_state(fc, 0xFF01).is_err());
    }

    #[test]
    fn test_read_holding_registers_layout() {
        let req = build_request(&acc(FunctionCode::ReadHoldingRegisters, 0x6B, 3)).unwrap();
        assert_eq!(req.function(), FunctionCode::ReadHoldingRegisters);
        assert_eq!(req.as_bytes(), &[0x03, 0x00, 0x6B, 0x00, 0x03]);
    }

    #[test]
    fn test_read_holding_registers_boundaries() {
        assert!(build_request(&acc(FunctionCode::ReadHoldingRegisters, 0, 1)).is_ok());
        assert!(build_request(&acc(FunctionCode::ReadHoldingRegisters, 0, 125)).is_ok());
        assert!(is_validation(build_request(&acc(
            FunctionCode::ReadHoldingRegisters,
            0,
            0
        ))));
        assert!(is_validation(build_request(&acc(
            FunctionCode::ReadHoldingRegisters,
            0,
            126
        ))));
    }

    #[test]
    fn test_accessor_window() {
        assert!(build_request(&acc(FunctionCode::ReadCoils, 255, 0)).is_err());
        assert!(build_request(&acc(FunctionCode::ReadCoils, 254, 1)).is_ok());
        assert!(is_validation(build_request(&acc(FunctionCode::ReadCoils, 256, 1))));
        assert!(is_validation(build_request(&acc(FunctionCode::ReadCoils, 200, 56))));
        assert!(is_validation(build_request(&acc(
            FunctionCode::ReadCoils,
            u16::MAX,
            u16::MAX
        ))));
    }

    #[test]
    fn test_read_coils_and_inputs() {
        let req = build_request(&acc(FunctionCode::ReadCoils, 0x13, 0x25)).unwrap();
        assert_eq!(req.as_bytes(), &[0x01, 0x00, 0x13, 0x00, 0x25]);

        let req = build_request(&acc(FunctionCode::ReadDiscreteInputs, 0xC4, 0x16)).unwrap();
        assert_eq!(req.as_bytes(), &[0x02, 0x00, 0xC4, 0x00, 0x16]);

        let req = build_request(&acc(FunctionCode::ReadInputRegisters, 0x08, 1)).unwrap();
        assert_eq!(req.as_bytes(), &[0x04, 0x00, 0x08, 0x00, 0x01]);
        assert!(is_validation(build_request(&acc(
            FunctionCode::ReadInputRegisters,
            0,
            0x7E
        ))));
    }

    #[test]
    fn test_write_single_coil() {
        let req = build_request(&acc(FunctionCode::WriteSingleCoil, 0xAC, 1)).unwrap();
        assert_eq!(req.as_bytes(), &[0x05, 0x00, 0xAC, 0xFF, 0x00]);

        let req = build_request(&acc(FunctionCode::WriteSingleCoil, 0, 200)).unwrap();
        assert_eq!(&req.as_bytes()[3..], &[0xFF, 0x00]);

        assert!(is_validation(build_request(&acc(FunctionCode::WriteSingleCoil, 0, 0))));
    }

    #[test]
    fn test_write_single_register() {
        let req = build_request(&acc(FunctionCode::WriteSingleRegister, 1, 3)).unwrap();
        assert_eq!(req.as_bytes(), &[0x06, 0x00, 0x01, 0x00, 0x03]);

        assert!(is_validation(build_request(&acc(
            FunctionCode::WriteSingleRegister,
            0,
            3
        ))));
        assert!(is_validation(build_request(&acc(
            FunctionCode::WriteSingleRegister,
            1,
            0
        ))));
    }

    #[test]
    fn test_write_multiple_coils_byte_count() {
        let req = build_request(&acc(FunctionCode::WriteMultipleCoils, 0x13, 8)).unwrap();
        assert_eq!(req.as_bytes(), &[0x0F, 0x00, 0x13, 0x00, 0x08, 0x02, 0x02]);

        let req = build_request(&acc(FunctionCode::WriteMultipleCoils, 0x13, 10)).unwrap();
        assert_eq!(req.as_bytes()[5], 2);

        let req = build_request(&acc(FunctionCode::WriteMultipleCoils, 0, 7)).unwrap();
        assert_eq!(req.as_bytes()[5], 1);

        assert_eq!(multiple_coils_byte_count(16), 3);
        // wraps to the low byte above 2039 outputs
        assert_eq!(multiple_coils_byte_count(45063), 0x01);
    }

    #[test]
    fn test_write_multiple_registers() {
        let accessor = acc(FunctionCode::WriteMultipleRegisters, 1, 2).with_write_value(0x0A0B);
        let req = build_request(&accessor).unwrap();
        assert_eq!(
            req.as_bytes(),
            &[0x10, 0x00, 0x01, 0x00, 0x02, 0x04, 0x0A, 0x0B]
        );
    }

    #[test]
    fn test_write_multiple_registers_requires_value() {
        let missing = acc(FunctionCode::WriteMultipleRegisters, 1, 2);
        assert!(is_validation(build_request(&missing)));

        let at_zero = acc(FunctionCode::WriteMultipleRegisters, 0, 2).with_write_value(1);
        assert!(is_validation(build_request(&at_zero)));

        let too_many = acc(FunctionCode::WriteMultipleRegisters, 1, 0x7C).with_write_value(1);
        assert!(is_validation(build_request(&too_many)));
    }

    #[test]
    fn test_reserved_and_error_codes() {
        for fc in [
            FunctionCode::MaskWriteRegister,
            FunctionCode::ReadWriteMultipleRegisters,
            FunctionCode::ReadFifoQueue,
        ] {
            assert_eq!(
                build_request(&acc(fc, 0, 1)),
                Err(ModbusError::Unsupported { function: fc.to_u8() })
            );
        }

        assert_eq!(
            build_request(&acc(FunctionCode::ErrorReadingHoldingRegisters, 0, 1)),
            Err(ModbusError::ErrorCodeRequest { code: 0x83 })
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let accessor = acc(FunctionCode::ReadInputRegisters, 10, 4);
        assert_eq!(build_request(&accessor), build_request(&accessor));
    }
}
