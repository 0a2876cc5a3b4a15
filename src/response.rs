//! # PDU Response Parser
//!
//! Reads a device's response PDU into [`PduResponseData`] or a decoded
//! protocol error.
//!
//! Response layouts:
//!
//! ```text
//! read (FC01-FC04):   [fc, byte_count, data...]
//! write (FC05/06/0F/10): [fc, addrH, addrL, valueH, valueL]
//! exception:          [fc | 0x80, exception_code]
//! ```
//!
//! For writes the content is the echoed value/quantity (bytes 3 and 4).

use tracing::{debug, warn};

use crate::accessor::Accessor;
use crate::coercion::{coerce, Projections};
use crate::error::{ModbusError, ModbusResult};
use crate::protocol::{FunctionCode, ModbusException};
use crate::value::ModbusValue;

/// Decoded response content with its typed projections.
#[derive(Debug, Clone, PartialEq)]
pub struct PduResponseData {
    function: FunctionCode,
    raw_content: Vec<u8>,
    content: Vec<u8>,
    projections: Projections,
}

impl PduResponseData {
    /// Build response data from extracted content, running type coercion.
    pub fn new(function: FunctionCode, raw_content: Vec<u8>, reverse: bool) -> Self {
        let (content, projections) = coerce(&raw_content, reverse);
        Self {
            function,
            raw_content,
            content,
            projections,
        }
    }

    #[inline]
    pub fn function(&self) -> FunctionCode {
        self.function
    }

    /// Content bytes exactly as extracted from the PDU.
    #[inline]
    pub fn raw_content(&self) -> &[u8] {
        &self.raw_content
    }

    /// Content bytes after byte-order normalization.
    #[inline]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    #[inline]
    pub fn projections(&self) -> &Projections {
        &self.projections
    }

    /// Populated projections, narrowest first.
    pub fn values(&self) -> Vec<ModbusValue> {
        self.projections.values()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.projections.boolean
    }

    pub fn as_u8(&self) -> Option<u8> {
        self.projections.byte
    }

    pub fn as_u16(&self) -> Option<u16> {
        self.projections.uint16
    }

    pub fn as_i16(&self) -> Option<i16> {
        self.projections.int16
    }

    pub fn as_u32(&self) -> Option<u32> {
        self.projections.uint32
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.projections.int32
    }

    pub fn as_f32(&self) -> Option<f32> {
        self.projections.float32
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.projections.uint64
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.projections.int64
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.projections.float64
    }

    pub fn as_str(&self) -> Option<&str> {
        self.projections.text.as_deref()
    }
}

/// Parse a response PDU, reversing content bytes before coercion.
///
/// # Errors
///
/// - [`ModbusError::MalformedResponse`] for empty or truncated PDUs
/// - [`ModbusError::InvalidFunction`] when byte 0 is not a known function code
/// - [`ModbusError::Exception`] for error responses carrying IllegalFunction,
///   IllegalDataAddress, IllegalDataValue or ServerDeviceFailure
///
/// # Example
///
/// ```rust
/// use modbus_accessor::{parse_response, ModbusError};
///
/// let data = parse_response(&[0x03, 0x02, 0x00, 0x0A]).unwrap();
/// assert_eq!(data.raw_content(), &[0x00, 0x0A]);
/// assert_eq!(data.as_u16(), Some(10));
///
/// let err = parse_response(&[0x83, 0x02]).unwrap_err();
/// assert!(matches!(err, ModbusError::Exception { name: "IllegalDataAddress", .. }));
/// ```
pub fn parse_response(pdu: &[u8]) -> ModbusResult<PduResponseData> {
    parse_response_with_order(pdu, true)
}

/// Parse a response PDU using the accessor's byte-order flag.
pub fn parse_response_for(accessor: &Accessor, pdu: &[u8]) -> ModbusResult<PduResponseData> {
    parse_response_with_order(pdu, accessor.reverse_byte_order())
}

/// Parse a response PDU with an explicit byte-order flag.
pub fn parse_response_with_order(pdu: &[u8], reverse: bool) -> ModbusResult<PduResponseData> {
    if pdu.is_empty() {
        return Err(ModbusError::malformed("empty response"));
    }
    if pdu.len() < 2 {
        return Err(ModbusError::malformed(format!(
            "response too short: {} byte",
            pdu.len()
        )));
    }

    let function = FunctionCode::try_from(pdu[0])?;
    let byte_count = pdu[1];

    if function.is_error() {
        match ModbusException::from_u8(byte_count) {
            Some(exception) if exception.fails_response() => {
                debug!(
                    "Exception response: FC={:02X}, exception={}",
                    function.to_u8(),
                    exception
                );
                return Err(ModbusError::Exception {
                    function: function.base().to_u8(),
                    code: exception.to_u8(),
                    name: exception.name(),
                });
            }
            _ => warn!(
                "Error function {} with non-failing code 0x{:02X}, reading as data",
                function, byte_count
            ),
        }
    }

    let raw_content = if function.is_write() {
        if pdu.len() < 5 {
            return Err(ModbusError::malformed(format!(
                "write response needs 5 bytes, got {}",
                pdu.len()
            )));
        }
        vec![pdu[3], pdu[4]]
    } else {
        let end = 2 + usize::from(byte_count);
        if pdu.len() < end {
            return Err(ModbusError::malformed(format!(
                "byte count {} exceeds the {} bytes available",
                byte_count,
                pdu.len() - 2
            )));
        }
        pdu[2..end].to_vec()
    };

    debug!(
        "PDU parsed: FC={:02X} ({}), content={:02X?}",
        function.to_u8(),
        function.name(),
        raw_content
    );

    Ok(PduResponseData::new(function, raw_content, reverse))
}
