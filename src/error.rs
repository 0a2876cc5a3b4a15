//! Error types for accessor encoding, response decoding and transport
//!
//! Every failure is returned to the immediate caller. Nothing in this crate
//! retries or recovers on its own.

use thiserror::Error;

/// Result alias used throughout the crate
pub type ModbusResult<T> = Result<T, ModbusError>;

/// Errors produced while building, framing, exchanging or parsing Modbus PDUs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModbusError {
    /// Accessor fields violate the range or shape rules of its function code
    #[error("Validation error for function 0x{function:02X}: {message}")]
    Validation { function: u8, message: String },

    /// Function code is known but has no request encoding
    #[error("Unsupported function 0x{function:02X}")]
    Unsupported { function: u8 },

    /// Byte does not name any known function code
    #[error("Invalid function code 0x{code:02X}")]
    InvalidFunction { code: u8 },

    /// A request was requested for an exception (error-class) function code
    #[error("Cannot build a request for error function code 0x{code:02X}")]
    ErrorCodeRequest { code: u8 },

    /// Device answered with a recognised Modbus exception
    #[error("Modbus exception 0x{code:02X} ({name}) for function 0x{function:02X}")]
    Exception {
        function: u8,
        code: u8,
        name: &'static str,
    },

    /// Response or frame is empty, truncated or otherwise unreadable
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Could not establish or use the connection
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// Socket I/O failed
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Operation did not finish within its deadline
    #[error("Timeout after {timeout_ms}ms during {operation}")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    /// Response carried a different transaction id than the request
    #[error("Transaction id mismatch: expected {expected}, got {actual}")]
    TransactionMismatch { expected: u16, actual: u16 },

    /// Device has no accessor with this name
    #[error("Unknown accessor '{name}'")]
    UnknownAccessor { name: String },
}

impl ModbusError {
    /// Create a validation error
    pub fn validation(function: u8, message: impl Into<String>) -> Self {
        Self::Validation {
            function,
            message: message.into(),
        }
    }

    /// Create a malformed-response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: &'static str, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation,
            timeout_ms,
        }
    }

    /// True for errors raised before any bytes were produced
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::Unsupported { .. }
                | Self::InvalidFunction { .. }
                | Self::ErrorCodeRequest { .. }
        )
    }

    /// True for errors raised by the transport rather than the protocol
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::Io { .. }
                | Self::Timeout { .. }
                | Self::TransactionMismatch { .. }
        )
    }
}

impl From<std::io::Error> for ModbusError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_display_names_exception() {
        let err = ModbusError::Exception {
            function: 0x03,
            code: 0x02,
            name: "IllegalDataAddress",
        };
        let text = err.to_string();
        assert!(text.contains("IllegalDataAddress"));
        assert!(text.contains("0x03"));
    }

    #[test]
    fn test_error_classes() {
        assert!(ModbusError::validation(0x03, "count").is_request_error());
        assert!(ModbusError::Unsupported { function: 0x17 }.is_request_error());
        assert!(!ModbusError::malformed("empty").is_request_error());
        assert!(ModbusError::timeout("read", 100).is_transport_error());
        assert!(!ModbusError::InvalidFunction { code: 0x55 }.is_transport_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: ModbusError = io.into();
        assert!(matches!(err, ModbusError::Io { ref message } if message.contains("pipe closed")));
    }
}
