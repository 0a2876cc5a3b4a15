//! # Modbus Accessor - Modbus TCP Wire Encoding
//!
//! Translates configured register/coil operations ("accessors") into the
//! exact bytes a Modbus TCP device expects, and a device's raw response back
//! into typed values or a decoded Modbus exception.
//!
//! ## Layers
//!
//! - **Function codes**: [`FunctionCode`], [`ModbusException`]
//! - **Accessor**: [`Accessor`], one configured operation
//! - **Request builder**: [`build_request`] → [`PduRequest`]
//! - **Response parser**: [`parse_response`] → [`PduResponseData`]
//! - **Type coercion**: [`coerce`] → [`Projections`]
//! - **Frame codec**: [`TcpFrame`], [`decode_frame`], [`MbapHeader`]
//! - **Transport / client / device** (`tcp` feature): [`TcpTransport`],
//!   [`AccessorClient`], [`ModbusDevice`]
//!
//! ## Supported Function Codes
//!
//! | Code | Function | Request |
//! |------|----------|---------|
//! | 0x01 | Read Coils | ✅ |
//! | 0x02 | Read Discrete Inputs | ✅ |
//! | 0x03 | Read Holding Registers | ✅ |
//! | 0x04 | Read Input Registers | ✅ |
//! | 0x05 | Write Single Coil | ✅ |
//! | 0x06 | Write Single Register | ✅ |
//! | 0x0F | Write Multiple Coils | ✅ |
//! | 0x10 | Write Multiple Registers | ✅ |
//!
//! ## Quick Start
//!
//! ```rust
//! use modbus_accessor::{build_request, decode_frame, encode_frame, parse_response, Accessor};
//!
//! let accessor = Accessor::holding_registers(0, "tank level", 1);
//! let request = build_request(&accessor).unwrap();
//! let frame = encode_frame(1, 1, request.as_bytes());
//! assert_eq!(frame.len(), 12);
//!
//! // a device answers 10
//! let response = [0x00, 0x01, 0x00, 0x00, 0x00, 0x05, 0x01, 0x03, 0x02, 0x00, 0x0A];
//! let pdu = decode_frame(&response).unwrap();
//! let data = parse_response(&pdu).unwrap();
//! assert_eq!(data.as_u16(), Some(10));
//! ```

// ============================================================================
// Core modules
// ============================================================================

/// Core error types and result handling
pub mod error;

/// Modbus protocol constants and accessor limits
pub mod constants;

/// Function code and exception code tables
pub mod protocol;

/// Configured register/coil operations
pub mod accessor;

/// PDU with stack-allocated fixed array
pub mod pdu;

/// Accessor to request PDU
pub mod request;

/// Typed value enumeration
pub mod value;

/// Content bytes to typed projections
pub mod coercion;

/// Response PDU parsing and exception decoding
pub mod response;

/// MBAP framing for Modbus TCP
pub mod codec;

// ============================================================================
// Network modules
// ============================================================================

/// Network transport for Modbus TCP
#[cfg(feature = "tcp")]
pub mod transport;

/// Accessor execution over a transport
#[cfg(feature = "tcp")]
pub mod client;

/// Named devices with their accessors
#[cfg(feature = "tcp")]
pub mod device;

// ============================================================================
// Re-exports for convenience
// ============================================================================

// === Error handling ===
pub use error::{ModbusError, ModbusResult};

// === Core types ===
pub use accessor::Accessor;
pub use protocol::{FunctionCode, ModbusException};
pub use value::ModbusValue;

// === Encoding / decoding ===
pub use codec::{decode_frame, encode_frame, MbapHeader, TcpFrame};
pub use coercion::{coerce, Projections};
pub use pdu::{ModbusPdu, PduBuilder};
pub use request::{build_request, PduRequest};
pub use response::{parse_response, parse_response_for, parse_response_with_order, PduResponseData};

// === Protocol limits (commonly needed constants) ===
pub use constants::{ACCESSOR_ADDRESS_LIMIT, MAX_PDU_SIZE, MODBUS_RESPONSE_BUFFER_SIZE};

// === Network ===
#[cfg(feature = "tcp")]
pub use client::AccessorClient;
#[cfg(feature = "tcp")]
pub use device::ModbusDevice;
#[cfg(feature = "tcp")]
pub use transport::{ModbusTransport, TcpSettings, TcpTransport, TransportStats};

/// Modbus TCP default port
pub const DEFAULT_TCP_PORT: u16 = 502;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
