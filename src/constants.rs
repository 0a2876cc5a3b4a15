//! Modbus protocol constants used by the accessor builder and frame codec
//!
//! Most limits come from the Modbus application protocol specification. The
//! accessor window ([`ACCESSOR_ADDRESS_LIMIT`]) is stricter than the protocol
//! allows and applies to every request built from an accessor.

// ============================================================================
// Frame Size Constants
// ============================================================================

/// Modbus MBAP header length for TCP, excluding the unit id
/// Format: Transaction ID(2) + Protocol ID(2) + Length(2) = 6 bytes
/// The unit id is counted by the Length field, so a frame is `length + 6` bytes
pub const MBAP_HEADER_LEN: usize = 6;

/// Offset of the first PDU byte in a TCP frame (MBAP header + unit id)
pub const MBAP_PDU_OFFSET: usize = 7;

/// Offset of the byte consulted as the frame length when decoding
pub const MBAP_LENGTH_LOW_OFFSET: usize = 5;

/// Maximum PDU (Protocol Data Unit) size per Modbus specification
/// RS485 ADU (256 bytes) - Slave Address (1 byte) - CRC (2 bytes) = 253 bytes
pub const MAX_PDU_SIZE: usize = 253;

/// Protocol identifier for Modbus TCP
pub const MODBUS_PROTOCOL_ID: u16 = 0;

/// Response buffer size for receiving Modbus frames
///
/// Calculation:
/// - MBAP Header: 6 bytes (MBAP_HEADER_LEN)
/// - Max MBAP Length (Unit ID + PDU): 254 bytes
/// - Theoretical max frame: 6 + 254 = 260 bytes
/// - Buffer size: 512 bytes
pub const MODBUS_RESPONSE_BUFFER_SIZE: usize = 512;

// ============================================================================
// Accessor Limits
// ============================================================================

/// Highest address an accessor may start at, and the highest value
/// `address + count_or_value` may reach.
pub const ACCESSOR_ADDRESS_LIMIT: u32 = 255;

/// Maximum number of coils for FC01/FC02, and the range accepted for FC05
pub const MAX_READ_COILS: u16 = 2000;

/// Maximum number of registers for FC03
pub const MAX_READ_HOLDING_REGISTERS: u16 = 125;

/// Maximum number of registers for FC04
pub const MAX_READ_INPUT_REGISTERS: u16 = 0x007D;

/// Maximum quantity of outputs accepted for FC15
pub const MAX_WRITE_COILS: u16 = 45063;

/// Maximum number of registers for FC16
pub const MAX_WRITE_REGISTERS: u16 = 0x007B;

/// Highest raw value accepted for FC05 before it is mapped to ON/OFF
pub const MAX_SINGLE_COIL_VALUE: u16 = 0xFF00;

/// FC05 output value for ON
pub const COIL_ON: u16 = 0xFF00;

/// FC05 output value for OFF
pub const COIL_OFF: u16 = 0x0000;

// ============================================================================
// Modbus Function Codes
// ============================================================================

/// Read Coils (FC01)
pub const FC_READ_COILS: u8 = 0x01;

/// Read Discrete Inputs (FC02)
pub const FC_READ_DISCRETE_INPUTS: u8 = 0x02;

/// Read Holding Registers (FC03)
pub const FC_READ_HOLDING_REGISTERS: u8 = 0x03;

/// Read Input Registers (FC04)
pub const FC_READ_INPUT_REGISTERS: u8 = 0x04;

/// Write Single Coil (FC05)
pub const FC_WRITE_SINGLE_COIL: u8 = 0x05;

/// Write Single Register (FC06)
pub const FC_WRITE_SINGLE_REGISTER: u8 = 0x06;

/// Write Multiple Coils (FC15)
pub const FC_WRITE_MULTIPLE_COILS: u8 = 0x0F;

/// Write Multiple Registers (FC16)
pub const FC_WRITE_MULTIPLE_REGISTERS: u8 = 0x10;

/// Mask Write Register (FC22), named but not supported
pub const FC_MASK_WRITE_REGISTER: u8 = 0x16;

/// Read/Write Multiple Registers (FC23), named but not supported
pub const FC_READ_WRITE_MULTIPLE_REGISTERS: u8 = 0x17;

/// Read FIFO Queue (FC24), named but not supported
pub const FC_READ_FIFO_QUEUE: u8 = 0x18;

/// Bit set on the function code of an exception response
pub const EXCEPTION_FLAG: u8 = 0x80;

// ============================================================================
// Modbus Exception Codes
// ============================================================================

/// Illegal Function
pub const EXCEPTION_ILLEGAL_FUNCTION: u8 = 0x01;

/// Illegal Data Address
pub const EXCEPTION_ILLEGAL_DATA_ADDRESS: u8 = 0x02;

/// Illegal Data Value
pub const EXCEPTION_ILLEGAL_DATA_VALUE: u8 = 0x03;

/// Server Device Failure
pub const EXCEPTION_SERVER_DEVICE_FAILURE: u8 = 0x04;

/// Acknowledge
pub const EXCEPTION_ACKNOWLEDGE: u8 = 0x05;

/// Server Device Busy
pub const EXCEPTION_SERVER_DEVICE_BUSY: u8 = 0x06;

/// Memory Parity Error
pub const EXCEPTION_MEMORY_PARITY_ERROR: u8 = 0x08;
