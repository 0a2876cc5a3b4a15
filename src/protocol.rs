//! Function code table and Modbus exception codes
//!
//! | Code | Function | Request | Error variant |
//! |------|----------|---------|---------------|
//! | 0x01 | Read Coils | ✅ | 0x81 |
//! | 0x02 | Read Discrete Inputs | ✅ | 0x82 |
//! | 0x03 | Read Holding Registers | ✅ | 0x83 |
//! | 0x04 | Read Input Registers | ✅ | 0x84 |
//! | 0x05 | Write Single Coil | ✅ | 0x85 |
//! | 0x06 | Write Single Register | ✅ | 0x86 |
//! | 0x0F | Write Multiple Coils | ✅ | 0x8F |
//! | 0x10 | Write Multiple Registers | ✅ | 0x90 |
//! | 0x16 | Mask Write Register | ❌ | - |
//! | 0x17 | Read/Write Multiple Registers | ❌ | - |
//! | 0x18 | Read FIFO Queue | ❌ | - |

use std::fmt;

use crate::constants::*;
use crate::error::ModbusError;

/// Modbus function codes known to the accessor layer.
///
/// Error variants are the request code with [`EXCEPTION_FLAG`] set; the
/// discriminants are constant expressions evaluated at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FunctionCode {
    ReadCoils = FC_READ_COILS,
    ReadDiscreteInputs = FC_READ_DISCRETE_INPUTS,
    ReadHoldingRegisters = FC_READ_HOLDING_REGISTERS,
    ReadInputRegisters = FC_READ_INPUT_REGISTERS,
    WriteSingleCoil = FC_WRITE_SINGLE_COIL,
    WriteSingleRegister = FC_WRITE_SINGLE_REGISTER,
    WriteMultipleCoils = FC_WRITE_MULTIPLE_COILS,
    WriteMultipleRegisters = FC_WRITE_MULTIPLE_REGISTERS,
    MaskWriteRegister = FC_MASK_WRITE_REGISTER,
    ReadWriteMultipleRegisters = FC_READ_WRITE_MULTIPLE_REGISTERS,
    ReadFifoQueue = FC_READ_FIFO_QUEUE,

    ErrorReadingCoils = FC_READ_COILS | EXCEPTION_FLAG,
    ErrorReadingDiscreteInputs = FC_READ_DISCRETE_INPUTS | EXCEPTION_FLAG,
    ErrorReadingHoldingRegisters = FC_READ_HOLDING_REGISTERS | EXCEPTION_FLAG,
    ErrorReadingInputRegisters = FC_READ_INPUT_REGISTERS | EXCEPTION_FLAG,
    ErrorWritingSingleCoil = FC_WRITE_SINGLE_COIL | EXCEPTION_FLAG,
    ErrorWritingSingleRegister = FC_WRITE_SINGLE_REGISTER | EXCEPTION_FLAG,
    ErrorWritingMultipleCoils = FC_WRITE_MULTIPLE_COILS | EXCEPTION_FLAG,
    ErrorWritingMultipleRegisters = FC_WRITE_MULTIPLE_REGISTERS | EXCEPTION_FLAG,
}

impl FunctionCode {
    /// Every known function code, request codes first.
    pub const ALL: [FunctionCode; 19] = [
        Self::ReadCoils,
        Self::ReadDiscreteInputs,
        Self::ReadHoldingRegisters,
        Self::ReadInputRegisters,
        Self::WriteSingleCoil,
        Self::WriteSingleRegister,
        Self::WriteMultipleCoils,
        Self::WriteMultipleRegisters,
        Self::MaskWriteRegister,
        Self::ReadWriteMultipleRegisters,
        Self::ReadFifoQueue,
        Self::ErrorReadingCoils,
        Self::ErrorReadingDiscreteInputs,
        Self::ErrorReadingHoldingRegisters,
        Self::ErrorReadingInputRegisters,
        Self::ErrorWritingSingleCoil,
        Self::ErrorWritingSingleRegister,
        Self::ErrorWritingMultipleCoils,
        Self::ErrorWritingMultipleRegisters,
    ];

    /// Look up a function code by its wire byte.
    pub fn from_u8(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|fc| fc.to_u8() == code)
    }

    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// True for the exception-response variants (bit 0x80 set).
    #[inline]
    pub fn is_error(self) -> bool {
        self.to_u8() & EXCEPTION_FLAG != 0
    }

    /// True for the write family, whose responses echo address and value.
    #[inline]
    pub fn is_write(self) -> bool {
        matches!(
            self,
            Self::WriteSingleCoil
                | Self::WriteSingleRegister
                | Self::WriteMultipleCoils
                | Self::WriteMultipleRegisters
        )
    }

    /// True for codes that are named but have no request encoding.
    #[inline]
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            Self::MaskWriteRegister | Self::ReadWriteMultipleRegisters | Self::ReadFifoQueue
        )
    }

    /// Request code an error variant belongs to; request codes map to themselves.
    pub fn base(self) -> Self {
        if !self.is_error() {
            return self;
        }
        Self::from_u8(self.to_u8() & !EXCEPTION_FLAG).unwrap_or(self)
    }

    /// Error variant a device answers with when this request fails.
    pub fn error_code(self) -> Option<Self> {
        if self.is_error() || self.is_reserved() {
            return None;
        }
        Self::from_u8(self.to_u8() | EXCEPTION_FLAG)
    }

    /// Get human-readable function code name
    pub fn name(self) -> &'static str {
        match self {
            Self::ReadCoils => "Read Coils",
            Self::ReadDiscreteInputs => "Read Discrete Inputs",
            Self::ReadHoldingRegisters => "Read Holding Registers",
            Self::ReadInputRegisters => "Read Input Registers",
            Self::WriteSingleCoil => "Write Single Coil",
            Self::WriteSingleRegister => "Write Single Register",
            Self::WriteMultipleCoils => "Write Multiple Coils",
            Self::WriteMultipleRegisters => "Write Multiple Registers",
            Self::MaskWriteRegister => "Mask Write Register",
            Self::ReadWriteMultipleRegisters => "Read/Write Multiple Registers",
            Self::ReadFifoQueue => "Read FIFO Queue",
            Self::ErrorReadingCoils => "Error Reading Coils",
            Self::ErrorReadingDiscreteInputs => "Error Reading Discrete Inputs",
            Self::ErrorReadingHoldingRegisters => "Error Reading Holding Registers",
            Self::ErrorReadingInputRegisters => "Error Reading Input Registers",
            Self::ErrorWritingSingleCoil => "Error Writing Single Coil",
            Self::ErrorWritingSingleRegister => "Error Writing Single Register",
            Self::ErrorWritingMultipleCoils => "Error Writing Multiple Coils",
            Self::ErrorWritingMultipleRegisters => "Error Writing Multiple Registers",
        }
    }
}

impl TryFrom<u8> for FunctionCode {
    type Error = ModbusError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_u8(code).ok_or(ModbusError::InvalidFunction { code })
    }
}

impl From<FunctionCode> for u8 {
    fn from(fc: FunctionCode) -> Self {
        fc.to_u8()
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.name(), self.to_u8())
    }
}

/// Exception codes a device returns in byte 1 of an error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ModbusException {
    IllegalFunction = EXCEPTION_ILLEGAL_FUNCTION,
    IllegalDataAddress = EXCEPTION_ILLEGAL_DATA_ADDRESS,
    IllegalDataValue = EXCEPTION_ILLEGAL_DATA_VALUE,
    ServerDeviceFailure = EXCEPTION_SERVER_DEVICE_FAILURE,
    Acknowledge = EXCEPTION_ACKNOWLEDGE,
    ServerDeviceBusy = EXCEPTION_SERVER_DEVICE_BUSY,
    MemoryParityError = EXCEPTION_MEMORY_PARITY_ERROR,
}

impl ModbusException {
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            EXCEPTION_ILLEGAL_FUNCTION => Some(Self::IllegalFunction),
            EXCEPTION_ILLEGAL_DATA_ADDRESS => Some(Self::IllegalDataAddress),
            EXCEPTION_ILLEGAL_DATA_VALUE => Some(Self::IllegalDataValue),
            EXCEPTION_SERVER_DEVICE_FAILURE => Some(Self::ServerDeviceFailure),
            EXCEPTION_ACKNOWLEDGE => Some(Self::Acknowledge),
            EXCEPTION_SERVER_DEVICE_BUSY => Some(Self::ServerDeviceBusy),
            EXCEPTION_MEMORY_PARITY_ERROR => Some(Self::MemoryParityError),
            _ => None,
        }
    }

    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Exceptions that make the response parser fail.
    ///
    /// Acknowledge, ServerDeviceBusy and MemoryParityError are not in this set;
    /// an error response carrying one of them is read like a data response.
    #[inline]
    pub fn fails_response(self) -> bool {
        matches!(
            self,
            Self::IllegalFunction
                | Self::IllegalDataAddress
                | Self::IllegalDataValue
                | Self::ServerDeviceFailure
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::IllegalFunction => "IllegalFunction",
            Self::IllegalDataAddress => "IllegalDataAddress",
            Self::IllegalDataValue => "IllegalDataValue",
            Self::ServerDeviceFailure => "ServerDeviceFailure",
            Self::Acknowledge => "Acknowledge",
            Self::ServerDeviceBusy => "ServerDeviceBusy",
            Self::MemoryParityError => "MemoryParityError",
        }
    }
}

impl fmt::Display for ModbusException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.name(), self.to_u8())
    }
}
