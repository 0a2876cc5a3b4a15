//! # Accessors
//!
//! An [`Accessor`] describes one logical operation against a device: which
//! function, which starting address, how many registers (or which value to
//! write) and how to order the returned content bytes.
//!
//! Accessors are immutable. The `with_*` methods consume the accessor and
//! return a new one, in the same style as the other configuration types.
//!
//! ## `count_or_value`
//!
//! | Function | Meaning |
//! |----------|---------|
//! | FC01-FC04 | Number of coils/registers to read |
//! | FC05 | Coil state (`>= 1` is ON) |
//! | FC06 | Register value |
//! | FC0F | Quantity of outputs |
//! | FC10 | Register count, paired with [`Accessor::write_value`] |
//!
//! ## Example
//!
//! ```rust
//! use modbus_accessor::{Accessor, FunctionCode};
//!
//! let setpoint = Accessor::new(FunctionCode::WriteMultipleRegisters, 10, "setpoint", 2, true)
//!     .with_write_value(0x1234);
//!
//! assert_eq!(setpoint.write_value(), Some(0x1234));
//! ```

use crate::error::ModbusResult;
use crate::protocol::FunctionCode;

/// A configured register/coil operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Accessor {
    function: FunctionCode,
    starting_address: u16,
    count_or_value: u16,
    name: String,
    reverse_byte_order: bool,
    write_value: Option<u16>,
}

impl Accessor {
    /// Create an accessor without an explicit write value.
    pub fn new(
        function: FunctionCode,
        starting_address: u16,
        name: impl Into<String>,
        count_or_value: u16,
        reverse_byte_order: bool,
    ) -> Self {
        Self {
            function,
            starting_address,
            count_or_value,
            name: name.into(),
            reverse_byte_order,
            write_value: None,
        }
    }

    /// Create an accessor from a raw function code byte.
    ///
    /// Fails with [`crate::ModbusError::InvalidFunction`] when the byte does
    /// not name a known function code.
    pub fn from_raw(
        code: u8,
        starting_address: u16,
        name: impl Into<String>,
        count_or_value: u16,
        reverse_byte_order: bool,
    ) -> ModbusResult<Self> {
        let function = FunctionCode::try_from(code)?;
        Ok(Self::new(
            function,
            starting_address,
            name,
            count_or_value,
            reverse_byte_order,
        ))
    }

    /// Read holding registers, reversing content bytes (the usual setup).
    pub fn holding_registers(starting_address: u16, name: impl Into<String>, count: u16) -> Self {
        Self::new(
            FunctionCode::ReadHoldingRegisters,
            starting_address,
            name,
            count,
            true,
        )
    }

    /// Read coils.
    pub fn coils(starting_address: u16, name: impl Into<String>, count: u16) -> Self {
        Self::new(FunctionCode::ReadCoils, starting_address, name, count, true)
    }

    /// Set the explicit write value used by FC10.
    pub fn with_write_value(mut self, value: u16) -> Self {
        self.write_value = Some(value);
        self
    }

    /// Set the byte-order flag.
    pub fn with_reverse_byte_order(mut self, reverse: bool) -> Self {
        self.reverse_byte_order = reverse;
        self
    }

    #[inline]
    pub fn function(&self) -> FunctionCode {
        self.function
    }

    #[inline]
    pub fn starting_address(&self) -> u16 {
        self.starting_address
    }

    #[inline]
    pub fn count_or_value(&self) -> u16 {
        self.count_or_value
    }

    /// Readable name; free text, never validated.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether response content is reversed before type coercion.
    #[inline]
    pub fn reverse_byte_order(&self) -> bool {
        self.reverse_byte_order
    }

    #[inline]
    pub fn write_value(&self) -> Option<u16> {
        self.write_value
    }

    /// Last address touched, `starting_address + count_or_value`, without overflow.
    #[inline]
    pub fn span_end(&self) -> u32 {
        u32::from(self.starting_address) + u32::from(self.count_or_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModbusError;

    #[test]
    fn test_with_methods_return_new_values() {
        let base = Accessor::holding_registers(4, "voltage", 2);
        let flipped = base.clone().with_reverse_byte_order(false);

        assert!(base.reverse_byte_order());
        assert!(!flipped.reverse_byte_order());
        assert_eq!(base.name(), "voltage");
        assert_eq!(base.write_value(), None);

        let with_value = base.clone().with_write_value(7);
        assert_eq!(with_value.write_value(), Some(7));
        assert_ne!(with_value, base);
    }

    #[test]
    fn test_from_raw() {
        let acc = Accessor::from_raw(0x04, 0, "inputs", 3, false).unwrap();
        assert_eq!(acc.function(), FunctionCode::ReadInputRegisters);

        let err = Accessor::from_raw(0x42, 0, "bogus", 1, false).unwrap_err();
        assert_eq!(err, ModbusError::InvalidFunction { code: 0x42 });
    }

    #[test]
    fn test_span_end_does_not_overflow() {
        let acc = Accessor::new(FunctionCode::ReadCoils, u16::MAX, "edge", u16::MAX, true);
        assert_eq!(acc.span_end(), 2 * u32::from(u16::MAX));
    }
}
