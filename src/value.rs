//! # Typed Values
//!
//! One typed interpretation of a response's content bytes. Type coercion can
//! yield several of these for the same content; see [`crate::coercion`].

use std::fmt;

/// A typed view of response content.
///
/// | Type | Content width |
/// |------|---------------|
/// | Bool, Byte | 1 byte |
/// | U16/I16 | 2 bytes |
/// | U32/I32/F32 | 4 bytes |
/// | U64/I64/F64 | 8 bytes |
/// | Text | any other length |
///
/// # Example
///
/// ```rust
/// use modbus_accessor::ModbusValue;
///
/// let temp = ModbusValue::F32(25.5);
/// assert_eq!(temp.byte_width(), Some(4));
/// assert!((temp.as_f64().unwrap() - 25.5).abs() < 0.001);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ModbusValue {
    /// Boolean value, only when the byte is exactly 0 or 1
    Bool(bool),
    /// Single byte
    Byte(u8),
    /// Unsigned 16-bit integer
    U16(u16),
    /// Signed 16-bit integer
    I16(i16),
    /// Unsigned 32-bit integer
    U32(u32),
    /// Signed 32-bit integer
    I32(i32),
    /// 32-bit floating point
    F32(f32),
    /// Unsigned 64-bit integer
    U64(u64),
    /// Signed 64-bit integer
    I64(i64),
    /// 64-bit floating point
    F64(f64),
    /// UTF-8 text
    Text(String),
}

impl ModbusValue {
    /// Convert the value to f64 for uniform numeric handling.
    ///
    /// Returns `None` for text.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ModbusValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            ModbusValue::Byte(v) => Some(f64::from(*v)),
            ModbusValue::U16(v) => Some(f64::from(*v)),
            ModbusValue::I16(v) => Some(f64::from(*v)),
            ModbusValue::U32(v) => Some(f64::from(*v)),
            ModbusValue::I32(v) => Some(f64::from(*v)),
            ModbusValue::F32(v) => Some(f64::from(*v)),
            ModbusValue::U64(v) => Some(*v as f64),
            ModbusValue::I64(v) => Some(*v as f64),
            ModbusValue::F64(v) => Some(*v),
            ModbusValue::Text(_) => None,
        }
    }

    /// Number of content bytes this value was read from.
    ///
    /// `None` for text, which takes whatever length the content has.
    #[inline]
    pub fn byte_width(&self) -> Option<usize> {
        match self {
            ModbusValue::Bool(_) | ModbusValue::Byte(_) => Some(1),
            ModbusValue::U16(_) | ModbusValue::I16(_) => Some(2),
            ModbusValue::U32(_) | ModbusValue::I32(_) | ModbusValue::F32(_) => Some(4),
            ModbusValue::U64(_) | ModbusValue::I64(_) | ModbusValue::F64(_) => Some(8),
            ModbusValue::Text(_) => None,
        }
    }

    /// Returns the type name as a string for logging/debugging.
    pub fn type_name(&self) -> &'static str {
        match self {
            ModbusValue::Bool(_) => "bool",
            ModbusValue::Byte(_) => "u8",
            ModbusValue::U16(_) => "u16",
            ModbusValue::I16(_) => "i16",
            ModbusValue::U32(_) => "u32",
            ModbusValue::I32(_) => "i32",
            ModbusValue::F32(_) => "f32",
            ModbusValue::U64(_) => "u64",
            ModbusValue::I64(_) => "i64",
            ModbusValue::F64(_) => "f64",
            ModbusValue::Text(_) => "string",
        }
    }
}

impl fmt::Display for ModbusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModbusValue::Bool(v) => write!(f, "{}", v),
            ModbusValue::Byte(v) => write!(f, "{}", v),
            ModbusValue::U16(v) => write!(f, "{}", v),
            ModbusValue::I16(v) => write!(f, "{}", v),
            ModbusValue::U32(v) => write!(f, "{}", v),
            ModbusValue::I32(v) => write!(f, "{}", v),
            ModbusValue::F32(v) => write!(f, "{}", v),
            ModbusValue::U64(v) => write!(f, "{}", v),
            ModbusValue::I64(v) => write!(f, "{}", v),
            ModbusValue::F64(v) => write!(f, "{}", v),
            ModbusValue::Text(v) => write!(f, "{:?}", v),
        }
    }
}
