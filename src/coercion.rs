//! # Type Coercion
//!
//! Exposes response content as every typed value its length supports.
//!
//! Content is optionally reversed first, then read by length using a
//! cumulative prefix rule: each width re-reads the leading bytes of the same
//! content, so a 4-byte content also yields the 1- and 2-byte projections.
//!
//! | Length | Projections |
//! |--------|-------------|
//! | 1 | byte, bool (if the byte is 0 or 1) |
//! | 2 | + u16, i16 |
//! | 4 | + u32, i32, f32 |
//! | 8 | + u64, i64, f64 |
//! | other | UTF-8 text only |
//!
//! Multi-byte projections read the stored bytes little-endian. With the usual
//! reversal this turns the big-endian wire value `[0x00, 0x0A]` into `10`.

use crate::value::ModbusValue;

/// Optional typed projections of one response's content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projections {
    pub boolean: Option<bool>,
    pub byte: Option<u8>,
    pub uint16: Option<u16>,
    pub int16: Option<i16>,
    pub uint32: Option<u32>,
    pub int32: Option<i32>,
    pub float32: Option<f32>,
    pub uint64: Option<u64>,
    pub int64: Option<i64>,
    pub float64: Option<f64>,
    pub text: Option<String>,
}

impl Projections {
    /// Populated projections, narrowest first.
    pub fn values(&self) -> Vec<ModbusValue> {
        let mut values = Vec::new();
        if let Some(v) = self.boolean {
            values.push(ModbusValue::Bool(v));
        }
        if let Some(v) = self.byte {
            values.push(ModbusValue::Byte(v));
        }
        if let Some(v) = self.uint16 {
            values.push(ModbusValue::U16(v));
        }
        if let Some(v) = self.int16 {
            values.push(ModbusValue::I16(v));
        }
        if let Some(v) = self.uint32 {
            values.push(ModbusValue::U32(v));
        }
        if let Some(v) = self.int32 {
            values.push(ModbusValue::I32(v));
        }
        if let Some(v) = self.float32 {
            values.push(ModbusValue::F32(v));
        }
        if let Some(v) = self.uint64 {
            values.push(ModbusValue::U64(v));
        }
        if let Some(v) = self.int64 {
            values.push(ModbusValue::I64(v));
        }
        if let Some(v) = self.float64 {
            values.push(ModbusValue::F64(v));
        }
        if let Some(ref v) = self.text {
            values.push(ModbusValue::Text(v.clone()));
        }
        values
    }

    fn set_byte(&mut self, b: u8) {
        self.byte = Some(b);
        if b == 0 || b == 1 {
            self.boolean = Some(b == 1);
        }
    }

    fn set_two(&mut self, bytes: [u8; 2]) {
        self.uint16 = Some(u16::from_le_bytes(bytes));
        self.int16 = Some(i16::from_le_bytes(bytes));
    }

    fn set_four(&mut self, bytes: [u8; 4]) {
        self.uint32 = Some(u32::from_le_bytes(bytes));
        self.int32 = Some(i32::from_le_bytes(bytes));
        self.float32 = Some(f32::from_le_bytes(bytes));
    }

    fn set_eight(&mut self, bytes: [u8; 8]) {
        self.float64 = Some(f64::from_le_bytes(bytes));
        self.int64 = Some(i64::from_le_bytes(bytes));
        self.uint64 = Some(u64::from_le_bytes(bytes));
    }
}

/// Normalize content order and derive its projections.
///
/// Returns the content as used for coercion (reversed when `reverse` is set)
/// together with the projections.
///
/// # Example
///
/// ```rust
/// use modbus_accessor::coerce;
///
/// let (content, values) = coerce(&[0x00, 0x0A], true);
/// assert_eq!(content, vec![0x0A, 0x00]);
/// assert_eq!(values.uint16, Some(10));
/// ```
pub fn coerce(raw: &[u8], reverse: bool) -> (Vec<u8>, Projections) {
    let mut content = raw.to_vec();
    if reverse {
        content.reverse();
    }

    let mut out = Projections::default();
    match content.len() {
        1 | 2 | 4 | 8 => {
            let len = content.len();
            out.set_byte(content[0]);
            if len >= 2 {
                out.set_two([content[0], content[1]]);
            }
            if len >= 4 {
                out.set_four([content[0], content[1], content[2], content[3]]);
            }
            if len == 8 {
                let mut eight = [0u8; 8];
                eight.copy_from_slice(&content[..8]);
                out.set_eight(eight);
            }
        }
        _ => {
            out.text = Some(String::from_utf8_lossy(&content).into_owned());
        }
    }

    (content, out)
}
