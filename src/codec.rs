//! # Modbus TCP Frame Codec
//!
//! Wraps PDUs in the MBAP header and unwraps raw response buffers.
//!
//! ```text
//! offset 0-1: transaction id (u16, big-endian)
//! offset 2-3: protocol id   (u16, always 0 for Modbus TCP)
//! offset 4-5: length        (u16, only the low byte is read on decode)
//! offset 6:   unit id       (u8)
//! offset 7..: PDU
//! ```
//!
//! ## Length field
//!
//! On encode the length is `pdu.len() + unit_id`, adding the numeric value of
//! the unit id. On decode only byte 5 is read and `length - 1` PDU bytes are
//! copied, so PDUs whose length field does not fit one byte do not survive a
//! round trip.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::constants::{
    MBAP_HEADER_LEN, MBAP_LENGTH_LOW_OFFSET, MBAP_PDU_OFFSET, MODBUS_PROTOCOL_ID,
};
use crate::error::{ModbusError, ModbusResult};

/// A Modbus TCP request frame, built fresh for each exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpFrame<'a> {
    transaction_id: u16,
    protocol_id: u16,
    unit_id: u8,
    pdu: &'a [u8],
}

impl<'a> TcpFrame<'a> {
    /// Create a frame with the Modbus TCP protocol id (0).
    pub fn new(transaction_id: u16, unit_id: u8, pdu: &'a [u8]) -> Self {
        Self {
            transaction_id,
            protocol_id: MODBUS_PROTOCOL_ID,
            unit_id,
            pdu,
        }
    }

    /// Set a non-default protocol id.
    pub fn with_protocol_id(mut self, protocol_id: u16) -> Self {
        self.protocol_id = protocol_id;
        self
    }

    #[inline]
    pub fn transaction_id(&self) -> u16 {
        self.transaction_id
    }

    #[inline]
    pub fn protocol_id(&self) -> u16 {
        self.protocol_id
    }

    #[inline]
    pub fn unit_id(&self) -> u8 {
        self.unit_id
    }

    #[inline]
    pub fn pdu(&self) -> &[u8] {
        self.pdu
    }

    /// Value written to the length field: `pdu.len() + unit_id`, wrapping at 16 bits.
    #[inline]
    pub fn length(&self) -> u16 {
        (self.pdu.len() as u16).wrapping_add(u16::from(self.unit_id))
    }

    /// Encode header and PDU.
    ///
    /// The buffer is `length + 6` bytes long, or `7 + pdu.len()` when that is
    /// larger (unit id 0), so the PDU is always emitted in full. Any bytes
    /// past the PDU are zero.
    pub fn encode(&self) -> Bytes {
        let length = self.length();
        let total = (usize::from(length) + MBAP_HEADER_LEN).max(MBAP_PDU_OFFSET + self.pdu.len());

        let mut buf = BytesMut::with_capacity(total);
        buf.put_u16(self.transaction_id);
        buf.put_u16(self.protocol_id);
        buf.put_u16(length);
        buf.put_u8(self.unit_id);
        buf.put_slice(self.pdu);
        buf.resize(total, 0);

        debug!("TCP request bytes: {}", hex(&buf));
        buf.freeze()
    }
}

/// Encode a PDU into a Modbus TCP frame with protocol id 0.
///
/// # Example
///
/// ```rust
/// use modbus_accessor::encode_frame;
///
/// let frame = encode_frame(0x0001, 1, &[0x03, 0x00, 0x6B, 0x00, 0x03]);
/// assert_eq!(
///     &frame[..],
///     &[0x00, 0x01, 0x00, 0x00, 0x00, 0x06, 0x01, 0x03, 0x00, 0x6B, 0x00, 0x03]
/// );
/// ```
pub fn encode_frame(transaction_id: u16, unit_id: u8, pdu: &[u8]) -> Bytes {
    TcpFrame::new(transaction_id, unit_id, pdu).encode()
}

/// Extract the PDU from a raw response buffer.
///
/// Reads only the low byte of the length field (offset 5) and copies
/// `max(length - 1, 0)` bytes starting at offset 7.
///
/// # Errors
///
/// [`ModbusError::MalformedResponse`] when the buffer is shorter than the
/// header or than the PDU the length byte announces.
pub fn decode_frame(buf: &[u8]) -> ModbusResult<Vec<u8>> {
    if buf.len() < MBAP_PDU_OFFSET {
        return Err(ModbusError::malformed(format!(
            "frame too short: {} bytes, header needs {}",
            buf.len(),
            MBAP_PDU_OFFSET
        )));
    }

    let length = buf[MBAP_LENGTH_LOW_OFFSET];
    let end = usize::from(length.saturating_sub(1));

    if buf.len() < MBAP_PDU_OFFSET + end {
        return Err(ModbusError::malformed(format!(
            "frame announces {} PDU bytes, {} available",
            end,
            buf.len() - MBAP_PDU_OFFSET
        )));
    }

    let pdu = buf[MBAP_PDU_OFFSET..MBAP_PDU_OFFSET + end].to_vec();
    debug!("PDU response bytes: {}", hex(&pdu));
    Ok(pdu)
}

/// Decoded MBAP header of a response, with full 16-bit fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MbapHeader {
    pub transaction_id: u16,
    pub protocol_id: u16,
    pub length: u16,
    pub unit_id: u8,
}

impl MbapHeader {
    /// Read the first 7 bytes of a frame.
    pub fn parse(buf: &[u8]) -> ModbusResult<Self> {
        if buf.len() < MBAP_PDU_OFFSET {
            return Err(ModbusError::malformed(format!(
                "MBAP header needs {} bytes, got {}",
                MBAP_PDU_OFFSET,
                buf.len()
            )));
        }
        Ok(Self {
            transaction_id: u16::from_be_bytes([buf[0], buf[1]]),
            protocol_id: u16::from_be_bytes([buf[2], buf[3]]),
            length: u16::from_be_bytes([buf[4], buf[5]]),
            unit_id: buf[6],
        })
    }
}

/// Uppercase hex without separators, for byte dumps in logs.
pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}
