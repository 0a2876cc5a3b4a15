//! Accessor client
//!
//! Runs one accessor end to end over any [`ModbusTransport`]:
//!
//! ```text
//! Accessor → build_request → TcpFrame::encode → exchange
//!          → MbapHeader check → decode_frame → parse_response_for
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use modbus_accessor::{Accessor, AccessorClient, ModbusResult, TcpSettings, TcpTransport};
//!
//! #[tokio::main]
//! async fn main() -> ModbusResult<()> {
//!     let transport = TcpTransport::from_address("127.0.0.1:502", TcpSettings::default()).await?;
//!     let mut client = AccessorClient::new(transport, 1);
//!
//!     let voltage = Accessor::holding_registers(0, "voltage", 1);
//!     let data = client.execute(&voltage).await?;
//!     println!("voltage = {:?}", data.as_u16());
//!
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

use tracing::{debug, warn};

use crate::accessor::Accessor;
use crate::codec::{decode_frame, MbapHeader, TcpFrame};
use crate::constants::MODBUS_PROTOCOL_ID;
use crate::error::{ModbusError, ModbusResult};
use crate::request::build_request;
use crate::response::{parse_response_for, PduResponseData};
use crate::transport::{ModbusTransport, TransportStats};

/// Client executing accessors against one unit behind a transport.
///
/// Transaction ids start at 1 and wrap. Each call waits for its response
/// before the next request is sent.
pub struct AccessorClient<T: ModbusTransport> {
    transport: T,
    unit_id: u8,
    protocol_id: u16,
    next_transaction_id: u16,
}

impl<T: ModbusTransport> AccessorClient<T> {
    /// Create a client for `unit_id` with protocol id 0.
    pub fn new(transport: T, unit_id: u8) -> Self {
        Self {
            transport,
            unit_id,
            protocol_id: MODBUS_PROTOCOL_ID,
            next_transaction_id: 1,
        }
    }

    /// Set the protocol id written into request headers.
    pub fn with_protocol_id(mut self, protocol_id: u16) -> Self {
        self.protocol_id = protocol_id;
        self
    }

    /// Get a reference to the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn unit_id(&self) -> u8 {
        self.unit_id
    }

    pub fn protocol_id(&self) -> u16 {
        self.protocol_id
    }

    fn next_transaction(&mut self) -> u16 {
        let id = self.next_transaction_id;
        self.next_transaction_id = self.next_transaction_id.wrapping_add(1);
        id
    }

    /// Execute one accessor and return its typed response.
    ///
    /// Request errors are returned before anything is sent, and do not
    /// consume a transaction id.
    pub async fn execute(&mut self, accessor: &Accessor) -> ModbusResult<PduResponseData> {
        let request = build_request(accessor)?;
        let transaction_id = self.next_transaction();

        let frame = TcpFrame::new(transaction_id, self.unit_id, request.as_bytes())
            .with_protocol_id(self.protocol_id)
            .encode();

        debug!(
            "Executing '{}' as transaction {} on unit {}",
            accessor.name(),
            transaction_id,
            self.unit_id
        );
        let raw = self.transport.exchange(&frame).await?;

        let header = MbapHeader::parse(&raw)?;
        if header.transaction_id != transaction_id {
            warn!(
                "Response for '{}' carries transaction {}, expected {}",
                accessor.name(),
                header.transaction_id,
                transaction_id
            );
            // the stream is out of step with our requests
            if let Err(e) = self.transport.close().await {
                debug!("Close after transaction mismatch reported: {}", e);
            }
            return Err(ModbusError::TransactionMismatch {
                expected: transaction_id,
                actual: header.transaction_id,
            });
        }

        let pdu = decode_frame(&raw)?;
        parse_response_for(accessor, &pdu)
    }

    /// Execute accessors in order, collecting each result by accessor name.
    ///
    /// A failing accessor does not stop the ones after it.
    pub async fn execute_all<'a, I>(
        &mut self,
        accessors: I,
    ) -> Vec<(String, ModbusResult<PduResponseData>)>
    where
        I: IntoIterator<Item = &'a Accessor>,
    {
        let mut results = Vec::new();
        for accessor in accessors {
            let result = self.execute(accessor).await;
            if let Err(ref e) = result {
                warn!("Accessor '{}' failed: {}", accessor.name(), e);
            }
            results.push((accessor.name().to_string(), result));
        }
        results
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub async fn close(&mut self) -> ModbusResult<()> {
        self.transport.close().await
    }

    pub fn stats(&self) -> TransportStats {
        self.transport.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::FunctionCode;
    use std::collections::VecDeque;

    /// Replays canned response PDUs, echoing the request's transaction id.
    struct MockTransport {
        requests: Vec<Vec<u8>>,
        responses: VecDeque<Vec<u8>>,
        transaction_override: Option<u16>,
        connected: bool,
    }

    impl MockTransport {
        fn new(responses: Vec<Vec<u8>>) -> Self {
            Self {
                requests: Vec::new(),
                responses: responses.into(),
                transaction_override: None,
                connected: true,
            }
        }
    }

    impl ModbusTransport for MockTransport {
        async fn exchange(&mut self, frame: &[u8]) -> ModbusResult<Vec<u8>> {
            self.requests.push(frame.to_vec());
            let pdu = self
                .responses
                .pop_front()
                .ok_or_else(|| ModbusError::connection("No response prepared in mock"))?;

            let tid = self
                .transaction_override
                .unwrap_or(u16::from_be_bytes([frame[0], frame[1]]));
            let mut buf = vec![0u8; 512];
            buf[..2].copy_from_slice(&tid.to_be_bytes());
            buf[4..6].copy_from_slice(&(pdu.len() as u16 + 1).to_be_bytes());
            buf[6] = frame[6];
            buf[7..7 + pdu.len()].copy_from_slice(&pdu);
            Ok(buf)
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        async fn close(&mut self) -> ModbusResult<()> {
            self.connected = false;
            Ok(())
        }

        fn stats(&self) -> TransportStats {
            TransportStats {
                requests_sent: self.requests.len() as u64,
                ..TransportStats::default()
            }
        }
    }

    #[tokio::test]
    async fn test_execute_holding_register() {
        let mock = MockTransport::new(vec![vec![0x03, 0x02, 0x00, 0x0A]]);
        let mut client = AccessorClient::new(mock, 1);

        let data = client
            .execute(&Accessor::holding_registers(0, "level", 1))
            .await
            .unwrap();
        assert_eq!(data.as_u16(), Some(10));

        let sent = &client.transport().requests[0];
        assert_eq!(
            sent.as_slice(),
            &[0x00, 0x01, 0x00, 0x00, 0x00, 0x06, 0x01, 0x03, 0x00, 0x00, 0x00, 0x01]
        );
    }

    #[tokio::test]
    async fn test_transaction_ids_increment() {
        let mock = MockTransport::new(vec![
            vec![0x01, 0x01, 0x01],
            vec![0x01, 0x01, 0x00],
        ]);
        let mut client = AccessorClient::new(mock, 1);
        let coil = Accessor::coils(3, "pump", 1);

        assert_eq!(client.execute(&coil).await.unwrap().as_bool(), Some(true));
        assert_eq!(client.execute(&coil).await.unwrap().as_bool(), Some(false));

        let requests = &client.transport().requests;
        assert_eq!(&requests[0][..2], &[0x00, 0x01]);
        assert_eq!(&requests[1][..2], &[0x00, 0x02]);
        assert_eq!(client.stats().requests_sent, 2);
    }

    #[tokio::test]
    async fn test_request_error_sends_nothing() {
        let mock = MockTransport::new(vec![]);
        let mut client = AccessorClient::new(mock, 1);
        let bad = Accessor::holding_registers(0, "too many", 126);

        let err = client.execute(&bad).await.unwrap_err();
        assert!(err.is_request_error());
        assert!(client.transport().requests.is_empty());
        assert_eq!(client.next_transaction_id, 1);
    }

    #[tokio::test]
    async fn test_exception_propagates() {
        let mock = MockTransport::new(vec![vec![0x84, 0x02]]);
        let mut client = AccessorClient::new(mock, 1);
        let acc = Accessor::new(FunctionCode::ReadInputRegisters, 0, "temp", 2, true);

        let err = client.execute(&acc).await.unwrap_err();
        assert!(matches!(err, ModbusError::Exception { function: 0x04, code: 0x02, .. }));
    }

    #[tokio::test]
    async fn test_transaction_mismatch() {
        let mut mock = MockTransport::new(vec![vec![0x03, 0x02, 0x00, 0x01]]);
        mock.transaction_override = Some(0x0999);
        let mut client = AccessorClient::new(mock, 1);

        let err = client
            .execute(&Accessor::holding_registers(0, "x", 1))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ModbusError::TransactionMismatch {
                expected: 1,
                actual: 0x0999
            }
        );
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_execute_all_continues_after_failure() {
        let mock = MockTransport::new(vec![vec![0x03, 0x02, 0x00, 0x05]]);
        let mut client = AccessorClient::new(mock, 1);
        let accessors = vec![
            Accessor::holding_registers(0, "bad", 0),
            Accessor::holding_registers(1, "good", 1),
        ];

        let results = client.execute_all(&accessors).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "bad");
        assert!(results[0].1.is_err());
        assert_eq!(results[1].1.as_ref().unwrap().as_u16(), Some(5));
    }

    #[test]
    fn test_write_register_echo() {
        let mock = MockTransport::new(vec![vec![0x06, 0x00, 0x09, 0x00, 0x2A]]);
        let mut client = AccessorClient::new(mock, 7).with_protocol_id(0);
        let acc = Accessor::new(FunctionCode::WriteSingleRegister, 9, "setpoint", 42, true);

        let data = tokio_test::block_on(client.execute(&acc)).unwrap();
        assert_eq!(data.raw_content(), &[0x00, 0x2A]);

        // length field is pdu length + unit id, the tail is zero padding
        let sent = &client.transport().requests[0];
        assert_eq!(sent.len(), 18);
        assert_eq!(&sent[4..6], &[0x00, 0x0C]);
        assert_eq!(sent[6], 7);
        assert_eq!(&sent[7..12], &[0x06, 0x00, 0x09, 0x00, 0x2A]);
        assert!(sent[12..].iter().all(|b| *b == 0));
    }

    #[tokio::test]
    async fn test_close() {
        let mut client = AccessorClient::new(MockTransport::new(vec![]), 1);
        assert!(client.is_connected());
        client.close().await.unwrap();
        assert!(!client.is_connected());
    }
}
