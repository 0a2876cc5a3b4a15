//! # Devices
//!
//! A [`ModbusDevice`] names a Modbus TCP endpoint and the accessors defined
//! for it. It holds configuration only; connections are opened with
//! [`ModbusDevice::connect`] and owned by the returned client.
//!
//! ```rust
//! use modbus_accessor::{Accessor, FunctionCode, ModbusDevice};
//!
//! let meter = ModbusDevice::new("meter", "192.168.1.50", 502, 1)
//!     .with_accessor(Accessor::holding_registers(0, "voltage", 2))
//!     .with_accessor(Accessor::new(FunctionCode::ReadCoils, 10, "breaker", 1, true));
//!
//! assert_eq!(meter.address(), "192.168.1.50:502");
//! assert!(meter.accessor("breaker").is_some());
//! ```

use tracing::info;

use crate::accessor::Accessor;
use crate::client::AccessorClient;
use crate::constants::MODBUS_PROTOCOL_ID;
use crate::error::{ModbusError, ModbusResult};
use crate::response::PduResponseData;
use crate::transport::{ModbusTransport, TcpSettings, TcpTransport};

/// A named Modbus TCP device and its accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModbusDevice {
    name: String,
    host: String,
    port: u16,
    unit_id: u8,
    protocol_id: u16,
    accessors: Vec<Accessor>,
}

impl ModbusDevice {
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16, unit_id: u8) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            unit_id,
            protocol_id: MODBUS_PROTOCOL_ID,
            accessors: Vec::new(),
        }
    }

    /// Usually 0.
    pub fn with_protocol_id(mut self, protocol_id: u16) -> Self {
        self.protocol_id = protocol_id;
        self
    }

    pub fn with_accessor(mut self, accessor: Accessor) -> Self {
        self.accessors.push(accessor);
        self
    }

    pub fn with_accessors(mut self, accessors: impl IntoIterator<Item = Accessor>) -> Self {
        self.accessors.extend(accessors);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn unit_id(&self) -> u8 {
        self.unit_id
    }

    pub fn protocol_id(&self) -> u16 {
        self.protocol_id
    }

    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    /// `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// First accessor with this readable name.
    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.iter().find(|a| a.name() == name)
    }

    /// Open a TCP connection and return a client for this device's unit.
    pub async fn connect(&self, settings: TcpSettings) -> ModbusResult<AccessorClient<TcpTransport>> {
        info!("Connecting to device '{}' at {}", self.name, self.address());
        let transport = TcpTransport::from_address(&self.address(), settings).await?;
        Ok(self.client(transport))
    }

    /// Wrap an existing transport in a client for this device's unit.
    pub fn client<T: ModbusTransport>(&self, transport: T) -> AccessorClient<T> {
        AccessorClient::new(transport, self.unit_id).with_protocol_id(self.protocol_id)
    }

    /// Execute the accessor with the given name.
    pub async fn read<T: ModbusTransport>(
        &self,
        client: &mut AccessorClient<T>,
        name: &str,
    ) -> ModbusResult<PduResponseData> {
        let accessor = self
            .accessor(name)
            .ok_or_else(|| ModbusError::UnknownAccessor {
                name: name.to_string(),
            })?;
        client.execute(accessor).await
    }

    /// Execute every accessor in definition order.
    pub async fn poll<T: ModbusTransport>(
        &self,
        client: &mut AccessorClient<T>,
    ) -> Vec<(String, ModbusResult<PduResponseData>)> {
        client.execute_all(&self.accessors).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::FunctionCode;

    fn meter() -> ModbusDevice {
        ModbusDevice::new("meter", "10.0.0.5", 1502, 3)
            .with_protocol_id(0)
            .with_accessors([
                Accessor::holding_registers(0, "voltage", 2),
                Accessor::new(FunctionCode::ReadInputRegisters, 4, "current", 2, true),
            ])
    }

    #[test]
    fn test_accessor_lookup() {
        let device = meter();
        assert_eq!(device.accessors().len(), 2);
        assert_eq!(
            device.accessor("current").map(|a| a.starting_address()),
            Some(4)
        );
        assert!(device.accessor("frequency").is_none());
    }

    #[test]
    fn test_address_and_ids() {
        let device = meter();
        assert_eq!(device.address(), "10.0.0.5:1502");
        assert_eq!(device.unit_id(), 3);
        assert_eq!(device.protocol_id(), 0);
        assert_eq!(device.name(), "meter");
    }

    #[tokio::test]
    async fn test_connect_refused() {
        // bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let device = ModbusDevice::new("gone", "127.0.0.1", port, 1);
        let err = device.connect(TcpSettings::default()).await.err().unwrap();
        assert!(err.is_transport_error());
    }
}
