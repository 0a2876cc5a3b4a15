//! Network transport for Modbus TCP
//!
//! The transport moves framed bytes and nothing else: it writes a complete
//! MBAP frame and hands back a fixed-capacity, receiver-allocated response
//! buffer. Framing, parsing and transaction correlation live above it.
//!
//! One request is in flight per connection. There is no reconnection or
//! retry; a failed socket is dropped and reported as not connected.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::constants::{MBAP_HEADER_LEN, MODBUS_RESPONSE_BUFFER_SIZE};
use crate::error::{ModbusError, ModbusResult};

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout for each write or read
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(3);

/// Byte-level exchange with a device.
///
/// Implemented by [`TcpTransport`]; tests provide in-memory versions.
pub trait ModbusTransport: Send {
    /// Send one framed request and return the raw response buffer.
    ///
    /// The buffer is [`MODBUS_RESPONSE_BUFFER_SIZE`] bytes; bytes past the
    /// received frame are zero.
    fn exchange(
        &mut self,
        frame: &[u8],
    ) -> impl Future<Output = ModbusResult<Vec<u8>>> + Send;

    /// Whether the underlying connection is usable.
    fn is_connected(&self) -> bool;

    /// Close the connection.
    fn close(&mut self) -> impl Future<Output = ModbusResult<()>> + Send;

    /// Exchange counters.
    fn stats(&self) -> TransportStats;
}

/// Counters kept by a transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportStats {
    pub requests_sent: u64,
    pub responses_received: u64,
    pub errors: u64,
    pub timeouts: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    /// Completion time of the last successful exchange
    pub last_exchange: Option<DateTime<Utc>>,
}

impl TransportStats {
    fn record_error(&mut self, err: &ModbusError) {
        self.errors += 1;
        if matches!(err, ModbusError::Timeout { .. }) {
            self.timeouts += 1;
        }
    }
}

/// Timeouts for a TCP connection.
///
/// # Example
///
/// ```rust
/// use modbus_accessor::TcpSettings;
/// use std::time::Duration;
///
/// let settings = TcpSettings::new().with_io_timeout(Duration::from_millis(500));
/// assert_eq!(settings.io_timeout, Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpSettings {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Timeout for each write and read
    pub io_timeout: Duration,
}

impl Default for TcpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }
}

impl TcpSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set I/O timeout.
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }
}

/// Modbus TCP transport over a tokio socket.
#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
    address: SocketAddr,
    io_timeout: Duration,
    stats: TransportStats,
}

impl TcpTransport {
    /// Connect to a device.
    pub async fn connect(address: SocketAddr, settings: TcpSettings) -> ModbusResult<Self> {
        let stream = match tokio::time::timeout(settings.connect_timeout, TcpStream::connect(address)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                return Err(ModbusError::connection(format!(
                    "failed to connect to {}: {}",
                    address, e
                )))
            }
            Err(_) => {
                return Err(ModbusError::timeout(
                    "connect",
                    millis(settings.connect_timeout),
                ))
            }
        };
        stream.set_nodelay(true)?;
        info!("Connected to Modbus TCP device at {}", address);

        Ok(Self {
            stream: Some(stream),
            address,
            io_timeout: settings.io_timeout,
            stats: TransportStats::default(),
        })
    }

    /// Resolve `host:port` and connect.
    pub async fn from_address(address: &str, settings: TcpSettings) -> ModbusResult<Self> {
        let resolved = tokio::net::lookup_host(address)
            .await
            .map_err(|e| ModbusError::connection(format!("cannot resolve {}: {}", address, e)))?
            .next()
            .ok_or_else(|| ModbusError::connection(format!("no address for {}", address)))?;
        Self::connect(resolved, settings).await
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    async fn exchange_inner(&mut self, frame: &[u8]) -> ModbusResult<Vec<u8>> {
        let io_timeout = self.io_timeout;
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| ModbusError::connection("not connected"))?;

        with_timeout("write", io_timeout, stream.write_all(frame)).await?;
        self.stats.requests_sent += 1;
        self.stats.bytes_sent += frame.len() as u64;

        let mut buf = vec![0u8; MODBUS_RESPONSE_BUFFER_SIZE];
        with_timeout("read", io_timeout, stream.read_exact(&mut buf[..MBAP_HEADER_LEN])).await?;

        let announced = usize::from(u16::from_be_bytes([buf[4], buf[5]]));
        let body = announced.min(MODBUS_RESPONSE_BUFFER_SIZE - MBAP_HEADER_LEN);
        if body < announced {
            warn!(
                "Response announces {} bytes, buffer holds {}",
                announced, body
            );
        }
        with_timeout(
            "read",
            io_timeout,
            stream.read_exact(&mut buf[MBAP_HEADER_LEN..MBAP_HEADER_LEN + body]),
        )
        .await?;

        self.stats.responses_received += 1;
        self.stats.bytes_received += (MBAP_HEADER_LEN + body) as u64;
        self.stats.last_exchange = Some(Utc::now());
        debug!(
            "Exchange with {}: sent {} bytes, received {} bytes",
            self.address,
            frame.len(),
            MBAP_HEADER_LEN + body
        );

        Ok(buf)
    }
}

impl ModbusTransport for TcpTransport {
    async fn exchange(&mut self, frame: &[u8]) -> ModbusResult<Vec<u8>> {
        match self.exchange_inner(frame).await {
            Ok(buf) => Ok(buf),
            Err(err) => {
                self.stats.record_error(&err);
                // a late reply would be read as the answer to the next request
                if matches!(err, ModbusError::Io { .. } | ModbusError::Timeout { .. }) {
                    warn!("Dropping connection to {}: {}", self.address, err);
                    self.stream = None;
                }
                Err(err)
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn close(&mut self) -> ModbusResult<()> {
        if let Some(mut stream) = self.stream.take() {
            // peer may already be gone; the socket is released either way
            if let Err(e) = stream.shutdown().await {
                debug!("Shutdown of {} reported: {}", self.address, e);
            }
            info!("Closed connection to {}", self.address);
        }
        Ok(())
    }

    fn stats(&self) -> TransportStats {
        self.stats.clone()
    }
}

async fn with_timeout<F, T>(operation: &'static str, limit: Duration, fut: F) -> ModbusResult<T>
where
    F: Future<Output = std::io::Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(ModbusError::from),
        Err(_) => Err(ModbusError::timeout(operation, millis(limit))),
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn test_settings_defaults() {
        let settings = TcpSettings::default();
        assert_eq!(settings.connect_timeout, Duration::from_secs(5));
        assert_eq!(settings.io_timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_exchange_reads_announced_length() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 12];
            socket.read_exact(&mut request).await.unwrap();
            let response = [
                request[0], request[1], 0x00, 0x00, 0x00, 0x05, 0x01, 0x03, 0x02, 0x00, 0x0A,
            ];
            socket.write_all(&response).await.unwrap();
        });

        let mut transport = TcpTransport::connect(addr, TcpSettings::default()).await.unwrap();
        let frame = [0x00, 0x07, 0x00, 0x00, 0x00, 0x06, 0x01, 0x03, 0x00, 0x00, 0x00, 0x01];
        let buf = transport.exchange(&frame).await.unwrap();

        assert_eq!(buf.len(), MODBUS_RESPONSE_BUFFER_SIZE);
        assert_eq!(&buf[..11], &[0x00, 0x07, 0x00, 0x00, 0x00, 0x05, 0x01, 0x03, 0x02, 0x00, 0x0A]);
        assert!(buf[11..].iter().all(|b| *b == 0));

        let stats = transport.stats();
        assert_eq!(stats.requests_sent, 1);
        assert_eq!(stats.responses_received, 1);
        assert_eq!(stats.bytes_sent, 12);
        assert_eq!(stats.bytes_received, 11);
        assert!(stats.last_exchange.is_some());

        transport.close().await.unwrap();
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_read_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
        });

        let settings = TcpSettings::new().with_io_timeout(Duration::from_millis(50));
        let mut transport = TcpTransport::connect(addr, settings).await.unwrap();
        let err = transport.exchange(&[0x00, 0x01]).await.unwrap_err();

        assert_eq!(err, ModbusError::timeout("read", 50));
        assert_eq!(transport.stats().timeouts, 1);
        assert!(!transport.is_connected());

        let err = transport.exchange(&[0x00, 0x02]).await.unwrap_err();
        assert!(matches!(err, ModbusError::Connection { .. }));
    }

    #[tokio::test]
    async fn test_exchange_after_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = listener.accept().await;
        });

        let mut transport = TcpTransport::connect(addr, TcpSettings::default()).await.unwrap();
        transport.close().await.unwrap();
        let err = transport.exchange(&[0x00]).await.unwrap_err();
        assert!(matches!(err, ModbusError::Connection { .. }));
        assert_eq!(transport.stats().errors, 1);
    }
}
