//! Device Polling Example
//!
//! Defines an energy meter as a named set of accessors and polls it.
//!
//! # Register Map (example meter)
//!
//! | Address | Function | Count | Description |
//! |---------|----------|-------|-------------|
//! | 0x0000  | FC03     | 2     | Voltage, float32 |
//! | 0x0002  | FC03     | 2     | Current, float32 |
//! | 0x0004  | FC04     | 1     | Frequency x100, u16 |
//! | 0x0010  | FC01     | 1     | Breaker state |
//! | 0x0020  | FC03     | 8     | Serial number, text |
//!
//! # Running this example
//!
//! ```bash
//! cargo run --example read_device -- 192.168.1.50 502
//! ```

use std::time::Duration;

use modbus_accessor::{
    Accessor, FunctionCode, ModbusDevice, ModbusResult, PduResponseData, TcpSettings,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn meter(host: &str, port: u16) -> ModbusDevice {
    ModbusDevice::new("energy-meter", host, port, 1).with_accessors([
        Accessor::holding_registers(0x0000, "voltage", 2),
        Accessor::holding_registers(0x0002, "current", 2),
        Accessor::new(FunctionCode::ReadInputRegisters, 0x0004, "frequency", 1, true),
        Accessor::coils(0x0010, "breaker", 1),
        // text is stored in wire order
        Accessor::holding_registers(0x0020, "serial", 8).with_reverse_byte_order(false),
    ])
}

fn describe(data: &PduResponseData) -> String {
    if let Some(text) = data.as_str() {
        return format!("{:?}", text.trim_end_matches('\0'));
    }
    match data.content().len() {
        1 => format!("{:?}", data.as_u8().map(|b| b != 0)),
        2 => format!("{:?}", data.as_u16()),
        4 => format!("{:?}", data.as_f32()),
        _ => format!("{:?}", data.as_f64()),
    }
}

#[tokio::main]
async fn main() -> ModbusResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port = args
        .next()
        .and_then(|p| p.parse().ok())
        .unwrap_or(modbus_accessor::DEFAULT_TCP_PORT);

    let device = meter(&host, port);
    let settings = TcpSettings::new()
        .with_connect_timeout(Duration::from_secs(3))
        .with_io_timeout(Duration::from_secs(1));

    let mut client = device.connect(settings).await?;
    info!(
        "Polling {} accessors on '{}'",
        device.accessors().len(),
        device.name()
    );

    for (name, result) in device.poll(&mut client).await {
        match result {
            Ok(data) => println!("{:<10} {}", name, describe(&data)),
            Err(e) => error!("{:<10} {}", name, e),
        }
    }

    client.close().await
}
