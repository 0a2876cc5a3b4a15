//! Modbus Accessor Demo
//!
//! Walks one accessor through the whole wire path without a device, then
//! optionally runs the same accessors against a live one.
//!
//! Usage: cargo run --example demo [server_address]
//! Example: RUST_LOG=modbus_accessor=debug cargo run --example demo 127.0.0.1:502

use modbus_accessor::{
    build_request, coerce, decode_frame, encode_frame, parse_response, Accessor, AccessorClient,
    FunctionCode, TcpSettings, TcpTransport,
};
use tracing_subscriber::EnvFilter;

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🚀 Modbus Accessor v{} Demo", modbus_accessor::VERSION);
    println!("==============================\n");

    // =========================================================================
    // Part 1: Building requests (no connection required)
    // =========================================================================
    println!("📦 Part 1: Accessor -> request PDU");
    println!("-----------------------------------");

    let accessors = [
        Accessor::holding_registers(0, "voltage", 2),
        Accessor::coils(16, "breaker", 1),
        Accessor::new(FunctionCode::WriteSingleCoil, 20, "pump", 1, true),
        Accessor::new(FunctionCode::WriteMultipleCoils, 0x13, "relays", 10, true),
        Accessor::new(FunctionCode::WriteMultipleRegisters, 40, "setpoints", 2, true)
            .with_write_value(0x0BB8),
        Accessor::holding_registers(250, "out of window", 10),
        Accessor::new(FunctionCode::ReadFifoQueue, 0, "fifo", 1, true),
    ];

    for accessor in &accessors {
        match build_request(accessor) {
            Ok(request) => println!("  {:<14} -> {}", accessor.name(), hex(request.as_bytes())),
            Err(e) => println!("  {:<14} -> ❌ {}", accessor.name(), e),
        }
    }

    // =========================================================================
    // Part 2: MBAP framing
    // =========================================================================
    println!("\n🔄 Part 2: Framing");
    println!("-------------------");

    let request = build_request(&accessors[0])?;
    let frame = encode_frame(1, 1, request.as_bytes());
    println!("  request frame:  {}", hex(&frame));

    // 230.5 V as a big-endian float
    let response = [
        0x00, 0x01, 0x00, 0x00, 0x00, 0x07, 0x01, 0x03, 0x04, 0x43, 0x66, 0x80, 0x00,
    ];
    println!("  response frame: {}", hex(&response));
    let pdu = decode_frame(&response)?;
    println!("  response PDU:   {}", hex(&pdu));

    // =========================================================================
    // Part 3: Parsing and coercion
    // =========================================================================
    println!("\n📊 Part 3: Typed values");
    println!("------------------------");

    let data = parse_response(&pdu)?;
    println!("  raw content:    {}", hex(data.raw_content()));
    println!("  content:        {}", hex(data.content()));
    for value in data.values() {
        println!("    {:<6} {}", value.type_name(), value);
    }

    let (_, text) = coerce(b"MTR-7", false);
    println!("  5-byte content as text: {:?}", text.text);

    for exception in [[0x83u8, 0x02], [0x81, 0x04]] {
        match parse_response(&exception) {
            Ok(d) => println!("  {} -> data {:?}", hex(&exception), d.raw_content()),
            Err(e) => println!("  {} -> ❌ {}", hex(&exception), e),
        }
    }

    // =========================================================================
    // Part 4: Live device (requires a Modbus TCP server)
    // =========================================================================
    println!("\n🔌 Part 4: Live device");
    println!("-----------------------");

    let server_address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:502".to_string());
    println!("  Connecting to {}...", server_address);

    let transport = match TcpTransport::from_address(&server_address, TcpSettings::default()).await
    {
        Ok(transport) => transport,
        Err(e) => {
            println!("  ⚠️  Connection failed: {}", e);
            println!("  (This is expected if no Modbus server is running)");
            println!("\n🎉 Demo completed! (TCP operations skipped)");
            return Ok(());
        }
    };

    let mut client = AccessorClient::new(transport, 1);
    for (name, result) in client.execute_all(&accessors[..2]).await {
        match result {
            Ok(data) => println!("    {:<10} {}", name, hex(data.raw_content())),
            Err(e) => println!("    {:<10} ❌ {}", name, e),
        }
    }

    let stats = client.stats();
    println!("\n  📊 Statistics:");
    println!(
        "    Requests: {}, Responses: {}, Errors: {}",
        stats.requests_sent, stats.responses_received, stats.errors
    );
    client.close().await?;

    println!("\n🎉 Demo completed!");
    Ok(())
}
