//! Reads the clock, storage counters and network settings of a terminal
//!
//! ```text
//! RUST_LOG=anviz=debug cargo run --example read_clock -- anviz.toml
//! ```

use anviz::{Device, DeviceConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anviz::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "anviz.toml".to_string());
    let config = DeviceConfig::load(&path)?;

    println!("Querying device {} at {}:{}...", config.device_id, config.ip_addr, config.ip_port);

    let mut device = Device::from_config(&config);

    let now = device.get_datetime().await?;
    println!("✓ Clock: {}", now);

    let records = device.get_record_info().await?;
    println!("✓ {}", records);

    let params = device.get_net_params().await?;
    println!("✓ {}", params);

    Ok(())
}
