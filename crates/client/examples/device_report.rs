//! Walk every device the signed-in user owns, probe its channels, and
//! export the collected data as JSON for further analysis.
//!
//! Device serials come from the user document's `deviceOrder` map;
//! channels are one-indexed and probed until the service answers
//! not-found.

use std::collections::BTreeMap;
use std::env;
use std::fs;

use embercloud::domain::{Device, DeviceChannel};
use embercloud::{Authenticator, CloudClient, Config, Error};
use serde::Serialize;

const OUTPUT_PATH: &str = "embercloud_devices.json";
const MAX_CHANNELS: u32 = 9;

#[derive(Serialize)]
struct Report {
    devices: Vec<Device>,
    device_channels: BTreeMap<String, Vec<DeviceChannel>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let email = env::var("EMBERCLOUD_EMAIL")?;
    let password = env::var("EMBERCLOUD_PASSWORD")?;
    let config = Config::new(env::var("EMBERCLOUD_API_KEY")?, env::var("EMBERCLOUD_APP_ID")?);

    let gateway = Authenticator::new(config).login(&email, &password).await?;
    let client = CloudClient::new(gateway);

    let user = client.get_user().await?;
    let account_id = user.account_id.clone().unwrap_or_default();
    let serials: Vec<String> = user
        .device_order
        .as_ref()
        .and_then(|orders| orders.get(&account_id))
        .map(|items| items.iter().filter_map(|item| item.device_id.clone()).collect())
        .unwrap_or_default();

    println!("found {} device(s) on account {account_id}", serials.len());

    let mut report = Report { devices: Vec::new(), device_channels: BTreeMap::new() };

    for serial in &serials {
        let device = client.get_device(serial).await?;
        println!(
            "{:12} {:8} battery={}",
            device.label.as_deref().unwrap_or("(unnamed)"),
            device.device_type.as_deref().unwrap_or("?"),
            device.battery.map_or_else(|| "?".to_owned(), |b| b.to_string()),
        );

        let mut channels = Vec::new();
        for number in 1..=MAX_CHANNELS {
            match client.get_device_channel(serial, &number.to_string()).await {
                Ok(channel) => {
                    if let (Some(value), Some(units)) = (channel.value, channel.units.as_deref()) {
                        println!(
                            "  channel {number}: {value}{units} ({})",
                            channel.label.as_deref().unwrap_or("unlabeled"),
                        );
                    }
                    channels.push(channel);
                }
                // Channels run out with a not-found; that's the stop signal.
                Err(Error::NotFound(_)) => break,
                Err(other) => return Err(other.into()),
            }
        }

        report.device_channels.insert(serial.clone(), channels);
        report.devices.push(device);
    }

    fs::write(OUTPUT_PATH, serde_json::to_string_pretty(&report)?)?;
    println!("report written to {OUTPUT_PATH}");

    Ok(())
}
