//! Status and device listing handlers.

use super::Session;
use anyhow::Result;
use wooting_analog::{AnalogConfig, DeviceInfo};

/// Show library state and connected devices
pub fn status(session: &Session, config: &AnalogConfig) -> Result<()> {
    let analog = &session.analog;
    println!(
        "Library:      {}",
        match (&session.mock, &config.library_path) {
            (Some(_), _) => "simulated".to_string(),
            (None, Some(path)) => path.display().to_string(),
            (None, None) => default_library_name(),
        }
    );
    println!("Initialised:  {}", analog.is_initialised());
    println!("Keycode mode: {}", config.keycode_mode.as_str());

    match analog.connected_devices(config.device_capacity) {
        Ok(devices) => {
            println!("Devices:      {}", devices.len());
            for device in &devices {
                println!("  {device}");
            }
        }
        Err(e) => println!("Devices:      unavailable ({e})"),
    }
    Ok(())
}

/// List connected devices
pub fn devices(session: &Session, config: &AnalogConfig, json: bool) -> Result<()> {
    let devices = session.analog.connected_devices(config.device_capacity)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }

    if devices.is_empty() {
        println!("No devices found!");
        return Ok(());
    }

    for (i, device) in devices.iter().enumerate() {
        print_device(i, device);
    }
    Ok(())
}

fn print_device(index: usize, device: &DeviceInfo) {
    println!(
        "  [{}] VID={:04X} PID={:04X} id={}",
        index, device.vendor_id, device.product_id, device.device_id
    );
    println!("      Manufacturer: {}", device.manufacturer_name);
    println!("      Name:         {}", device.device_name);
}

fn default_library_name() -> String {
    wooting_analog::library_file_name()
        .map(str::to_string)
        .unwrap_or_else(|e| e.to_string())
}
