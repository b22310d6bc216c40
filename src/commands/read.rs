//! Analog read handlers.

use super::{depth_bar, device_arg, setup_interrupt_handler, Session};
use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};
use wooting_analog::{
    key_code_from_name, key_name, AnalogConfig, AnalogError, AnalogResult, DeviceId,
};

/// Read the analog value of a single key
pub fn read(session: &Session, config: &AnalogConfig, key: &str, device: Option<u64>) -> Result<()> {
    let (code, value) = read_key(session, config, key, device_arg(device))?;
    println!(
        "{} (0x{:04X}): {:.3} {}",
        key_name(config.keycode_mode, code),
        code,
        value,
        depth_bar(value, 20)
    );
    Ok(())
}

/// Resolve `key` in the configured keycode mode and read it
fn read_key(
    session: &Session,
    config: &AnalogConfig,
    key: &str,
    device: Option<DeviceId>,
) -> Result<(u16, f32)> {
    let mode = config.keycode_mode;
    let code = key_code_from_name(mode, key)
        .ok_or_else(|| anyhow!("Unknown key \"{}\" for keycode mode {}", key, mode.as_str()))?;

    let value = match device {
        Some(id) => session.analog.read_analog_device(code, id)?,
        None => session.analog.read_analog(code)?,
    };
    Ok((code, value))
}

/// Poll the full buffer and print pressed keys whenever they change
pub async fn watch(
    session: &Session,
    config: &AnalogConfig,
    device: Option<u64>,
    interval_ms: Option<u64>,
) -> Result<()> {
    let running = setup_interrupt_handler();
    println!("Watching analog keys (Ctrl-C to stop)...");
    run_watch(session, config, device_arg(device), interval_ms, &running).await?;
    Ok(())
}

/// Watch loop; returns how many key snapshots were printed
async fn run_watch(
    session: &Session,
    config: &AnalogConfig,
    device: Option<DeviceId>,
    interval_ms: Option<u64>,
    running: &AtomicBool,
) -> Result<usize> {
    let mode = config.keycode_mode;
    let interval = Duration::from_millis(interval_ms.unwrap_or(config.poll_interval_ms).max(1));
    let mut codes = vec![0u16; config.buffer_size];
    let mut values = vec![0f32; config.buffer_size];
    let mut last: Vec<(u16, f32)> = Vec::new();
    let mut printed = 0;

    let mut ticker = tokio::time::interval(interval);
    while running.load(Ordering::SeqCst) {
        ticker.tick().await;

        let result = match device {
            Some(id) => session
                .analog
                .read_full_buffer_device(&mut codes, &mut values, id),
            None => session.analog.read_full_buffer(&mut codes, &mut values),
        };
        let count = match result {
            Ok(count) => count.min(codes.len()),
            Err(AnalogError::Status { code, .. }) if code == AnalogResult::NoDevices.code() => {
                debug!("No devices connected");
                0
            }
            Err(e) => {
                warn!("Read failed: {}", e);
                tokio::time::sleep(Duration::from_secs(1)).await;
                continue;
            }
        };

        let current: Vec<(u16, f32)> = codes[..count]
            .iter()
            .copied()
            .zip(values[..count].iter().copied())
            .collect();
        if current == last {
            continue;
        }

        if current.is_empty() {
            println!("(no keys pressed)");
        } else {
            let line: Vec<String> = current
                .iter()
                .map(|(code, value)| format!("{} {:.0}%", key_name(mode, *code), value * 100.0))
                .collect();
            println!("{}", line.join(" | "));
        }
        printed += 1;
        last = current;
    }

    Ok(printed)
}
