//! Command handlers for the CLI application.
//!
//! - `query`: status and device listing
//! - `read`: single reads and the watch loop
//! - `events`: device hot-plug events

pub mod events;
pub mod query;
pub mod read;

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use wooting_analog::{AnalogConfig, AnalogInput, DeviceId, MockSdk};

/// An initialised binding, plus the simulated library when running with `--mock`
pub struct Session {
    pub analog: AnalogInput,
    pub mock: Option<Arc<MockSdk>>,
}

/// Load the library, initialise it and apply the configured keycode mode
pub fn open_session(config: &AnalogConfig, mock: bool) -> Result<Session> {
    let (analog, mock) = if mock {
        info!("Using simulated keyboard");
        let sdk = Arc::new(MockSdk::with_demo_keyboard());
        (AnalogInput::new(sdk.clone()), Some(sdk))
    } else {
        let analog = match &config.library_path {
            Some(path) => AnalogInput::load_from(path),
            None => AnalogInput::load(),
        }
        .context("Failed to load the analog wrapper library")?;
        (analog, None)
    };

    start_session(analog, mock, config)
}

/// Initialise a loaded binding and apply the configured keycode mode
///
/// Uninitialises again if the mode cannot be set.
pub fn start_session(
    analog: AnalogInput,
    mock: Option<Arc<MockSdk>>,
    config: &AnalogConfig,
) -> Result<Session> {
    analog.initialise().context("Failed to initialise the analog SDK")?;
    if let Err(e) = analog.set_keycode_mode(config.keycode_mode) {
        let status = analog.uninitialise();
        debug!("uninitialise after failed setup -> {}", status);
        return Err(e).with_context(|| {
            format!("Failed to set keycode mode {}", config.keycode_mode.as_str())
        });
    }

    Ok(Session { analog, mock })
}

/// Set up a Ctrl-C handler that sets the given flag to false when triggered.
/// Returns the Arc<AtomicBool> for use in the main loop.
pub fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .ok();

    running
}

/// Serializes tests that touch the process-wide device-event callback
#[cfg(test)]
pub(crate) static CALLBACK_SLOT: parking_lot::Mutex<()> = parking_lot::const_mutex(());

/// Convert an optional `--device` argument
pub fn device_arg(device: Option<u64>) -> Option<DeviceId> {
    device.map(DeviceId)
}

/// Format an analog value as a percentage bar
pub fn depth_bar(value: f32, width: usize) -> String {
    let filled = ((value.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), " ".repeat(width - filled))
}
