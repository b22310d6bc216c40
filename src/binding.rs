//! Checked binding over the native analog entry points
//!
//! Every method forwards to exactly one `AnalogSdk` call and applies the same
//! policy to its result:
//!
//! - control calls succeed only on `Ok`
//! - count calls succeed on any non-negative value, returned unchanged
//! - single-value reads succeed on values in `[0, 1]`, returned unchanged
//!
//! Failures carry the native status decoded through the result table.
//! `uninitialise` is the exception: its raw status is returned as is.

use std::path::Path;
use std::ptr;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use wooting_analog_ffi::{
    AnalogResult, DeviceEventType, DeviceId, DeviceInfo, DeviceInfoFfi, KeycodeType,
    NativeSdk, SharedSdk,
};

use crate::error::AnalogError;
use crate::event_bridge::{self, DeviceEvent};

/// Caller-owned buffer for `get_connected_devices_info`
///
/// Holds the descriptor pointers written by the native library. The binding
/// never touches the slots itself.
pub struct DeviceInfoBuffer {
    slots: Vec<*mut DeviceInfoFfi>,
}

impl DeviceInfoBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![ptr::null_mut(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slots as last written by the native library
    pub fn slots(&self) -> &[*mut DeviceInfoFfi] {
        &self.slots
    }

    /// Copy the first `count` descriptors into owned values, skipping nulls
    ///
    /// # Safety
    ///
    /// The records must still be alive: no device may have disconnected and
    /// the library must not have been uninitialised since the call that
    /// filled this buffer.
    pub unsafe fn decode(&self, count: usize) -> Vec<DeviceInfo> {
        self.slots
            .iter()
            .take(count)
            .filter_map(|&raw| DeviceInfo::from_raw(raw))
            .collect()
    }
}

/// The analog input binding
pub struct AnalogInput {
    sdk: SharedSdk,
}

impl AnalogInput {
    /// Wrap an existing SDK implementation
    pub fn new(sdk: SharedSdk) -> Self {
        Self { sdk }
    }

    /// Load the native wrapper by its platform file name
    ///
    /// Fails before any native call on platforms other than Windows, Linux
    /// and macOS.
    pub fn load() -> Result<Self, AnalogError> {
        Ok(Self::new(Arc::new(NativeSdk::load()?)))
    }

    /// Load the native wrapper from an explicit path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, AnalogError> {
        Ok(Self::new(Arc::new(NativeSdk::load_from(path)?)))
    }

    // === Lifecycle ===

    pub fn initialise(&self) -> Result<(), AnalogError> {
        check_ok("initialise", self.sdk.initialise())?;
        info!("Analog SDK initialised");
        Ok(())
    }

    pub fn is_initialised(&self) -> bool {
        self.sdk.is_initialised()
    }

    /// Uninitialise the library and return its raw status, uninterpreted
    ///
    /// The library forgets its device-event callback here, so the handler
    /// and its dispatcher are released whatever the status.
    pub fn uninitialise(&self) -> i32 {
        let _registration = event_bridge::registration();
        let status = self.sdk.uninitialise();
        debug!("uninitialise -> {}", status);
        event_bridge::uninstall();
        status
    }

    pub fn set_keycode_mode(&self, mode: KeycodeType) -> Result<(), AnalogError> {
        check_ok("set_keycode_mode", self.sdk.set_keycode_mode(mode as i32))?;
        debug!("Keycode mode set to {}", mode.as_str());
        Ok(())
    }

    // === Reads ===

    /// Analog value of `code` combined across all devices
    pub fn read_analog(&self, code: u16) -> Result<f32, AnalogError> {
        check_value("read_analog", self.sdk.read_analog(code))
    }

    /// Analog value of `code` on a single device
    pub fn read_analog_device(&self, code: u16, device_id: DeviceId) -> Result<f32, AnalogError> {
        check_value(
            "read_analog_device",
            self.sdk.read_analog_device(code, device_id),
        )
    }

    /// Fill the parallel buffers with every pressed key, returning the count
    ///
    /// The capacity passed to the library is the shorter of the two buffers.
    pub fn read_full_buffer(
        &self,
        codes: &mut [u16],
        analog: &mut [f32],
    ) -> Result<usize, AnalogError> {
        check_count("read_full_buffer", self.sdk.read_full_buffer(codes, analog))
    }

    pub fn read_full_buffer_device(
        &self,
        codes: &mut [u16],
        analog: &mut [f32],
        device_id: DeviceId,
    ) -> Result<usize, AnalogError> {
        check_count(
            "read_full_buffer_device",
            self.sdk.read_full_buffer_device(codes, analog, device_id),
        )
    }

    // === Devices ===

    /// Let the library fill `buffer` with descriptor pointers, returning the count
    pub fn get_connected_devices_info(
        &self,
        buffer: &mut DeviceInfoBuffer,
    ) -> Result<usize, AnalogError> {
        check_count(
            "get_connected_devices_info",
            self.sdk.get_connected_devices_info(&mut buffer.slots),
        )
    }

    /// Enumerate up to `capacity` devices as owned descriptors
    pub fn connected_devices(&self, capacity: usize) -> Result<Vec<DeviceInfo>, AnalogError> {
        let mut buffer = DeviceInfoBuffer::with_capacity(capacity);
        let count = self.get_connected_devices_info(&mut buffer)?;
        // SAFETY: decoded right after the call that filled the buffer.
        Ok(unsafe { buffer.decode(count) })
    }

    // === Device events ===

    /// Register `handler` for device connect/disconnect events
    ///
    /// The handler receives an owned snapshot of the descriptor and never
    /// runs on the native callback thread or inside this call: it runs on the
    /// current tokio runtime if there is one, otherwise on a dedicated
    /// thread. A new registration replaces the previous one.
    pub fn set_device_event_cb<F>(&self, handler: F) -> Result<(), AnalogError>
    where
        F: FnMut(DeviceEventType, DeviceInfo) + Send + 'static,
    {
        let _registration = event_bridge::registration();
        let previous = event_bridge::install(handler);
        let status = self
            .sdk
            .set_device_event_cb(event_bridge::device_event_trampoline);
        if let Err(e) = check_ok("set_device_event_cb", status) {
            event_bridge::restore(previous);
            return Err(e);
        }
        if previous.is_some() {
            info!("Device event handler replaced");
        } else {
            info!("Device event handler registered");
        }
        Ok(())
    }

    /// Register a handler that forwards device events into a channel
    pub fn device_events(&self) -> Result<mpsc::UnboundedReceiver<DeviceEvent>, AnalogError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.set_device_event_cb(move |event_type, device| {
            let _ = tx.send(DeviceEvent { event_type, device });
        })?;
        Ok(rx)
    }

    pub fn clear_device_event_cb(&self) -> Result<(), AnalogError> {
        let _registration = event_bridge::registration();
        check_ok("clear_device_event_cb", self.sdk.clear_device_event_cb())?;
        event_bridge::uninstall();
        info!("Device event handler cleared");
        Ok(())
    }
}

fn check_ok(call: &str, status: i32) -> Result<(), AnalogError> {
    if status == AnalogResult::Ok.code() {
        Ok(())
    } else {
        let err = AnalogError::status(status);
        warn!("{} failed: {}", call, err);
        Err(err)
    }
}

fn check_count(call: &str, status: i32) -> Result<usize, AnalogError> {
    match usize::try_from(status) {
        Ok(count) => Ok(count),
        Err(_) => {
            let err = AnalogError::status(status);
            debug!("{} failed: {}", call, err);
            Err(err)
        }
    }
}

fn check_value(call: &str, value: f32) -> Result<f32, AnalogError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        let err = AnalogError::out_of_range(value);
        debug!("{} failed: {}", call, err);
        Err(err)
    }
}
