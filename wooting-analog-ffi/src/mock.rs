//! In-process stand-in for the native wrapper library
//!
//! `MockSdk` keeps a set of simulated devices with per-key analog values and
//! behaves like the wrapper at the ABI level: raw status codes, negative
//! sentinels cast to float, native-owned descriptor records and a single
//! device-event callback slot. Any call can be forced to return a status.

use std::collections::{BTreeMap, HashMap};
use std::ffi::{c_int, CString};

use parking_lot::Mutex;
use tracing::debug;

use crate::result::AnalogResult;
use crate::types::{DeviceEventType, DeviceId, DeviceInfoFfi, KeycodeType};
use crate::{AnalogSdk, DeviceEventCallback};

/// Native calls whose status can be forced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockCall {
    Initialise,
    Uninitialise,
    SetKeycodeMode,
    ReadAnalog,
    ReadFullBuffer,
    GetConnectedDevices,
    SetDeviceEventCb,
    ClearDeviceEventCb,
}

struct MockDevice {
    // Boxed so the address handed out to callers stays fixed
    record: Box<DeviceInfoFfi>,
    _manufacturer: CString,
    _name: CString,
    keys: BTreeMap<u16, f32>,
}

// The raw pointers in `record` only reference the CStrings owned by the same
// struct, and every access goes through the `MockSdk` mutex.
unsafe impl Send for MockDevice {}

impl MockDevice {
    fn new(id: u64, vendor_id: u16, product_id: u16, manufacturer: &str, name: &str) -> Self {
        let manufacturer = cstring(manufacturer);
        let name = cstring(name);
        let record = Box::new(DeviceInfoFfi {
            vendor_id,
            product_id,
            manufacturer_name: manufacturer.as_ptr(),
            device_name: name.as_ptr(),
            device_id: id,
        });
        Self {
            record,
            _manufacturer: manufacturer,
            _name: name,
            keys: BTreeMap::new(),
        }
    }

    fn id(&self) -> DeviceId {
        DeviceId(self.record.device_id)
    }

    fn record_ptr(&mut self) -> *mut DeviceInfoFfi {
        &mut *self.record
    }
}

fn cstring(s: &str) -> CString {
    CString::new(s.replace('\0', "")).unwrap_or_default()
}

#[derive(Default)]
struct MockState {
    initialised: bool,
    keycode_mode: KeycodeType,
    devices: Vec<MockDevice>,
    next_device_id: u64,
    callback: Option<DeviceEventCallback>,
    registrations: usize,
    forced: HashMap<MockCall, c_int>,
    forced_value: Option<f32>,
}

impl MockState {
    fn device_mut(&mut self, id: DeviceId) -> Option<&mut MockDevice> {
        self.devices.iter_mut().find(|d| d.id() == id)
    }

    /// Status a read call should fail with, if any
    fn read_guard(&self) -> Option<c_int> {
        if !self.initialised {
            Some(AnalogResult::UnInitialized.code())
        } else if self.devices.is_empty() {
            Some(AnalogResult::NoDevices.code())
        } else {
            None
        }
    }

    /// Highest value per key across the selected devices, sorted by code
    fn combined_keys(&self, device: Option<DeviceId>) -> Vec<(u16, f32)> {
        let mut combined: BTreeMap<u16, f32> = BTreeMap::new();
        for dev in self
            .devices
            .iter()
            .filter(|d| device.map_or(true, |id| d.id() == id))
        {
            for (&code, &value) in &dev.keys {
                let entry = combined.entry(code).or_insert(0.0);
                *entry = entry.max(value);
            }
        }
        combined.into_iter().filter(|(_, v)| *v > 0.0).collect()
    }
}

/// Simulated analog wrapper library
pub struct MockSdk {
    state: Mutex<MockState>,
}

impl Default for MockSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSdk {
    /// Create a mock with no devices attached
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                next_device_id: 1,
                ..MockState::default()
            }),
        }
    }

    /// Create a mock with one keyboard and a few keys held down
    pub fn with_demo_keyboard() -> Self {
        let sdk = Self::new();
        let id = sdk.add_device(0x31E3, 0x1220, "Wooting", "Wooting Two HE (simulated)");
        // HID codes: W, A, ShiftLeft, Space
        sdk.set_key(id, 0x1A, 0.62);
        sdk.set_key(id, 0x04, 0.18);
        sdk.set_key(id, 0xE1, 1.0);
        sdk.set_key(id, 0x2C, 0.0);
        sdk
    }

    /// Attach a device without firing the event callback
    pub fn add_device(
        &self,
        vendor_id: u16,
        product_id: u16,
        manufacturer: &str,
        name: &str,
    ) -> DeviceId {
        let mut state = self.state.lock();
        let id = state.next_device_id;
        state.next_device_id += 1;
        state
            .devices
            .push(MockDevice::new(id, vendor_id, product_id, manufacturer, name));
        DeviceId(id)
    }

    /// Attach a device and notify the registered callback on the calling thread
    pub fn connect_device(
        &self,
        vendor_id: u16,
        product_id: u16,
        manufacturer: &str,
        name: &str,
    ) -> DeviceId {
        let id = self.add_device(vendor_id, product_id, manufacturer, name);
        let (callback, record) = {
            let mut state = self.state.lock();
            let callback = state.callback;
            let record = state.device_mut(id).map(MockDevice::record_ptr);
            (callback, record)
        };
        if let (Some(callback), Some(record)) = (callback, record) {
            callback(DeviceEventType::Connected as c_int, record);
        }
        id
    }

    /// Detach a device, notifying the callback before its record is freed
    ///
    /// Returns false if no such device was attached.
    pub fn disconnect_device(&self, id: DeviceId) -> bool {
        let (callback, mut removed) = {
            let mut state = self.state.lock();
            let Some(pos) = state.devices.iter().position(|d| d.id() == id) else {
                return false;
            };
            (state.callback, state.devices.remove(pos))
        };
        if let Some(callback) = callback {
            callback(DeviceEventType::Disconnected as c_int, removed.record_ptr());
        }
        true
    }

    /// Set the analog value of a key on a device (not clamped)
    pub fn set_key(&self, device: DeviceId, code: u16, value: f32) {
        if let Some(dev) = self.state.lock().device_mut(device) {
            dev.keys.insert(code, value);
        }
    }

    /// Force a call to return `status` until `clear_forced` is called
    pub fn force_status(&self, call: MockCall, status: c_int) {
        self.state.lock().forced.insert(call, status);
    }

    /// Force single-value reads to return `value` regardless of state
    pub fn force_value(&self, value: f32) {
        self.state.lock().forced_value = Some(value);
    }

    pub fn clear_forced(&self) {
        let mut state = self.state.lock();
        state.forced.clear();
        state.forced_value = None;
    }

    /// Whether a device-event callback is currently registered
    pub fn has_callback(&self) -> bool {
        self.state.lock().callback.is_some()
    }

    /// Number of successful callback registrations so far
    pub fn registration_count(&self) -> usize {
        self.state.lock().registrations
    }

    pub fn keycode_mode(&self) -> KeycodeType {
        self.state.lock().keycode_mode
    }

    fn forced(&self, call: MockCall) -> Option<c_int> {
        self.state.lock().forced.get(&call).copied()
    }
}

impl AnalogSdk for MockSdk {
    fn initialise(&self) -> c_int {
        if let Some(status) = self.forced(MockCall::Initialise) {
            return status;
        }
        self.state.lock().initialised = true;
        AnalogResult::Ok.code()
    }

    fn is_initialised(&self) -> bool {
        self.state.lock().initialised
    }

    fn uninitialise(&self) -> c_int {
        if let Some(status) = self.forced(MockCall::Uninitialise) {
            return status;
        }
        let mut state = self.state.lock();
        state.initialised = false;
        state.callback = None;
        AnalogResult::Ok.code()
    }

    fn set_keycode_mode(&self, mode: c_int) -> c_int {
        if let Some(status) = self.forced(MockCall::SetKeycodeMode) {
            return status;
        }
        let mut state = self.state.lock();
        if !state.initialised {
            return AnalogResult::UnInitialized.code();
        }
        match KeycodeType::from_raw(mode) {
            Some(mode) => {
                state.keycode_mode = mode;
                AnalogResult::Ok.code()
            }
            None => AnalogResult::InvalidArgument.code(),
        }
    }

    fn read_analog(&self, code: u16) -> f32 {
        if let Some(status) = self.forced(MockCall::ReadAnalog) {
            return status as f32;
        }
        let state = self.state.lock();
        if let Some(value) = state.forced_value {
            return value;
        }
        if let Some(status) = state.read_guard() {
            return status as f32;
        }
        state
            .devices
            .iter()
            .filter_map(|d| d.keys.get(&code).copied())
            .fold(0.0, f32::max)
    }

    fn read_analog_device(&self, code: u16, device_id: DeviceId) -> f32 {
        if let Some(status) = self.forced(MockCall::ReadAnalog) {
            return status as f32;
        }
        let mut state = self.state.lock();
        if let Some(value) = state.forced_value {
            return value;
        }
        if let Some(status) = state.read_guard() {
            return status as f32;
        }
        match state.device_mut(device_id) {
            Some(dev) => dev.keys.get(&code).copied().unwrap_or(0.0),
            None => AnalogResult::NoDevices.code() as f32,
        }
    }

    fn read_full_buffer(&self, codes: &mut [u16], analog: &mut [f32]) -> c_int {
        if let Some(status) = self.forced(MockCall::ReadFullBuffer) {
            return status;
        }
        let state = self.state.lock();
        if let Some(status) = state.read_guard() {
            return status;
        }
        fill_buffers(&state.combined_keys(None), codes, analog)
    }

    fn read_full_buffer_device(
        &self,
        codes: &mut [u16],
        analog: &mut [f32],
        device_id: DeviceId,
    ) -> c_int {
        if let Some(status) = self.forced(MockCall::ReadFullBuffer) {
            return status;
        }
        let state = self.state.lock();
        if let Some(status) = state.read_guard() {
            return status;
        }
        if !state.devices.iter().any(|d| d.id() == device_id) {
            return AnalogResult::NoDevices.code();
        }
        fill_buffers(&state.combined_keys(Some(device_id)), codes, analog)
    }

    fn get_connected_devices_info(&self, buffer: &mut [*mut DeviceInfoFfi]) -> c_int {
        if let Some(status) = self.forced(MockCall::GetConnectedDevices) {
            return status;
        }
        let mut state = self.state.lock();
        if !state.initialised {
            return AnalogResult::UnInitialized.code();
        }
        let mut written = 0;
        for (slot, dev) in buffer.iter_mut().zip(state.devices.iter_mut()) {
            *slot = dev.record_ptr();
            written += 1;
        }
        written
    }

    fn set_device_event_cb(&self, callback: DeviceEventCallback) -> c_int {
        if let Some(status) = self.forced(MockCall::SetDeviceEventCb) {
            return status;
        }
        let mut state = self.state.lock();
        if !state.initialised {
            return AnalogResult::UnInitialized.code();
        }
        state.callback = Some(callback);
        state.registrations += 1;
        debug!("Mock callback registered ({} total)", state.registrations);
        AnalogResult::Ok.code()
    }

    fn clear_device_event_cb(&self) -> c_int {
        if let Some(status) = self.forced(MockCall::ClearDeviceEventCb) {
            return status;
        }
        let mut state = self.state.lock();
        if !state.initialised {
            return AnalogResult::UnInitialized.code();
        }
        state.callback = None;
        AnalogResult::Ok.code()
    }
}

fn fill_buffers(keys: &[(u16, f32)], codes: &mut [u16], analog: &mut [f32]) -> c_int {
    let mut written = 0;
    for ((code_slot, value_slot), (code, value)) in
        codes.iter_mut().zip(analog.iter_mut()).zip(keys)
    {
        *code_slot = *code;
        *value_slot = *value;
        written += 1;
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceInfo;
    use std::ptr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn initialised_demo() -> MockSdk {
        let sdk = MockSdk::with_demo_keyboard();
        assert_eq!(sdk.initialise(), 1);
        sdk
    }

    #[test]
    fn test_reads_require_initialise() {
        let sdk = MockSdk::with_demo_keyboard();
        assert_eq!(sdk.read_analog(0x1A), -2000.0);
        let mut codes = [0u16; 4];
        let mut values = [0f32; 4];
        assert_eq!(sdk.read_full_buffer(&mut codes, &mut values), -2000);
    }

    #[test]
    fn test_no_devices() {
        let sdk = MockSdk::new();
        sdk.initialise();
        assert_eq!(sdk.read_analog(0x1A), -1999.0);
    }

    #[test]
    fn test_read_values() {
        let sdk = initialised_demo();
        assert_eq!(sdk.read_analog(0x1A), 0.62);
        assert_eq!(sdk.read_analog(0x05), 0.0);
        assert_eq!(sdk.read_analog_device(0x04, DeviceId(1)), 0.18);
        assert_eq!(sdk.read_analog_device(0x04, DeviceId(99)), -1999.0);
    }

    #[test]
    fn test_full_buffer_truncates_to_capacity() {
        let sdk = initialised_demo();
        let mut codes = [0u16; 2];
        let mut values = [0f32; 2];
        assert_eq!(sdk.read_full_buffer(&mut codes, &mut values), 2);
        // Sorted by code, zero-valued Space omitted
        assert_eq!(codes, [0x04, 0x1A]);
        assert_eq!(values, [0.18, 0.62]);

        let mut codes = [0u16; 8];
        let mut values = [0f32; 8];
        assert_eq!(sdk.read_full_buffer(&mut codes, &mut values), 3);
    }

    #[test]
    fn test_combines_devices_by_max() {
        let sdk = initialised_demo();
        let second = sdk.add_device(0x31E3, 0x1300, "Wooting", "Wooting 60HE");
        sdk.set_key(second, 0x1A, 0.9);
        assert_eq!(sdk.read_analog(0x1A), 0.9);
        assert_eq!(sdk.read_analog_device(0x1A, DeviceId(1)), 0.62);
    }

    #[test]
    fn test_enumerate_devices() {
        let sdk = initialised_demo();
        sdk.add_device(0x03EB, 0xFF02, "Wooting", "Wooting One");
        let mut buffer = [ptr::null_mut(); 1];
        assert_eq!(sdk.get_connected_devices_info(&mut buffer), 1);
        let info = unsafe { DeviceInfo::from_raw(buffer[0]) }.unwrap();
        assert_eq!(info.device_id, DeviceId(1));
        assert_eq!(info.manufacturer_name, "Wooting");
    }

    #[test]
    fn test_keycode_mode() {
        let sdk = initialised_demo();
        assert_eq!(sdk.set_keycode_mode(2), 1);
        assert_eq!(sdk.keycode_mode(), KeycodeType::VirtualKey);
        assert_eq!(sdk.set_keycode_mode(7), -1996);
    }

    #[test]
    fn test_forced_status() {
        let sdk = initialised_demo();
        sdk.force_status(MockCall::Uninitialise, -1997);
        assert_eq!(sdk.uninitialise(), -1997);
        assert!(sdk.is_initialised());
        sdk.clear_forced();
        assert_eq!(sdk.uninitialise(), 1);
        assert!(!sdk.is_initialised());
    }

    static EVENTS: AtomicUsize = AtomicUsize::new(0);

    extern "C" fn count_events(_event: c_int, info: *mut DeviceInfoFfi) {
        assert!(!info.is_null());
        EVENTS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_callback_fires_on_hotplug() {
        let sdk = initialised_demo();
        assert_eq!(sdk.set_device_event_cb(count_events), 1);
        assert!(sdk.has_callback());
        let id = sdk.connect_device(0x31E3, 0x1220, "Wooting", "Wooting Two HE");
        assert!(sdk.disconnect_device(id));
        assert!(!sdk.disconnect_device(id));
        assert_eq!(EVENTS.load(Ordering::SeqCst), 2);

        assert_eq!(sdk.clear_device_event_cb(), 1);
        assert!(!sdk.has_callback());
        sdk.connect_device(0x31E3, 0x1220, "Wooting", "Wooting Two HE");
        assert_eq!(EVENTS.load(Ordering::SeqCst), 2);
    }
}
