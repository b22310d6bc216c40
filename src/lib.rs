//! Binding to the Wooting analog wrapper library
//!
//! `AnalogInput` wraps the library's entry points and turns their native
//! result codes into `AnalogError`s. Device hot-plug notifications are
//! copied off the native callback thread and delivered to the application
//! asynchronously.
//!
//! ```no_run
//! use wooting_analog::{AnalogInput, HidCode};
//!
//! let analog = AnalogInput::load()?;
//! analog.initialise()?;
//! let depth = analog.read_analog(HidCode::W.code())?;
//! println!("W pressed {:.0}%", depth * 100.0);
//! analog.uninitialise();
//! # Ok::<(), wooting_analog::AnalogError>(())
//! ```

pub mod binding;
pub mod config;
pub mod error;
pub mod event_bridge;

pub use binding::{AnalogInput, DeviceInfoBuffer};
pub use config::AnalogConfig;
pub use error::AnalogError;
pub use event_bridge::DeviceEvent;

// Re-export the ABI types consumers need
pub use wooting_analog_ffi::{
    decode_status, key_code_from_name, key_name, library_file_name, AnalogResult, AnalogSdk,
    DeviceEventType, DeviceId, DeviceInfo, HidCode, KeycodeType, MockCall, MockSdk, NativeSdk,
    ScanCode1, SharedSdk, VirtualKey, UNKNOWN_ERROR,
};
