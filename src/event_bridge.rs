//! Bridge from the native device-event callback to application handlers
//!
//! The native library calls back on its own thread, passing a descriptor it
//! only guarantees for the duration of the call, and offers no user-data
//! pointer. The trampoline registered with it therefore copies the descriptor
//! into an owned `DeviceInfo`, pushes it into the process-wide sink and
//! returns. A dispatcher drains the sink and runs the handler: as a task on
//! the current tokio runtime when there is one, otherwise on a dedicated
//! thread.

use std::ffi::c_int;
use std::panic::{self, AssertUnwindSafe};

use parking_lot::{Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};
use wooting_analog_ffi::{DeviceEventType, DeviceInfo, DeviceInfoFfi};

/// A device event delivered to the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEvent {
    pub event_type: DeviceEventType,
    pub device: DeviceInfo,
}

pub(crate) type EventSink = mpsc::UnboundedSender<DeviceEvent>;

// The native library keeps a single callback slot, so one sink suffices.
static SINK: Mutex<Option<EventSink>> = parking_lot::const_mutex(None);

// Held across swapping the sink and the native call that goes with it, so
// concurrent registrations cannot restore or drop each other's sink.
static REGISTRATION: Mutex<()> = parking_lot::const_mutex(());

/// Serialize a sink change with its native registration call
pub(crate) fn registration() -> MutexGuard<'static, ()> {
    REGISTRATION.lock()
}

/// Registered with the native library as the device-event callback
pub(crate) extern "C" fn device_event_trampoline(event_type: c_int, device: *mut DeviceInfoFfi) {
    if panic::catch_unwind(|| forward(event_type, device)).is_err() {
        error!("Panic while forwarding device event");
    }
}

fn forward(raw_type: c_int, device: *mut DeviceInfoFfi) {
    let Some(event_type) = DeviceEventType::from_raw(raw_type) else {
        warn!("Ignoring device event with unknown type {}", raw_type);
        return;
    };
    // SAFETY: the native library keeps `device` valid for the duration of
    // the callback, which outlives this copy.
    let Some(device) = (unsafe { DeviceInfo::from_raw(device) }) else {
        warn!("Ignoring {} event without a device record", event_type.as_str());
        return;
    };

    match SINK.lock().as_ref() {
        Some(sink) => {
            if sink.send(DeviceEvent { event_type, device }).is_err() {
                warn!(
                    "Device event dispatcher has stopped, dropping {} event",
                    event_type.as_str()
                );
            }
        }
        None => debug!("Device event with no handler installed"),
    }
}

/// Start a dispatcher for `handler` and make it the current sink
///
/// Returns the sink it replaced so a failed native registration can put it
/// back with `restore`. Callers hold `registration()` until then.
pub(crate) fn install<F>(handler: F) -> Option<EventSink>
where
    F: FnMut(DeviceEventType, DeviceInfo) + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    spawn_dispatcher(rx, handler);
    SINK.lock().replace(tx)
}

/// Put back a sink returned by `install`; dropping the replaced one stops
/// its dispatcher
pub(crate) fn restore(previous: Option<EventSink>) {
    *SINK.lock() = previous;
}

/// Drop the current sink, stopping its dispatcher once the queue drains
pub(crate) fn uninstall() {
    SINK.lock().take();
}

/// Run the handler for one event; a panic is logged and the dispatcher keeps going
fn dispatch<F>(handler: &mut F, event: DeviceEvent)
where
    F: FnMut(DeviceEventType, DeviceInfo),
{
    let event_type = event.event_type;
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        handler(event.event_type, event.device)
    }));
    if result.is_err() {
        error!("Device event handler panicked on {} event", event_type.as_str());
    }
}

fn spawn_dispatcher<F>(mut rx: mpsc::UnboundedReceiver<DeviceEvent>, mut handler: F)
where
    F: FnMut(DeviceEventType, DeviceInfo) + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                while let Some(event) = rx.recv().await {
                    dispatch(&mut handler, event);
                }
                debug!("Device event dispatcher stopped");
            });
        }
        Err(_) => {
            let spawned = std::thread::Builder::new()
                .name("analog-device-events".into())
                .spawn(move || {
                    while let Some(event) = rx.blocking_recv() {
                        dispatch(&mut handler, event);
                    }
                    debug!("Device event dispatcher stopped");
                });
            if let Err(e) = spawned {
                error!("Failed to spawn device event dispatcher: {}", e);
            }
        }
    }
}
