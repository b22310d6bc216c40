//! Loading the native wrapper and status decoding through the public API.

use std::sync::Arc;

use wooting_analog::{decode_status, AnalogError, AnalogInput, MockCall, MockSdk, UNKNOWN_ERROR};

#[test]
fn missing_library_is_a_load_error() {
    let Err(err) = AnalogInput::load_from("/nonexistent/libwooting_analog_wrapper.so") else {
        panic!("expected a load error");
    };
    assert!(matches!(err, AnalogError::Load(_)));
    assert_eq!(err.code(), None);
    assert!(err.to_string().contains("/nonexistent/libwooting_analog_wrapper.so"));
}

#[test]
fn every_status_decodes() {
    assert_eq!(decode_status(1), "Ok");
    assert_eq!(decode_status(-1990), "The Wooting Analog SDK could not be found on the system");
    assert_eq!(decode_status(12345), UNKNOWN_ERROR);
}

#[test]
fn initialise_failure_carries_decoded_message() {
    let mock = Arc::new(MockSdk::new());
    mock.force_status(MockCall::Initialise, -1995);
    let analog = AnalogInput::new(mock.clone());

    let err = analog.initialise().unwrap_err();
    assert_eq!(err.code(), Some(-1995));
    assert_eq!(err.message(), "No plugins were found");
    assert!(!analog.is_initialised());
}

#[test]
fn demo_keyboard_session() {
    let mock = Arc::new(MockSdk::with_demo_keyboard());
    let analog = AnalogInput::new(mock.clone());
    analog.initialise().unwrap();

    let devices = analog.connected_devices(4).unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].vendor_id, 0x31E3);

    let mut codes = [0u16; 8];
    let mut values = [0f32; 8];
    let count = analog.read_full_buffer(&mut codes, &mut values).unwrap();
    // Space rests at 0.0 and is left out
    assert_eq!(count, 3);
    assert_eq!(&codes[..3], &[0x04, 0x1A, 0xE1]);
    assert_eq!(values[2], 1.0);

    assert_eq!(analog.uninitialise(), 1);
    assert!(!analog.is_initialised());
}
