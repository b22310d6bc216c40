//! Device event handler.

use super::{setup_interrupt_handler, Session};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use wooting_analog::MockSdk;

const HOTPLUG_PERIOD: Duration = Duration::from_secs(2);

/// Print device connect/disconnect events until interrupted
pub async fn events(session: &Session) -> Result<()> {
    let running = setup_interrupt_handler();
    println!("Waiting for device events (Ctrl-C to stop)...");
    run_events(session, &running).await?;
    Ok(())
}

/// Event loop; returns how many events were printed
async fn run_events(session: &Session, running: &Arc<AtomicBool>) -> Result<usize> {
    let mut rx = session.analog.device_events()?;

    // With --mock, plug a second keyboard in and out from a separate thread,
    // standing in for the native library's own event thread
    let simulator = session
        .mock
        .as_ref()
        .map(|mock| spawn_hotplug_simulator(Arc::clone(mock), Arc::clone(running)));

    let mut printed = 0;
    while running.load(Ordering::SeqCst) {
        match tokio::time::timeout(Duration::from_millis(200), rx.recv()).await {
            Ok(Some(event)) => {
                println!("{:<12} {}", event.event_type.as_str(), event.device);
                printed += 1;
            }
            Ok(None) => break,
            Err(_) => {}
        }
    }

    session.analog.clear_device_event_cb()?;
    if let Some(handle) = simulator {
        handle.join().ok();
    }
    Ok(printed)
}

fn spawn_hotplug_simulator(
    mock: Arc<MockSdk>,
    running: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        info!("Simulating hot-plug every {:?}", HOTPLUG_PERIOD);
        while sleep_while_running(&running, HOTPLUG_PERIOD) {
            let id = mock.connect_device(0x31E3, 0x1300, "Wooting", "Wooting 60HE (simulated)");
            sleep_while_running(&running, HOTPLUG_PERIOD);
            mock.disconnect_device(id);
        }
    })
}

/// Sleep in short steps; false once `running` is cleared
fn sleep_while_running(running: &AtomicBool, duration: Duration) -> bool {
    let step = Duration::from_millis(50);
    let mut slept = Duration::ZERO;
    while slept < duration {
        if !running.load(Ordering::SeqCst) {
            return false;
        }
        std::thread::sleep(step);
        slept += step;
    }
    running.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{open_session, CALLBACK_SLOT};
    use wooting_analog::AnalogConfig;

    #[test]
    fn test_sleep_while_running_stops_early() {
        let running = AtomicBool::new(false);
        assert!(!sleep_while_running(&running, Duration::from_secs(60)));

        let running = AtomicBool::new(true);
        assert!(sleep_while_running(&running, Duration::from_millis(60)));
    }

    #[tokio::test]
    async fn test_events_prints_hotplug() {
        let _slot = CALLBACK_SLOT.lock();
        let session = open_session(&AnalogConfig::default(), true).unwrap();
        let mock = Arc::clone(session.mock.as_ref().unwrap());
        let running = Arc::new(AtomicBool::new(true));

        let driver = {
            let running = Arc::clone(&running);
            let mock = Arc::clone(&mock);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(100));
                let id = mock.connect_device(0x31E3, 0x1220, "Wooting", "Wooting Two HE");
                mock.disconnect_device(id);
                std::thread::sleep(Duration::from_millis(300));
                running.store(false, Ordering::SeqCst);
            })
        };

        let printed = run_events(&session, &running).await.unwrap();
        driver.join().unwrap();
        assert_eq!(printed, 2);
        // Registration is cleared on the way out
        assert!(!mock.has_callback());
    }
}
