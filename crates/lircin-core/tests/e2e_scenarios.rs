// Lircin End-to-End Test Scenarios
//
// Drives the full driver stack against a fake lircd served over an
// in-process Unix socket: real transport, real worker thread, real timeouts.
//
// Run with: cargo test --test e2e_scenarios

use std::io::Write;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use lircin_core::{
    DispatchTuning, DriverConfig, InputSink, KeyAction, KeyEvent, KeySymbol, RemoteDriver,
};

// =========================================================================
// Test Helpers
// =========================================================================

/// Sink that captures dispatched events behind a shared lock.
#[derive(Clone, Default)]
struct CaptureSink {
    events: Arc<Mutex<Vec<KeyEvent>>>,
}

impl CaptureSink {
    fn snapshot(&self) -> Vec<KeyEvent> {
        self.events.lock().clone()
    }

    /// Wait until at least `count` events arrived, or panic after 3 seconds.
    fn wait_for(&self, count: usize) -> Vec<KeyEvent> {
        let deadline = Instant::now() + Duration::from_secs(3);
        loop {
            let events = self.snapshot();
            if events.len() >= count {
                return events;
            }
            if Instant::now() > deadline {
                panic!("expected {} events, got {:?}", count, events);
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}

impl InputSink for CaptureSink {
    fn dispatch(&mut self, event: KeyEvent) {
        self.events.lock().push(event);
    }
}

fn socket_path(tag: &str) -> PathBuf {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let path = std::env::temp_dir().join(format!(
        "lircin-e2e-{}-{}-{}",
        tag,
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    let _ = std::fs::remove_file(&path);
    path
}

/// Short timeouts so scenarios run quickly; proportions match the defaults.
fn fast_tuning() -> DispatchTuning {
    DispatchTuning {
        idle_timeout: Duration::from_millis(500),
        held_timeout: Duration::from_millis(120),
        low_battery_timeout: Duration::from_millis(200),
        repeat_debounce: 4,
    }
}

fn spawn_driver(path: &Path, sink: CaptureSink) -> RemoteDriver {
    let config = DriverConfig {
        socket_path: Some(path.to_path_buf()),
        legacy_socket_path: Some(path.to_path_buf()),
        tuning: fast_tuning(),
    };
    RemoteDriver::spawn(config, Box::new(sink)).expect("driver should connect to the fake lircd")
}

fn send_line(server: &mut UnixStream, line: &str) {
    server.write_all(line.as_bytes()).unwrap();
    server.write_all(b"\n").unwrap();
    server.flush().unwrap();
    // Keep frames in separate reads, the way lircd's paced writes arrive
    std::thread::sleep(Duration::from_millis(20));
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn scenario_press_repeats_then_timeout_release() {
    let path = socket_path("repeats");
    let listener = UnixListener::bind(&path).unwrap();
    let sink = CaptureSink::default();
    let mut driver = spawn_driver(&path, sink.clone());
    let (mut server, _) = listener.accept().unwrap();

    send_line(&mut server, "0000000000003a7f 00 KEY_VOLUMEUP rc.conf");
    send_line(&mut server, "0000000000003a7f 01 KEY_VOLUMEUP rc.conf");
    send_line(&mut server, "0000000000003a7f 02 KEY_VOLUMEUP rc.conf");

    // Silence past the held timeout synthesizes exactly one release
    let events = sink.wait_for(2);
    assert_eq!(
        events,
        vec![
            KeyEvent::press(KeySymbol::VOLUME_UP),
            KeyEvent::release(KeySymbol::VOLUME_UP),
        ]
    );

    // And the silence that follows produces nothing further
    std::thread::sleep(Duration::from_millis(300));
    assert_eq!(sink.snapshot().len(), 2);

    driver.stop();
    let _ = std::fs::remove_file(&path);
}

#[test]
fn scenario_second_key_before_timeout() {
    let path = socket_path("two-keys");
    let listener = UnixListener::bind(&path).unwrap();
    let sink = CaptureSink::default();
    let mut driver = spawn_driver(&path, sink.clone());
    let (mut server, _) = listener.accept().unwrap();

    send_line(&mut server, "00000000000000aa 00 KEY_OK rc.conf");
    send_line(&mut server, "00000000000000ab 00 KEY_MENU rc.conf");

    let events = sink.wait_for(3);
    assert_eq!(
        events[..3],
        [
            KeyEvent::press(KeySymbol::SELECT),
            KeyEvent::release(KeySymbol::SELECT),
            KeyEvent::press(KeySymbol::MENU),
        ]
    );

    driver.stop();
    let _ = std::fs::remove_file(&path);
}

#[test]
fn scenario_rstep_remote_single_logical_press() {
    let path = socket_path("rstep");
    let listener = UnixListener::bind(&path).unwrap();
    let sink = CaptureSink::default();
    let mut driver = spawn_driver(&path, sink.clone());
    let (mut server, _) = listener.accept().unwrap();

    // Initial press carries the repeat bit; the auto-repeat drops it and
    // lircd counts it as a fresh press (repeat field 0)
    send_line(&mut server, "00000000000001eb 00 KEY_CHANNELUP rc.conf");
    send_line(&mut server, "00000000000000eb 00 KEY_CHANNELUP rc.conf");
    send_line(&mut server, "00000000000000eb 01 KEY_CHANNELUP rc.conf");

    let events = sink.wait_for(2);
    assert_eq!(
        events,
        vec![
            KeyEvent::press(KeySymbol::CHANNEL_UP),
            KeyEvent::release(KeySymbol::CHANNEL_UP),
        ]
    );

    driver.stop();
    let _ = std::fs::remove_file(&path);
}

#[test]
fn scenario_garbage_frames_are_discarded() {
    let path = socket_path("garbage");
    let listener = UnixListener::bind(&path).unwrap();
    let sink = CaptureSink::default();
    let mut driver = spawn_driver(&path, sink.clone());
    let (mut server, _) = listener.accept().unwrap();

    send_line(&mut server, "this is not a frame");
    send_line(&mut server, "00000000000000aa 00");
    send_line(&mut server, "00000000000000aa 00 KEY_OK rc.conf");

    let events = sink.wait_for(1);
    assert_eq!(events[0], KeyEvent::press(KeySymbol::SELECT));

    driver.stop();
    let _ = std::fs::remove_file(&path);
}

#[test]
fn scenario_shutdown_under_continuous_input() {
    let path = socket_path("shutdown");
    let listener = UnixListener::bind(&path).unwrap();
    let sink = CaptureSink::default();
    let mut driver = spawn_driver(&path, sink.clone());
    let (mut server, _) = listener.accept().unwrap();

    // Hammer frames from another thread so the socket is never quiet
    let writer = std::thread::spawn(move || {
        for i in 0..400u32 {
            let line = format!("00000000000000{:02x} 00 KEY_OK rc.conf\n", i % 0x80);
            if server.write_all(line.as_bytes()).is_err() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    });

    sink.wait_for(1);
    let start = Instant::now();
    driver.stop();
    // Shutdown has priority over pending data: the worker exits promptly
    // instead of draining the stream first
    assert!(
        start.elapsed() < Duration::from_secs(1),
        "stop took {:?}",
        start.elapsed()
    );

    writer.join().unwrap();
    let _ = std::fs::remove_file(&path);
}

#[test]
fn scenario_reconnect_after_daemon_restart() {
    let path = socket_path("restart");
    let listener = UnixListener::bind(&path).unwrap();
    let sink = CaptureSink::default();
    let mut driver = spawn_driver(&path, sink.clone());
    let (mut server, _) = listener.accept().unwrap();

    send_line(&mut server, "00000000000000aa 00 KEY_OK rc.conf");
    sink.wait_for(1);

    // Restart the daemon: close the connection, rebind the socket
    drop(server);
    drop(listener);
    let _ = std::fs::remove_file(&path);
    let listener = UnixListener::bind(&path).unwrap();

    // The worker retries on a fixed 1s backoff; accept its new connection
    let (mut server, _) = listener.accept().unwrap();
    send_line(&mut server, "00000000000000ab 00 KEY_MENU rc.conf");

    let events = sink.wait_for(3);
    // The held key was released by timeout during the outage, then the
    // post-restart press came through
    assert_eq!(events[0], KeyEvent::press(KeySymbol::SELECT));
    assert_eq!(events[1], KeyEvent::release(KeySymbol::SELECT));
    assert_eq!(events[2], KeyEvent::press(KeySymbol::MENU));

    driver.stop();
    let _ = std::fs::remove_file(&path);
}

#[test]
fn scenario_events_alternate_press_release() {
    let path = socket_path("ordering");
    let listener = UnixListener::bind(&path).unwrap();
    let sink = CaptureSink::default();
    let mut driver = spawn_driver(&path, sink.clone());
    let (mut server, _) = listener.accept().unwrap();

    for name in ["KEY_1", "KEY_2", "KEY_3"] {
        send_line(&mut server, &format!("00000000000000aa 00 {} rc.conf", name));
    }

    let events = sink.wait_for(5);
    // Strict ordering: every release closes the press before it
    let mut held: Option<KeySymbol> = None;
    for event in &events {
        match event.action {
            KeyAction::Press => {
                assert_eq!(held, None, "press while {:?} still held", held);
                held = Some(event.symbol);
            }
            KeyAction::Release => {
                assert_eq!(held, Some(event.symbol));
                held = None;
            }
        }
    }

    driver.stop();
    let _ = std::fs::remove_file(&path);
}
