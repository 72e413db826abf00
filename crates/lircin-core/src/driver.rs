// Lircin Remote Driver
// Owns the worker thread running receive -> decode -> dispatch

use std::io;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use crate::decode::KeyDecoder;
use crate::dispatch::{DispatchTuning, Dispatcher, InputSink};
use crate::transport::{
    LircSocket, ReadOutcome, ReconnectOutcome, ShutdownHandle, ShutdownPipe, TransportError,
    LIRCD_SOCKET, LIRCD_SOCKET_LEGACY,
};

/// Errors that can occur while starting the driver.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Startup configuration for a driver instance.
#[derive(Debug, Clone, Default)]
pub struct DriverConfig {
    /// Primary socket path; defaults to the well-known lircd path
    pub socket_path: Option<PathBuf>,
    /// Fallback socket path; defaults to the legacy lircd path
    pub legacy_socket_path: Option<PathBuf>,
    pub tuning: DispatchTuning,
}

/// A running remote-control input driver.
///
/// One dedicated worker thread per instance runs the whole
/// receive -> decode -> dispatch loop; decoder and dispatcher state is
/// thread-local to it. Dropping the driver signals shutdown and joins the
/// worker, so events stop before the sink's owner goes away.
#[derive(Debug)]
pub struct RemoteDriver {
    worker: Option<JoinHandle<()>>,
    shutdown: ShutdownHandle,
}

impl RemoteDriver {
    /// Connect to lircd and start the worker thread.
    ///
    /// A connection failure here is fatal and surfaces to the caller. Once
    /// the worker is running, transport failures are absorbed and retried
    /// forever.
    pub fn spawn(
        config: DriverConfig,
        sink: Box<dyn InputSink + Send>,
    ) -> Result<Self, DriverError> {
        let primary = config
            .socket_path
            .unwrap_or_else(|| PathBuf::from(LIRCD_SOCKET));
        let legacy = config
            .legacy_socket_path
            .unwrap_or_else(|| PathBuf::from(LIRCD_SOCKET_LEGACY));

        let transport = LircSocket::connect_to(primary, legacy)?;
        let (pipe, handle) = ShutdownPipe::new().map_err(TransportError::Io)?;

        let tuning = config.tuning;
        let worker = thread::Builder::new()
            .name("lirc-input".into())
            .spawn(move || run_loop(transport, pipe, tuning, sink))
            .map_err(DriverError::Spawn)?;

        Ok(Self {
            worker: Some(worker),
            shutdown: handle,
        })
    }

    /// A handle other threads can use to request shutdown.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Signal the worker and wait for it to exit.
    pub fn stop(&mut self) {
        self.shutdown.signal();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for RemoteDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    mut transport: LircSocket,
    shutdown: ShutdownPipe,
    tuning: DispatchTuning,
    mut sink: Box<dyn InputSink + Send>,
) {
    let mut decoder = KeyDecoder::new();
    let mut dispatcher = Dispatcher::new(tuning);
    info!("lirc input worker running");

    loop {
        match transport.read_frame(dispatcher.next_timeout(), &shutdown) {
            // Exit without a final release event
            ReadOutcome::Shutdown => break,
            ReadOutcome::Timeout => dispatcher.handle_timeout(sink.as_mut()),
            ReadOutcome::Frame(line) => {
                let key = decoder.decode(&line, dispatcher.repeats_mut());
                debug!("frame {:?} decoded as {}", line, key.symbol);
                dispatcher.handle_key(&key, sink.as_mut());
            }
            ReadOutcome::Disconnected => {
                warn!("lost connection to lircd, retrying");
                if transport.reconnect(&shutdown) == ReconnectOutcome::Shutdown {
                    break;
                }
            }
        }
    }

    debug!("lirc input worker exiting");
}
