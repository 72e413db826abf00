// Lircin Socket Transport
// Connects to the lircd broadcast socket and reads one frame at a time

use std::io::{self, ErrorKind, Read};
use std::os::fd::AsRawFd;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};

use super::shutdown::ShutdownPipe;

/// Well-known lircd socket path.
pub const LIRCD_SOCKET: &str = "/var/run/lirc/lircd";
/// Socket path used by lircd installations that predate /var/run.
pub const LIRCD_SOCKET_LEGACY: &str = "/dev/lircd";

/// Upper bound on one broadcast frame, terminator included.
pub const MAX_FRAME_LEN: usize = 128;

/// Errors from the transport layer.
///
/// Only `Connect` ever escapes the driver: it is fatal at startup. Everything
/// mid-stream is absorbed by the worker loop and retried.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("cannot connect to lircd at {primary} (or legacy {legacy}): {source}")]
    Connect {
        primary: PathBuf,
        legacy: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// What a bounded wait for the next frame produced.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// One frame of text, terminator stripped
    Frame(String),
    /// The timeout elapsed with no data
    Timeout,
    /// The shutdown side-channel fired
    Shutdown,
    /// The connection is gone; the caller should reconnect
    Disconnected,
}

/// Result of one reconnect attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectOutcome {
    Reconnected,
    StillDown,
    Shutdown,
}

/// Stream connection to the lircd broadcast socket.
#[derive(Debug)]
pub struct LircSocket {
    stream: Option<UnixStream>,
    primary: PathBuf,
    legacy: PathBuf,
}

impl LircSocket {
    /// Delay between reconnect attempts. Fixed, with unbounded retries.
    pub const RECONNECT_BACKOFF_MS: i32 = 1000;

    /// Connect to lircd at the well-known paths.
    pub fn connect() -> Result<Self, TransportError> {
        Self::connect_to(LIRCD_SOCKET, LIRCD_SOCKET_LEGACY)
    }

    /// Connect, trying `primary` first and falling back to `legacy`.
    pub fn connect_to(
        primary: impl Into<PathBuf>,
        legacy: impl Into<PathBuf>,
    ) -> Result<Self, TransportError> {
        let primary = primary.into();
        let legacy = legacy.into();
        let stream = Self::open(&primary, &legacy).map_err(|source| TransportError::Connect {
            primary: primary.clone(),
            legacy: legacy.clone(),
            source,
        })?;
        debug!("connected to lircd");
        Ok(Self {
            stream: Some(stream),
            primary,
            legacy,
        })
    }

    fn open(primary: &Path, legacy: &Path) -> io::Result<UnixStream> {
        match UnixStream::connect(primary) {
            Ok(stream) => Ok(stream),
            Err(primary_err) => {
                debug!(
                    "lircd socket {} unavailable ({}), trying {}",
                    primary.display(),
                    primary_err,
                    legacy.display()
                );
                // Report the primary path's error if both fail
                UnixStream::connect(legacy).map_err(|_| primary_err)
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Wait up to `timeout` for the next frame.
    ///
    /// The wait is multiplexed over the socket and the shutdown pipe. A
    /// shutdown request pending at the same time as data wins: the worker
    /// must exit promptly even under continuous input.
    pub fn read_frame(&mut self, timeout: Duration, shutdown: &ShutdownPipe) -> ReadOutcome {
        let Some(stream) = self.stream.as_mut() else {
            return ReadOutcome::Disconnected;
        };

        let mut fds = [
            libc::pollfd {
                fd: shutdown.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            },
            libc::pollfd {
                fd: stream.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            },
        ];

        let timeout_ms = timeout.as_millis().min(i32::MAX as u128) as i32;
        let rc = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, timeout_ms) };

        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == ErrorKind::Interrupted {
                return ReadOutcome::Timeout;
            }
            warn!("poll on lircd socket failed: {}", err);
            self.stream = None;
            return ReadOutcome::Disconnected;
        }
        if rc == 0 {
            return ReadOutcome::Timeout;
        }

        // Shutdown wins over pending data
        if fds[0].revents & libc::POLLIN != 0 {
            return ReadOutcome::Shutdown;
        }
        if fds[1].revents == 0 {
            return ReadOutcome::Timeout;
        }

        let mut buf = [0u8; MAX_FRAME_LEN];
        match stream.read(&mut buf) {
            Ok(n) if n >= 1 => {
                // One read, one frame: lircd writes each broadcast line in a
                // single short write, so take the text up to the terminator.
                let end = buf[..n].iter().position(|&b| b == b'\n').unwrap_or(n);
                ReadOutcome::Frame(String::from_utf8_lossy(&buf[..end]).into_owned())
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => ReadOutcome::Timeout,
            Ok(_) | Err(_) => {
                self.stream = None;
                ReadOutcome::Disconnected
            }
        }
    }

    /// One reconnect attempt after connection loss.
    ///
    /// Sleeps the fixed backoff first, riding the shutdown pipe so a stop
    /// request still interrupts an outage, then retries both paths. The
    /// caller keeps looping whatever the outcome; a prolonged lircd outage
    /// is never fatal to the worker.
    pub fn reconnect(&mut self, shutdown: &ShutdownPipe) -> ReconnectOutcome {
        self.stream = None;
        if shutdown.wait(Self::RECONNECT_BACKOFF_MS) {
            return ReconnectOutcome::Shutdown;
        }
        match Self::open(&self.primary, &self.legacy) {
            Ok(stream) => {
                info!("reconnected to lircd");
                self.stream = Some(stream);
                ReconnectOutcome::Reconnected
            }
            Err(e) => {
                warn!("lircd still unreachable: {}", e);
                ReconnectOutcome::StillDown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::net::UnixListener;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn scratch_path(tag: &str) -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let path = std::env::temp_dir().join(format!(
            "lircin-sock-{}-{}-{}",
            tag,
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn test_connect_fails_when_no_daemon() {
        let missing = scratch_path("none");
        let err = LircSocket::connect_to(&missing, &missing).unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
    }

    #[test]
    fn test_connect_falls_back_to_legacy_path() {
        let missing = scratch_path("missing");
        let legacy = scratch_path("legacy");
        let _listener = UnixListener::bind(&legacy).unwrap();

        let socket = LircSocket::connect_to(&missing, &legacy).unwrap();
        assert!(socket.is_connected());
        let _ = std::fs::remove_file(&legacy);
    }

    #[test]
    fn test_read_frame_times_out_without_data() {
        let path = scratch_path("idle");
        let listener = UnixListener::bind(&path).unwrap();
        let mut socket = LircSocket::connect_to(&path, &path).unwrap();
        let _server = listener.accept().unwrap();

        let (pipe, _handle) = ShutdownPipe::new().unwrap();
        let outcome = socket.read_frame(Duration::from_millis(30), &pipe);
        assert_eq!(outcome, ReadOutcome::Timeout);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_read_frame_returns_one_line() {
        let path = scratch_path("line");
        let listener = UnixListener::bind(&path).unwrap();
        let mut socket = LircSocket::connect_to(&path, &path).unwrap();
        let (mut server, _) = listener.accept().unwrap();

        server
            .write_all(b"0000000000003a7f 00 KEY_VOLUMEUP some_remote.conf\n")
            .unwrap();

        let (pipe, _handle) = ShutdownPipe::new().unwrap();
        let outcome = socket.read_frame(Duration::from_secs(2), &pipe);
        assert_eq!(
            outcome,
            ReadOutcome::Frame("0000000000003a7f 00 KEY_VOLUMEUP some_remote.conf".to_string())
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_shutdown_wins_over_pending_data() {
        let path = scratch_path("priority");
        let listener = UnixListener::bind(&path).unwrap();
        let mut socket = LircSocket::connect_to(&path, &path).unwrap();
        let (mut server, _) = listener.accept().unwrap();

        server
            .write_all(b"0000000000003a7f 00 KEY_VOLUMEUP some_remote.conf\n")
            .unwrap();
        // Let the data land in the socket buffer so both conditions are
        // satisfiable at poll time
        std::thread::sleep(Duration::from_millis(50));

        let (pipe, handle) = ShutdownPipe::new().unwrap();
        handle.signal();

        let outcome = socket.read_frame(Duration::from_secs(2), &pipe);
        assert_eq!(outcome, ReadOutcome::Shutdown);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_peer_close_reports_disconnect() {
        let path = scratch_path("close");
        let listener = UnixListener::bind(&path).unwrap();
        let mut socket = LircSocket::connect_to(&path, &path).unwrap();
        {
            let (_server, _) = listener.accept().unwrap();
            // server drops here
        }

        let (pipe, _handle) = ShutdownPipe::new().unwrap();
        let outcome = socket.read_frame(Duration::from_secs(2), &pipe);
        assert_eq!(outcome, ReadOutcome::Disconnected);
        assert!(!socket.is_connected());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_reconnect_observes_shutdown_during_backoff() {
        let path = scratch_path("backoff");
        let listener = UnixListener::bind(&path).unwrap();
        let mut socket = LircSocket::connect_to(&path, &path).unwrap();
        drop(listener);

        let (pipe, handle) = ShutdownPipe::new().unwrap();
        handle.signal();
        assert_eq!(socket.reconnect(&pipe), ReconnectOutcome::Shutdown);
        let _ = std::fs::remove_file(&path);
    }
}
