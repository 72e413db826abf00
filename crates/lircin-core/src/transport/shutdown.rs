// Lircin Shutdown Side-Channel
// Self-pipe that lets another thread wake the worker's blocking wait

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::sync::Arc;

/// Read side of the shutdown pipe, owned by the worker thread.
///
/// The file descriptor joins the worker's poll set, so a shutdown request
/// unblocks the wait immediately. The pipe is never drained: once signaled it
/// stays readable, which is exactly the latching behavior shutdown needs.
#[derive(Debug)]
pub struct ShutdownPipe {
    read: OwnedFd,
}

/// Write side of the shutdown pipe. Cheap to clone and send across threads.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    write: Arc<OwnedFd>,
}

impl ShutdownPipe {
    /// Create a connected pipe/handle pair.
    pub fn new() -> io::Result<(Self, ShutdownHandle)> {
        let mut fds = [0 as libc::c_int; 2];
        // O_NONBLOCK on both ends: a full pipe must never block signal()
        let rc = unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC | libc::O_NONBLOCK) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        let read = unsafe { OwnedFd::from_raw_fd(fds[0]) };
        let write = unsafe { OwnedFd::from_raw_fd(fds[1]) };
        Ok((
            Self { read },
            ShutdownHandle {
                write: Arc::new(write),
            },
        ))
    }

    /// Raw descriptor for inclusion in a poll set.
    pub fn as_raw_fd(&self) -> RawFd {
        self.read.as_raw_fd()
    }

    /// Block up to `timeout_ms` waiting for a shutdown request.
    ///
    /// Returns true once shutdown has been signaled. EINTR counts as "not
    /// signaled yet"; the caller's loop comes back around.
    pub fn wait(&self, timeout_ms: i32) -> bool {
        let mut fds = [libc::pollfd {
            fd: self.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        }];
        let rc = unsafe { libc::poll(fds.as_mut_ptr(), 1, timeout_ms) };
        rc > 0 && fds[0].revents & libc::POLLIN != 0
    }

    /// Non-blocking check for a pending shutdown request.
    pub fn is_signaled(&self) -> bool {
        self.wait(0)
    }
}

impl ShutdownHandle {
    /// Request shutdown. Idempotent; safe to call from any thread.
    pub fn signal(&self) {
        let byte = 1u8;
        // A full pipe means a signal is already pending, so the result is
        // irrelevant either way.
        let _ = unsafe {
            libc::write(
                self.write.as_raw_fd(),
                &byte as *const u8 as *const libc::c_void,
                1,
            )
        };
    }
}
