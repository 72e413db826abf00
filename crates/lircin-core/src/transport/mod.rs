// Lircin Transport Layer
// lircd socket client plus the shutdown side-channel that wakes it

pub mod shutdown;
pub mod socket;

pub use shutdown::{ShutdownHandle, ShutdownPipe};
pub use socket::{
    LircSocket, ReadOutcome, ReconnectOutcome, TransportError, LIRCD_SOCKET, LIRCD_SOCKET_LEGACY,
};
