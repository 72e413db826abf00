// Lircin Core Library
// Remote-control event decoding and dispatch over the lircd socket

pub mod action;
pub mod decode;
pub mod dispatch;
pub mod driver;
pub mod key;
pub mod settings;
pub mod transport;

pub use action::KeyAction;
pub use decode::{DecodedKey, KeyDecoder, LOW_BATTERY_BIT, REPEAT_BIT};
pub use dispatch::{DispatchTuning, Dispatcher, InputSink, KeyEvent};
pub use driver::{DriverConfig, DriverError, RemoteDriver};
pub use key::{symbol_from_name, KeySymbol};
pub use settings::{Settings, SettingsError};
pub use transport::{
    LircSocket, ReadOutcome, ShutdownHandle, ShutdownPipe, TransportError, LIRCD_SOCKET,
    LIRCD_SOCKET_LEGACY,
};
