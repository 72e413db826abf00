// Lircin Dispatch Layer
// Press/hold/release state machine and the sink seam to the host

pub mod dispatcher;
pub mod sink;

pub use dispatcher::{DispatchTuning, Dispatcher};
pub use sink::{InputSink, KeyEvent};
