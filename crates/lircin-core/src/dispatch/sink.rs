// Lircin Event Sink
// The seam between the dispatcher and the host input subsystem

use crate::action::KeyAction;
use crate::key::KeySymbol;

/// One dispatched input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub action: KeyAction,
    pub symbol: KeySymbol,
}

impl KeyEvent {
    pub fn press(symbol: KeySymbol) -> Self {
        Self {
            action: KeyAction::Press,
            symbol,
        }
    }

    pub fn release(symbol: KeySymbol) -> Self {
        Self {
            action: KeyAction::Release,
            symbol,
        }
    }
}

/// Receiver for dispatched events.
///
/// Events arrive synchronously, strictly in the order the dispatcher decides
/// them: a press, then later its release, never reordered. The dispatcher is
/// the sole producer.
pub trait InputSink {
    fn dispatch(&mut self, event: KeyEvent);
}

/// Plain capture sink, mostly useful in tests.
impl InputSink for Vec<KeyEvent> {
    fn dispatch(&mut self, event: KeyEvent) {
        self.push(event);
    }
}
