// Lircin Event Dispatcher
// Press/hold/release state machine driven by frames and read timeouts

use std::time::Duration;

use log::trace;

use super::sink::{InputSink, KeyEvent};
use crate::decode::DecodedKey;
use crate::key::KeySymbol;

/// Timing and debounce knobs for the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTuning {
    /// Wait budget while no key is held
    pub idle_timeout: Duration,
    /// Wait budget while a key is held; its expiry synthesizes the release
    pub held_timeout: Duration,
    /// Held-key wait budget when the remote reports a low battery, which
    /// stretches the repeat interval on the wire
    pub low_battery_timeout: Duration,
    /// Number of leading repeat frames treated as debounce
    pub repeat_debounce: u32,
}

impl Default for DispatchTuning {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_millis(1000),
            held_timeout: Duration::from_millis(150),
            low_battery_timeout: Duration::from_millis(260),
            repeat_debounce: 4,
        }
    }
}

/// The per-worker dispatch state machine.
///
/// Two states: Idle (held is None) and KeyHeld. The worker thread is the only
/// writer, so no locking anywhere.
#[derive(Debug)]
pub struct Dispatcher {
    held: Option<KeySymbol>,
    repeats: u32,
    low_battery: bool,
    tuning: DispatchTuning,
}

impl Dispatcher {
    pub fn new(tuning: DispatchTuning) -> Self {
        Self {
            held: None,
            repeats: 0,
            low_battery: false,
            tuning,
        }
    }

    /// The currently held symbol, if any.
    pub fn held(&self) -> Option<KeySymbol> {
        self.held
    }

    /// The running repeat counter, lent to the decoder each cycle.
    pub fn repeats_mut(&mut self) -> &mut u32 {
        &mut self.repeats
    }

    /// Wait budget for the next frame: long while idle so polling stays
    /// cheap, short while a key is held so the synthetic release is prompt.
    pub fn next_timeout(&self) -> Duration {
        match self.held {
            None => self.tuning.idle_timeout,
            Some(_) if self.low_battery => self.tuning.low_battery_timeout,
            Some(_) => self.tuning.held_timeout,
        }
    }

    /// The wait elapsed with no frame: the held key, if any, was let go.
    pub fn handle_timeout(&mut self, sink: &mut dyn InputSink) {
        if let Some(symbol) = self.held.take() {
            self.repeats = 0;
            sink.dispatch(KeyEvent::release(symbol));
        }
    }

    /// Feed one decoded frame through the state machine.
    pub fn handle_key(&mut self, key: &DecodedKey, sink: &mut dyn InputSink) {
        if key.symbol.is_null() {
            return;
        }

        self.low_battery = key.low_battery;

        if key.is_repeat && self.held == Some(key.symbol) {
            // Auto-repeat never reaches the sink: the press went out on the
            // first frame and the release will come from the timeout. Below
            // the debounce threshold the frames count as wire jitter; past
            // it the run is a genuine hold.
            if self.repeats >= self.tuning.repeat_debounce {
                trace!("{} auto-repeating ({} frames)", key.symbol, self.repeats);
            }
            return;
        }

        // A fresh press. A still-held key is released first; its release was
        // implied by the new activity, not observed as a timeout.
        if let Some(previous) = self.held.take() {
            sink.dispatch(KeyEvent::release(previous));
        }
        self.repeats = 0;
        sink.dispatch(KeyEvent::press(key.symbol));
        self.held = Some(key.symbol);
    }
}
