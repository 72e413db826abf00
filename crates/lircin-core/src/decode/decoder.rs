// Lircin Key Decoder
// Turns one lircd frame into a decoded key, compensating for r-step remotes

use log::trace;

use super::frame::parse_frame;
use crate::key::{symbol_from_name, KeySymbol};

/// Repeat bit in the raw scan code. r-step remotes set it on the initial
/// press and drop it from the auto-repeat code (active-low encoding).
pub const REPEAT_BIT: u64 = 0x100;

/// Low-battery/toggle bit in the raw scan code. Also perturbs the repeat
/// encoding, so it participates in repeat detection.
pub const LOW_BATTERY_BIT: u64 = 0x8000;

/// One decoded frame, consumed immediately by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedKey {
    pub raw_code: u64,
    /// lircd's own repeat counter from the frame
    pub repeat_count: u32,
    pub name: String,
    pub symbol: KeySymbol,
    /// Repeat of the previous press, per the frame counter or the r-step rules
    pub is_repeat: bool,
    /// Transmitting remote reports a low battery; used as a timing hint
    pub low_battery: bool,
}

impl DecodedKey {
    /// Sentinel for malformed frames.
    pub fn none() -> Self {
        Self {
            raw_code: 0,
            repeat_count: 0,
            name: String::new(),
            symbol: KeySymbol::NULL,
            is_repeat: false,
            low_battery: false,
        }
    }

    pub fn is_none(&self) -> bool {
        self.symbol.is_null()
    }
}

/// Stateful decoder with a single-slot history (the previous frame's code and
/// name), which is all the r-step equivalence rules need.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    last_code: u64,
    last_name: String,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one raw line.
    ///
    /// `repeats` is the caller's running repeat counter; it is incremented
    /// here whenever the frame is classified as a repeat, whether by lircd's
    /// own counter or by the r-step rules. Malformed lines yield the NULL
    /// sentinel and leave both the counter and the history untouched.
    pub fn decode(&mut self, line: &str, repeats: &mut u32) -> DecodedKey {
        let Some(frame) = parse_frame(line) else {
            return DecodedKey::none();
        };

        let low_battery = frame.code & LOW_BATTERY_BIT != 0;

        let mut is_repeat = frame.repeat > 0;
        if self.is_rstep_repeat(frame.code, frame.name) {
            trace!(
                "r-step repeat: {:#x} follows {:#x} ({})",
                frame.code,
                self.last_code,
                frame.name
            );
            is_repeat = true;
        }
        if is_repeat {
            *repeats += 1;
        }

        self.last_code = frame.code;
        self.last_name.clear();
        self.last_name.push_str(frame.name);

        DecodedKey {
            raw_code: frame.code,
            repeat_count: frame.repeat,
            name: frame.name.to_string(),
            symbol: symbol_from_name(frame.name),
            is_repeat,
            low_battery,
        }
    }

    /// Does this frame repeat the previous press despite a distinct code?
    ///
    /// r-step remotes encode the initial press and the auto-repeat of one
    /// logical key with two different scan codes. All three equivalences
    /// additionally require the symbolic name to be unchanged.
    fn is_rstep_repeat(&self, code: u64, name: &str) -> bool {
        if name != self.last_name {
            return false;
        }
        let prev = self.last_code;
        let prev_had_repeat = prev & REPEAT_BIT != 0;
        let curr_has_low_battery = code & LOW_BATTERY_BIT != 0;

        // The repeat bit present on the press is dropped on auto-repeat.
        let repeat_bit_dropped = prev_had_repeat && (prev & !REPEAT_BIT) == code;
        // The low-battery bit appears on the repeat code once the cell runs
        // down, leaving the rest of the code intact.
        let low_battery_gained = curr_has_low_battery && (code & !LOW_BATTERY_BIT) == prev;
        // Both quirks at once: repeat bit dropped and low-battery bit gained.
        let both = prev_had_repeat
            && curr_has_low_battery
            && (prev & !REPEAT_BIT) == (code & !LOW_BATTERY_BIT);

        repeat_bit_dropped || low_battery_gained || both
    }
}
