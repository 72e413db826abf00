// Lircin Decode Layer
// Frame parsing and key decoding with r-step repeat compensation

pub mod decoder;
pub mod frame;

pub use decoder::{DecodedKey, KeyDecoder, LOW_BATTERY_BIT, REPEAT_BIT};
pub use frame::{parse_frame, ParsedFrame, MAX_NAME_LEN};
