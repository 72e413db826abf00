// Lircin Key Symbols
// Logical key vocabulary shared with the host input subsystem

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

include!(concat!(env!("OUT_DIR"), "/key_symbol.rs"));

impl KeySymbol {
    /// Sentinel: no key.
    pub const NULL: KeySymbol = KeySymbol(0);

    // Special keys live in a reserved range above the printable code points.
    pub const CURSOR_UP: KeySymbol = KeySymbol(0xF000);
    pub const CURSOR_DOWN: KeySymbol = KeySymbol(0xF001);
    pub const CURSOR_LEFT: KeySymbol = KeySymbol(0xF002);
    pub const CURSOR_RIGHT: KeySymbol = KeySymbol(0xF003);
    pub const SELECT: KeySymbol = KeySymbol(0xF004);
    pub const BACK: KeySymbol = KeySymbol(0xF005);
    pub const EXIT: KeySymbol = KeySymbol(0xF006);
    pub const HOME: KeySymbol = KeySymbol(0xF007);
    pub const MENU: KeySymbol = KeySymbol(0xF008);
    pub const INFO: KeySymbol = KeySymbol(0xF009);
    pub const GUIDE: KeySymbol = KeySymbol(0xF00A);
    pub const POWER: KeySymbol = KeySymbol(0xF00B);
    pub const MUTE: KeySymbol = KeySymbol(0xF00C);
    pub const VOLUME_UP: KeySymbol = KeySymbol(0xF00D);
    pub const VOLUME_DOWN: KeySymbol = KeySymbol(0xF00E);
    pub const CHANNEL_UP: KeySymbol = KeySymbol(0xF00F);
    pub const CHANNEL_DOWN: KeySymbol = KeySymbol(0xF010);
    pub const PLAY: KeySymbol = KeySymbol(0xF011);
    pub const PAUSE: KeySymbol = KeySymbol(0xF012);
    pub const STOP: KeySymbol = KeySymbol(0xF013);
    pub const RECORD: KeySymbol = KeySymbol(0xF014);
    pub const REWIND: KeySymbol = KeySymbol(0xF015);
    pub const FAST_FORWARD: KeySymbol = KeySymbol(0xF016);
    pub const PREVIOUS: KeySymbol = KeySymbol(0xF017);
    pub const NEXT: KeySymbol = KeySymbol(0xF018);
    pub const RED: KeySymbol = KeySymbol(0xF019);
    pub const GREEN: KeySymbol = KeySymbol(0xF01A);
    pub const YELLOW: KeySymbol = KeySymbol(0xF01B);
    pub const BLUE: KeySymbol = KeySymbol(0xF01C);
    pub const TEXT: KeySymbol = KeySymbol(0xF01D);
    pub const SUBTITLE: KeySymbol = KeySymbol(0xF01E);
    pub const AUDIO: KeySymbol = KeySymbol(0xF01F);
    pub const SETUP: KeySymbol = KeySymbol(0xF020);
    pub const TV: KeySymbol = KeySymbol(0xF021);
    pub const RADIO: KeySymbol = KeySymbol(0xF022);
    pub const SEARCH: KeySymbol = KeySymbol(0xF023);
}

/// Symbolic names as lircd broadcasts them, grouped by function.
///
/// The modern KEY_* vocabulary comes first; the unprefixed aliases at the end
/// cover remote configs that predate the Linux naming scheme. The array is
/// deliberately left in declaration order and gets sorted once, lazily, in
/// `sorted_table`. Names of a single character never reach this table (they
/// resolve through the code-point fast path in `symbol_from_name`).
static KEY_SYMBOL_NAMES: &[(&str, KeySymbol)] = &[
    ("KEY_UP", KeySymbol::CURSOR_UP),
    ("KEY_DOWN", KeySymbol::CURSOR_DOWN),
    ("KEY_LEFT", KeySymbol::CURSOR_LEFT),
    ("KEY_RIGHT", KeySymbol::CURSOR_RIGHT),
    ("KEY_OK", KeySymbol::SELECT),
    ("KEY_SELECT", KeySymbol::SELECT),
    ("KEY_BACK", KeySymbol::BACK),
    ("KEY_EXIT", KeySymbol::EXIT),
    ("KEY_HOME", KeySymbol::HOME),
    ("KEY_MENU", KeySymbol::MENU),
    ("KEY_INFO", KeySymbol::INFO),
    ("KEY_EPG", KeySymbol::GUIDE),
    ("KEY_POWER", KeySymbol::POWER),
    ("KEY_MUTE", KeySymbol::MUTE),
    ("KEY_VOLUMEUP", KeySymbol::VOLUME_UP),
    ("KEY_VOLUMEDOWN", KeySymbol::VOLUME_DOWN),
    ("KEY_CHANNELUP", KeySymbol::CHANNEL_UP),
    ("KEY_CHANNELDOWN", KeySymbol::CHANNEL_DOWN),
    ("KEY_PLAY", KeySymbol::PLAY),
    ("KEY_PAUSE", KeySymbol::PAUSE),
    ("KEY_PLAYPAUSE", KeySymbol::PLAY),
    ("KEY_STOP", KeySymbol::STOP),
    ("KEY_RECORD", KeySymbol::RECORD),
    ("KEY_REWIND", KeySymbol::REWIND),
    ("KEY_FASTFORWARD", KeySymbol::FAST_FORWARD),
    ("KEY_PREVIOUS", KeySymbol::PREVIOUS),
    ("KEY_NEXT", KeySymbol::NEXT),
    ("KEY_RED", KeySymbol::RED),
    ("KEY_GREEN", KeySymbol::GREEN),
    ("KEY_YELLOW", KeySymbol::YELLOW),
    ("KEY_BLUE", KeySymbol::BLUE),
    ("KEY_TEXT", KeySymbol::TEXT),
    ("KEY_SUBTITLE", KeySymbol::SUBTITLE),
    ("KEY_AUDIO", KeySymbol::AUDIO),
    ("KEY_SETUP", KeySymbol::SETUP),
    ("KEY_TV", KeySymbol::TV),
    ("KEY_RADIO", KeySymbol::RADIO),
    ("KEY_SEARCH", KeySymbol::SEARCH),
    ("KEY_0", KeySymbol(b'0' as u32)),
    ("KEY_1", KeySymbol(b'1' as u32)),
    ("KEY_2", KeySymbol(b'2' as u32)),
    ("KEY_3", KeySymbol(b'3' as u32)),
    ("KEY_4", KeySymbol(b'4' as u32)),
    ("KEY_5", KeySymbol(b'5' as u32)),
    ("KEY_6", KeySymbol(b'6' as u32)),
    ("KEY_7", KeySymbol(b'7' as u32)),
    ("KEY_8", KeySymbol(b'8' as u32)),
    ("KEY_9", KeySymbol(b'9' as u32)),
    // Legacy unprefixed names seen in older remote configs
    ("OK", KeySymbol::SELECT),
    ("UP", KeySymbol::CURSOR_UP),
    ("DOWN", KeySymbol::CURSOR_DOWN),
    ("LEFT", KeySymbol::CURSOR_LEFT),
    ("RIGHT", KeySymbol::CURSOR_RIGHT),
    ("MENU", KeySymbol::MENU),
    ("EXIT", KeySymbol::EXIT),
    ("POWER", KeySymbol::POWER),
    ("MUTE", KeySymbol::MUTE),
    ("VOLUP", KeySymbol::VOLUME_UP),
    ("VOLDOWN", KeySymbol::VOLUME_DOWN),
    ("CHANUP", KeySymbol::CHANNEL_UP),
    ("CHANDOWN", KeySymbol::CHANNEL_DOWN),
];

/// The name table, sorted by name for binary search.
///
/// The sort happens exactly once for the process lifetime: `OnceLock`
/// serializes first use across threads, so two driver instances opened
/// concurrently cannot race on it. Every later access sees the already
/// sorted table.
fn sorted_table() -> &'static [(&'static str, KeySymbol)] {
    static SORTED: OnceLock<Vec<(&'static str, KeySymbol)>> = OnceLock::new();
    SORTED.get_or_init(|| {
        let mut table = KEY_SYMBOL_NAMES.to_vec();
        table.sort_unstable_by(|a, b| a.0.cmp(b.0));
        table
    })
}

/// Resolve a symbolic name from a lircd frame to a key symbol.
///
/// An empty name resolves to NULL. A one-character name resolves to that
/// character's code point directly, without consulting the table. Everything
/// else is binary-searched in the sorted name table; names that are not
/// present resolve to NULL.
pub fn symbol_from_name(name: &str) -> KeySymbol {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (None, _) => KeySymbol::NULL,
        (Some(c), None) => KeySymbol::from(c),
        _ => sorted_table()
            .binary_search_by(|entry| entry.0.cmp(name))
            .map(|idx| sorted_table()[idx].1)
            .unwrap_or(KeySymbol::NULL),
    }
}

/// Display name for a key symbol.
///
/// Aliased symbols report the first name declared for them. Printable symbols
/// are rendered by `Display` through `symbol_char` and never hit this path
/// with a table entry.
pub fn symbol_name(symbol: KeySymbol) -> &'static str {
    if symbol.is_null() {
        return "NONE";
    }
    KEY_SYMBOL_NAMES
        .iter()
        .find(|(_, s)| *s == symbol)
        .map(|(name, _)| *name)
        .unwrap_or("UNKNOWN")
}

/// The printable character behind a symbol, if it has one.
pub fn symbol_char(symbol: KeySymbol) -> Option<char> {
    if symbol.code() < 0x20 || symbol.code() >= 0xF000 {
        return None;
    }
    char::from_u32(symbol.code())
}
