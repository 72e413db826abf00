// Lircin Frame Parser
// One lircd broadcast line: "<hex code> <repeat> <name> <config>"

/// Longest symbolic name carried in a frame.
pub const MAX_NAME_LEN: usize = 127;

/// The four fields of a broadcast line. The config name is parsed for the
/// field count but ignored downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedFrame<'a> {
    /// Raw scan code, up to 64 bits, sent as hex
    pub code: u64,
    /// Auto-repeat counter maintained by lircd, sent as decimal
    pub repeat: u32,
    /// Symbolic key name from the remote config
    pub name: &'a str,
}

/// Parse one broadcast line.
///
/// Exactly four whitespace-separated tokens; anything else is malformed and
/// yields None. Over-long names are truncated, not rejected.
pub fn parse_frame(line: &str) -> Option<ParsedFrame<'_>> {
    let mut tokens = line.split_whitespace();
    let code = tokens.next()?;
    let repeat = tokens.next()?;
    let name = tokens.next()?;
    let _config = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }

    let code = u64::from_str_radix(code, 16).ok()?;
    let repeat = repeat.parse::<u32>().ok()?;
    Some(ParsedFrame {
        code,
        repeat,
        name: truncate_name(name),
    })
}

fn truncate_name(name: &str) -> &str {
    if name.len() <= MAX_NAME_LEN {
        return name;
    }
    let mut end = MAX_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
