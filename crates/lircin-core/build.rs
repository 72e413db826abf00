use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("key_symbol.rs");
    let mut f = File::create(&dest_path).unwrap();

    // Generate the KeySymbol newtype wrapper
    writeln!(
        f,
        r#"
/// Represents a logical key on a remote control.
///
/// This is a newtype wrapper around u32 for type safety. Printable keys carry
/// their Unicode code point, special keys live in a reserved range starting at
/// 0xF000, and 0 is the NULL sentinel (no key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct KeySymbol(pub u32);

impl KeySymbol {{
    /// Get the raw numeric symbol value
    pub fn code(self) -> u32 {{
        self.0
    }}

    /// True for the NULL sentinel
    pub fn is_null(self) -> bool {{
        self.0 == 0
    }}

    /// Get the name of this symbol
    pub fn name(self) -> &'static str {{
        symbol_name(self)
    }}
}}

impl From<u32> for KeySymbol {{
    fn from(code: u32) -> Self {{
        KeySymbol(code)
    }}
}}

impl From<char> for KeySymbol {{
    fn from(c: char) -> Self {{
        KeySymbol(c as u32)
    }}
}}

impl From<KeySymbol> for u32 {{
    fn from(symbol: KeySymbol) -> Self {{
        symbol.0
    }}
}}

impl fmt::Display for KeySymbol {{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {{
        match symbol_char(*self) {{
            Some(c) => write!(f, "{{}}", c),
            None => f.write_str(self.name()),
        }}
    }}
}}

impl FromStr for KeySymbol {{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {{
        let symbol = symbol_from_name(s);
        if symbol.is_null() {{
            Err(format!("Unknown key symbol: {{}}", s))
        }} else {{
            Ok(symbol)
        }}
    }}
}}
"#
    )
    .unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}
