//! Character classification shared by every scanning layer (spec.md §4.2
//! "looking_at_identifier / looking_at_number", §9 "Lookahead tables").
//!
//! The design notes suggest a 256-entry ASCII dispatch table beats a chain
//! of comparisons; we build one lazily for the single most pressure-tested
//! predicate (`is_name_start`) and fall through to `char` methods for the
//! rest of the (rarely hot) non-ASCII path.

use once_cell::sync::Lazy;

const fn name_start_table() -> [bool; 128] {
    let mut table = [false; 128];
    let mut i = 0;
    while i < 128 {
        let c = i as u8;
        table[i] = c.is_ascii_alphabetic() || c == b'_' || c == b'-';
        i += 1;
    }
    table
}

static NAME_START_ASCII: Lazy<[bool; 128]> = Lazy::new(name_start_table);

pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

pub fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\x0c')
}

pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// `<ident-start>` per the CSS syntax spec: letters, `_`, or non-ASCII.
/// `-` is included because Sass/CSS identifiers may begin with a single
/// `-` (and `--` for custom properties).
pub fn is_name_start(c: char) -> bool {
    if c.is_ascii() {
        NAME_START_ASCII[c as usize]
    } else {
        true
    }
}

/// `<ident-char>`: name-start characters, digits, and non-ASCII.
pub fn is_name_char(c: char) -> bool {
    is_name_start(c) || is_digit(c) || (c as u32) >= 0x80
}

/// Characters that may appear escaped via `\` without starting a new
/// escape themselves -- used by `try_url`/`declaration_value` to decide
/// whether a `(`-delimited run still looks like a plain URL token.
pub fn is_url_unquoted_safe(c: char) -> bool {
    !matches!(c, '"' | '\'' | '(' | ')' | '\\') && !is_whitespace(c) && !c.is_control()
}

/// The CSS syntax spec's "would start an identifier" predicate, assuming
/// `\` always starts a valid escape (spec.md §4.2).
pub fn looking_at_identifier(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    match first {
        Some(c) if is_name_start(c) => true,
        Some('-') => match second {
            Some(c2) if is_name_start(c2) || c2 == '-' => true,
            Some('\\') => !matches!(third, Some('\n') | None),
            _ => false,
        },
        Some('\\') => !matches!(second, Some('\n') | None),
        _ => false,
    }
}

/// The CSS syntax spec's "would start a number" predicate.
pub fn looking_at_number(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    match first {
        Some(c) if is_digit(c) => true,
        Some('+') | Some('-') => match second {
            Some(c2) if is_digit(c2) => true,
            Some('.') => matches!(third, Some(c3) if is_digit(c3)),
            _ => false,
        },
        Some('.') => matches!(second, Some(c2) if is_digit(c2)),
        _ => false,
    }
}
