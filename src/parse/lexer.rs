//! Lexical primitives (spec.md §4.2, C2): whitespace/comment skipping, CSS
//! identifiers, strings, escapes, numbers, and the plain-CSS `url(...)`
//! and declaration-value tokenizers.

use crate::error::SassResult;
use crate::parse::chars::{is_digit, is_hex_digit, is_name_char, is_name_start, is_whitespace};
use crate::parse::scanner::Scanner;

/// Skips whitespace and both silent (`//`) and loud (`/* */`) comments.
/// Returns whether anything was consumed.
pub fn whitespace_with_comments(scanner: &mut Scanner) -> SassResult<bool> {
    let mut consumed = false;
    loop {
        if skip_whitespace_chars(scanner) {
            consumed = true;
            continue;
        }
        if scanner.peek(0) == Some('/') {
            match scanner.peek(1) {
                Some('/') => {
                    skip_silent_comment(scanner);
                    consumed = true;
                    continue;
                }
                Some('*') => {
                    skip_loud_comment(scanner)?;
                    consumed = true;
                    continue;
                }
                _ => {}
            }
        }
        break;
    }
    Ok(consumed)
}

/// Skips only whitespace characters, leaving comments untouched.
pub fn whitespace_without_comments(scanner: &mut Scanner) -> bool {
    skip_whitespace_chars(scanner)
}

fn skip_whitespace_chars(scanner: &mut Scanner) -> bool {
    let mut any = false;
    while let Some(c) = scanner.peek(0) {
        if is_whitespace(c) {
            scanner.read();
            any = true;
        } else {
            break;
        }
    }
    any
}

fn skip_silent_comment(scanner: &mut Scanner) {
    scanner.read(); // '/'
    scanner.read(); // '/'
    while let Some(c) = scanner.peek(0) {
        if c == '\n' {
            break;
        }
        scanner.read();
    }
}

fn skip_loud_comment(scanner: &mut Scanner) -> SassResult<()> {
    scanner.read(); // '/'
    scanner.read(); // '*'
    loop {
        match scanner.read() {
            Some('*') if scanner.peek(0) == Some('/') => {
                scanner.read();
                return Ok(());
            }
            Some(_) => continue,
            None => return Err(scanner.error("expected more input.")),
        }
    }
}

/// Captures the *text* of a loud comment, including its `/*`/`*/`
/// delimiters, without interpreting interpolation (callers that need
/// interpolation-aware loud comments re-scan the captured span).
pub fn raw_loud_comment_text(scanner: &mut Scanner) -> SassResult<String> {
    let state = scanner.state();
    skip_loud_comment(scanner)?;
    Ok(scanner.text_from(state))
}

pub fn raw_silent_comment_text(scanner: &mut Scanner) -> String {
    let state = scanner.state();
    skip_silent_comment(scanner);
    scanner.text_from(state)
}

/// Consumes a CSS identifier, including an optional leading `--`, hex
/// escapes (`\xxxxxx `), and literal-character escapes (`\<char>`).
///
/// `normalize` maps `_` to `-` in the result (used for keyword matching);
/// `unit` refuses a trailing `-<digit>` or `-.` so `1px-2px` tokenizes as
/// subtraction rather than a unit (spec.md §4.2).
pub fn identifier(scanner: &mut Scanner, normalize: bool, unit: bool) -> SassResult<String> {
    let mut text = String::new();
    if scanner.scan_char('-') {
        text.push('-');
        if scanner.scan_char('-') {
            text.push('-');
        }
    }

    match scanner.peek(0) {
        Some('\\') => text.push_str(&escape(scanner, false)?),
        Some(c) if is_name_start(c) => {
            scanner.read();
            text.push(c);
        }
        _ => {
            if text.is_empty() {
                return Err(scanner.error("Expected identifier."));
            }
        }
    }

    loop {
        match scanner.peek(0) {
            Some('\\') => text.push_str(&escape(scanner, false)?),
            Some(c) if is_name_char(c) => {
                if unit && c == '-' {
                    // Don't consume `-<digit>` / `-.` as part of a unit.
                    match scanner.peek(1) {
                        Some(n) if is_digit(n) || n == '.' => break,
                        _ => {}
                    }
                }
                scanner.read();
                text.push(c);
            }
            _ => break,
        }
    }

    Ok(if normalize {
        text.replace('_', "-")
    } else {
        text
    })
}

/// A quoted CSS string. Resolves escapes; rejects unescaped newlines.
pub fn string(scanner: &mut Scanner) -> SassResult<String> {
    let quote = match scanner.peek(0) {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(scanner.error("Expected string.")),
    };
    scanner.read();

    let mut text = String::new();
    loop {
        match scanner.peek(0) {
            Some(c) if c == quote => {
                scanner.read();
                return Ok(text);
            }
            Some('\n') | None => return Err(scanner.error("Expected \"" .to_string() + &quote.to_string() + "\".")),
            Some('\\') => {
                if matches!(scanner.peek(1), Some('\n')) {
                    scanner.read();
                    scanner.read();
                    text.push('\n');
                } else {
                    text.push(escape_character(scanner)?);
                }
            }
            Some(c) => {
                scanner.read();
                text.push(c);
            }
        }
    }
}

/// Consumes one or more decimal digits, returning the matched text.
pub fn natural_number(scanner: &mut Scanner) -> SassResult<String> {
    let mut text = String::new();
    while let Some(c) = scanner.peek(0) {
        if is_digit(c) {
            scanner.read();
            text.push(c);
        } else {
            break;
        }
    }
    if text.is_empty() {
        return Err(scanner.error("Expected digit."));
    }
    Ok(text)
}

/// `.` followed by one or more digits; returns `None` without consuming
/// anything if there's no `.` or it isn't followed by a digit.
pub fn try_decimal(scanner: &mut Scanner) -> Option<String> {
    if scanner.peek(0) != Some('.') || !matches!(scanner.peek(1), Some(c) if is_digit(c)) {
        return None;
    }
    let mut text = String::from(".");
    scanner.read();
    while let Some(c) = scanner.peek(0) {
        if is_digit(c) {
            scanner.read();
            text.push(c);
        } else {
            break;
        }
    }
    Some(text)
}

/// `e`/`E` optionally followed by a sign, then one or more digits.
pub fn try_exponent(scanner: &mut Scanner) -> Option<String> {
    match scanner.peek(0) {
        Some(e @ ('e' | 'E')) => {
            let sign_offset = if matches!(scanner.peek(1), Some('+') | Some('-')) {
                2
            } else {
                1
            };
            if !matches!(scanner.peek(sign_offset), Some(c) if is_digit(c)) {
                return None;
            }
            let mut text = String::new();
            text.push(e);
            scanner.read();
            if sign_offset == 2 {
                let sign = scanner.read().unwrap();
                text.push(sign);
            }
            while let Some(c) = scanner.peek(0) {
                if is_digit(c) {
                    scanner.read();
                    text.push(c);
                } else {
                    break;
                }
            }
            Some(text)
        }
        _ => None,
    }
}

/// The text of an escape sequence (the `\` and whatever follows),
/// normalized: control/digit code points are re-emitted as six hex digits
/// followed by a single space (spec.md §4.2).
pub fn escape(scanner: &mut Scanner, identifier_start: bool) -> SassResult<String> {
    let c = escape_character(scanner)?;
    let _ = identifier_start;
    Ok(canonical_escape(c))
}

fn canonical_escape(c: char) -> String {
    if c.is_control() || c.is_ascii_digit() {
        format!("\\{:06x} ", c as u32)
    } else {
        let mut s = String::from('\\');
        s.push(c);
        s
    }
}

/// Resolves an escape sequence to its code point: `\xxxxxx ` hex escapes
/// (1-6 hex digits, optionally followed by one whitespace character that is
/// consumed as part of the escape) or `\<char>` literal escapes.
pub fn escape_character(scanner: &mut Scanner) -> SassResult<char> {
    scanner
        .expect_char('\\')
        .map_err(|_| scanner.error("Expected escape sequence."))?;

    match scanner.peek(0) {
        None => Err(scanner.error("Expected escape sequence.")),
        Some('\n') => Err(scanner.error("Expected escape sequence.")),
        Some(c) if is_hex_digit(c) => {
            let mut hex = String::new();
            for _ in 0..6 {
                match scanner.peek(0) {
                    Some(h) if is_hex_digit(h) => {
                        scanner.read();
                        hex.push(h);
                    }
                    _ => break,
                }
            }
            if matches!(scanner.peek(0), Some(w) if is_whitespace(w)) {
                if scanner.peek(0) == Some('\r') && scanner.peek(1) == Some('\n') {
                    scanner.read();
                }
                scanner.read();
            }
            let code = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
            Ok(char::from_u32(code).unwrap_or('\u{FFFD}'))
        }
        Some(c) => {
            scanner.read();
            Ok(c)
        }
    }
}

/// A plain CSS `url(...)` token: scans raw contents that may span one
/// line. Backtracks and returns `None` if the contents look like they
/// need expression parsing (an unescaped `#{` hole, for instance).
pub fn try_url(scanner: &mut Scanner) -> SassResult<Option<String>> {
    let state = scanner.state();
    if !scanner.scan_identifier_str("url") {
        return Ok(None);
    }
    if !scanner.scan_char('(') {
        scanner.restore(state);
        return Ok(None);
    }
    whitespace_without_comments(scanner);

    let mut buffer = String::new();
    loop {
        match scanner.peek(0) {
            Some(')') => {
                scanner.read();
                return Ok(Some(buffer));
            }
            Some('#') if scanner.peek(1) == Some('{') => {
                scanner.restore(state);
                return Ok(None);
            }
            Some('\\') => {
                buffer.push(escape_character(scanner)?);
            }
            Some(c) if crate::parse::chars::is_url_unquoted_safe(c) => {
                scanner.read();
                buffer.push(c);
            }
            Some(c) if is_whitespace(c) => {
                whitespace_without_comments(scanner);
                if scanner.peek(0) != Some(')') {
                    scanner.restore(state);
                    return Ok(None);
                }
            }
            _ => {
                scanner.restore(state);
                return Ok(None);
            }
        }
    }
}

/// Plain-CSS declaration-value tokenizer: balances `()`/`[]`/`{}`,
/// preserves strings as raw text, collapses whitespace runs to a single
/// space unless a newline intervened, and stops at a top-level `;`, `!`,
/// or an unmatched closing bracket.
pub fn declaration_value(scanner: &mut Scanner) -> SassResult<String> {
    let mut buffer = String::new();
    let mut brackets: Vec<char> = Vec::new();

    loop {
        match scanner.peek(0) {
            None => break,
            Some(c @ ('"' | '\'')) => {
                let _ = c;
                buffer.push_str(&raw_quoted_string(scanner)?);
            }
            Some(c @ ('(' | '[' | '{')) => {
                scanner.read();
                buffer.push(c);
                brackets.push(closing_for(c));
            }
            Some(c @ (')' | ']' | '}')) => {
                match brackets.last() {
                    Some(expected) if *expected == c => {
                        brackets.pop();
                        scanner.read();
                        buffer.push(c);
                    }
                    _ => break,
                }
            }
            Some(';') if brackets.is_empty() => break,
            Some('!') if brackets.is_empty() => break,
            Some(c) if is_whitespace(c) => {
                let had_newline = consume_whitespace_run(scanner);
                if had_newline {
                    buffer.push('\n');
                } else {
                    buffer.push(' ');
                }
            }
            Some(c) => {
                scanner.read();
                buffer.push(c);
            }
        }
    }

    if !brackets.is_empty() {
        return Err(scanner.error("expected more input."));
    }

    Ok(buffer.trim().to_string())
}

fn consume_whitespace_run(scanner: &mut Scanner) -> bool {
    let mut had_newline = false;
    while let Some(c) = scanner.peek(0) {
        if c == '\n' {
            had_newline = true;
            scanner.read();
        } else if is_whitespace(c) {
            scanner.read();
        } else {
            break;
        }
    }
    had_newline
}

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        _ => unreachable!(),
    }
}

/// Raw quoted string preserved verbatim (including its quote characters),
/// for use inside `declaration_value`, which treats strings as opaque
/// text rather than resolving their escapes.
pub fn raw_quoted_string(scanner: &mut Scanner) -> SassResult<String> {
    let quote = match scanner.peek(0) {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(scanner.error("Expected string.")),
    };
    let mut buffer = String::new();
    buffer.push(quote);
    scanner.read();
    loop {
        match scanner.peek(0) {
            Some(c) if c == quote => {
                buffer.push(c);
                scanner.read();
                return Ok(buffer);
            }
            Some('\n') | None => return Err(scanner.error("Expected string.")),
            Some('\\') => {
                buffer.push('\\');
                scanner.read();
                if let Some(next) = scanner.peek(0) {
                    buffer.push(next);
                    scanner.read();
                }
            }
            Some(c) => {
                buffer.push(c);
                scanner.read();
            }
        }
    }
}

/// Zero-width lookahead: would the characters from here start an
/// identifier?
pub fn looking_at_identifier(scanner: &Scanner) -> bool {
    crate::parse::chars::looking_at_identifier(scanner.peek(0), scanner.peek(1), scanner.peek(2))
}

/// Zero-width lookahead: would the characters from here start a number?
pub fn looking_at_number(scanner: &Scanner) -> bool {
    crate::parse::chars::looking_at_number(scanner.peek(0), scanner.peek(1), scanner.peek(2))
}
