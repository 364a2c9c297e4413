//! Key events and their textual notation.
//!
//! Notation follows the conventional transcription used by the test suites:
//! a bare character is a plain keypress, `C-x`/`M-x` are modified keys,
//! `SPC`/`TAB`/`RET`/`DEL`/`ESC` and arrow names denote non-printable keys,
//! and a leading backslash escapes a literal character (`\(` is `(`).

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyParseError {
    #[error("unknown key token: {0}")]
    UnknownToken(String),
    #[error("unterminated directive: {0}")]
    UnterminatedDirective(String),
    #[error("malformed directive: {0}")]
    MalformedDirective(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Modifiers {
    pub control: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        control: false,
        meta: false,
    };

    pub fn is_empty(&self) -> bool {
        !self.control && !self.meta
    }
}

/// Logical key value. `Chord` carries the token a resolved multi-key chord
/// maps to in the typing rule; it never appears in raw input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Keyval {
    Char(char),
    Return,
    Tab,
    Backspace,
    Escape,
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    LeftShift,
    RightShift,
    Chord(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub keyval: Keyval,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn plain(keyval: Keyval) -> Self {
        Self {
            keyval,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn from_char(c: char) -> Self {
        Self::plain(Keyval::Char(c))
    }

    /// Parse a single key token (`a`, `C-g`, `SPC`, `\(`).
    pub fn parse(token: &str) -> Result<Self, KeyParseError> {
        let mut modifiers = Modifiers::NONE;
        let mut rest = token;
        loop {
            if let Some(r) = rest.strip_prefix("C-") {
                // Bare "C-" would leave nothing to parse.
                if r.is_empty() {
                    break;
                }
                modifiers.control = true;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("M-") {
                if r.is_empty() {
                    break;
                }
                modifiers.meta = true;
                rest = r;
            } else {
                break;
            }
        }
        let keyval = match rest {
            "SPC" => Keyval::Char(' '),
            "TAB" => Keyval::Tab,
            "RET" | "\n" => Keyval::Return,
            "DEL" => Keyval::Backspace,
            "ESC" => Keyval::Escape,
            "Left" => Keyval::Left,
            "Right" => Keyval::Right,
            "Up" => Keyval::Up,
            "Down" => Keyval::Down,
            "PageUp" => Keyval::PageUp,
            "PageDown" => Keyval::PageDown,
            "lshift" => Keyval::LeftShift,
            "rshift" => Keyval::RightShift,
            _ => {
                let mut chars = rest.chars();
                match (chars.next(), chars.next(), chars.next()) {
                    (Some(c), None, _) => Keyval::Char(c),
                    // Escaped literal, e.g. "\(" or "\\".
                    (Some('\\'), Some(c), None) => Keyval::Char(c),
                    _ => return Err(KeyParseError::UnknownToken(token.to_string())),
                }
            }
        };
        Ok(Self { keyval, modifiers })
    }

    /// Notation used for keymap lookup; inverse of `parse` for plain tokens.
    pub fn notation(&self) -> String {
        let mut out = String::new();
        if self.modifiers.control {
            out.push_str("C-");
        }
        if self.modifiers.meta {
            out.push_str("M-");
        }
        match &self.keyval {
            Keyval::Char(' ') => out.push_str("SPC"),
            Keyval::Char(c) => out.push(*c),
            Keyval::Return => out.push_str("RET"),
            Keyval::Tab => out.push_str("TAB"),
            Keyval::Backspace => out.push_str("DEL"),
            Keyval::Escape => out.push_str("ESC"),
            Keyval::Left => out.push_str("Left"),
            Keyval::Right => out.push_str("Right"),
            Keyval::Up => out.push_str("Up"),
            Keyval::Down => out.push_str("Down"),
            Keyval::PageUp => out.push_str("PageUp"),
            Keyval::PageDown => out.push_str("PageDown"),
            Keyval::LeftShift => out.push_str("lshift"),
            Keyval::RightShift => out.push_str("rshift"),
            Keyval::Chord(token) => out.push_str(token),
        }
        out
    }

    /// The character this event inserts when no command is bound, if any.
    pub fn printable(&self) -> Option<char> {
        match self.keyval {
            Keyval::Char(c) if self.modifiers.is_empty() => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}

/// One item of a textual key sequence. `Release` and `Sleep` come from the
/// parenthesized test directives and drive chord recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeqItem {
    Press(KeyEvent),
    Release(KeyEvent),
    /// Advance the virtual clock by this many microseconds.
    Sleep(u64),
}

/// Parse a space-separated key sequence, e.g. `"A i SPC (usleep 200000)"`.
pub fn parse_sequence(input: &str) -> Result<Vec<SeqItem>, KeyParseError> {
    let mut items = Vec::new();
    let mut tokens = input.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        if let Some(body) = token.strip_prefix('(') {
            // Directives may span two whitespace-separated tokens.
            let mut directive = body.to_string();
            while !directive.ends_with(')') {
                match tokens.next() {
                    Some(next) => {
                        directive.push(' ');
                        directive.push_str(next);
                    }
                    None => return Err(KeyParseError::UnterminatedDirective(token.to_string())),
                }
            }
            directive.pop();
            let mut parts = directive.split(' ');
            match (parts.next(), parts.next()) {
                (Some("release"), Some(key)) => {
                    items.push(SeqItem::Release(KeyEvent::parse(key)?));
                }
                (Some("usleep"), Some(n)) => {
                    let usec = n
                        .parse::<u64>()
                        .map_err(|_| KeyParseError::MalformedDirective(directive.clone()))?;
                    items.push(SeqItem::Sleep(usec));
                }
                (Some("lshift"), None) => {
                    items.push(SeqItem::Press(KeyEvent::plain(Keyval::LeftShift)));
                }
                (Some("rshift"), None) => {
                    items.push(SeqItem::Press(KeyEvent::plain(Keyval::RightShift)));
                }
                _ => return Err(KeyParseError::MalformedDirective(directive)),
            }
        } else {
            items.push(SeqItem::Press(KeyEvent::parse(token)?));
        }
    }
    Ok(items)
}
