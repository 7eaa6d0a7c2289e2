// This file is part of bcc, a compiler for the B programming language.
// Copyright 2026 The bcc Authors.
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// bcc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// bcc is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with bcc.  If not, see <http://www.gnu.org/licenses/>.

//! Lexical primitives shared by every producer in [`super::emit`].
//!
//! There is no token stream here, only a handful of free functions that each
//! read one lexical construct from an [`Input`] and leave the cursor
//! positioned just past it (or, on a non-match, positioned as if nothing had
//! been consumed).

use std::fmt::{self, Display, Formatter};

use super::input::Input;

// -----------------------------------------------------------------------------

/// Result of [`read_number`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Number {
    /// End of file was reached before any digit was read.
    Eof,

    /// A (possibly empty) run of digits was read and accumulated in base 10,
    /// with silent wraparound on overflow. Zero digits read yields `Value(0)`.
    Value(u64),
}

/// A fatal lexical error: an escape sequence the character-literal reader
/// does not recognize, or a character literal that never closes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LexError {
    /// `*<byte>` is not one of the recognized escape selectors.
    UnknownEscape(u8),

    /// `word_size` characters were read and the next byte was not `'`.
    UnclosedCharLiteral,
}

impl Display for LexError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            LexError::UnknownEscape(b) => {
                write!(f, "unknown escape sequence '*{}'", b as char)
            }
            LexError::UnclosedCharLiteral => {
                write!(f, "unclosed character literal")
            }
        }
    }
}

// -----------------------------------------------------------------------------

/// Consumes and discards a run of whitespace. Comments are not recognized.
/// Leaves the cursor positioned just after the run, i.e. at the first
/// non-whitespace byte or at end of file.
pub fn skip_whitespace(input: &mut Input) {
    loop {
        match input.next() {
            Some(b) if b.is_ascii_whitespace() => continue,
            Some(_) => { input.unget(); return; }
            None    => return,
        }
    }
}

/// Reads the longest run of identifier bytes: an alphabetic first byte
/// followed by zero or more alphanumeric bytes. Skips leading whitespace
/// first. Returns `None` if the input (after whitespace) does not begin with
/// an alphabetic byte; in that case no bytes are consumed.
pub fn read_ident(input: &mut Input) -> Option<String> {
    skip_whitespace(input);

    let first = match input.next() {
        Some(b) if b.is_ascii_alphabetic() => b,
        Some(_) => { input.unget(); return None; }
        None    => return None,
    };

    let mut ident = String::new();
    ident.push(first as char);

    loop {
        match input.next() {
            Some(b) if b.is_ascii_alphanumeric() => ident.push(b as char),
            Some(_) => { input.unget(); break; }
            None    => break,
        }
    }

    Some(ident)
}

/// Reads a run of decimal digits, skipping leading whitespace first. See
/// [`Number`] for the precise end-of-file/no-digits distinction.
pub fn read_number(input: &mut Input) -> Number {
    skip_whitespace(input);

    let mut value   = 0u64;
    let mut any_digit = false;

    loop {
        match input.next() {
            Some(b) if b.is_ascii_digit() => {
                any_digit = true;
                value = value.wrapping_mul(10).wrapping_add((b - b'0') as u64);
            }
            Some(_) => { input.unget(); break; }
            None => {
                if !any_digit {
                    return Number::Eof;
                }
                break;
            }
        }
    }

    Number::Value(value)
}

/// Decodes the byte selected by a `*x` escape, per the escape table below.
///
/// | Escape | Decoded byte |
/// |--------|--------------|
/// | `*0`, `*e` | NUL (`0x00`) |
/// | `*(`, `*)`, `**`, `*'`, `*"` | the literal character |
/// | `*t` | TAB |
/// | `*n` | LF |
fn decode_escape(selector: u8) -> Option<u8> {
    match selector {
        b'0' | b'e'                           => Some(0x00),
        b'(' | b')' | b'*' | b'\'' | b'"'      => Some(selector),
        b't'                                   => Some(b'\t'),
        b'n'                                   => Some(b'\n'),
        _                                      => None,
    }
}

/// Reads a character literal, called just after the opening `'` has been
/// consumed. Reads up to `word_size` characters, packing each into the
/// result word little-endian at byte offset `i` (the i-th character read
/// occupies bits `[i*8, i*8+7]`). A closing `'` terminates the literal early.
/// `*` introduces an escape per [`decode_escape`]; an unrecognized selector
/// is a fatal error. If `word_size` characters are read without a closing
/// `'`, the next byte must be `'`, or the literal is unclosed (fatal).
pub fn read_char_literal(input: &mut Input, word_size: usize) -> Result<u64, LexError> {
    let mut value = 0u64;

    for i in 0..word_size {
        let byte = match input.next() {
            Some(b'\'') => return Ok(value),
            Some(b'*') => {
                let selector = input.next().unwrap_or(0);
                match decode_escape(selector) {
                    Some(b) => b,
                    None    => return Err(LexError::UnknownEscape(selector)),
                }
            }
            Some(b) => b,
            None => return Err(LexError::UnclosedCharLiteral),
        };

        value |= (byte as u64) << (i * 8);
    }

    match input.next() {
        Some(b'\'') => Ok(value),
        _           => Err(LexError::UnclosedCharLiteral),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_whitespace_consumes_run() {
        let mut input = Input::new(b"   \t\nx");
        skip_whitespace(&mut input);
        assert_eq!(input.next(), Some(b'x'));
    }

    #[test]
    fn skip_whitespace_noop_at_nonblank() {
        let mut input = Input::new(b"x");
        skip_whitespace(&mut input);
        assert_eq!(input.next(), Some(b'x'));
    }

    #[test]
    fn read_ident_basic() {
        let mut input = Input::new(b"foo123 bar");
        assert_eq!(read_ident(&mut input), Some("foo123".to_string()));
        assert_eq!(input.next(), Some(b' '));
    }

    #[test]
    fn read_ident_rejects_leading_digit() {
        let mut input = Input::new(b"123abc");
        assert_eq!(read_ident(&mut input), None);
        assert_eq!(input.next(), Some(b'1'));
    }

    #[test]
    fn read_ident_skips_leading_whitespace() {
        let mut input = Input::new(b"   foo;");
        assert_eq!(read_ident(&mut input), Some("foo".to_string()));
        assert_eq!(input.next(), Some(b';'));
    }

    #[test]
    fn read_ident_empty_at_eof() {
        let mut input = Input::new(b"");
        assert_eq!(read_ident(&mut input), None);
    }

    #[test]
    fn read_number_basic() {
        let mut input = Input::new(b"42;");
        assert_eq!(read_number(&mut input), Number::Value(42));
        assert_eq!(input.next(), Some(b';'));
    }

    #[test]
    fn read_number_zero_digits_nondigit() {
        let mut input = Input::new(b";");
        assert_eq!(read_number(&mut input), Number::Value(0));
        assert_eq!(input.next(), Some(b';'));
    }

    #[test]
    fn read_number_eof_without_digits() {
        let mut input = Input::new(b"");
        assert_eq!(read_number(&mut input), Number::Eof);
    }

    #[test]
    fn read_number_wraps_on_overflow() {
        let mut input = Input::new(b"99999999999999999999999;");
        match read_number(&mut input) {
            Number::Value(_) => {}
            Number::Eof      => panic!("expected a wrapped value"),
        }
    }

    #[test]
    fn char_literal_single_byte() {
        let mut input = Input::new(b"a';");
        assert_eq!(read_char_literal(&mut input, 8), Ok(b'a' as u64));
    }

    #[test]
    fn char_literal_packs_little_endian() {
        let mut input = Input::new(b"ab';");
        let value = read_char_literal(&mut input, 8).unwrap();
        assert_eq!(value, 'a' as u64 | ('b' as u64) << 8);
    }

    #[test]
    fn char_literal_empty_is_zero() {
        let mut input = Input::new(b"';");
        assert_eq!(read_char_literal(&mut input, 8), Ok(0));
    }

    #[test]
    fn char_literal_escape_nul() {
        let mut input = Input::new(b"*0';");
        assert_eq!(read_char_literal(&mut input, 8), Ok(0));
    }

    #[test]
    fn char_literal_escape_tab_and_newline() {
        let mut input = Input::new(b"*t*n';");
        let value = read_char_literal(&mut input, 8).unwrap();
        assert_eq!(value, (b'\t' as u64) | (b'\n' as u64) << 8);
    }

    #[test]
    fn char_literal_escape_quote() {
        let mut input = Input::new(b"*'';");
        assert_eq!(read_char_literal(&mut input, 8), Ok(b'\'' as u64));
    }

    #[test]
    fn char_literal_unknown_escape_is_fatal() {
        let mut input = Input::new(b"*qZ");
        assert_eq!(read_char_literal(&mut input, 8), Err(LexError::UnknownEscape(b'q')));
    }

    #[test]
    fn char_literal_exact_word_size_requires_closing_quote() {
        let mut input = Input::new(b"abcdefgh';");
        assert_eq!(read_char_literal(&mut input, 8), Ok(u64::from_le_bytes(*b"abcdefgh")));
    }

    #[test]
    fn char_literal_too_long_is_fatal() {
        let mut input = Input::new(b"abcdefghi';");
        assert_eq!(read_char_literal(&mut input, 8), Err(LexError::UnclosedCharLiteral));
    }

    #[test]
    fn char_literal_eof_is_fatal() {
        let mut input = Input::new(b"ab");
        assert_eq!(read_char_literal(&mut input, 8), Err(LexError::UnclosedCharLiteral));
    }
}
