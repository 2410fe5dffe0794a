//! Lexing of backslash escapes.
//!
//! After a `\` the scanner sees one of three shapes:
//! - `\'hh`: a byte in the active code page (two bytes in double-byte mode).
//! - `\word` or `\word-123`: a control word with an optional signed
//!   parameter, delimited by one optional space.
//! - `\x` for any other single character: a control symbol such as `\{`,
//!   `\*` or an escaped line break.

use bstr::BString;

use crate::{cursor::ByteCursor, error::ErrorKind};

pub(crate) const MAX_KEYWORD_LEN: usize = 30;
pub(crate) const MAX_PARAM_DIGITS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Escape {
    /// `\'hh`, or a lead/trail byte pair packed big-endian.
    Hex(u32),
    Word { name: String, param: Option<i32> },
    Symbol(char),
}

impl Escape {
    /// Lexes the escape following a `\` that has already been consumed.
    pub(crate) fn read(cursor: &mut ByteCursor<'_>, double_byte: bool) -> Result<Self, ErrorKind> {
        let ch = cursor.read_char()?;
        if ch == '\'' {
            return read_hex(cursor, double_byte).map(Escape::Hex);
        }
        if !ch.is_ascii_alphabetic() {
            return Ok(Escape::Symbol(ch));
        }

        let mut name = String::with_capacity(8);
        name.push(ch);
        let mut ch = cursor.read_char()?;
        while ch.is_ascii_alphabetic() {
            if name.len() == MAX_KEYWORD_LEN {
                return Err(ErrorKind::KeywordTooLong);
            }
            name.push(ch);
            ch = cursor.read_char()?;
        }

        let mut number = String::new();
        if ch == '-' {
            number.push(ch);
            ch = cursor.read_char()?;
        }
        let mut digits = 0;
        while ch.is_ascii_digit() {
            if digits == MAX_PARAM_DIGITS {
                return Err(ErrorKind::KeywordParamTooLong);
            }
            number.push(ch);
            digits += 1;
            ch = cursor.read_char()?;
        }
        let param = if number.is_empty() {
            None
        } else {
            Some(
                number
                    .parse::<i32>()
                    .map_err(|_| ErrorKind::InvalidKeywordParam(number))?,
            )
        };

        if ch != ' ' {
            cursor.unread_char()?;
        }
        Ok(Escape::Word { name, param })
    }
}

fn read_hex(cursor: &mut ByteCursor<'_>, double_byte: bool) -> Result<u32, ErrorKind> {
    let mut raw = BString::from(Vec::with_capacity(4));
    let mut value = read_hex_pair(cursor, &mut raw)?;
    if double_byte {
        // The trail byte is written either as two more digits or as a second
        // `\'hh` escape.
        if cursor.read_char()? == '\\' {
            let quote = cursor.read_char()?;
            if quote != '\'' {
                raw.extend_from_slice(b"\\");
                raw.push(ascii_byte(quote));
                return Err(ErrorKind::InvalidHexEscape(raw));
            }
        } else {
            cursor.unread_char()?;
        }
        value = (value << 8) | read_hex_pair(cursor, &mut raw)?;
    }
    Ok(value)
}

fn read_hex_pair(cursor: &mut ByteCursor<'_>, raw: &mut BString) -> Result<u32, ErrorKind> {
    let hi = cursor.read_char()?;
    let lo = cursor.read_char()?;
    raw.push(ascii_byte(hi));
    raw.push(ascii_byte(lo));
    match (hi.to_digit(16), lo.to_digit(16)) {
        (Some(h), Some(l)) => Ok((h << 4) | l),
        _ => Err(ErrorKind::InvalidHexEscape(core::mem::take(raw))),
    }
}

// Characters come from single input bytes, so they always fit.
fn ascii_byte(ch: char) -> u8 {
    u8::try_from(ch).unwrap_or(b'?')
}
