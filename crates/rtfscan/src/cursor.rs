//! Positional reader over the raw document bytes.
//!
//! The cursor hands out one byte at a time widened to a `char` (RTF is a 7-bit
//! format; anything above 0x7F is passed through as Latin-1), supports exactly
//! one step of pushback, and reads fixed-length binary runs verbatim. Column
//! tracking follows reads and unreads; line tracking belongs to the caller,
//! which observes the newline characters itself.

use crate::error::ErrorKind;

#[derive(Debug)]
pub(crate) struct ByteCursor<'src> {
    input: &'src [u8],
    pos: usize,
    column: usize,
}

impl<'src> ByteCursor<'src> {
    pub(crate) fn new(input: &'src [u8]) -> Self {
        Self {
            input,
            pos: 0,
            column: 0,
        }
    }

    pub(crate) fn read_char(&mut self) -> Result<char, ErrorKind> {
        let byte = *self
            .input
            .get(self.pos)
            .ok_or(ErrorKind::UnexpectedEndOfInput)?;
        self.pos += 1;
        self.column += 1;
        Ok(char::from(byte))
    }

    pub(crate) fn unread_char(&mut self) -> Result<(), ErrorKind> {
        if self.pos == 0 {
            return Err(ErrorKind::AtBeginning);
        }
        self.pos -= 1;
        self.column = self.column.saturating_sub(1);
        Ok(())
    }

    /// Reads the next `len` bytes without interpreting them.
    pub(crate) fn read_raw_bytes(&mut self, len: usize) -> Result<&'src [u8], ErrorKind> {
        let available = self.input.len() - self.pos;
        if len > available {
            return Err(ErrorKind::TruncatedBinaryRun {
                wanted: len,
                available,
            });
        }
        let bytes = &self.input[self.pos..self.pos + len];
        self.pos += len;
        self.column += len;
        Ok(bytes)
    }

    #[inline]
    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    #[inline]
    pub(crate) fn column(&self) -> usize {
        self.column
    }

    /// Called by the scanner after it consumes a line feed.
    #[inline]
    pub(crate) fn reset_column(&mut self) {
        self.column = 0;
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }
}
