//! Processing of lexed escapes: the keywords the scanner reserves for itself
//! and the forwarding of everything else to destinations.

use tracing::{debug, trace};

use super::{context::ParseContext, router::REPLACEMENT};
use crate::{document::Document, error::ErrorKind, keyword::Escape};

impl<D: Document> ParseContext<'_, D> {
    /// Lexes the escape after a `\` and processes it. With `process` unset
    /// the escape is consumed without effect, except that `\bin` still arms
    /// its binary run so the payload is never read as markup.
    pub(super) fn escape(&mut self, process: bool) -> Result<(), ErrorKind> {
        let double_byte = self.double_byte();
        let escape = Escape::read(&mut self.cursor, double_byte)?;
        if escape == Escape::Symbol('\n') {
            self.newline();
        }
        // `scan` drains an armed run before reading the next escape.
        if self.top()?.bin_data > 0 {
            return Err(ErrorKind::KeywordDuringBinaryRun);
        }

        match escape {
            Escape::Word { ref name, param } if name == "bin" => self.arm_binary(param),
            _ if !process => Ok(()),
            Escape::Hex(value) => self.decode_byte(value),
            Escape::Word { name, param } => self.keyword(&name, param),
            Escape::Symbol(ch) => {
                let mut buf = [0; 4];
                self.keyword(ch.encode_utf8(&mut buf), None)
            }
        }
    }

    fn arm_binary(&mut self, param: Option<i32>) -> Result<(), ErrorKind> {
        let len = match param {
            None => return Err(ErrorKind::MissingBinaryLength),
            Some(n) => usize::try_from(n).map_err(|_| ErrorKind::InvalidBinaryLength(n))?,
        };
        let scope = self.top_mut()?;
        scope.first = false;
        scope.bin_data = len;
        Ok(())
    }

    fn keyword(&mut self, name: &str, param: Option<i32>) -> Result<(), ErrorKind> {
        let scope = self.top_mut()?;
        let first = scope.first;
        if first {
            if name == "*" {
                scope.skip_unknown_destination = true;
                return Ok(());
            }
            scope.first = false;
        }

        // Only a following \u can complete a pending high surrogate.
        if name != "u" {
            self.flush_lone_surrogate()?;
        }
        self.apply_text()?;
        if self.top()?.skip_destination {
            return Ok(());
        }

        match (name, param) {
            ("\n", _) => self.append_text("\n"),
            ("\r", _) => self.append_text("\r"),
            ("tab", _) => self.append_text("\t"),
            ("ldblquote", _) => self.append_text("\u{201c}"),
            ("rdblquote", _) => self.append_text("\u{201d}"),
            ("{" | "}" | "\\", _) => self.append_text(name),
            ("uc", Some(width)) if width >= 0 => {
                self.top_mut()?.uc_width = usize::try_from(width).unwrap_or_default();
                Ok(())
            }
            ("u", Some(code)) => self.unicode(code),
            ("upr", _) => {
                // {\upr{ansi fallback}{\*\ud{unicode}}}: the first group is
                // scanned and thrown away, the \ud branch is processed normally.
                let exit = self.scan(true, true)?;
                trace!(?exit, "skipped \\upr fallback");
                Ok(())
            }
            ("ud", _) => Ok(()),
            _ => self.forward_keyword(name, param, first),
        }
    }

    /// Sends an unreserved keyword to the destination machinery: as the first
    /// token of a scope it may name a new destination, otherwise it goes to
    /// the active destination's keyword handler.
    fn forward_keyword(
        &mut self,
        name: &str,
        param: Option<i32>,
        first: bool,
    ) -> Result<(), ErrorKind> {
        if first && self.change_destination(name, param)? {
            return Ok(());
        }

        let handled = match self.top()?.destination.clone() {
            Some(handle) => self.dispatch(&handle, |d, cx| d.handle_keyword(cx, name, param))?,
            None => {
                debug!(keyword = name, ?param, "keyword with no active destination");
                false
            }
        };
        if handled {
            return Ok(());
        }

        let scope = self.top_mut()?;
        if first && scope.skip_unknown_destination {
            trace!(keyword = name, "skipping unknown destination");
            scope.skip_destination = true;
        } else {
            trace!(keyword = name, ?param, "unhandled keyword");
        }
        Ok(())
    }

    /// `\uN`: one UTF-16 code unit, followed by `uc` fallback characters to
    /// discard.
    fn unicode(&mut self, code: i32) -> Result<(), ErrorKind> {
        let normalized = if code < 0 { code + 65536 } else { code };
        let unit = u16::try_from(normalized).map_err(|_| ErrorKind::InvalidUnicodeCodepoint(code))?;

        // A new escape ends whatever fallback the previous one announced.
        self.top_mut()?.skip_chars = 0;

        match unit {
            0xD800..=0xDBFF => {
                self.flush_lone_surrogate()?;
                self.pending_surrogate = Some(unit);
                self.top_mut()?.first = false;
            }
            0xDC00..=0xDFFF => match self.pending_surrogate.take() {
                Some(high) => {
                    let scalar = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                    let ch = char::from_u32(scalar).unwrap_or('\u{fffd}');
                    let mut buf = [0; 4];
                    self.append_text(ch.encode_utf8(&mut buf))?;
                }
                None => {
                    debug!(unit, "unpaired low surrogate replaced");
                    self.append_text(REPLACEMENT)?;
                }
            },
            _ => {
                let parser = self.parser;
                let hex = format!("{unit:x}");
                match parser.symbols.lookup(&hex) {
                    Some(symbol) => self.append_text(symbol)?,
                    None => {
                        let ch = char::from_u32(u32::from(unit)).unwrap_or('\u{fffd}');
                        let mut buf = [0; 4];
                        self.append_text(ch.encode_utf8(&mut buf))?;
                    }
                }
            }
        }

        let scope = self.top_mut()?;
        scope.skip_chars = scope.uc_width;
        Ok(())
    }
}
