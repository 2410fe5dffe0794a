//! Routing of decoded text and binary runs to the active destination.

use tracing::debug;

use super::context::ParseContext;
use crate::{document::Document, error::ErrorKind};

pub(super) const REPLACEMENT: &str = "\u{fffd}";

impl<D: Document> ParseContext<'_, D> {
    /// Buffers `text` for the active destination, first discarding as many
    /// characters as the pending `\u` fallback skip still covers.
    pub(super) fn append_text(&mut self, text: &str) -> Result<(), ErrorKind> {
        let scope = self.scopes.top_mut().ok_or(ErrorKind::UnbalancedGroup)?;
        scope.first = false;

        let mut text = text;
        if scope.skip_chars > 0 {
            let len = text.chars().count();
            if scope.skip_chars >= len {
                scope.skip_chars -= len;
                return Ok(());
            }
            let cut = text
                .char_indices()
                .nth(scope.skip_chars)
                .map_or(text.len(), |(i, _)| i);
            text = &text[cut..];
            scope.skip_chars = 0;
        }

        let lone_surrogate = self.pending_surrogate.take().is_some();
        if scope.destination.is_none() || scope.skip_destination {
            return Ok(());
        }
        if lone_surrogate {
            debug!("unpaired high surrogate replaced");
            self.text.push_str(REPLACEMENT);
        }
        self.text.push_str(text);
        Ok(())
    }

    /// Counts one undecodable character against the pending skip without
    /// producing text.
    pub(super) fn discard_char(&mut self) -> Result<(), ErrorKind> {
        let scope = self.top_mut()?;
        scope.first = false;
        scope.skip_chars = scope.skip_chars.saturating_sub(1);
        Ok(())
    }

    /// Flushes buffered text to the active destination.
    pub(super) fn apply_text(&mut self) -> Result<(), ErrorKind> {
        if self.text.is_empty() {
            return Ok(());
        }
        let scope = self.top()?;
        if scope.skip_destination {
            self.text.clear();
            return Ok(());
        }
        let handle = scope
            .destination
            .clone()
            .ok_or(ErrorKind::NoRoutableDestination)?;

        let mut text = core::mem::take(&mut self.text);
        self.dispatch(&handle, |d, cx| d.append_text(cx, &text))?;
        // Keep the allocation for the next run.
        text.clear();
        self.text = text;
        Ok(())
    }

    /// Routes one binary run. A whole run counts as a single fallback
    /// character for `\u` skipping.
    pub(super) fn apply_blob(&mut self, data: &[u8]) -> Result<(), ErrorKind> {
        let scope = self.top_mut()?;
        scope.first = false;
        if scope.skip_chars > 0 {
            scope.skip_chars -= 1;
            return Ok(());
        }
        self.flush_lone_surrogate()?;
        self.apply_text()?;

        let scope = self.top()?;
        if scope.skip_destination {
            return Ok(());
        }
        let handle = scope
            .destination
            .clone()
            .ok_or(ErrorKind::NoRoutableDestination)?;
        self.dispatch(&handle, |d, cx| d.handle_blob(cx, data))
    }

    /// A literal character from the input. Bytes above 0x7F are text in the
    /// active code page.
    pub(super) fn literal(&mut self, ch: char) -> Result<(), ErrorKind> {
        if ch.is_ascii() {
            let mut buf = [0; 4];
            return self.append_text(ch.encode_utf8(&mut buf));
        }
        self.decode_byte(u32::from(ch))
    }

    /// Decodes one code-page value (a byte, or a packed double-byte pair).
    pub(super) fn decode_byte(&mut self, value: u32) -> Result<(), ErrorKind> {
        let codepage = self.active_codepage();
        match self.parser.codepages.decode(codepage, value) {
            Some(text) => self.append_text(&text),
            None => {
                debug!(codepage, value, "no mapping in code page");
                self.discard_char()
            }
        }
    }

    /// Replaces a high surrogate that never received its low half. The
    /// replacement is buffered directly and does not count against a pending
    /// fallback skip.
    pub(super) fn flush_lone_surrogate(&mut self) -> Result<(), ErrorKind> {
        if self.pending_surrogate.take().is_none() {
            return Ok(());
        }
        debug!("unpaired high surrogate replaced");
        let scope = self.top()?;
        if scope.destination.is_some() && !scope.skip_destination {
            self.text.push_str(REPLACEMENT);
        }
        Ok(())
    }
}
