use tracing::debug;

use super::Parser;
use crate::{
    cursor::ByteCursor,
    destination::{Destination, DestinationCx, Handle},
    document::Document,
    error::ErrorKind,
    props::{CharWidth, Instruction},
    scope::{Scope, ScopeStack},
    tasks::PendingTasks,
};

/// Stack depth with no group open: just the base scope.
const BASE_DEPTH: usize = 1;

/// How a scan invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ScanExit {
    /// The scope that was open when the scan started has been closed.
    Closed,
    /// A `}` would have closed a scope opened before the scan started. It has
    /// been pushed back for the caller.
    Boundary,
    EndOfInput,
}

/// All state of one parse. Created by [`Parser::parse`] and dropped when it
/// returns.
pub(super) struct ParseContext<'p, D> {
    pub(super) parser: &'p Parser<D>,
    pub(super) cursor: ByteCursor<'p>,
    pub(super) line: usize,
    pub(super) scopes: ScopeStack<D>,
    /// Document code page, changed by destinations handling `\ansicpg`.
    pub(super) codepage: u16,
    /// Text decoded since the last flush.
    pub(super) text: String,
    /// A high surrogate from `\u` waiting for its low half.
    pub(super) pending_surrogate: Option<u16>,
    pub(super) tasks: PendingTasks,
    pub(super) doc: &'p mut D,
}

impl<'p, D: Document> ParseContext<'p, D> {
    pub(super) fn new(parser: &'p Parser<D>, input: &'p [u8], doc: &'p mut D) -> Self {
        // The base scope sits below the outermost group; closing that group
        // restores it like any other parent.
        let mut scopes = ScopeStack::new();
        scopes.push(false);
        Self {
            parser,
            cursor: ByteCursor::new(input),
            line: 1,
            scopes,
            codepage: parser.options.default_codepage,
            text: String::new(),
            pending_surrogate: None,
            tasks: PendingTasks::new(),
            doc,
        }
    }

    pub(super) fn position(&self) -> (usize, usize) {
        (self.line, self.cursor.column())
    }

    pub(super) fn into_tasks(self) -> PendingTasks {
        self.tasks
    }

    /// Scans the whole document.
    pub(super) fn run(&mut self) -> Result<(), ErrorKind> {
        match self.cursor.read_char() {
            Ok('{') => self.cursor.unread_char()?,
            Ok(_) => return Err(ErrorKind::NotAnRtfDocument),
            Err(_) => return Err(ErrorKind::TruncatedDocument),
        }

        self.scan(false, true)?;

        if self.open_groups() > 0 {
            return Err(ErrorKind::TruncatedDocument);
        }
        if !self.cursor.at_end() {
            debug!(
                bytes = self.cursor.remaining(),
                "ignoring content after the root group"
            );
        }
        Ok(())
    }

    /// The character loop. Re-entered for the `\upr` fallback branch, in
    /// which case `skip` discards everything the nested scan reads.
    pub(super) fn scan(&mut self, skip: bool, process: bool) -> Result<ScanExit, ErrorKind> {
        let start = self.scopes.depth();
        while !self.cursor.at_end() {
            let pending_bin = self.scopes.top().map_or(0, |s| s.bin_data);
            if pending_bin > 0 {
                let data = self.cursor.read_raw_bytes(pending_bin)?;
                self.top_mut()?.bin_data = 0;
                if !skip {
                    self.apply_blob(data)?;
                }
                continue;
            }

            match self.cursor.read_char()? {
                '\r' => {}
                '\n' => self.newline(),
                '{' => self.push_state(skip)?,
                '}' => {
                    if self.scopes.depth() == start {
                        self.cursor.unread_char()?;
                        return Ok(ScanExit::Boundary);
                    }
                    self.pop_state()?;
                    if self.scopes.depth() == start {
                        return Ok(ScanExit::Closed);
                    }
                }
                '\\' => self.escape(!skip && process)?,
                ch if !skip => self.literal(ch)?,
                _ => {}
            }
        }
        Ok(ScanExit::EndOfInput)
    }

    pub(super) fn newline(&mut self) {
        self.line += 1;
        self.cursor.reset_column();
    }

    /// Groups opened by `{` and not yet closed.
    fn open_groups(&self) -> usize {
        self.scopes.depth().saturating_sub(BASE_DEPTH)
    }

    pub(super) fn top(&self) -> Result<&Scope<D>, ErrorKind> {
        self.scopes.top().ok_or(ErrorKind::UnbalancedGroup)
    }

    pub(super) fn top_mut(&mut self) -> Result<&mut Scope<D>, ErrorKind> {
        self.scopes.top_mut().ok_or(ErrorKind::UnbalancedGroup)
    }

    pub(super) fn double_byte(&self) -> bool {
        self.scopes
            .top()
            .is_some_and(|s| s.pap.char_width == CharWidth::DoubleByte)
    }

    /// The code page for `\'hh` escapes: the selected font's charset if the
    /// document knows one, else the document code page.
    pub(super) fn active_codepage(&self) -> u16 {
        self.scopes
            .top()
            .and_then(|s| s.chp.font)
            .and_then(|font| self.doc.font_codepage(font))
            .unwrap_or(self.codepage)
    }

    // ---------------------------------------------------------------------------------------------
    // Scope stack
    // ---------------------------------------------------------------------------------------------

    pub(super) fn push_state(&mut self, force_skip: bool) -> Result<(), ErrorKind> {
        let limit = self.parser.options.max_nesting;
        if self.open_groups() >= limit {
            return Err(ErrorKind::NestingTooDeep(limit));
        }
        self.apply_text()?;

        let parent_destination = match self.scopes.top() {
            Some(top) if !force_skip && !top.skip_destination => top.destination.clone(),
            _ => None,
        };
        self.scopes.push(force_skip);

        if let Some(parent) = parent_destination {
            if let Some(sub) = self.dispatch(&parent, |d, cx| Ok(d.sub(cx)))? {
                self.top_mut()?.destination = Some(Handle::new(sub));
            }
        }
        Ok(())
    }

    pub(super) fn pop_state(&mut self) -> Result<(), ErrorKind> {
        if self.open_groups() == 0 {
            return Err(ErrorKind::UnbalancedGroup);
        }
        self.flush_lone_surrogate()?;
        self.apply_text()?;
        self.finalize_destination()?;
        self.scopes.pop();

        if let Some(restored) = self.scopes.top() {
            self.doc
                .push_instruction(Instruction::SetCharProps(restored.chp.clone()));
            self.doc
                .push_instruction(Instruction::SetParaProps(restored.pap.clone()));
        }
        Ok(())
    }

    /// Applies the top scope's destination unless its parent scope still
    /// uses the same instance.
    fn finalize_destination(&mut self) -> Result<(), ErrorKind> {
        let Some(handle) = self.scopes.top().and_then(|s| s.destination.clone()) else {
            return Ok(());
        };
        let shared = self
            .scopes
            .parent()
            .and_then(|p| p.destination.as_ref())
            .is_some_and(|p| p.same(&handle));
        if shared {
            return Ok(());
        }
        self.dispatch(&handle, |d, cx| d.apply(cx))?;
        self.top_mut()?.destination = None;
        Ok(())
    }

    // ---------------------------------------------------------------------------------------------
    // Destinations
    // ---------------------------------------------------------------------------------------------

    /// Installs the destination registered for `name` in the top scope.
    /// Returns `false` if nothing is registered under that name.
    pub(super) fn change_destination(
        &mut self,
        name: &str,
        param: Option<i32>,
    ) -> Result<bool, ErrorKind> {
        let parser = self.parser;
        let registry = &parser.registry;
        if registry.lookup(name).is_none() {
            return Ok(false);
        }
        self.apply_text()?;
        self.finalize_destination()?;

        let Some(destination) = self.with_cx(|cx| registry.construct(cx, name, param))? else {
            return Ok(false);
        };
        self.top_mut()?.destination = Some(Handle::new(destination));
        debug!(destination = name, "destination installed");
        Ok(true)
    }

    /// Runs `f` against `handle` with a context borrowed from the top scope.
    pub(super) fn dispatch<R>(
        &mut self,
        handle: &Handle<D>,
        f: impl FnOnce(&mut dyn Destination<D>, &mut DestinationCx<'_, D>) -> Result<R, ErrorKind>,
    ) -> Result<R, ErrorKind> {
        self.with_cx(|cx| handle.with(|destination| f(destination, cx)))?
    }

    fn with_cx<R>(&mut self, f: impl FnOnce(&mut DestinationCx<'_, D>) -> R) -> Result<R, ErrorKind> {
        let scope = self.scopes.top_mut().ok_or(ErrorKind::UnbalancedGroup)?;
        let mut cx = DestinationCx {
            doc: &mut *self.doc,
            chp: &mut scope.chp,
            pap: &mut scope.pap,
            codepage: &mut self.codepage,
            uc_width: scope.uc_width,
            tasks: &mut self.tasks,
        };
        Ok(f(&mut cx))
    }
}
