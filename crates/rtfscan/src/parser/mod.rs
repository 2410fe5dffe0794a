//! The RTF scanner.
//!
//! A parse walks the whole document once, synchronously: braces open and
//! close scopes, backslash escapes are lexed into control words and either
//! handled here (the reserved escaping and Unicode keywords) or forwarded to
//! the active destination, and runs of literal text are buffered and flushed
//! to the destination whenever anything else interrupts them. When the root
//! group closes, deferred destination work is joined and the parse completes.
//!
//! # Examples
//!
//! ```rust
//! use rtfscan::{Destination, DestinationCx, DestinationRegistry, ErrorKind, Instruction, Parser, Registration};
//!
//! struct Body;
//!
//! impl Destination<Vec<Instruction>> for Body {
//!     fn append_text(
//!         &mut self,
//!         _cx: &mut DestinationCx<'_, Vec<Instruction>>,
//!         text: &str,
//!     ) -> Result<(), ErrorKind> {
//!         println!("{text}");
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = DestinationRegistry::<Vec<Instruction>>::new();
//! registry.register("rtf", Registration::constructor(|_, _, _| Box::new(Body)));
//!
//! let mut doc: Vec<Instruction> = Vec::new();
//! Parser::new(registry)
//!     .parse(br"{\rtf1 Hello {\b bold} world}", &mut doc)
//!     .unwrap();
//! // One character/paragraph pair per closed group.
//! assert_eq!(doc.len(), 4);
//! ```

mod context;
mod keywords;
mod router;

use context::ParseContext;
use tracing::debug;

use crate::{
    document::Document,
    error::{ErrorKind, ParserError},
    options::ParserOptions,
    registry::DestinationRegistry,
    tables::{CodepageTable, SymbolTable, WindowsCodepages},
};

/// Parses complete RTF documents into destination events and an instruction
/// stream.
///
/// A `Parser` holds everything that is shared between parses: the destination
/// registry, the code-page and symbol tables, and the options. All per-parse
/// state lives in a context created by [`Parser::parse`].
pub struct Parser<D> {
    registry: DestinationRegistry<D>,
    codepages: Box<dyn CodepageTable>,
    symbols: Box<dyn SymbolTable>,
    options: ParserOptions,
}

impl<D: Document> Parser<D> {
    /// Creates a parser with `encoding_rs` code pages, no symbol
    /// substitutions and default options.
    #[must_use]
    pub fn new(registry: DestinationRegistry<D>) -> Self {
        Self {
            registry,
            codepages: Box::new(WindowsCodepages),
            symbols: Box::new(()),
            options: ParserOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_codepages(mut self, codepages: impl CodepageTable + 'static) -> Self {
        self.codepages = Box::new(codepages);
        self
    }

    #[must_use]
    pub fn with_symbols(mut self, symbols: impl SymbolTable + 'static) -> Self {
        self.symbols = Box::new(symbols);
        self
    }

    pub fn registry_mut(&mut self) -> &mut DestinationRegistry<D> {
        &mut self.registry
    }

    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses `input` into `doc`.
    ///
    /// Returns once the root group has closed and every deferred task
    /// registered by a destination has finished.
    ///
    /// # Errors
    ///
    /// Any malformed input or destination failure aborts the parse; the error
    /// carries the line and column at which the scan stopped. Whatever was
    /// delivered to `doc` before the failure must be discarded by the caller.
    pub fn parse(&self, input: &[u8], doc: &mut D) -> Result<(), ParserError> {
        let mut cx = ParseContext::new(self, input, doc);
        let scanned = cx.run();
        let (line, column) = cx.position();
        let tasks = cx.into_tasks();

        let result = match scanned {
            Ok(()) => {
                if !tasks.is_empty() {
                    debug!(count = tasks.len(), "waiting for deferred tasks");
                }
                tasks.join_all()
            }
            Err(kind) => {
                // Tasks cannot be cancelled; wait for them before reporting.
                let _ = tasks.join_all();
                Err(kind)
            }
        };

        result.map_err(|kind| self.fail(kind, line, column))
    }

    fn fail(&self, kind: ErrorKind, line: usize, column: usize) -> ParserError {
        let err = ParserError::new(kind, line, column);
        #[cfg(any(test, feature = "fuzzing"))]
        if self.options.panic_on_error {
            panic!("{err}");
        }
        err
    }
}

impl<D> core::fmt::Debug for Parser<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Parser")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
