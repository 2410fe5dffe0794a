//! An event-driven tokenizer for Rich Text Format.
//!
//! [`Parser`] walks the group-and-keyword grammar of an RTF document once,
//! maintaining the stack of formatting scopes, and routes decoded text,
//! binary runs and unreserved keywords to pluggable [`Destination`]s looked up
//! in a [`DestinationRegistry`]. Each closed group appends a pair of
//! [`Instruction`]s to the [`Document`] so a renderer can replay formatting
//! transitions at group boundaries.

#![allow(missing_docs)]

mod cursor;
mod destination;
mod document;
mod error;
mod keyword;
mod options;
mod parser;
mod props;
mod registry;
mod scope;
mod tables;
mod tasks;

#[cfg(test)]
mod tests;

pub use destination::{Destination, DestinationCx};
pub use document::Document;
pub use error::{ErrorKind, ParserError};
pub use options::ParserOptions;
pub use parser::Parser;
pub use props::{CharProps, CharWidth, Instruction, Justification, ParaProps, VerticalPosition};
pub use registry::{Constructor, DestinationRegistry, PropertyDestination, Registration};
pub use tables::{CodepageTable, SymbolTable, WindowsCodepages, charset_codepage};
pub use tasks::{PendingTasks, TaskError};
