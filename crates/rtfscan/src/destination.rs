//! The capability contract between the scanner and content handlers.

use std::{cell::RefCell, rc::Rc};

use crate::{
    error::ErrorKind,
    props::{CharProps, ParaProps},
    tasks::{PendingTasks, TaskError},
};

/// A handler for the content of a group: the document body, a font table, a
/// picture, an info field.
///
/// Every capability is optional. The default implementations drop the event,
/// and `handle_keyword` reports the keyword as unhandled.
pub trait Destination<D> {
    /// Finalizes the destination once the last scope governed by it closes.
    fn apply(&mut self, _cx: &mut DestinationCx<'_, D>) -> Result<(), ErrorKind> {
        Ok(())
    }

    /// Receives a run of decoded text.
    fn append_text(&mut self, _cx: &mut DestinationCx<'_, D>, _text: &str) -> Result<(), ErrorKind> {
        Ok(())
    }

    /// Receives a keyword the scanner does not reserve. Returns whether it was
    /// understood.
    fn handle_keyword(
        &mut self,
        _cx: &mut DestinationCx<'_, D>,
        _keyword: &str,
        _param: Option<i32>,
    ) -> Result<bool, ErrorKind> {
        Ok(false)
    }

    /// Receives the bytes of a `\bin` run.
    fn handle_blob(&mut self, _cx: &mut DestinationCx<'_, D>, _data: &[u8]) -> Result<(), ErrorKind> {
        Ok(())
    }

    /// Offers a handler for a group opened while this destination is active,
    /// e.g. one level of a list definition.
    fn sub(&mut self, _cx: &mut DestinationCx<'_, D>) -> Option<Box<dyn Destination<D>>> {
        None
    }
}

/// A shared reference to an installed destination. A scope and its children
/// share one handle until a child installs its own; finalization is decided
/// by handle identity.
pub(crate) struct Handle<D>(Rc<RefCell<Box<dyn Destination<D>>>>);

impl<D> Handle<D> {
    pub(crate) fn new(destination: Box<dyn Destination<D>>) -> Self {
        Self(Rc::new(RefCell::new(destination)))
    }

    pub(crate) fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut dyn Destination<D>) -> R) -> R {
        let mut guard = self.0.borrow_mut();
        f(&mut **guard)
    }
}

impl<D> Clone for Handle<D> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<D> core::fmt::Debug for Handle<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Handle").field(&Rc::as_ptr(&self.0)).finish()
    }
}

/// What a destination may touch while handling an event: the document, the
/// formatting of the scope being processed, the document code page and the
/// deferred task list.
pub struct DestinationCx<'a, D> {
    pub(crate) doc: &'a mut D,
    pub(crate) chp: &'a mut CharProps,
    pub(crate) pap: &'a mut ParaProps,
    pub(crate) codepage: &'a mut u16,
    pub(crate) uc_width: usize,
    pub(crate) tasks: &'a mut PendingTasks,
}

impl<D> DestinationCx<'_, D> {
    pub fn doc(&self) -> &D {
        self.doc
    }

    pub fn doc_mut(&mut self) -> &mut D {
        self.doc
    }

    pub fn chp(&self) -> &CharProps {
        self.chp
    }

    pub fn chp_mut(&mut self) -> &mut CharProps {
        self.chp
    }

    pub fn pap(&self) -> &ParaProps {
        self.pap
    }

    pub fn pap_mut(&mut self) -> &mut ParaProps {
        self.pap
    }

    /// The document-level code page for `\'hh` escapes.
    pub fn codepage(&self) -> u16 {
        *self.codepage
    }

    /// Sets the document-level code page, as `\ansicpg` does.
    pub fn set_codepage(&mut self, codepage: u16) {
        *self.codepage = codepage;
    }

    /// Number of fallback characters that follow each `\u` in this scope.
    pub fn uc_width(&self) -> usize {
        self.uc_width
    }

    /// Registers work that must finish before the parse completes.
    ///
    /// # Errors
    ///
    /// Fails if the worker cannot be started.
    pub fn defer<F>(&mut self, name: &str, work: F) -> Result<(), ErrorKind>
    where
        F: FnOnce() -> Result<(), TaskError> + Send + 'static,
    {
        self.tasks.defer(name, work)
    }
}
