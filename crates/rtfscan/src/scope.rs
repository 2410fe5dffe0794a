//! The stack of formatting scopes opened by `{` and closed by `}`.
//!
//! Scopes live in a vector; the parent of a scope is the entry below it. A
//! child starts from copies of its parent's formatting and routing state and
//! is independent of it thereafter.

use crate::{
    destination::Handle,
    props::{CharProps, ParaProps},
};

/// Fallback characters following each `\u` until a `\uc` says otherwise.
pub(crate) const DEFAULT_UC_WIDTH: usize = 1;

#[derive(Debug)]
pub(crate) struct Scope<D> {
    pub(crate) chp: CharProps,
    pub(crate) pap: ParaProps,
    pub(crate) destination: Option<Handle<D>>,
    /// Nothing but `\*` has been consumed in this scope yet.
    pub(crate) first: bool,
    pub(crate) skip_destination: bool,
    pub(crate) skip_unknown_destination: bool,
    /// Decoded characters still to discard after a `\u`.
    pub(crate) skip_chars: usize,
    /// Raw bytes still to read as one binary run.
    pub(crate) bin_data: usize,
    pub(crate) uc_width: usize,
}

impl<D> Scope<D> {
    pub(crate) fn root() -> Self {
        Self {
            chp: CharProps::default(),
            pap: ParaProps::default(),
            destination: None,
            first: true,
            skip_destination: false,
            skip_unknown_destination: false,
            skip_chars: 0,
            bin_data: 0,
            uc_width: DEFAULT_UC_WIDTH,
        }
    }

    /// A fresh scope nested in `self`. Skipping is inherited so that groups
    /// inside a suppressed destination stay suppressed.
    pub(crate) fn child(&self, force_skip: bool) -> Self {
        Self {
            chp: self.chp.clone(),
            pap: self.pap.clone(),
            destination: self.destination.clone(),
            first: true,
            skip_destination: self.skip_destination || force_skip,
            skip_unknown_destination: false,
            skip_chars: 0,
            bin_data: 0,
            uc_width: self.uc_width,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ScopeStack<D> {
    scopes: Vec<Scope<D>>,
}

impl<D> ScopeStack<D> {
    pub(crate) fn new() -> Self {
        Self {
            scopes: Vec::with_capacity(16),
        }
    }

    #[inline]
    pub(crate) fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub(crate) fn top(&self) -> Option<&Scope<D>> {
        self.scopes.last()
    }

    #[inline]
    pub(crate) fn top_mut(&mut self) -> Option<&mut Scope<D>> {
        self.scopes.last_mut()
    }

    /// The scope enclosing the top one.
    pub(crate) fn parent(&self) -> Option<&Scope<D>> {
        self.scopes.len().checked_sub(2).map(|i| &self.scopes[i])
    }

    /// Opens a scope nested in the current top, or the root scope.
    pub(crate) fn push(&mut self, force_skip: bool) -> &mut Scope<D> {
        let scope = match self.scopes.last() {
            Some(top) => top.child(force_skip),
            None => {
                let mut root = Scope::root();
                root.skip_destination = force_skip;
                root
            }
        };
        self.scopes.push(scope);
        let top = self.scopes.len() - 1;
        &mut self.scopes[top]
    }

    pub(crate) fn pop(&mut self) -> Option<Scope<D>> {
        self.scopes.pop()
    }
}
