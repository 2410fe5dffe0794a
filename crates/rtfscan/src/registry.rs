//! Name-to-handler resolution for destination keywords.

use std::collections::BTreeMap;

use crate::{
    document::Document,
    destination::{Destination, DestinationCx},
    error::ErrorKind,
};

/// Builds a destination for `(name, param)`.
pub type Constructor<D> =
    Box<dyn Fn(&mut DestinationCx<'_, D>, &str, Option<i32>) -> Box<dyn Destination<D>>>;

/// How a destination keyword is turned into a handler.
pub enum Registration<D> {
    /// An arbitrary handler built by a function.
    Constructor(Constructor<D>),
    /// A group whose text is collected and stored on the document under the
    /// given key (`\title`, `\author`, ...).
    Property(&'static str),
}

impl<D: Document> Registration<D> {
    /// Wraps a constructor function or closure.
    pub fn constructor<F>(f: F) -> Self
    where
        F: Fn(&mut DestinationCx<'_, D>, &str, Option<i32>) -> Box<dyn Destination<D>> + 'static,
    {
        Self::Constructor(Box::new(f))
    }

    fn construct(
        &self,
        cx: &mut DestinationCx<'_, D>,
        name: &str,
        param: Option<i32>,
    ) -> Box<dyn Destination<D>> {
        match self {
            Self::Constructor(f) => f(cx, name, param),
            Self::Property(key) => Box::new(PropertyDestination::new(*key)),
        }
    }
}

/// The destinations a parser can install, keyed by keyword.
pub struct DestinationRegistry<D> {
    entries: BTreeMap<String, Registration<D>>,
}

impl<D> Default for DestinationRegistry<D> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<D: Document> DestinationRegistry<D> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, replacing any earlier registration.
    pub fn register(&mut self, name: impl Into<String>, registration: Registration<D>) -> &mut Self {
        self.entries.insert(name.into(), registration);
        self
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Registration<D>> {
        self.entries.get(name)
    }

    /// Builds the destination registered for `name`, if any.
    pub fn construct(
        &self,
        cx: &mut DestinationCx<'_, D>,
        name: &str,
        param: Option<i32>,
    ) -> Option<Box<dyn Destination<D>>> {
        self.lookup(name).map(|r| r.construct(cx, name, param))
    }
}

impl<D> core::fmt::Debug for DestinationRegistry<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// Collects the text of its group and hands it to
/// [`Document::set_property`] when the group closes.
#[derive(Debug)]
pub struct PropertyDestination {
    key: &'static str,
    text: String,
}

impl PropertyDestination {
    #[must_use]
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            text: String::new(),
        }
    }
}

impl<D: Document> Destination<D> for PropertyDestination {
    fn append_text(&mut self, _cx: &mut DestinationCx<'_, D>, text: &str) -> Result<(), ErrorKind> {
        self.text.push_str(text);
        Ok(())
    }

    fn apply(&mut self, cx: &mut DestinationCx<'_, D>) -> Result<(), ErrorKind> {
        let value = core::mem::take(&mut self.text);
        cx.doc_mut().set_property(self.key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        props::{CharProps, Instruction, ParaProps},
        tasks::PendingTasks,
    };

    #[derive(Default)]
    struct Info(BTreeMap<String, String>);

    impl Document for Info {
        fn push_instruction(&mut self, _instruction: Instruction) {}

        fn set_property(&mut self, key: &str, value: String) {
            self.0.insert(key.to_string(), value);
        }
    }

    #[test]
    fn property_registration_collects_text() {
        let mut registry = DestinationRegistry::<Info>::new();
        registry.register("title", Registration::Property("title"));
        assert!(registry.lookup("title").is_some());
        assert!(registry.lookup("author").is_none());

        let mut doc = Info::default();
        let mut chp = CharProps::default();
        let mut pap = ParaProps::default();
        let mut codepage = 1252;
        let mut tasks = PendingTasks::new();
        let mut cx = DestinationCx {
            doc: &mut doc,
            chp: &mut chp,
            pap: &mut pap,
            codepage: &mut codepage,
            uc_width: 1,
            tasks: &mut tasks,
        };

        let mut title = registry.construct(&mut cx, "title", None).unwrap();
        title.append_text(&mut cx, "Annual ").unwrap();
        title.append_text(&mut cx, "report").unwrap();
        title.apply(&mut cx).unwrap();
        assert!(registry.construct(&mut cx, "author", None).is_none());

        assert_eq!(doc.0["title"], "Annual report");
    }
}
