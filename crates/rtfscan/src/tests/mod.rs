
use std::collections::BTreeMap;

use crate::{
    CharWidth, Destination, DestinationCx, DestinationRegistry, Document, ErrorKind, Instruction,
    Parser, ParserError, Registration,
};

/// Everything a parse delivered, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Text(String),
    Keyword(String, Option<i32>),
    Blob(Vec<u8>),
    Applied(String),
}

#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub(crate) events: Vec<Event>,
    pub(crate) instructions: Vec<Instruction>,
    pub(crate) properties: BTreeMap<String, String>,
    pub(crate) font_codepages: BTreeMap<i32, u16>,
}

impl Recorder {
    /// All routed text, concatenated.
    pub(crate) fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn keywords(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Keyword(k, _) => Some(k.as_str()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn applied(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Applied(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Document for Recorder {
    fn push_instruction(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn font_codepage(&self, font: i32) -> Option<u16> {
        self.font_codepages.get(&font).copied()
    }

    fn set_property(&mut self, key: &str, value: String) {
        self.properties.insert(key.to_string(), value);
    }
}

/// A destination that records every event it receives on the document and
/// understands a handful of formatting keywords.
pub(crate) struct Recording {
    name: String,
    sub: Option<&'static str>,
}

impl Recording {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sub: None,
        }
    }
}

impl Destination<Recorder> for Recording {
    fn apply(&mut self, cx: &mut DestinationCx<'_, Recorder>) -> Result<(), ErrorKind> {
        cx.doc_mut().events.push(Event::Applied(self.name.clone()));
        Ok(())
    }

    fn append_text(&mut self, cx: &mut DestinationCx<'_, Recorder>, text: &str) -> Result<(), ErrorKind> {
        cx.doc_mut().events.push(Event::Text(text.to_string()));
        Ok(())
    }

    fn handle_keyword(
        &mut self,
        cx: &mut DestinationCx<'_, Recorder>,
        keyword: &str,
        param: Option<i32>,
    ) -> Result<bool, ErrorKind> {
        cx.doc_mut()
            .events
            .push(Event::Keyword(keyword.to_string(), param));
        let handled = match keyword {
            "b" => {
                cx.chp_mut().bold = param != Some(0);
                true
            }
            "i" => {
                cx.chp_mut().italic = param != Some(0);
                true
            }
            "f" => {
                cx.chp_mut().font = param;
                true
            }
            "dbch" => {
                cx.pap_mut().char_width = CharWidth::DoubleByte;
                true
            }
            "ansicpg" => {
                if let Some(codepage) = param.and_then(|p| u16::try_from(p).ok()) {
                    cx.set_codepage(codepage);
                }
                true
            }
            "fail" => return Err(ErrorKind::destination("refused")),
            "par" | "pard" | "plain" | "ansi" => true,
            _ => false,
        };
        Ok(handled)
    }

    fn handle_blob(&mut self, cx: &mut DestinationCx<'_, Recorder>, data: &[u8]) -> Result<(), ErrorKind> {
        cx.doc_mut().events.push(Event::Blob(data.to_vec()));
        Ok(())
    }

    fn sub(&mut self, _cx: &mut DestinationCx<'_, Recorder>) -> Option<Box<dyn Destination<Recorder>>> {
        self.sub
            .map(|name| Box::new(Recording::new(name)) as Box<dyn Destination<Recorder>>)
    }
}

/// `rtf`, `fonttbl` and `colortbl` record; `listtable` hands each nested
/// group a `level` recorder; `title` and `author` are properties.
pub(crate) fn registry() -> DestinationRegistry<Recorder> {
    let mut registry = DestinationRegistry::<Recorder>::new();
    for name in ["rtf", "fonttbl", "colortbl"] {
        registry.register(
            name,
            Registration::constructor(|_, name, _| Box::new(Recording::new(name))),
        );
    }
    registry
        .register(
            "listtable",
            Registration::constructor(|_, name, _| {
                Box::new(Recording {
                    name: name.to_string(),
                    sub: Some("level"),
                })
            }),
        )
        .register("title", Registration::Property("title"))
        .register("author", Registration::Property("author"));
    registry
}

pub(crate) fn parse_with(
    parser: &Parser<Recorder>,
    doc: &mut Recorder,
    input: &[u8],
) -> Result<(), ParserError> {
    parser.parse(input, doc)
}

pub(crate) fn parse(input: &str) -> Result<Recorder, ParserError> {
    let mut doc = Recorder::default();
    Parser::new(registry()).parse(input.as_bytes(), &mut doc)?;
    Ok(doc)
}

pub(crate) fn parse_err(input: &[u8]) -> ParserError {
    let mut doc = Recorder::default();
    match Parser::new(registry()).parse(input, &mut doc) {
        Ok(()) => panic!("expected {input:?} to fail, got {:?}", doc.events),
        Err(e) => e,
    }
}
