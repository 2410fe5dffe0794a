#![expect(missing_docs)]

use core::fmt::Write;

use rtfscan::{
    Destination, DestinationCx, DestinationRegistry, Document, ErrorKind, Instruction, Parser,
    Registration,
};

/// Writes one line per scanner event.
#[derive(Default)]
struct Transcript {
    out: String,
}

impl Document for Transcript {
    fn push_instruction(&mut self, instruction: Instruction) {
        let written = match instruction {
            Instruction::SetCharProps(chp) => writeln!(self.out, "chp bold={}", chp.bold),
            Instruction::SetParaProps(pap) => writeln!(self.out, "pap {:?}", pap.char_width),
        };
        written.unwrap();
    }
}

struct Log(String);

impl Destination<Transcript> for Log {
    fn apply(&mut self, cx: &mut DestinationCx<'_, Transcript>) -> Result<(), ErrorKind> {
        writeln!(cx.doc_mut().out, "apply {}", self.0).unwrap();
        Ok(())
    }

    fn append_text(&mut self, cx: &mut DestinationCx<'_, Transcript>, text: &str) -> Result<(), ErrorKind> {
        writeln!(cx.doc_mut().out, "text {}: {text:?}", self.0).unwrap();
        Ok(())
    }

    fn handle_keyword(
        &mut self,
        cx: &mut DestinationCx<'_, Transcript>,
        keyword: &str,
        param: Option<i32>,
    ) -> Result<bool, ErrorKind> {
        let param = param.map(|p| p.to_string()).unwrap_or_default();
        writeln!(cx.doc_mut().out, "kw {}: {keyword}{param}", self.0).unwrap();
        if keyword == "b" {
            cx.chp_mut().bold = param != "0";
            return Ok(true);
        }
        Ok(false)
    }

    fn handle_blob(&mut self, cx: &mut DestinationCx<'_, Transcript>, data: &[u8]) -> Result<(), ErrorKind> {
        writeln!(cx.doc_mut().out, "blob {}: {} bytes", self.0, data.len()).unwrap();
        Ok(())
    }
}

fn transcript(input: &str) -> String {
    let mut registry = DestinationRegistry::<Transcript>::new();
    for name in ["rtf", "fonttbl", "pict"] {
        registry.register(
            name,
            Registration::constructor(|_, name, _| Box::new(Log(name.to_string()))),
        );
    }
    let mut doc = Transcript::default();
    Parser::new(registry)
        .parse(input.as_bytes(), &mut doc)
        .expect("parse failed");
    doc.out
}

#[test]
fn snapshot_font_table_and_formatting() {
    let input = r"{\rtf1\ansi\deff0{\fonttbl{\f0 Arial;}}\b Hello\b0  world\par}";
    insta::assert_snapshot!(transcript(input), @r#"
    kw rtf: ansi
    kw rtf: deff0
    kw fonttbl: f0
    text fonttbl: "Arial;"
    chp bold=false
    pap LowAnsi
    apply fonttbl
    chp bold=false
    pap LowAnsi
    kw rtf: b
    text rtf: "Hello"
    kw rtf: b0
    text rtf: " world"
    kw rtf: par
    apply rtf
    chp bold=false
    pap LowAnsi
    "#);
}

#[test]
fn snapshot_unicode_and_binary() {
    let input = r"{\rtf1\uc1\u8364?\'e9 {\*\pict\bin4 {}\}}done}";
    insta::assert_snapshot!(transcript(input), @r#"
    text rtf: "€é "
    blob pict: 4 bytes
    apply pict
    chp bold=false
    pap LowAnsi
    text rtf: "done"
    apply rtf
    chp bold=false
    pap LowAnsi
    "#);
}
