use crate::props::Instruction;

/// The rendering layer the scanner feeds.
///
/// The scanner only appends to the instruction stream and asks for font code
/// pages; everything else a document needs is delivered by destinations,
/// which receive `&mut D` on every call.
pub trait Document {
    /// Appends one entry to the instruction stream.
    fn push_instruction(&mut self, instruction: Instruction);

    /// Resolves the code page of the font selected by `\f{font}`, if the font
    /// table declared a charset for it.
    fn font_codepage(&self, _font: i32) -> Option<u16> {
        None
    }

    /// Receives the collected text of a destination registered with
    /// [`Registration::Property`](crate::Registration::Property).
    fn set_property(&mut self, _key: &str, _value: String) {}
}

impl Document for Vec<Instruction> {
    fn push_instruction(&mut self, instruction: Instruction) {
        self.push(instruction);
    }
}
