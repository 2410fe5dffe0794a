//! Character and paragraph formatting carried by every scope.
//!
//! The scanner never interprets these beyond the two fields it needs for
//! decoding (`CharProps::font` and `ParaProps::char_width`); destinations
//! mutate them while handling formatting keywords and the renderer receives
//! snapshots through [`Instruction`]s.

/// Character formatting (`chp`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharProps {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub hidden: bool,
    /// Index into the document font table, selected by `\f`.
    pub font: Option<i32>,
    /// Size in half-points, selected by `\fs`.
    pub font_size: Option<i32>,
    /// Index into the colour table, selected by `\cf`.
    pub foreground: Option<i32>,
    /// Index into the colour table, selected by `\cb` or `\highlight`.
    pub background: Option<i32>,
    pub vertical: VerticalPosition,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VerticalPosition {
    #[default]
    Baseline,
    Superscript,
    Subscript,
}

/// Paragraph formatting (`pap`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParaProps {
    /// How `\'hh` escapes are read: double-byte mode takes two bytes per
    /// character.
    pub char_width: CharWidth,
    pub justification: Justification,
    /// Indents and spacing, in twips.
    pub left_indent: i32,
    pub right_indent: i32,
    pub first_line_indent: i32,
    pub space_before: i32,
    pub space_after: i32,
    pub in_table: bool,
}

/// Character width mode, switched by `\loch`, `\hich` and `\dbch`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharWidth {
    #[default]
    LowAnsi,
    HighAnsi,
    DoubleByte,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Justification {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// One entry of the output instruction stream. A pair is emitted every time a
/// group closes, carrying the formatting that is in effect again afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Instruction {
    SetCharProps(CharProps),
    SetParaProps(ParaProps),
}
