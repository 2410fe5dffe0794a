/// Configuration options for the RTF parser.
///
/// # Examples
///
/// ```rust
/// use rtfscan::ParserOptions;
///
/// let options = ParserOptions {
///     default_codepage: 1251,
///     ..Default::default()
/// };
/// assert_eq!(options.max_nesting, 1024);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Code page used to decode `\'hh` escapes until a destination sets the
    /// document code page (normally via `\ansicpg`).
    ///
    /// # Default
    ///
    /// `1252`
    pub default_codepage: u16,

    /// Maximum number of simultaneously open groups. Opening one more fails
    /// the parse with `ErrorKind::NestingTooDeep`.
    ///
    /// # Default
    ///
    /// `1024`
    pub max_nesting: usize,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on parse errors instead of returning them.
    ///
    /// Enabled only in test builds to produce backtraces on parse failures.
    pub panic_on_error: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            default_codepage: 1252,
            max_nesting: 1024,
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: false,
        }
    }
}
