//! Lookup tables the scanner consults but does not own.

use std::collections::BTreeMap;

use encoding_rs::Encoding;

/// Decodes the value of a `\'hh` escape in a numeric code page.
pub trait CodepageTable {
    /// Returns the text for `value` (one byte, or a lead/trail pair packed
    /// big-endian for double-byte code pages), or `None` when the code page is
    /// unknown or has no mapping for it.
    fn decode(&self, codepage: u16, value: u32) -> Option<String>;
}

/// Resolves the symbol substitution for a `\u` escape, keyed by the lowercase
/// hexadecimal form of the code unit (`"2605"` for U+2605).
pub trait SymbolTable {
    fn lookup(&self, hex: &str) -> Option<&str>;
}

impl SymbolTable for () {
    fn lookup(&self, _hex: &str) -> Option<&str> {
        None
    }
}

impl SymbolTable for BTreeMap<String, String> {
    fn lookup(&self, hex: &str) -> Option<&str> {
        self.get(hex).map(String::as_str)
    }
}

/// Code pages backed by `encoding_rs`, covering the Windows ANSI and DBCS code
/// pages RTF writers emit in `\ansicpg` and font charsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsCodepages;

impl WindowsCodepages {
    #[must_use]
    pub fn encoding(codepage: u16) -> Option<&'static Encoding> {
        Some(match codepage {
            866 => encoding_rs::IBM866,
            874 => encoding_rs::WINDOWS_874,
            932 => encoding_rs::SHIFT_JIS,
            936 => encoding_rs::GBK,
            949 => encoding_rs::EUC_KR,
            950 => encoding_rs::BIG5,
            1250 => encoding_rs::WINDOWS_1250,
            1251 => encoding_rs::WINDOWS_1251,
            1252 => encoding_rs::WINDOWS_1252,
            1253 => encoding_rs::WINDOWS_1253,
            1254 => encoding_rs::WINDOWS_1254,
            1255 => encoding_rs::WINDOWS_1255,
            1256 => encoding_rs::WINDOWS_1256,
            1257 => encoding_rs::WINDOWS_1257,
            1258 => encoding_rs::WINDOWS_1258,
            10000 => encoding_rs::MACINTOSH,
            20866 => encoding_rs::KOI8_R,
            21866 => encoding_rs::KOI8_U,
            28592 => encoding_rs::ISO_8859_2,
            28595 => encoding_rs::ISO_8859_5,
            28597 => encoding_rs::ISO_8859_7,
            _ => return None,
        })
    }
}

impl CodepageTable for WindowsCodepages {
    fn decode(&self, codepage: u16, value: u32) -> Option<String> {
        let encoding = Self::encoding(codepage)?;
        let packed = value.to_be_bytes();
        let bytes = if value > 0xFF { &packed[2..] } else { &packed[3..] };
        encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(std::borrow::Cow::into_owned)
    }
}

/// Maps an `\fcharset` value to the code page its text is written in.
///
/// Font-table destinations use this to answer
/// [`Document::font_codepage`](crate::Document::font_codepage).
#[must_use]
pub fn charset_codepage(charset: i32) -> Option<u16> {
    Some(match charset {
        0 => 1252,
        77 => 10000,
        128 => 932,
        129 => 949,
        134 => 936,
        136 => 950,
        161 => 1253,
        162 => 1254,
        163 => 1258,
        177 => 1255,
        178 => 1256,
        186 => 1257,
        204 => 1251,
        222 => 874,
        238 => 1250,
        254 => 437,
        255 => 850,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1252, 0x80, "\u{20ac}")]
    #[case(1252, 0x93, "\u{201c}")]
    #[case(1251, 0xC0, "\u{410}")]
    #[case(1253, 0xE1, "\u{3b1}")]
    #[case(932, 0x82A0, "\u{3042}")]
    #[case(936, 0xC4E3, "\u{4f60}")]
    fn decodes_known_codepages(#[case] codepage: u16, #[case] value: u32, #[case] text: &str) {
        assert_eq!(WindowsCodepages.decode(codepage, value).as_deref(), Some(text));
    }

    #[test]
    fn unknown_codepage_or_unmapped_byte_is_none() {
        assert_eq!(WindowsCodepages.decode(4242, 0x41), None);
        // A lone Shift-JIS lead byte has no mapping.
        assert_eq!(WindowsCodepages.decode(932, 0x82), None);
        // UTF-8 sequences span several escapes, which a per-value table
        // cannot join.
        assert_eq!(WindowsCodepages.decode(65001, 0xE2), None);
        assert_eq!(WindowsCodepages.decode(65001, 0x41), None);
    }

    #[test]
    fn charsets_map_to_codepages() {
        assert_eq!(charset_codepage(0), Some(1252));
        assert_eq!(charset_codepage(204), Some(1251));
        assert_eq!(charset_codepage(2), None);
    }

    #[test]
    fn symbol_tables() {
        let mut table = BTreeMap::new();
        table.insert("f020".to_string(), " ".to_string());
        assert_eq!(table.lookup("f020"), Some(" "));
        assert_eq!(table.lookup("f021"), None);
        assert_eq!(().lookup("f020"), None);
    }
}
