//! Text helpers shared by the converter and the command-line front end.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex_lite::Regex;

static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s_-]+").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Decode bytes to a string, handling various encodings.
///
/// Tries UTF-8 first (a BOM is handled by encoding_rs), then the hint
/// encoding, then falls back to Windows-1252.
///
/// ```ignore
/// assert_eq!(decode_text("Hello".as_bytes(), None), "Hello");
/// ```
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Turn a document title into a file name stem.
///
/// Punctuation is dropped and whitespace runs become a single `_`.
///
/// ```
/// use gdoc2tex::util::friendly_filename;
///
/// assert_eq!(friendly_filename("  My Thesis: Draft #2 "), "My_Thesis_Draft_2");
/// ```
pub fn friendly_filename(title: &str) -> String {
    let cleaned = NON_WORD_RE.replace_all(title, "");
    WHITESPACE_RE
        .replace_all(cleaned.trim(), "_")
        .into_owned()
}

/// Lower-cased [`friendly_filename`], with a fallback for empty titles.
pub fn base_name(title: &str) -> String {
    let name = friendly_filename(title).to_lowercase();
    if name.is_empty() {
        "document".to_string()
    } else {
        name
    }
}

/// Trim trailing whitespace on every line, collapse blank-line runs to a
/// single blank line and trim the whole text.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}
