//! Formulas embedded as chart-service images.
//!
//! The Docs equation editor exported formulas as
//! `https://www.google.com/chart?cht=tx&chl=<url-encoded TeX>` images. The
//! TeX source is recovered from the `chl` parameter.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex_lite::Regex;

static CHART_FORMULA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://www\.google\.com/chart\?(?:.*&)?chl=([^&]+)").unwrap()
});

/// The encoded `chl` value of a chart-service image URL.
///
/// ```
/// use gdoc2tex::formula::chart_formula;
///
/// let src = "https://www.google.com/chart?cht=tx&chf=bg,s,FFFFFF00&chl=x%5E2";
/// assert_eq!(chart_formula(src), Some("x%5E2"));
/// assert_eq!(chart_formula("https://lh3.googleusercontent.com/abc"), None);
/// ```
pub fn chart_formula(src: &str) -> Option<&str> {
    CHART_FORMULA_RE
        .captures(src)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Decode a `chl` value into TeX source.
///
/// Percent escapes are decoded (`+` stays a plus sign), every literal `\+`
/// left over from the upstream encoding is dropped, and when
/// `replace_backslash` is set each `\backslash` token becomes a single `\`.
pub fn decode(encoded: &str, replace_backslash: bool) -> String {
    let decoded = percent_decode_str(encoded).decode_utf8_lossy();
    let stripped = decoded.replace("\\+", "");
    if replace_backslash {
        stripped.replace("\\backslash", "\\")
    } else {
        stripped
    }
}
