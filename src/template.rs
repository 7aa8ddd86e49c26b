//! `#{name}` placeholder substitution in LaTeX templates.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex_lite::{Captures, Regex};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\{([^}]+)\}").unwrap());

/// Replacement for a placeholder without a value.
pub const INVALID_BLOCK: &str = "[Invalid data block]";

/// Substitute every `#{name}` in `template` with its value.
///
/// The template is processed line by line and every output line ends with
/// a newline. Unknown names are replaced by [`INVALID_BLOCK`].
///
/// ```
/// use std::collections::HashMap;
/// use gdoc2tex::template::render_template;
///
/// let values = HashMap::from([("title", "On Trees".to_string())]);
/// assert_eq!(render_template("\\title{#{title}}", &values), "\\title{On Trees}\n");
/// ```
pub fn render_template(template: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    for line in template.lines() {
        let rendered = PLACEHOLDER_RE.replace_all(line, |caps: &Captures<'_>| {
            let name = &caps[1];
            match values.get(name) {
                Some(value) => value.clone(),
                None => {
                    log::warn!("unknown template placeholder #{{{name}}}");
                    INVALID_BLOCK.to_string()
                }
            }
        });
        out.push_str(&rendered);
        out.push('\n');
    }
    out
}
