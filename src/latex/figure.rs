//! Figure and formula blocks.

/// Extension for a downloaded image's media type; empty when unrecognized.
pub fn image_extension(content_type: Option<&str>) -> &'static str {
    match content_type {
        Some("image/png") => ".png",
        Some("image/jpeg") => ".jpg",
        _ => "",
    }
}

/// Deterministic local file name for an image: SHA-1 of its URL plus extension.
///
/// ```
/// use gdoc2tex::latex::image_file_name;
///
/// let a = image_file_name("https://example.com/a", Some("image/png"));
/// assert_eq!(a, image_file_name("https://example.com/a", Some("image/png")));
/// assert!(a.ends_with(".png"));
/// assert_eq!(a.len(), 40 + 4);
/// ```
pub fn image_file_name(url: &str, content_type: Option<&str>) -> String {
    let digest = sha1_smol::Sha1::from(url).digest();
    format!("{digest}{}", image_extension(content_type))
}

/// `figure` environment for an included image.
pub fn figure_block(file_name: &str, caption: Option<&str>) -> String {
    let mut out = String::from("\\begin{figure}[ht]\n\\begin{center}\n");
    out.push_str(&format!("\\includegraphics[width=\\textwidth]{{{file_name}}}\n"));
    if let Some(caption) = caption {
        out.push_str(&format!("\\caption{{\\small{{{caption}}}}}\n"));
    }
    out.push_str(&format!("\\label{{{file_name}}}\n"));
    out.push_str("\\end{center}\n\\end{figure}");
    out
}

/// How a decoded formula is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaPlacement {
    Inline,
    Display,
    NumberedEquation,
}

impl FormulaPlacement {
    /// Placement for a formula image, given whether it stands alone in its paragraph.
    pub fn choose(sole_child: bool, numbered_equations: bool) -> Self {
        match (sole_child, numbered_equations) {
            (true, true) => FormulaPlacement::NumberedEquation,
            (true, false) => FormulaPlacement::Display,
            (false, _) => FormulaPlacement::Inline,
        }
    }

    pub fn render(self, formula: &str) -> String {
        match self {
            FormulaPlacement::Inline => format!(" ${formula}$ "),
            FormulaPlacement::Display => format!("\\[ {formula} \\]"),
            FormulaPlacement::NumberedEquation => {
                format!("\\begin{{equation}}\n{formula}\n\\end{{equation}}")
            }
        }
    }
}
