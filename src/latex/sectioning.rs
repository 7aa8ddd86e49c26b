//! Heading level to sectioning command.

/// Sectioning command (without its argument) for an `h<level>` heading.
///
/// With chapters, `h1` is `\chapter` and `h2` the top `\section`; without,
/// `h1` is the top `\section`. Each further level adds one `sub`.
///
/// ```
/// use gdoc2tex::latex::section_command;
///
/// assert_eq!(section_command(1, true, false), "\\chapter");
/// assert_eq!(section_command(3, true, false), "\\subsection");
/// assert_eq!(section_command(3, false, true), "\\subsubsection*");
/// ```
pub fn section_command(level: u8, use_chapters: bool, starred: bool) -> String {
    let mut command = if level == 1 && use_chapters {
        String::from("\\chapter")
    } else {
        let top = if use_chapters { 2 } else { 1 };
        let depth = usize::from(level.saturating_sub(top));
        format!("\\{}section", "sub".repeat(depth))
    };
    if starred {
        command.push('*');
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Number of `sub` prefixes in a sectioning command.
    fn nesting_depth(command: &str) -> usize {
        command.matches("sub").count()
    }

    #[test]
    fn test_chapter_mode() {
        assert_eq!(section_command(1, true, false), "\\chapter");
        assert_eq!(section_command(2, true, false), "\\section");
        assert_eq!(section_command(4, true, false), "\\subsubsection");
    }

    #[test]
    fn test_article_mode() {
        assert_eq!(section_command(1, false, false), "\\section");
        assert_eq!(section_command(2, false, false), "\\subsection");
    }

    #[test]
    fn test_star_variant() {
        assert_eq!(section_command(1, true, true), "\\chapter*");
        assert_eq!(section_command(2, true, true), "\\section*");
    }

    #[test]
    fn test_level_zero_clamps() {
        assert_eq!(section_command(0, true, false), "\\section");
        assert_eq!(section_command(0, false, false), "\\section");
    }

    proptest! {
        #[test]
        fn prop_chapter_depth_is_level_minus_two(level in 2u8..=9) {
            let command = section_command(level, true, false);
            prop_assert_eq!(nesting_depth(&command), usize::from(level - 2));
            prop_assert!(command.ends_with("section"));
        }

        #[test]
        fn prop_h1_is_always_chapter(starred in any::<bool>()) {
            let command = section_command(1, true, starred);
            prop_assert!(command.starts_with("\\chapter"));
            prop_assert_eq!(command.ends_with('*'), starred);
        }
    }
}
