//! Text folding for alias comparison.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold text into the form used to compare aliases.
///
/// Lower-cases, trims, strips diacritics (NFD, then drops combining marks)
/// and removes spaces and hyphens. Base letters such as `ø` and `æ` have no
/// decomposition and are kept.
///
/// # Examples
///
/// ```
/// use reise::domain::normalize;
///
/// assert_eq!(normalize("  Hasle-Tåsen "), "hasletasen");
/// assert_eq!(normalize("Oslo S"), normalize("oslos"));
/// assert_ne!(normalize("Skøyen"), normalize("Skoyen"));
/// ```
pub fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Trim and collapse runs of whitespace to single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Folding an already folded string changes nothing
        #[test]
        fn idempotent(s in "[a-zA-ZæøåÆØÅéèüÜ -]{0,24}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        /// Case never affects the result for ASCII input
        #[test]
        fn ascii_case_insensitive(s in "[a-zA-Z -]{0,24}") {
            prop_assert_eq!(normalize(&s.to_uppercase()), normalize(&s.to_lowercase()));
        }

        /// Output never contains spaces or hyphens
        #[test]
        fn no_separators(s in "[a-z -]{0,24}") {
            let n = normalize(&s);
            prop_assert!(!n.contains(' ') && !n.contains('-'));
        }
    }
}
