//! Name normalization: raw student name -> join key.
//!
//! The key is fully case-folded (`ß` matches `ss`), punctuation-free, and
//! independent of token order, so `"Brown, Bob"`, `"bob  brown"` and
//! `"Bob Brown"` all compare equal.
//! Accents are kept: `"Zoë"` and `"Zoe"` are different students as far as the
//! key is concerned. Transliteration is left to a human reviewing the
//! unmatched rows.

use caseless::Caseless;
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

use crate::model::CanonicalKey;

/// Map a raw name to its canonical comparison key.
pub fn normalize(raw: &str) -> CanonicalKey {
    let cleaned: String = raw.chars().filter(|&c| is_name_char(c)).default_case_fold().collect();

    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();

    CanonicalKey::new(tokens.join(" "))
}

/// Letters (L*), marks (M*, accents in any script), and whitespace.
fn is_name_char(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c.general_category_group(),
            GeneralCategoryGroup::Letter | GeneralCategoryGroup::Mark
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> String {
        normalize(s).as_str().to_string()
    }

    #[test]
    fn token_order_does_not_matter() {
        assert_eq!(normalize("Bob Brown"), normalize("Brown Bob"));
        assert_eq!(key("Bob Brown"), "bob brown");
    }

    #[test]
    fn whitespace_is_trimmed_and_collapsed() {
        assert_eq!(normalize(" bob   brown "), normalize("Bob Brown"));
        assert_eq!(normalize("Bob\tBrown"), normalize("Bob Brown"));
    }

    #[test]
    fn punctuation_is_dropped() {
        assert_eq!(normalize("Brown, Bob"), normalize("Bob Brown"));
        assert_eq!(key("O'Neil Sean."), "oneil sean");
        assert_eq!(key("Anne-Marie Dupont"), "annemarie dupont");
    }

    #[test]
    fn accents_are_significant() {
        assert_ne!(normalize("Zoë Jansons"), normalize("Zoe Jansons"));
        assert_eq!(normalize("ZOË JANSONS"), normalize("zoë jansons"));
        assert_eq!(key("Jānis Bērziņš"), "bērziņš jānis");
    }

    #[test]
    fn decomposed_marks_are_kept() {
        // "e" + COMBINING ACUTE ACCENT
        let decomposed = "Rene\u{0301} Martin";
        assert_eq!(key(decomposed), "martin rene\u{0301}");
        assert_ne!(normalize(decomposed), normalize("Rene Martin"));
    }

    #[test]
    fn full_case_folding() {
        assert_eq!(normalize("Straße Anna"), normalize("STRASSE Anna"));
        assert_eq!(key("Straße Anna"), "anna strasse");
        // Final sigma folds like the capital.
        assert_eq!(normalize("ΑΛΕΞΗΣ Παπας"), normalize("Αλεξης Παπας"));
        assert_eq!(key("Αλεξης Παπας"), "αλεξησ παπασ");
    }

    #[test]
    fn marks_outside_latin_are_kept() {
        // Thai tone mark
        assert_ne!(normalize("\u{0E19}\u{0E49}\u{0E2D}\u{0E07}"), normalize("\u{0E19}\u{0E2D}\u{0E07}"));
        // Devanagari virama and vowel sign
        assert_eq!(key("अर्जुन"), "अर्जुन");
    }

    #[test]
    fn letter_numbers_are_not_letters() {
        assert_eq!(normalize("Henry \u{2167}"), normalize("Henry"));
    }

    #[test]
    fn digits_and_symbols_only_is_empty() {
        assert!(normalize("  123 -- ").is_empty());
        assert!(normalize("").is_empty());
    }
}
