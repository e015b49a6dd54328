//! Japanese-locale string ordering
//!
//! Product names mix hiragana, katakana, kanji and full-width Latin, so a
//! plain code-point comparison gives the wrong order (e.g. `き` before `カ`).
//! Comparisons here go through ICU's `ja` collation.

use std::cmp::Ordering;

use icu::collator::{Collator, CollatorOptions};
use icu::locid::locale;

thread_local! {
    static JA_COLLATOR: Option<Collator> = match Collator::try_new(
        &locale!("ja").into(),
        CollatorOptions::new(),
    ) {
        Ok(collator) => Some(collator),
        Err(e) => {
            tracing::warn!("ja collation unavailable, falling back to code-point order: {}", e);
            None
        }
    };
}

/// Compare two strings under Japanese collation
pub fn compare_ja(a: &str, b: &str) -> Ordering {
    JA_COLLATOR.with(|collator| match collator {
        Some(c) => c.compare(a, b),
        None => a.cmp(b),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        names.sort_by(|a, b| compare_ja(a, b));
        names
    }

    #[test]
    fn test_hiragana_order() {
        assert_eq!(compare_ja("あんこ餅", "わらび餅"), Ordering::Less);
        assert_eq!(compare_ja("わらび餅", "あんこ餅"), Ordering::Greater);
    }

    #[test]
    fn test_equal_strings() {
        assert_eq!(compare_ja("大福", "大福"), Ordering::Equal);
    }

    #[test]
    fn test_katakana_interleaves_with_hiragana() {
        // Code-point order would be あ, き, カ (katakana block comes after hiragana)
        assert_eq!(sorted(vec!["き", "カ", "あ"]), vec!["あ", "カ", "き"]);
    }

    #[test]
    fn test_latin_before_kana() {
        assert_eq!(sorted(vec!["あ", "B", "a"]), vec!["a", "B", "あ"]);
    }
}
