//! Text normalization and display helpers shared by grading and reporting.

use std::collections::BTreeSet;

use crate::model::Answer;

/// Normalize free text for comparison.
///
/// Lower-cases, collapses every run of whitespace to a single space, and trims
/// both ends. Two strings that differ only in case and whitespace runs
/// normalize to the same value.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize every entry and collect them into a set. Duplicates collapse.
pub fn normalize_set<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| normalize(s.as_ref()))
        .collect()
}

/// Number of words in `text`, counted on its normalized form.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Render an answer as a single display string.
///
/// Choice lists join with ", "; an absent answer renders as "".
pub fn pretty_print(value: Option<&Answer>) -> String {
    match value {
        Some(Answer::Text(s)) => s.clone(),
        Some(Answer::Choices(items)) => items.join(", "),
        None => String::new(),
    }
}

/// Integer percentage of `correct` over `total`, rounded half up.
///
/// Returns 0 when `total` is 0. The result never exceeds 100, even if
/// `correct` is larger than `total`.
pub fn percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    ((200 * correct + total) / (2 * total)) as u32
}

/// Split free text into trimmed, non-empty lines.
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a keyword list where commas and line breaks both separate entries.
pub fn parse_keyword_list(text: &str) -> Vec<String> {
    parse_lines(&text.replace(',', "\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_case_and_whitespace() {
        assert_eq!(normalize("  Hello \t  WORLD\n"), "hello world");
        assert_eq!(normalize("i  AM Learning english."), "i am learning english.");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn normalize_equates_formatting_variants() {
        let variants = ["New York", "new york", "  NEW\tYORK ", "New\n\nYork"];
        for v in variants {
            assert_eq!(normalize(v), normalize(variants[0]), "variant {v:?}");
        }
        assert_ne!(normalize("New-York"), normalize("New York"));
    }

    #[test]
    fn normalize_set_collapses_duplicates() {
        let set = normalize_set(["A", " a ", "B"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("a"));
        assert!(set.contains("b"));
    }

    #[test]
    fn word_count_ignores_extra_spaces() {
        assert_eq!(word_count("  one   two\tthree "), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn pretty_print_values() {
        assert_eq!(pretty_print(Some(&Answer::from("Paris"))), "Paris");
        assert_eq!(pretty_print(Some(&Answer::from(vec!["A", "B"]))), "A, B");
        assert_eq!(pretty_print(None), "");
    }

    #[test]
    fn percent_rounding() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(3, 4), 75);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(5, 5), 100);
        assert_eq!(percent(0, 7), 0);
    }

    #[test]
    fn percent_caps_at_100() {
        assert_eq!(percent(5, 4), 100);
        assert_eq!(percent(u32::MAX, 1), 100);
        assert_eq!(percent(u32::MAX, u32::MAX), 100);
    }

    #[test]
    fn parse_lines_discards_blanks() {
        assert_eq!(
            parse_lines("  Paris \r\n\nLondon\n   \nRome"),
            vec!["Paris", "London", "Rome"]
        );
    }

    #[test]
    fn parse_keyword_list_splits_commas() {
        assert_eq!(
            parse_keyword_list("because , although\nhowever,"),
            vec!["because", "although", "however"]
        );
    }
}
