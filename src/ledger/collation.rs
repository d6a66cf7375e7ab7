//! Locale-aware ordering of transaction names.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};
use tracing::warn;

/// Compares names with the root-locale collation at tertiary strength.
///
/// Letters compare by base letter first; accents, then case (lowercase first)
/// only separate names that are otherwise equal. Punctuation sorts before
/// digits and digits before letters.
pub struct NameCollator {
    collator: Option<Collator>,
}

impl NameCollator {
    pub fn new() -> Self {
        match Collator::try_new(&Default::default(), CollatorOptions::new()) {
            Ok(collator) => Self {
                collator: Some(collator),
            },
            Err(err) => {
                warn!(error = ?err, "root collation unavailable; ordering names by code point");
                Self { collator: None }
            }
        }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            // Code points break ties between collation-equal names.
            Some(collator) => collator.compare(a, b).then_with(|| a.cmp(b)),
            None => a.cmp(b),
        }
    }
}

impl Default for NameCollator {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off comparison; build a [`NameCollator`] once when sorting many names.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    NameCollator::new().compare(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_compare_case_insensitively_first() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Banana", "apple"), Ordering::Greater);
        assert_eq!(compare_names("A", "B"), Ordering::Less);
    }

    #[test]
    fn lowercase_precedes_uppercase_on_ties() {
        assert_eq!(compare_names("a", "A"), Ordering::Less);
        assert_eq!(compare_names("Rent", "rent"), Ordering::Greater);
        assert_eq!(compare_names("rent", "rent"), Ordering::Equal);
    }

    #[test]
    fn shorter_prefix_sorts_first() {
        assert_eq!(compare_names("Gym", "gym fee"), Ordering::Less);
    }

    #[test]
    fn accents_sort_with_their_base_letter() {
        let names = NameCollator::new();
        assert_eq!(names.compare("Éclair", "Zebra"), Ordering::Less);
        assert_eq!(names.compare("eclair", "Éclair"), Ordering::Less);
        assert_eq!(names.compare("Éclair", "Fig"), Ordering::Less);
    }

    #[test]
    fn punctuation_then_digits_then_letters() {
        let names = NameCollator::new();
        assert_eq!(names.compare(":note", "{misc}"), Ordering::Less);
        assert_eq!(names.compare("{misc}", "1st"), Ordering::Less);
        assert_eq!(names.compare("1st", "apple"), Ordering::Less);
    }
}
