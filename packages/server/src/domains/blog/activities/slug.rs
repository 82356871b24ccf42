/// URL slug for a title: lowercase, ASCII letters/digits only, words joined by
/// single hyphens. Returns an empty string when nothing survives.
pub fn slugify(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ' || *c == '-')
        .collect();

    cleaned
        .split(|c: char| c == ' ' || c == '-')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_title() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn apostrophes_and_punctuation_are_dropped() {
        assert_eq!(
            slugify("Sun'iy intellekt: biznesni avtomatlashtirish!"),
            "suniy-intellekt-biznesni-avtomatlashtirish"
        );
    }

    #[test]
    fn hyphen_and_space_runs_collapse() {
        assert_eq!(slugify("  AI  --  2025 - yil  "), "ai-2025-yil");
    }

    #[test]
    fn non_latin_titles_can_be_empty() {
        assert_eq!(slugify("Привет мир"), "");
        assert_eq!(slugify("!!!"), "");
    }

    proptest! {
        #[test]
        fn slug_uses_only_allowed_characters(title in ".{0,80}") {
            let slug = slugify(&title);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn slugify_is_idempotent(title in ".{0,80}") {
            let once = slugify(&title);
            prop_assert_eq!(slugify(&once), once);
        }
    }
}
