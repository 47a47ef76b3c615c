//! Input validation for reaction text.
//!
//! Rules run in a fixed order and the first failure wins:
//! empty → length → alphabet → hard repeat ceiling → repeats vs. joined guilds.

use reactext_types::charmap;
use reactext_types::{ValidationError, MAX_CHARACTER_REPEATS, MAX_TEXT_LENGTH};

/// Check `text` against the alphabet and the number of guilds available.
pub fn validate(text: &str, available_spaces: usize) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }

    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(ValidationError::TooLong);
    }

    if !text.chars().all(charmap::is_supported) {
        return Err(ValidationError::InvalidCharacter);
    }

    let counts = character_counts(text);
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);

    if max > MAX_CHARACTER_REPEATS {
        return Err(ValidationError::TooManyRepeats);
    }

    if max > available_spaces {
        let exceeding: Vec<char> = counts
            .iter()
            .filter(|(_, n)| *n > available_spaces)
            .map(|(c, _)| *c)
            .collect();

        return Err(match exceeding.as_slice() {
            [single] => ValidationError::SingleCharacterLimit(*single),
            many => ValidationError::InsufficientSpaces(
                many.iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        });
    }

    Ok(())
}

/// Occurrences per uppercased character, in order of first occurrence.
pub fn character_counts(text: &str) -> Vec<(char, usize)> {
    let mut counts: Vec<(char, usize)> = Vec::new();
    for c in text.chars().map(|c| c.to_ascii_uppercase()) {
        match counts.iter_mut().find(|(seen, _)| *seen == c) {
            Some((_, n)) => *n += 1,
            None => counts.push((c, 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank_text() {
        assert_eq!(validate("", 6), Err(ValidationError::EmptyText));
        assert_eq!(validate("   ", 6), Err(ValidationError::EmptyText));
    }

    #[test]
    fn test_too_long_wins_over_later_rules() {
        assert_eq!(validate(&"A".repeat(21), 6), Err(ValidationError::TooLong));
        assert_eq!(validate(&"?".repeat(21), 6), Err(ValidationError::TooLong));
    }

    #[test]
    fn test_exactly_twenty_characters_is_allowed() {
        assert_eq!(validate("ABCDEFGHIJKLMNOPQRST", 1), Ok(()));
    }

    #[test]
    fn test_invalid_characters() {
        assert_eq!(validate("hi?", 6), Err(ValidationError::InvalidCharacter));
        assert_eq!(validate("tab\there", 6), Err(ValidationError::InvalidCharacter));
        assert_eq!(validate("café", 6), Err(ValidationError::InvalidCharacter));
    }

    #[test]
    fn test_lowercase_is_accepted() {
        assert_eq!(validate("hello world!", 6), Ok(()));
    }

    #[test]
    fn test_repeat_ceiling_ignores_space_count() {
        for spaces in [0, 1, 6, 100] {
            assert_eq!(
                validate(&"A".repeat(7), spaces),
                Err(ValidationError::TooManyRepeats)
            );
        }
    }

    #[test]
    fn test_repeats_are_case_insensitive() {
        assert_eq!(validate("aAaAaAa", 6), Err(ValidationError::TooManyRepeats));
        assert_eq!(
            validate("aA", 1),
            Err(ValidationError::SingleCharacterLimit('A'))
        );
    }

    #[test]
    fn test_single_character_limit() {
        assert_eq!(
            validate("AAA", 2),
            Err(ValidationError::SingleCharacterLimit('A'))
        );
    }

    #[test]
    fn test_insufficient_spaces_lists_in_first_occurrence_order() {
        assert_eq!(
            validate("AAABBB", 2),
            Err(ValidationError::InsufficientSpaces("A, B".to_string()))
        );
        assert_eq!(
            validate("zzzxaaa", 2),
            Err(ValidationError::InsufficientSpaces("Z, A".to_string()))
        );
    }

    #[test]
    fn test_spaces_count_as_characters() {
        assert_eq!(
            validate("A B C", 1),
            Err(ValidationError::SingleCharacterLimit(' '))
        );
        assert_eq!(validate("A B C", 2), Ok(()));
    }

    #[test]
    fn test_compliant_inputs_are_valid() {
        for (text, spaces) in [
            ("HI", 1),
            ("HELLO", 2),
            ("BANANA", 3),
            ("AAAAAA", 6),
            ("123!", 1),
        ] {
            assert_eq!(validate(text, spaces), Ok(()), "{text:?} with {spaces}");
        }
    }

    #[test]
    fn test_character_counts_order_and_case() {
        assert_eq!(
            character_counts("baBa c"),
            vec![('B', 2), ('A', 2), (' ', 1), ('C', 1)]
        );
    }
}
