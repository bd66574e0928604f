use crate::session::Severity;

/// Longest word a participant may submit, in characters
pub const MAX_WORD_LENGTH: usize = 13;

/// Why a candidate word was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    EmptyInput,
    MatchesKeyword,
    Duplicate,
    TooLong,
}

/// What a rejection does to the input buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferEffect {
    Keep,
    Clear,
    /// Keep only the first n characters of the candidate
    Truncate(usize),
}

impl Rejection {
    pub fn severity(&self) -> Severity {
        match self {
            Rejection::EmptyInput => Severity::Info,
            Rejection::MatchesKeyword | Rejection::Duplicate => Severity::Error,
            Rejection::TooLong => Severity::Warning,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Rejection::EmptyInput => "Please enter a word!",
            Rejection::MatchesKeyword => "Enter a word other than the keyword!",
            Rejection::Duplicate => "You already submitted that word!",
            Rejection::TooLong => "Keep it within 13 characters!",
        }
    }

    pub fn buffer_effect(&self) -> BufferEffect {
        match self {
            Rejection::EmptyInput => BufferEffect::Keep,
            Rejection::MatchesKeyword | Rejection::Duplicate => BufferEffect::Clear,
            Rejection::TooLong => BufferEffect::Truncate(MAX_WORD_LENGTH),
        }
    }
}

struct Candidate<'a> {
    raw: &'a str,
    keyword: &'a str,
    accepted: &'a [String],
}

type Rule = for<'a> fn(&Candidate<'a>) -> Option<Rejection>;

/// Evaluated top to bottom, the first rule that rejects wins.
/// The conditions overlap (an empty keyword matches empty input), so the order is part of the contract.
const RULES: [Rule; 4] = [
    reject_empty,
    reject_keyword,
    reject_duplicate,
    reject_too_long,
];

fn reject_empty(candidate: &Candidate<'_>) -> Option<Rejection> {
    candidate
        .raw
        .trim()
        .is_empty()
        .then_some(Rejection::EmptyInput)
}

fn reject_keyword(candidate: &Candidate<'_>) -> Option<Rejection> {
    (candidate.raw == candidate.keyword).then_some(Rejection::MatchesKeyword)
}

fn reject_duplicate(candidate: &Candidate<'_>) -> Option<Rejection> {
    candidate
        .accepted
        .iter()
        .any(|word| word == candidate.raw)
        .then_some(Rejection::Duplicate)
}

fn reject_too_long(candidate: &Candidate<'_>) -> Option<Rejection> {
    (candidate.raw.chars().count() > MAX_WORD_LENGTH).then_some(Rejection::TooLong)
}

/// Decides whether `raw` may join the accepted words of the round
pub fn validate(raw: &str, keyword: &str, accepted: &[String]) -> Result<(), Rejection> {
    let candidate = Candidate {
        raw,
        keyword,
        accepted,
    };

    match RULES.iter().find_map(|rule| rule(&candidate)) {
        Some(rejection) => Err(rejection),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_accepts_a_fresh_word() {
        assert_eq!(validate("banana", "apple", &[]), Ok(()));
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(validate("", "apple", &[]), Err(Rejection::EmptyInput));
        assert_eq!(validate("  \t ", "apple", &[]), Err(Rejection::EmptyInput));
    }

    #[test]
    fn test_empty_wins_over_an_empty_keyword() {
        assert_eq!(validate("", "", &[]), Err(Rejection::EmptyInput));
    }

    #[test]
    fn test_keyword_match_is_exact() {
        assert_eq!(validate("apple", "apple", &[]), Err(Rejection::MatchesKeyword));
        assert_eq!(validate("Apple", "apple", &[]), Ok(()));
        assert_eq!(validate(" apple", "apple", &[]), Ok(()));
    }

    #[test]
    fn test_keyword_wins_over_duplicate_and_length() {
        let keyword = "averyveryverylongkeyword";

        assert_eq!(
            validate(keyword, keyword, &words(&[keyword])),
            Err(Rejection::MatchesKeyword)
        );
    }

    #[test]
    fn test_duplicate_is_case_sensitive() {
        let accepted = words(&["banana"]);

        assert_eq!(validate("banana", "apple", &accepted), Err(Rejection::Duplicate));
        assert_eq!(validate("Banana", "apple", &accepted), Ok(()));
    }

    #[test]
    fn test_length_counts_characters() {
        assert_eq!(validate("abcdefghijklm", "apple", &[]), Ok(()));
        assert_eq!(validate("abcdefghijklmn", "apple", &[]), Err(Rejection::TooLong));
        // thirteen hangul syllables are thirteen characters, not thirty-nine bytes
        assert_eq!(validate("가나다라마바사아자차카타파", "사과", &[]), Ok(()));
    }

    #[test]
    fn test_every_rejection_has_its_own_message() {
        let rejections = [
            Rejection::EmptyInput,
            Rejection::MatchesKeyword,
            Rejection::Duplicate,
            Rejection::TooLong,
        ];

        for (i, a) in rejections.iter().enumerate() {
            for b in rejections.iter().skip(i + 1) {
                assert_ne!(a.message(), b.message());
            }
        }
    }
}
