use serde::Serialize;
use std::fmt;

/// Shortest accepted topic, in characters.
pub const MIN_TOPIC_CHARS: usize = 5;
/// Longest accepted topic, in characters.
pub const MAX_TOPIC_CHARS: usize = 100;

/// A quiz topic that has passed input validation.
///
/// Length is counted in Unicode scalar values after trimming surrounding
/// whitespace, so a topic typed in any script gets the same bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopicError {
    #[error("topic must be at least {min} characters, got {0}", min = MIN_TOPIC_CHARS)]
    TooShort(usize),
    #[error("topic must be at most {max} characters, got {0}", max = MAX_TOPIC_CHARS)]
    TooLong(usize),
}

impl Topic {
    pub fn parse(input: &str) -> Result<Self, TopicError> {
        let trimmed = input.trim();
        let len = trimmed.chars().count();
        if len < MIN_TOPIC_CHARS {
            return Err(TopicError::TooShort(len));
        }
        if len > MAX_TOPIC_CHARS {
            return Err(TopicError::TooLong(len));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_length_bounds() {
        assert_eq!(Topic::parse("abcd"), Err(TopicError::TooShort(4)));
        assert!(Topic::parse("abcde").is_ok());
        assert!(Topic::parse(&"x".repeat(100)).is_ok());
        assert_eq!(
            Topic::parse(&"x".repeat(101)),
            Err(TopicError::TooLong(101))
        );
    }

    #[test]
    fn test_topic_is_trimmed() {
        let topic = Topic::parse("   Ownership in Rust \n").unwrap();
        assert_eq!(topic.as_str(), "Ownership in Rust");
        assert_eq!(Topic::parse("  ab  "), Err(TopicError::TooShort(2)));
    }

    #[test]
    fn test_surrounding_whitespace_does_not_count_toward_length() {
        assert_eq!(Topic::parse("abcd "), Err(TopicError::TooShort(4)));
        assert_eq!(Topic::parse("\tabcd"), Err(TopicError::TooShort(4)));
        assert_eq!(Topic::parse(&format!(" {} ", "x".repeat(100))).unwrap().as_str().len(), 100);
        assert!(Topic::parse("a b c").is_ok());
    }

    #[test]
    fn test_topic_counts_characters_not_bytes() {
        // Five characters, fifteen bytes.
        assert!(Topic::parse("日本語です").is_ok());
        assert_eq!(topic_display("World History"), "World History");
    }

    fn topic_display(s: &str) -> String {
        Topic::parse(s).unwrap().to_string()
    }
}
