//! Module with the matcher type that makes up the match list of a rule.

use crate::{internal::pattern_utils, Result};

/// A single entry of the match list of a rule.
///
/// A literal matches its text verbatim, a regex is a pattern in the syntax of the `regex-syntax`
/// crate. Patterns are compiled in multi-line mode, i.e. `^` and `$` match at line boundaries.
/// Patterns must not carry their own anchoring: every match is anchored at the current scanner
/// position implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Matcher {
    /// A literal string.
    Literal(String),
    /// A regular expression.
    Regex(String),
}

impl Matcher {
    /// Create a new literal matcher.
    pub fn literal<S: Into<String>>(text: S) -> Self {
        Matcher::Literal(text.into())
    }

    /// Create a new regex matcher.
    pub fn regex<S: Into<String>>(pattern: S) -> Self {
        Matcher::Regex(pattern.into())
    }

    /// Returns the single character of a one-character literal.
    pub(crate) fn single_char(&self) -> Option<char> {
        match self {
            Matcher::Literal(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            Matcher::Regex(_) => None,
        }
    }

    /// Returns the regex source of the matcher. Literals are escaped and wrapped in a
    /// non-capturing group, regexes are reprinted without comments.
    pub(crate) fn to_pattern(&self) -> Result<String> {
        match self {
            Matcher::Literal(text) => Ok(pattern_utils::non_capturing(&pattern_utils::escape(
                text,
            ))),
            Matcher::Regex(pattern) => pattern_utils::canonical(pattern),
        }
    }
}

impl std::fmt::Display for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Matcher::Literal(text) => write!(f, "'{}'", text.escape_default()),
            Matcher::Regex(pattern) => write!(f, "/{}/", pattern.escape_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_char() {
        assert_eq!(Matcher::literal("(").single_char(), Some('('));
        assert_eq!(Matcher::literal("ä").single_char(), Some('ä'));
        assert_eq!(Matcher::literal("==").single_char(), None);
        assert_eq!(Matcher::literal("").single_char(), None);
        assert_eq!(Matcher::regex("a").single_char(), None);
    }

    #[test]
    fn test_to_pattern() {
        assert_eq!(Matcher::literal("a+b").to_pattern().unwrap(), r"(?:a\+b)");
        assert_eq!(Matcher::regex("[0-9]+").to_pattern().unwrap(), "[0-9]+");
        assert_eq!(
            Matcher::regex("(?x) [0-9]+ # digits").to_pattern().unwrap(),
            "(?x)[0-9]+"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Matcher::literal("\n").to_string(), r"'\n'");
        assert_eq!(Matcher::regex(r"\s+").to_string(), r"/\\s+/");
    }
}
