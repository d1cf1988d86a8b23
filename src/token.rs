use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Category, Position, Span};

/// A token produced by the scanner.
///
/// Offsets and lengths are byte based, lines and columns are 1-based and columns count
/// characters.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token {
    /// The token type, i.e. the name of the rule or the keyword type that produced the token.
    token_type: Arc<str>,
    /// The value of the token after the value transform of its rule.
    value: String,
    /// The matched text.
    text: String,
    /// The byte offset of the token in the buffer.
    offset: usize,
    /// The number of line breaks in the text.
    line_breaks: usize,
    /// The line of the first character.
    line: usize,
    /// The column of the first character.
    col: usize,
    /// The flattened categories of the token.
    categories: Arc<[Arc<str>]>,
}

impl Token {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        token_type: Arc<str>,
        value: String,
        text: String,
        offset: usize,
        line_breaks: usize,
        line: usize,
        col: usize,
        categories: Arc<[Arc<str>]>,
    ) -> Self {
        Self {
            token_type,
            value,
            text,
            offset,
            line_breaks,
            line,
            col,
            categories,
        }
    }

    /// Get the token type.
    #[inline]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Get the value of the token.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Get the matched text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the byte offset of the token.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get the byte length of the matched text.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the matched text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Get the number of line breaks in the matched text.
    #[inline]
    pub fn line_breaks(&self) -> usize {
        self.line_breaks
    }

    /// Get the line of the token.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the column of the token.
    #[inline]
    pub fn col(&self) -> usize {
        self.col
    }

    /// Get the position of the first character of the token.
    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Get the byte span of the token.
    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.text.len())
    }

    /// Get the categories of the token.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.as_ref())
    }

    /// Check if the token belongs to the named category.
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| &**c == name)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A coarse test for tokens, used by hand-written parsers to look at tokens without caring for
/// their exact type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenMatcher {
    /// Matches tokens of the given type.
    Type(String),
    /// Matches tokens that belong to the given category or to a category derived from it.
    Category(Category),
}

impl TokenMatcher {
    /// Check if the token matches. A missing token never matches.
    pub fn matches(&self, token: Option<&Token>) -> bool {
        match (self, token) {
            (_, None) => false,
            (TokenMatcher::Type(token_type), Some(token)) => token.token_type() == token_type,
            (TokenMatcher::Category(category), Some(token)) => token.has_category(category.name()),
        }
    }
}

impl From<Category> for TokenMatcher {
    fn from(category: Category) -> Self {
        TokenMatcher::Category(category)
    }
}

impl From<&str> for TokenMatcher {
    fn from(token_type: &str) -> Self {
        TokenMatcher::Type(token_type.to_string())
    }
}

/// Check if the tokens match the matchers pairwise. Sequences of different length never match.
pub fn match_tokens(tokens: &[Token], matchers: &[TokenMatcher]) -> bool {
    tokens.len() == matchers.len()
        && tokens
            .iter()
            .zip(matchers)
            .all(|(token, matcher)| matcher.matches(Some(token)))
}
