//! Module with the declarative rule types.
//!
//! A rule set is an ordered list of `(name, RuleSpec)` pairs. The name becomes the token type of
//! the tokens the rule produces. The order of the rules is their priority: if two rules match at
//! the same position, the first declared rule wins.

use std::sync::Arc;

use crate::{Category, Matcher};

/// A function that converts the matched text of a token into its value.
pub type ValueTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// The declaration of a rule.
#[derive(Debug, Clone)]
pub enum RuleSpec {
    /// A literal string.
    Literal(String),
    /// A regular expression.
    Regex(String),
    /// A list of specs. Literals and regexes that follow each other form one rule, literals sorted
    /// longest first. Each options record forms a rule of its own. All rules get the same name.
    List(Vec<RuleSpec>),
    /// A match list combined with behavior options.
    Options(Box<RuleOptions>),
    /// Splices the rules of the named state into the current state at this position.
    Include(String),
}

impl RuleSpec {
    /// Create a literal rule spec.
    pub fn literal<S: Into<String>>(text: S) -> Self {
        RuleSpec::Literal(text.into())
    }

    /// Create a regex rule spec.
    pub fn regex<S: Into<String>>(pattern: S) -> Self {
        RuleSpec::Regex(pattern.into())
    }

    /// Create a list of literal rule specs.
    pub fn literals<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RuleSpec::List(texts.into_iter().map(RuleSpec::literal).collect())
    }

    /// Create a list rule spec.
    pub fn list(specs: Vec<RuleSpec>) -> Self {
        RuleSpec::List(specs)
    }

    /// Create an include directive.
    pub fn include<S: Into<String>>(state: S) -> Self {
        RuleSpec::Include(state.into())
    }

    /// Create an error rule. The error rule produces a token for input no other rule matches. It
    /// consumes the rest of the buffer.
    pub fn error() -> Self {
        RuleOptions::new().error().into()
    }

    /// Create a fallback rule. The fallback rule turns every span of input no other rule matches
    /// into a token of its own and scanning continues after it.
    pub fn fallback() -> Self {
        RuleOptions::new().fallback().into()
    }
}

impl From<RuleOptions> for RuleSpec {
    fn from(options: RuleOptions) -> Self {
        RuleSpec::Options(Box::new(options))
    }
}

impl From<Matcher> for RuleSpec {
    fn from(matcher: Matcher) -> Self {
        match matcher {
            Matcher::Literal(text) => RuleSpec::Literal(text),
            Matcher::Regex(pattern) => RuleSpec::Regex(pattern),
        }
    }
}

/// An explicit keyword declaration of a rule.
///
/// If the text of a token produced by the rule equals one of the `values`, the token gets the
/// `token_type` of this declaration instead of the rule's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSpec {
    /// The token type of the keyword tokens.
    pub token_type: String,
    /// The keyword strings.
    pub values: Vec<String>,
    /// Categories of the keyword tokens. The categories of the rule are added to them.
    pub categories: Vec<Category>,
}

impl KeywordSpec {
    /// Create a new keyword declaration without own categories.
    pub fn new<T, I, S>(token_type: T, values: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            token_type: token_type.into(),
            values: values.into_iter().map(Into::into).collect(),
            categories: Vec::new(),
        }
    }

    /// Add a category to the keyword tokens.
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }
}

/// A match list combined with behavior options.
#[derive(Clone, Default)]
pub struct RuleOptions {
    /// The match list.
    pub matchers: Vec<Matcher>,
    /// The rule can match newline characters.
    pub line_breaks: bool,
    /// Push the current state and switch to the named state.
    pub push: Option<String>,
    /// Pop the given number of states. Only a count of 1 is valid.
    pub pop: Option<usize>,
    /// Switch to the named state without touching the state stack.
    pub next: Option<String>,
    /// The rule is the error rule of its state.
    pub error: bool,
    /// The rule is the fallback rule of its state.
    pub fallback: bool,
    /// Converts the matched text into the token value.
    pub value: Option<ValueTransform>,
    /// Keyword reclassification of the tokens of the rule.
    pub keywords: Vec<KeywordSpec>,
    /// The categories of the tokens of the rule.
    pub categories: Vec<Category>,
    /// Tokens of the rule are skipped.
    pub ignore: bool,
}

impl RuleOptions {
    /// Create new rule options with an empty match list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a matcher to the match list.
    pub fn matches(mut self, matcher: Matcher) -> Self {
        self.matchers.push(matcher);
        self
    }

    /// Add a literal to the match list.
    pub fn literal<S: Into<String>>(self, text: S) -> Self {
        self.matches(Matcher::literal(text))
    }

    /// Add several literals to the match list.
    pub fn literals<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.matchers
            .extend(texts.into_iter().map(Matcher::literal));
        self
    }

    /// Add a regex to the match list.
    pub fn regex<S: Into<String>>(self, pattern: S) -> Self {
        self.matches(Matcher::regex(pattern))
    }

    /// Declare that the rule can match newline characters.
    pub fn line_breaks(mut self) -> Self {
        self.line_breaks = true;
        self
    }

    /// Push the current state and switch to the given state.
    pub fn push<S: Into<String>>(mut self, state: S) -> Self {
        self.push = Some(state.into());
        self
    }

    /// Return to the state on top of the state stack.
    pub fn pop(mut self) -> Self {
        self.pop = Some(1);
        self
    }

    /// Switch to the given state.
    pub fn next<S: Into<String>>(mut self, state: S) -> Self {
        self.next = Some(state.into());
        self
    }

    /// Make the rule the error rule of its state.
    pub fn error(mut self) -> Self {
        self.error = true;
        self
    }

    /// Make the rule the fallback rule of its state.
    pub fn fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    /// Convert the matched text into the token value with the given function.
    pub fn value<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.value = Some(Arc::new(transform));
        self
    }

    /// Add keywords in the flat form `token type -> keyword strings`. The keyword tokens get the
    /// categories of the rule.
    pub fn keywords<I, T, V, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = (T, V)>,
        T: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(
            keywords
                .into_iter()
                .map(|(token_type, values)| KeywordSpec::new(token_type, values)),
        );
        self
    }

    /// Add explicit keyword declarations.
    pub fn keyword_types<I>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = KeywordSpec>,
    {
        self.keywords.extend(keywords);
        self
    }

    /// Add a category.
    pub fn category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    /// Add several categories.
    pub fn categories<I>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = Category>,
    {
        self.categories.extend(categories);
        self
    }

    /// Skip the tokens of the rule.
    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }
}

impl std::fmt::Debug for RuleOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleOptions")
            .field("matchers", &self.matchers)
            .field("line_breaks", &self.line_breaks)
            .field("push", &self.push)
            .field("pop", &self.pop)
            .field("next", &self.next)
            .field("error", &self.error)
            .field("fallback", &self.fallback)
            .field("value", &self.value.as_ref().map(|_| "<fn>"))
            .field("keywords", &self.keywords)
            .field("categories", &self.categories)
            .field("ignore", &self.ignore)
            .finish()
    }
}
