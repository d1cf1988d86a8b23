use thiserror::Error;

/// The result type for the `modelex` crate.
pub type Result<T> = std::result::Result<T, LexError>;

/// The error type for the `modelex` crate.
#[derive(Error, Debug)]
pub struct LexError {
    /// The source of the error.
    pub source: Box<LexErrorKind>,
}

impl LexError {
    /// Create a new `LexError`.
    pub fn new(kind: LexErrorKind) -> Self {
        LexError {
            source: Box::new(kind),
        }
    }

    /// Returns the kind of the error.
    #[inline]
    pub fn kind(&self) -> &LexErrorKind {
        &self.source
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The error kind type.
///
/// All kinds except [LexErrorKind::UnmatchedInput], [LexErrorKind::UnknownState] and
/// [LexErrorKind::OverlappingTokenType] are raised while a rule set is compiled and indicate a
/// mistake in the rule declarations.
#[derive(Error, Debug)]
pub enum LexErrorKind {
    /// An error occurred during the parsing of the regex syntax.
    #[error("'{1}' {0}")]
    RegexSyntax(regex_syntax::Error, String),

    /// An error occurred while the combined regex of a state was built.
    #[error(transparent)]
    RegexBuild(regex_automata::meta::BuildError),

    /// The pattern of a rule can match the empty string.
    #[error("Pattern '{pattern}' of token '{token_type}' matches the empty string")]
    EmptyMatch {
        /// The token type of the offending rule.
        token_type: String,
        /// The pattern of the rule.
        pattern: String,
    },

    /// The pattern of a rule contains more than one capture group.
    #[error(
        "Pattern '{pattern}' of token '{token_type}' has {count} capture groups, at most one is \
         allowed. Use (?: ... ) instead"
    )]
    CaptureGroups {
        /// The token type of the offending rule.
        token_type: String,
        /// The pattern of the rule.
        pattern: String,
        /// The number of capture groups found.
        count: usize,
    },

    /// More than one error or fallback rule was declared in one state.
    #[error("Multiple error rules not allowed (for token '{token_type}' in state '{state}')")]
    MultipleErrorRules {
        /// The token type of the second error rule.
        token_type: String,
        /// The state in which the rules are declared.
        state: String,
    },

    /// A state-switching option was used in a lexer with a single state.
    #[error("State-switching options are not allowed in stateless lexers (for token '{0}')")]
    StatelessTransition(String),

    /// A fallback or error rule carries a state-switching option.
    #[error("State-switching options are not allowed on error or fallback tokens (for token '{0}')")]
    FallbackTransition(String),

    /// A rule is declared as error rule and as fallback rule at once.
    #[error("A rule can't be an error rule and a fallback rule (for token '{0}')")]
    ErrorAndFallback(String),

    /// A rule combines more than one of push, pop and next.
    #[error("Only one of push, pop and next is allowed (for token '{0}')")]
    MultipleTransitions(String),

    /// A pop count other than one.
    #[error("pop must be 1 (in token '{token_type}' of state '{state}', got {count})")]
    PopCount {
        /// The token type of the offending rule.
        token_type: String,
        /// The state in which the rule is declared.
        state: String,
        /// The declared pop count.
        count: usize,
    },

    /// A push or next target names a state that does not exist.
    #[error("Missing state '{target}' (in token '{token_type}' of state '{state}')")]
    MissingState {
        /// The missing target state.
        target: String,
        /// The token type of the offending rule.
        token_type: String,
        /// The state in which the rule is declared.
        state: String,
    },

    /// An include directive names a state that does not exist.
    #[error("Cannot include nonexistent state '{include}' (in state '{state}')")]
    MissingInclude {
        /// The included state.
        include: String,
        /// The including state.
        state: String,
    },

    /// A pattern can match a newline but the rule does not declare line breaks.
    #[error("Rule '{token_type}' should declare line_breaks: '{pattern}'")]
    UndeclaredLineBreaks {
        /// The token type of the offending rule.
        token_type: String,
        /// The pattern of the rule.
        pattern: String,
    },

    /// No state was given to the builder.
    #[error("At least one state is required")]
    NoStates,

    /// Two states share one name.
    #[error("Duplicate state '{0}'")]
    DuplicateState(String),

    /// The requested start state does not exist.
    #[error("Unknown start state '{0}'")]
    UnknownStartState(String),

    /// The input at the given position matched no rule and no error or fallback rule exists.
    #[error("{message}")]
    UnmatchedInput {
        /// The byte offset of the unmatched input.
        offset: usize,
        /// The 1-based line of the unmatched input.
        line: usize,
        /// The 1-based column of the unmatched input.
        col: usize,
        /// The formatted diagnostic with source context.
        message: String,
    },

    /// A state name that is not part of the lexer table.
    #[error("Unknown state '{0}'")]
    UnknownState(String),

    /// The same token type name is used with different categories.
    #[error("There are overlapping token names with different categories: '{0}'")]
    OverlappingTokenType(String),
}

impl From<regex_automata::meta::BuildError> for LexError {
    fn from(error: regex_automata::meta::BuildError) -> Self {
        LexError::new(LexErrorKind::RegexBuild(error))
    }
}

impl From<LexErrorKind> for LexError {
    fn from(kind: LexErrorKind) -> Self {
        LexError::new(kind)
    }
}
