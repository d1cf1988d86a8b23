use std::sync::Arc;

use crate::{RuleOptions, ValueTransform};

use super::{keywords::KeywordTable, StateID};

/// A normalized rule declaration. The match list is sorted, state references are still names.
///
/// Declarations are shared between states through include directives. They are compared by
/// identity to keep a rule that is reached twice only once.
#[derive(Debug)]
pub(crate) struct RuleDecl {
    pub(crate) token_type: Arc<str>,
    pub(crate) options: RuleOptions,
}

/// An entry of a state's rule list before include directives are resolved.
#[derive(Debug, Clone)]
pub(crate) enum RuleEntry {
    Rule(Arc<RuleDecl>),
    Include(String),
}

/// The state transition a rule performs after it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    None,
    Push(StateID),
    Pop,
    Next(StateID),
}

/// A compiled rule of one state.
#[derive(Clone)]
pub(crate) struct Rule {
    pub(crate) token_type: Arc<str>,
    /// The regex of the match list. `None` for error and fallback rules without match list.
    pub(crate) pattern: Option<String>,
    /// The characters of a rule that consists of single-character literals only and has no
    /// behavior that prevents fast dispatch.
    pub(crate) fast_chars: Option<Vec<char>>,
    pub(crate) line_breaks: bool,
    pub(crate) transition: Transition,
    pub(crate) error: bool,
    pub(crate) fallback: bool,
    pub(crate) value: Option<ValueTransform>,
    pub(crate) keywords: Option<KeywordTable>,
    pub(crate) categories: Arc<[Arc<str>]>,
    pub(crate) ignore: bool,
    /// The pattern has one capture group that provides the token value.
    pub(crate) has_value_group: bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("token_type", &self.token_type)
            .field("pattern", &self.pattern)
            .field("fast_chars", &self.fast_chars)
            .field("line_breaks", &self.line_breaks)
            .field("transition", &self.transition)
            .field("error", &self.error)
            .field("fallback", &self.fallback)
            .field("keywords", &self.keywords)
            .field("categories", &self.categories)
            .field("ignore", &self.ignore)
            .field("has_value_group", &self.has_value_group)
            .finish()
    }
}
