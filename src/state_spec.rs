use crate::RuleSpec;

/// The declaration of a lexical state.
///
/// A lexer with several states scans different parts of the input with different rule sets,
/// e.g. the inside of a template string with other rules than the surrounding code. Rules switch
/// between states with their `push`, `pop` and `next` options.
#[derive(Debug, Clone)]
pub struct StateSpec {
    /// The name of the state.
    pub name: String,
    /// The rules of the state in priority order.
    pub rules: Vec<(String, RuleSpec)>,
}

impl StateSpec {
    /// Creates a new state declaration with the given name and rules.
    pub fn new<N, I, K>(name: N, rules: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (K, RuleSpec)>,
        K: Into<String>,
    {
        Self {
            name: name.into(),
            rules: rules.into_iter().map(|(k, r)| (k.into(), r)).collect(),
        }
    }
}
