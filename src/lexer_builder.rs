use crate::{internal::build_table, LexerTable, Result, RuleSpec, StateSpec};

/// A builder for creating a lexer table.
#[derive(Debug, Clone, Default)]
pub struct LexerBuilder {
    states: Vec<StateSpec>,
    shared_rules: Vec<(String, RuleSpec)>,
    start_state: Option<String>,
}

impl LexerBuilder {
    /// Creates a new lexer builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a state to the lexer builder.
    pub fn add_state(mut self, state: StateSpec) -> Self {
        self.states.push(state);
        self
    }

    /// Adds multiple states to the lexer builder.
    pub fn add_states(mut self, states: &[StateSpec]) -> Self {
        self.states.extend_from_slice(states);
        self
    }

    /// Adds rules that are appended to every state, after the state's own rules.
    pub fn shared_rules<I, K>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = (K, RuleSpec)>,
        K: Into<String>,
    {
        self.shared_rules
            .extend(rules.into_iter().map(|(k, r)| (k.into(), r)));
        self
    }

    /// Sets the state new scanners start in. Defaults to the first added state.
    pub fn start_state<S: Into<String>>(mut self, state: S) -> Self {
        self.start_state = Some(state.into());
        self
    }

    /// Builds the lexer table from the lexer builder.
    pub fn build(self) -> Result<LexerTable> {
        Ok(LexerTable::new(build_table(
            self.states,
            self.shared_rules,
            self.start_state,
        )?))
    }
}

/// Compiles a lexer with a single state named `start`.
///
/// State-switching options are rejected in such a lexer.
pub fn compile<I, K>(rules: I) -> Result<LexerTable>
where
    I: IntoIterator<Item = (K, RuleSpec)>,
    K: Into<String>,
{
    LexerBuilder::new()
        .add_state(StateSpec::new("start", rules))
        .build()
}

/// Compiles a lexer with several states. The start state defaults to the first state.
pub fn compile_states(states: Vec<StateSpec>, start: Option<&str>) -> Result<LexerTable> {
    let builder = states
        .into_iter()
        .fold(LexerBuilder::new(), LexerBuilder::add_state);
    match start {
        Some(start) => builder.start_state(start),
        None => builder,
    }
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LexErrorKind, RuleOptions};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_lexer_builder() {
        init();
        let table = LexerBuilder::new()
            .add_states(&[
                StateSpec::new(
                    "main",
                    vec![
                        ("word", RuleSpec::regex("[a-z]+")),
                        ("open", RuleOptions::new().literal("(").push("paren").into()),
                    ],
                ),
                StateSpec::new(
                    "paren",
                    vec![
                        ("number", RuleSpec::regex("[0-9]+")),
                        ("close", RuleOptions::new().literal(")").pop().into()),
                    ],
                ),
            ])
            .shared_rules([("ws", RuleOptions::new().regex("[ \t]+").ignore().into())])
            .build()
            .unwrap();
        assert_eq!(table.start_state(), "main");
        assert!(table.has("ws"));

        let mut scanner = table.instantiate("ab (12) cd");
        let tokens = scanner
            .by_ref()
            .map(|t| t.unwrap().token_type().to_string())
            .collect::<Vec<_>>();
        assert_eq!(tokens, vec!["word", "open", "number", "close", "word"]);
        assert_eq!(scanner.current_state(), "main");
    }

    #[test]
    fn test_transition_errors() {
        init();
        let result = LexerBuilder::new()
            .add_state(StateSpec::new(
                "main",
                vec![("open", RuleOptions::new().literal("(").push("nowhere").into())],
            ))
            .add_state(StateSpec::new("other", vec![("x", RuleSpec::literal("x"))]))
            .build();
        assert!(matches!(
            *result.unwrap_err().source,
            LexErrorKind::MissingState { ref target, .. } if target == "nowhere"
        ));

        let result = LexerBuilder::new()
            .add_state(StateSpec::new(
                "main",
                vec![("open", RuleOptions::new().literal("(").push("main").into())],
            ))
            .build();
        assert!(matches!(
            *result.unwrap_err().source,
            LexErrorKind::StatelessTransition(_)
        ));
    }
}
