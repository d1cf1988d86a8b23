use std::{collections::BTreeMap, sync::Arc};

use crate::{
    internal::{CompiledState, StateID, TableData},
    LexError, LexErrorKind, Result, ScannerState,
};

/// The compiled, immutable form of a set of lexer states.
///
/// A table is created once by [`crate::compile`], [`crate::compile_states`] or a
/// [`crate::LexerBuilder`] and can be instantiated any number of times. Cloning is cheap, all
/// clones and all scanners share the compiled states.
#[derive(Debug, Clone)]
pub struct LexerTable {
    inner: Arc<TableData>,
}

impl LexerTable {
    pub(crate) fn new(data: TableData) -> Self {
        Self {
            inner: Arc::new(data),
        }
    }

    /// Creates a scanner over the given buffer that starts in the start state.
    pub fn instantiate<S: Into<String>>(&self, buffer: S) -> ScannerState {
        ScannerState::new(self.clone(), buffer.into())
    }

    /// Returns the name of the start state.
    pub fn start_state(&self) -> &str {
        &self.state(self.inner.start).name
    }

    /// Returns the names of all states in declaration order.
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.inner.states.iter().map(|s| s.name.as_str())
    }

    /// Checks if any rule of any state can produce a token of the given type, either directly or
    /// through a keyword override.
    pub fn has(&self, token_type: &str) -> bool {
        self.inner.states.iter().any(|state| {
            state.rules.iter().any(|rule| {
                &*rule.token_type == token_type
                    || rule.keywords.as_ref().is_some_and(|keywords| {
                        keywords
                            .overrides()
                            .any(|o| &*o.token_type == token_type)
                    })
            })
        })
    }

    /// Collects every token type the table can produce together with its categories.
    ///
    /// A token type that is produced with different category lists is reported as
    /// [`LexErrorKind::OverlappingTokenType`].
    pub fn token_library(&self) -> Result<BTreeMap<String, Vec<String>>> {
        let mut library = BTreeMap::<String, Arc<[Arc<str>]>>::new();
        let mut add = |token_type: &Arc<str>, categories: &Arc<[Arc<str>]>| match library
            .get(&**token_type)
        {
            Some(known) if known != categories => Err(LexError::new(
                LexErrorKind::OverlappingTokenType(token_type.to_string()),
            )),
            Some(_) => Ok(()),
            None => {
                library.insert(token_type.to_string(), Arc::clone(categories));
                Ok(())
            }
        };
        for rule in self.inner.states.iter().flat_map(|s| s.rules.iter()) {
            add(&rule.token_type, &rule.categories)?;
            if let Some(keywords) = &rule.keywords {
                for keyword in keywords.overrides() {
                    add(&keyword.token_type, &keyword.categories)?;
                }
            }
        }
        Ok(library
            .into_iter()
            .map(|(token_type, categories)| {
                (
                    token_type,
                    categories.iter().map(|c| c.to_string()).collect(),
                )
            })
            .collect())
    }

    /// Returns the pattern of the named state as one alternation with a capture group per rule
    /// that is matched by the regex. Rules that are dispatched by character are not part of it.
    pub fn combined_pattern(&self, state: &str) -> Option<&str> {
        self.state_id(state)
            .map(|id| self.state(id).combined_pattern.as_str())
    }

    /// Returns the characters that the named state dispatches without running its regex.
    pub fn fast_dispatch_chars(&self, state: &str) -> Option<Vec<char>> {
        self.state_id(state).map(|id| {
            let mut chars = self.state(id).fast.keys().copied().collect::<Vec<_>>();
            chars.sort_unstable();
            chars
        })
    }

    #[inline]
    pub(crate) fn state(&self, id: StateID) -> &CompiledState {
        &self.inner.states[id]
    }

    #[inline]
    pub(crate) fn state_id(&self, name: &str) -> Option<StateID> {
        self.inner.state_ids.get(name).copied()
    }

    #[inline]
    pub(crate) fn start_id(&self) -> StateID {
        self.inner.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile, compile_states, Category, KeywordSpec, RuleOptions, RuleSpec, StateSpec};

    #[test]
    fn test_table_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LexerTable>();
    }

    #[test]
    fn test_token_library() {
        let literal = Category::new("Literal");
        let keyword = Category::new("Keyword");
        let table = compile(vec![
            (
                "number",
                RuleOptions::new()
                    .regex("[0-9]+")
                    .category(Category::with_parents("Number", [&literal]))
                    .into(),
            ),
            (
                "word",
                RuleOptions::new()
                    .regex("[a-z]+")
                    .keyword_types([KeywordSpec::new("kw-if", ["if"]).with_category(keyword)])
                    .into(),
            ),
            ("ws", RuleOptions::new().regex(" +").ignore().into()),
        ])
        .unwrap();
        let library = table.token_library().unwrap();
        assert_eq!(
            library.keys().collect::<Vec<_>>(),
            vec!["kw-if", "number", "word", "ws"]
        );
        assert_eq!(library["number"], vec!["Number", "Literal"]);
        assert_eq!(library["kw-if"], vec!["Keyword"]);
        assert!(library["word"].is_empty());
        assert!(table.has("kw-if"));
        assert!(table.has("ws"));
        assert!(!table.has("string"));
    }

    #[test]
    fn test_overlapping_token_type() {
        let table = compile(vec![
            (
                "value",
                RuleOptions::new()
                    .regex("[0-9]+")
                    .category(Category::new("Number"))
                    .into(),
            ),
            ("value", RuleSpec::regex("[a-z]+")),
        ])
        .unwrap();
        assert!(matches!(
            *table.token_library().unwrap_err().source,
            LexErrorKind::OverlappingTokenType(ref t) if t == "value"
        ));
    }

    #[test]
    fn test_state_names() {
        let table = compile_states(
            vec![
                StateSpec::new("main", vec![("x", RuleSpec::literal("x"))]),
                StateSpec::new("other", vec![("y", RuleSpec::literal("y"))]),
            ],
            Some("other"),
        )
        .unwrap();
        assert_eq!(table.state_names().collect::<Vec<_>>(), vec!["main", "other"]);
        assert_eq!(table.start_state(), "other");
        assert_eq!(table.fast_dispatch_chars("main"), Some(vec!['x']));
        assert_eq!(table.combined_pattern("main"), Some("(?:)"));
        assert!(table.combined_pattern("missing").is_none());
    }
}
