//! Keyword reclassification.
//!
//! Keywords are bucketed by length first and then matched exactly, so a lookup after a generic
//! match costs one integer hash and at most one string hash. Keyword strings longer or shorter
//! than every declared keyword are rejected by the first lookup.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{category::flatten_categories, Category, KeywordSpec};

/// The token type and categories a keyword token gets instead of the ones of its rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeywordOverride {
    pub(crate) token_type: Arc<str>,
    pub(crate) categories: Arc<[Arc<str>]>,
}

/// The compiled keyword declarations of one rule.
#[derive(Debug, Clone, Default)]
pub(crate) struct KeywordTable {
    types: Vec<KeywordOverride>,
    by_length: FxHashMap<usize, FxHashMap<Box<str>, usize>>,
}

impl KeywordTable {
    /// Compiles the keyword declarations of a rule.
    /// The categories of each override are its own categories followed by the rule's. If a
    /// keyword string is declared twice, the first declaration wins.
    pub(crate) fn new(specs: &[KeywordSpec], rule_categories: &[Category]) -> Self {
        let mut table = KeywordTable::default();
        for spec in specs {
            let categories = flatten_categories(spec.categories.iter().chain(rule_categories));
            let index = table.types.len();
            table.types.push(KeywordOverride {
                token_type: spec.token_type.as_str().into(),
                categories: categories.into(),
            });
            for keyword in &spec.values {
                table
                    .by_length
                    .entry(keyword.len())
                    .or_default()
                    .entry(keyword.as_str().into())
                    .or_insert(index);
            }
        }
        table
    }

    /// Returns the override for the given text if it is a keyword.
    #[inline]
    pub(crate) fn lookup(&self, text: &str) -> Option<&KeywordOverride> {
        self.by_length
            .get(&text.len())
            .and_then(|keywords| keywords.get(text))
            .map(|&index| &self.types[index])
    }

    /// Returns all overrides in declaration order.
    pub(crate) fn overrides(&self) -> impl Iterator<Item = &KeywordOverride> {
        self.types.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(categories: &[Arc<str>]) -> Vec<&str> {
        categories.iter().map(|c| c.as_ref()).collect()
    }

    #[test]
    fn test_lookup() {
        let table = KeywordTable::new(
            &[
                KeywordSpec::new("kw-if", ["if"]),
                KeywordSpec::new("kw-loop", ["for", "while"]),
            ],
            &[],
        );
        assert_eq!(&*table.lookup("if").unwrap().token_type, "kw-if");
        assert_eq!(&*table.lookup("while").unwrap().token_type, "kw-loop");
        assert_eq!(&*table.lookup("for").unwrap().token_type, "kw-loop");
        assert!(table.lookup("ifx").is_none());
        assert!(table.lookup("i").is_none());
        assert!(table.lookup("").is_none());
        assert_eq!(table.overrides().count(), 2);
    }

    #[test]
    fn test_first_declaration_wins() {
        let table = KeywordTable::new(
            &[
                KeywordSpec::new("first", ["do"]),
                KeywordSpec::new("second", ["do"]),
            ],
            &[],
        );
        assert_eq!(&*table.lookup("do").unwrap().token_type, "first");
    }

    #[test]
    fn test_categories_are_merged() {
        let word = Category::new("Word");
        let reserved = Category::new("Reserved");
        let table = KeywordTable::new(
            &[
                KeywordSpec::new("kw", ["if"]).with_category(reserved),
                KeywordSpec::new("plain", ["x"]),
            ],
            &[word],
        );
        assert_eq!(
            names(&table.lookup("if").unwrap().categories),
            vec!["Reserved", "Word"]
        );
        assert_eq!(names(&table.lookup("x").unwrap().categories), vec!["Word"]);
    }
}
