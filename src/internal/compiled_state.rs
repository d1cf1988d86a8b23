use std::sync::Arc;

use log::debug;
use regex_automata::{meta::Regex, Anchored, Input};
use rustc_hash::FxHashMap;

use crate::{LexError, LexErrorKind, Result};

use super::{
    pattern_utils,
    rule::{Rule, RuleDecl},
    rule_compiler::{compile_rule, StateContext},
    RuleID,
};

/// The rule that handles input no other rule of a state matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorRule {
    /// Unmatched input is an error that is reported to the caller.
    Default,
    /// Unmatched input becomes a token of this rule, consuming the rest of the buffer.
    Error(RuleID),
    /// Unmatched spans become tokens of this rule and scanning continues.
    Fallback(RuleID),
}

/// A match of a rule in the haystack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RuleMatch {
    pub(crate) rule: RuleID,
    pub(crate) start: usize,
    pub(crate) end: usize,
    /// The span of the value capture group, if the rule has one and it participated.
    pub(crate) value: Option<(usize, usize)>,
}

/// A compiled state that can be used to scan a string.
#[derive(Debug, Clone)]
pub(crate) struct CompiledState {
    /// The name of the state.
    pub(crate) name: String,
    /// All rules of the state in declaration order.
    pub(crate) rules: Vec<Rule>,
    /// Single-character rules that are dispatched without running the regex.
    pub(crate) fast: FxHashMap<char, RuleID>,
    /// The regex with one pattern per rule that is not dispatched by character.
    /// The priorities of the patterns are determined by their order. Lower indices have higher
    /// priority if multiple patterns match at the same position.
    pub(crate) regex: Regex,
    /// Maps the pattern ids of the regex to the rules.
    pub(crate) pattern_rules: Vec<RuleID>,
    pub(crate) error: ErrorRule,
    /// The regex rendered as one alternation with a capture group per rule.
    pub(crate) combined_pattern: String,
}

impl CompiledState {
    /// Compiles the rule declarations of a state.
    ///
    /// Single-character literal rules are moved into the fast dispatch table as long as no rule
    /// was added to the regex before them and the state has no fallback rule. Under these
    /// conditions the table yields exactly the rule the regex would have chosen.
    pub(crate) fn try_from_decls(decls: &[Arc<RuleDecl>], context: &StateContext) -> Result<Self> {
        let mut rules = Vec::with_capacity(decls.len());
        let mut fast = FxHashMap::default();
        let mut patterns = Vec::with_capacity(decls.len());
        let mut pattern_rules = Vec::with_capacity(decls.len());
        let mut error = ErrorRule::Default;
        let mut fast_allowed = !decls.iter().any(|decl| decl.options.fallback);

        for decl in decls {
            let rule = compile_rule(decl, context)?;
            let id = RuleID::new(rules.len() as u32);
            if rule.error || rule.fallback {
                if error != ErrorRule::Default {
                    return Err(LexError::new(LexErrorKind::MultipleErrorRules {
                        token_type: rule.token_type.to_string(),
                        state: context.state_name.to_string(),
                    }));
                }
                error = if rule.fallback {
                    ErrorRule::Fallback(id)
                } else {
                    ErrorRule::Error(id)
                };
            }
            match (&rule.pattern, &rule.fast_chars) {
                (None, _) => {}
                (Some(_), Some(chars)) if fast_allowed => {
                    for c in chars {
                        fast.entry(*c).or_insert(id);
                    }
                }
                (Some(pattern), _) => {
                    fast_allowed = false;
                    patterns.push(pattern.clone());
                    pattern_rules.push(id);
                }
            }
            rules.push(rule);
        }

        let regex = Regex::builder()
            .syntax(pattern_utils::syntax_config())
            .build_many(&patterns)?;
        let combined_pattern = pattern_utils::union(
            patterns
                .iter()
                .map(|p| pattern_utils::flatten_captures(p).map(|p| pattern_utils::capture(&p)))
                .collect::<Result<Vec<_>>>()?,
        );
        debug!(
            "Compiled state '{}': {} rules, {} fast dispatched characters, combined pattern {}",
            context.state_name,
            rules.len(),
            fast.len(),
            combined_pattern
        );

        Ok(Self {
            name: context.state_name.to_string(),
            rules,
            fast,
            regex,
            pattern_rules,
            error,
            combined_pattern,
        })
    }

    /// Returns the rule with the given id.
    #[inline]
    pub(crate) fn rule(&self, id: RuleID) -> &Rule {
        &self.rules[id]
    }

    /// Returns the fast dispatched rule for the given character.
    #[inline]
    pub(crate) fn fast_rule(&self, c: char) -> Option<RuleID> {
        self.fast.get(&c).copied()
    }

    /// Check if the state has a fallback rule.
    #[inline]
    pub(crate) fn has_fallback(&self) -> bool {
        matches!(self.error, ErrorRule::Fallback(_))
    }

    /// Searches the next rule match starting at `offset`.
    ///
    /// Without a fallback rule the match has to start exactly at `offset`. With a fallback rule
    /// the earliest match after `offset` is returned, the gap in front of it is the caller's
    /// business.
    pub(crate) fn find_at(&self, haystack: &str, offset: usize) -> Option<RuleMatch> {
        let anchored = if self.has_fallback() {
            Anchored::No
        } else {
            Anchored::Yes
        };
        let input = Input::new(haystack).range(offset..).anchored(anchored);
        let matched = self.regex.search(&input)?;
        let rule = self.pattern_rules[matched.pattern().as_usize()];
        let value = if self.rules[rule].has_value_group {
            let mut captures = self.regex.create_captures();
            let input = Input::new(haystack)
                .range(matched.start()..)
                .anchored(Anchored::Pattern(matched.pattern()));
            self.regex.search_captures(&input, &mut captures);
            captures.get_group(1).map(|span| (span.start, span.end))
        } else {
            None
        };
        Some(RuleMatch {
            rule,
            start: matched.start(),
            end: matched.end(),
            value,
        })
    }
}
