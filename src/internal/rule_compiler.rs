//! Normalization and validation of rule declarations.

use std::{cmp::Ordering, sync::Arc};

use log::trace;
use rustc_hash::FxHashMap;

use crate::{
    category::flatten_categories, LexError, LexErrorKind, Matcher, Result, RuleOptions, RuleSpec,
};

use super::{
    keywords::KeywordTable,
    pattern_utils,
    rule::{Rule, RuleDecl, RuleEntry, Transition},
    StateID,
};

/// The context a rule is compiled in.
pub(crate) struct StateContext<'a> {
    /// The name of the state the rule belongs to.
    pub(crate) state_name: &'a str,
    /// The lexer has more than one state.
    pub(crate) has_states: bool,
    /// All state names of the lexer.
    pub(crate) state_ids: &'a FxHashMap<String, StateID>,
}

/// Normalizes a named rule spec into rule entries.
///
/// A list spec can produce several rules: consecutive literals and regexes are collected into one
/// rule, every options record becomes a rule of its own, and include directives stay in place.
pub(crate) fn normalize(name: &str, spec: RuleSpec) -> Vec<RuleEntry> {
    let token_type: Arc<str> = name.into();
    let mut entries = Vec::new();
    normalize_into(&token_type, spec, &mut entries);
    entries
}

fn normalize_into(token_type: &Arc<str>, spec: RuleSpec, entries: &mut Vec<RuleEntry>) {
    match spec {
        RuleSpec::Literal(text) => entries.push(declare(
            token_type,
            RuleOptions::new().matches(Matcher::Literal(text)),
        )),
        RuleSpec::Regex(pattern) => entries.push(declare(
            token_type,
            RuleOptions::new().matches(Matcher::Regex(pattern)),
        )),
        RuleSpec::Options(options) => entries.push(declare(token_type, *options)),
        RuleSpec::Include(state) => entries.push(RuleEntry::Include(state)),
        RuleSpec::List(specs) => {
            let mut matchers = Vec::new();
            for spec in specs {
                match spec {
                    RuleSpec::Literal(text) => matchers.push(Matcher::Literal(text)),
                    RuleSpec::Regex(pattern) => matchers.push(Matcher::Regex(pattern)),
                    other => {
                        flush(token_type, &mut matchers, entries);
                        normalize_into(token_type, other, entries);
                    }
                }
            }
            flush(token_type, &mut matchers, entries);
        }
    }
}

fn flush(token_type: &Arc<str>, matchers: &mut Vec<Matcher>, entries: &mut Vec<RuleEntry>) {
    if !matchers.is_empty() {
        let options = RuleOptions {
            matchers: std::mem::take(matchers),
            ..Default::default()
        };
        entries.push(declare(token_type, options));
    }
}

fn declare(token_type: &Arc<str>, mut options: RuleOptions) -> RuleEntry {
    sort_matchers(&mut options.matchers);
    RuleEntry::Rule(Arc::new(RuleDecl {
        token_type: Arc::clone(token_type),
        options,
    }))
}

/// Sorts literals longest first in front of the regexes. Regexes keep their order.
///
/// The alternation of a rule prefers the first alternative that matches, so `==` has to be tried
/// before `=`.
pub(crate) fn sort_matchers(matchers: &mut [Matcher]) {
    matchers.sort_by(|a, b| match (a, b) {
        (Matcher::Literal(a), Matcher::Literal(b)) => b.len().cmp(&a.len()),
        (Matcher::Literal(_), Matcher::Regex(_)) => Ordering::Less,
        (Matcher::Regex(_), Matcher::Literal(_)) => Ordering::Greater,
        (Matcher::Regex(_), Matcher::Regex(_)) => Ordering::Equal,
    });
}

/// Validates a rule declaration and compiles it for the given state.
pub(crate) fn compile_rule(decl: &RuleDecl, context: &StateContext) -> Result<Rule> {
    let RuleDecl {
        token_type,
        options,
    } = decl;
    let name = || token_type.to_string();

    if options.error && options.fallback {
        return Err(LexError::new(LexErrorKind::ErrorAndFallback(name())));
    }
    let transition = resolve_transition(token_type, options, context)?;
    let error_like = options.error || options.fallback;
    if error_like && transition != Transition::None {
        return Err(LexError::new(LexErrorKind::FallbackTransition(name())));
    }

    // Error and fallback tokens can span lines.
    let line_breaks = options.line_breaks || error_like;

    let mut has_value_group = false;
    let pattern = if options.matchers.is_empty() {
        None
    } else {
        let pattern = pattern_utils::union(
            options
                .matchers
                .iter()
                .map(|matcher| matcher.to_pattern())
                .collect::<Result<Vec<_>>>()?,
        );
        let hir = pattern_utils::parse(&pattern)?;
        if pattern_utils::can_match_empty(&hir) {
            return Err(LexError::new(LexErrorKind::EmptyMatch {
                token_type: name(),
                pattern,
            }));
        }
        let count = pattern_utils::capture_count(&hir);
        if count > 1 {
            return Err(LexError::new(LexErrorKind::CaptureGroups {
                token_type: name(),
                pattern,
                count,
            }));
        }
        has_value_group = count == 1;
        if !line_breaks && pattern_utils::matches_newline(&pattern)? {
            return Err(LexError::new(LexErrorKind::UndeclaredLineBreaks {
                token_type: name(),
                pattern,
            }));
        }
        Some(pattern)
    };

    let keywords = if options.keywords.is_empty() {
        None
    } else {
        Some(KeywordTable::new(&options.keywords, &options.categories))
    };

    let fast_chars = if transition == Transition::None
        && !error_like
        && options.value.is_none()
        && keywords.is_none()
        && !options.matchers.is_empty()
    {
        options
            .matchers
            .iter()
            .map(Matcher::single_char)
            .collect::<Option<Vec<_>>>()
    } else {
        None
    };

    trace!(
        "Compiled rule '{}' in state '{}': {:?}",
        token_type,
        context.state_name,
        pattern
    );

    Ok(Rule {
        token_type: Arc::clone(token_type),
        pattern,
        fast_chars,
        line_breaks,
        transition,
        error: options.error,
        fallback: options.fallback,
        value: options.value.clone(),
        keywords,
        categories: flatten_categories(&options.categories).into(),
        ignore: options.ignore,
        has_value_group,
    })
}

fn resolve_transition(
    token_type: &str,
    options: &RuleOptions,
    context: &StateContext,
) -> Result<Transition> {
    let count = [
        options.push.is_some(),
        options.pop.is_some(),
        options.next.is_some(),
    ]
    .iter()
    .filter(|set| **set)
    .count();
    if count == 0 {
        return Ok(Transition::None);
    }
    if !context.has_states {
        return Err(LexError::new(LexErrorKind::StatelessTransition(
            token_type.to_string(),
        )));
    }
    if count > 1 {
        return Err(LexError::new(LexErrorKind::MultipleTransitions(
            token_type.to_string(),
        )));
    }
    let lookup = |target: &String| {
        context.state_ids.get(target).copied().ok_or_else(|| {
            LexError::new(LexErrorKind::MissingState {
                target: target.clone(),
                token_type: token_type.to_string(),
                state: context.state_name.to_string(),
            })
        })
    };
    if let Some(target) = &options.push {
        Ok(Transition::Push(lookup(target)?))
    } else if let Some(target) = &options.next {
        Ok(Transition::Next(lookup(target)?))
    } else {
        match options.pop {
            Some(1) => Ok(Transition::Pop),
            other => Err(LexError::new(LexErrorKind::PopCount {
                token_type: token_type.to_string(),
                state: context.state_name.to_string(),
                count: other.unwrap_or_default(),
            })),
        }
    }
}
