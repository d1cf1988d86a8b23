//! Builds the compiled states of a lexer table from the state declarations.

use std::sync::Arc;

use log::trace;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{LexError, LexErrorKind, Result, RuleSpec, StateSpec};

use super::{
    compiled_state::CompiledState,
    rule::{RuleDecl, RuleEntry},
    rule_compiler::{normalize, StateContext},
    StateID,
};

/// The data of a lexer table.
#[derive(Debug)]
pub(crate) struct TableData {
    pub(crate) states: Vec<CompiledState>,
    pub(crate) state_ids: FxHashMap<String, StateID>,
    pub(crate) start: StateID,
}

/// Compiles all states.
///
/// `shared` rules are appended to every state. `start` defaults to the first state.
pub(crate) fn build_table(
    states: Vec<StateSpec>,
    shared: Vec<(String, RuleSpec)>,
    start: Option<String>,
) -> Result<TableData> {
    if states.is_empty() {
        return Err(LexError::new(LexErrorKind::NoStates));
    }

    let mut state_ids = FxHashMap::default();
    for (index, state) in states.iter().enumerate() {
        if state_ids
            .insert(state.name.clone(), StateID::new(index as u32))
            .is_some()
        {
            return Err(LexError::new(LexErrorKind::DuplicateState(
                state.name.clone(),
            )));
        }
    }

    let shared = shared
        .into_iter()
        .flat_map(|(name, spec)| normalize(&name, spec))
        .collect::<Vec<_>>();
    let names = states.iter().map(|s| s.name.clone()).collect::<Vec<_>>();
    let entries = states
        .into_iter()
        .map(|state| {
            let mut entries = state
                .rules
                .into_iter()
                .flat_map(|(name, spec)| normalize(&name, spec))
                .collect::<Vec<_>>();
            entries.extend(shared.iter().cloned());
            entries
        })
        .collect::<Vec<_>>();

    let has_states = names.len() > 1;
    let mut compiled = Vec::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        let decls = expand_includes(index, &names, &entries, &state_ids)?;
        let context = StateContext {
            state_name: name,
            has_states,
            state_ids: &state_ids,
        };
        compiled.push(CompiledState::try_from_decls(&decls, &context)?);
    }

    let start = match start {
        Some(start) => *state_ids
            .get(&start)
            .ok_or_else(|| LexError::new(LexErrorKind::UnknownStartState(start.clone())))?,
        None => StateID::new(0),
    };

    Ok(TableData {
        states: compiled,
        state_ids,
        start,
    })
}

/// Replaces the include directives of a state with the rules of the included states.
///
/// The included rules are spliced in at the position of the directive. Every state is included at
/// most once and a state including itself is ignored, which makes cyclic includes terminate. A
/// rule that is already part of the list is not added again.
fn expand_includes(
    index: usize,
    names: &[String],
    entries: &[Vec<RuleEntry>],
    state_ids: &FxHashMap<String, StateID>,
) -> Result<Vec<Arc<RuleDecl>>> {
    let name = &names[index];
    let mut rules = entries[index].clone();
    let mut included = FxHashSet::default();
    let mut i = 0;
    while i < rules.len() {
        let target = match &rules[i] {
            RuleEntry::Include(target) => target.clone(),
            RuleEntry::Rule(_) => {
                i += 1;
                continue;
            }
        };
        let mut splice = Vec::new();
        if target != *name && included.insert(target.clone()) {
            let included_id = state_ids.get(&target).ok_or_else(|| {
                LexError::new(LexErrorKind::MissingInclude {
                    include: target.clone(),
                    state: name.clone(),
                })
            })?;
            trace!("Including state '{}' into state '{}'", target, name);
            for entry in &entries[included_id.as_usize()] {
                if let RuleEntry::Rule(decl) = entry {
                    if contains(&rules, decl) || contains(&splice, decl) {
                        continue;
                    }
                }
                splice.push(entry.clone());
            }
        }
        // The spliced entries are examined next, so nested includes are expanded as well.
        rules.splice(i..i + 1, splice);
    }
    Ok(rules
        .into_iter()
        .filter_map(|entry| match entry {
            RuleEntry::Rule(decl) => Some(decl),
            RuleEntry::Include(_) => None,
        })
        .collect())
}

fn contains(entries: &[RuleEntry], decl: &Arc<RuleDecl>) -> bool {
    entries
        .iter()
        .any(|e| matches!(e, RuleEntry::Rule(d) if Arc::ptr_eq(d, decl)))
}
