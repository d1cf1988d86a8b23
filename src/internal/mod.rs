/// Module with the compiled form of a lexer state.
pub(crate) mod compiled_state;
pub(crate) use compiled_state::{CompiledState, ErrorRule, RuleMatch};

/// Module that formats error messages with an excerpt of the buffer.
pub(crate) mod diagnostics;

/// Module for several ID types.
mod ids;
pub(crate) use ids::{RuleID, StateID};

/// Module with the keyword lookup table of a rule.
pub(crate) mod keywords;

/// Module with helpers to build and inspect regex patterns.
pub(crate) mod pattern_utils;

/// Module with the compiled rule and its intermediate forms.
pub(crate) mod rule;

/// Module that validates and compiles single rules.
pub(crate) mod rule_compiler;

/// Module that compiles all states of a lexer table.
pub(crate) mod state_table_builder;
pub(crate) use state_table_builder::{build_table, TableData};
