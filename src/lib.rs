#![forbid(missing_docs)]
//! # `modelex`
//! The `modelex` crate is a stateful lexer engine. A lexer is declared as a set of named states,
//! each with an ordered list of token rules. The rules are compiled once into a [`LexerTable`]
//! that can be shared between threads, and every buffer is scanned by its own [`ScannerState`].
//!
//! Rules match literals or regular expressions. Earlier rules win over later ones, literals of a
//! rule are tried longest first. Rules can switch the state of the scanner with `push`, `pop`
//! and `next`, which is useful for languages with nested sub-languages like string
//! interpolation. Further options provide keyword tables, value transforms, token categories,
//! ignored tokens and error and fallback tokens.
//! To parse the regular expressions, the crate uses the `regex-syntax` crate, the matching is
//! done by the `regex-automata` crate.
//!
//! # Example
//! ```rust
//! use modelex::{compile_states, RuleOptions, RuleSpec, StateSpec};
//!
//! # fn main() -> modelex::Result<()> {
//! let table = compile_states(
//!     vec![
//!         StateSpec::new(
//!             "main",
//!             vec![
//!                 ("strstart", RuleOptions::new().literal("`").push("lit").into()),
//!                 ("ident", RuleSpec::regex(r"\w+")),
//!                 ("lbrace", RuleOptions::new().literal("{").push("main").into()),
//!                 ("rbrace", RuleOptions::new().literal("}").pop().into()),
//!                 ("ws", RuleOptions::new().regex(r"[ \t]+").ignore().into()),
//!             ],
//!         ),
//!         StateSpec::new(
//!             "lit",
//!             vec![
//!                 ("interp", RuleOptions::new().literal("${").push("main").into()),
//!                 ("escape", RuleSpec::regex(r"\\.")),
//!                 ("strend", RuleOptions::new().literal("`").pop().into()),
//!                 (
//!                     "const",
//!                     RuleOptions::new()
//!                         .regex(r"(?:[^$`\\]|\$[^{])+")
//!                         .line_breaks()
//!                         .into(),
//!                 ),
//!             ],
//!         ),
//!     ],
//!     None,
//! )?;
//!
//! let tokens = table
//!     .instantiate("`a${b}c`")
//!     .map(|token| token.map(|t| format!("{}:{}", t.token_type(), t.value())))
//!     .collect::<modelex::Result<Vec<_>>>()?;
//! assert_eq!(
//!     tokens,
//!     vec![
//!         "strstart:`", "const:a", "interp:${", "ident:b", "rbrace:}", "const:c", "strend:`"
//!     ]
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Crate features
//! - `serde`: Enabled by default. Derives `Serialize` and `Deserialize` for [`Token`],
//!   [`SavedInfo`], [`Position`] and [`Span`].

/// Module with token categories
mod category;
pub use category::Category;

/// Module with error definitions
mod errors;
pub use errors::{LexError, LexErrorKind, Result};

/// The module with internal implementation details.
mod internal;

/// The module with the lexer builder and the compile functions.
mod lexer_builder;
pub use lexer_builder::{compile, compile_states, LexerBuilder};

/// The module with the compiled lexer table.
mod lexer_table;
pub use lexer_table::LexerTable;

/// Module that provides the Matcher type
mod pattern;
pub use pattern::Matcher;

/// Module that provides a position type
mod position;
pub use position::Position;

/// Module with the rule declarations
mod rule;
pub use rule::{KeywordSpec, RuleOptions, RuleSpec, ValueTransform};

/// The module with the scanner.
mod scanner;
pub use scanner::{SavedInfo, ScannerState};

/// Module that provides a Span type
mod span;
pub use span::Span;

/// Module with the state declarations
mod state_spec;
pub use state_spec::StateSpec;

/// Module that provides the Token type and token matchers
mod token;
pub use token::{match_tokens, Token, TokenMatcher};
