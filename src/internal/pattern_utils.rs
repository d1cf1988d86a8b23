//! Helpers to build and analyze the regex sources of rules.

use regex_automata::{meta::Regex, util::syntax};
use regex_syntax::{
    ast::{self, parse::Parser, print::Printer, Ast, GroupKind},
    hir::Hir,
    ParserBuilder,
};

use crate::{LexError, LexErrorKind, Result};

/// The syntax configuration used for all patterns. Multi-line mode lets `^` and `$` match at line
/// boundaries.
#[inline]
pub(crate) fn syntax_config() -> syntax::Config {
    syntax::Config::new().multi_line(true)
}

/// Escapes all meta characters of the given text.
#[inline]
pub(crate) fn escape(text: &str) -> String {
    regex_syntax::escape(text)
}

/// Wraps the pattern in a non-capturing group.
#[inline]
pub(crate) fn non_capturing(pattern: &str) -> String {
    format!("(?:{})", pattern)
}

/// Wraps the pattern in a capture group.
#[inline]
pub(crate) fn capture(pattern: &str) -> String {
    format!("({})", pattern)
}

/// Builds an alternation of the given sub-patterns. The alternatives keep their order, which is
/// their priority under leftmost-first semantics.
pub(crate) fn union<I, S>(patterns: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let alternatives = patterns
        .into_iter()
        .map(|p| non_capturing(p.as_ref()))
        .collect::<Vec<_>>()
        .join("|");
    non_capturing(&alternatives)
}

/// Parses the pattern into its high-level intermediate representation.
pub(crate) fn parse(pattern: &str) -> Result<Hir> {
    ParserBuilder::new()
        .multi_line(true)
        .build()
        .parse(pattern)
        .map_err(|e| LexError::new(LexErrorKind::RegexSyntax(e, pattern.to_string())))
}

/// Returns the number of explicit capture groups of the pattern.
#[inline]
pub(crate) fn capture_count(hir: &Hir) -> usize {
    hir.properties().explicit_captures_len()
}

/// Check if the pattern can match the empty string.
#[inline]
pub(crate) fn can_match_empty(hir: &Hir) -> bool {
    hir.properties().minimum_len() == Some(0)
}

/// Check if the pattern matches somewhere in a single newline character.
pub(crate) fn matches_newline(pattern: &str) -> Result<bool> {
    let re = Regex::builder().syntax(syntax_config()).build(pattern)?;
    Ok(re.is_match("\n"))
}

/// Reprints the pattern from its syntax tree. Comments and insignificant whitespace of verbose
/// patterns are dropped, so the result can be embedded in a larger pattern.
pub(crate) fn canonical(pattern: &str) -> Result<String> {
    Ok(print(&parse_ast(pattern)?))
}

/// Rewrites all capture groups of the pattern into non-capturing groups.
pub(crate) fn flatten_captures(pattern: &str) -> Result<String> {
    let mut ast = parse_ast(pattern)?;
    flatten(&mut ast);
    Ok(print(&ast))
}

fn parse_ast(pattern: &str) -> Result<Ast> {
    Parser::new()
        .parse(pattern)
        .map_err(|e| LexError::new(LexErrorKind::RegexSyntax(e.into(), pattern.to_string())))
}

fn print(ast: &Ast) -> String {
    let mut printed = String::new();
    // Printing into a String can't fail.
    let _ = Printer::new().print(ast, &mut printed);
    printed
}

fn flatten(ast: &mut Ast) {
    match ast {
        Ast::Group(group) => {
            if !matches!(group.kind, GroupKind::NonCapturing(_)) {
                group.kind = GroupKind::NonCapturing(ast::Flags {
                    span: group.span,
                    items: Vec::new(),
                });
            }
            flatten(&mut group.ast);
        }
        Ast::Repetition(repetition) => flatten(&mut repetition.ast),
        Ast::Alternation(alternation) => alternation.asts.iter_mut().for_each(flatten),
        Ast::Concat(concat) => concat.asts.iter_mut().for_each(flatten),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("==="), "===");
        assert_eq!(escape("${"), r"\$\{");
        assert_eq!(escape("a.b*"), r"a\.b\*");
    }

    #[test]
    fn test_union() {
        assert_eq!(union(["a", "b|c"]), "(?:(?:a)|(?:b|c))");
        assert_eq!(capture("x"), "(x)");
    }

    #[test]
    fn test_capture_count() {
        assert_eq!(capture_count(&parse("a(?:b)c").unwrap()), 0);
        assert_eq!(capture_count(&parse(r#""([^"]*)""#).unwrap()), 1);
        assert_eq!(capture_count(&parse("(a)(b(c))").unwrap()), 3);
        assert_eq!(capture_count(&parse("(?P<name>a)").unwrap()), 1);
    }

    #[test]
    fn test_can_match_empty() {
        assert!(can_match_empty(&parse("a*").unwrap()));
        assert!(can_match_empty(&parse("^").unwrap()));
        assert!(can_match_empty(&parse("x?|y").unwrap()));
        assert!(!can_match_empty(&parse("a+").unwrap()));
        assert!(!can_match_empty(&parse(r"\w+").unwrap()));
    }

    #[test]
    fn test_matches_newline() {
        assert!(matches_newline(r"\s+").unwrap());
        assert!(matches_newline(r"[^a]").unwrap());
        assert!(matches_newline("(?s).").unwrap());
        assert!(!matches_newline(".").unwrap());
        assert!(!matches_newline(" +").unwrap());
    }

    #[test]
    fn test_flatten_captures() {
        assert_eq!(flatten_captures("(a)(b(c))").unwrap(), "(?:a)(?:b(?:c))");
        assert_eq!(flatten_captures("(?P<x>a)+|b").unwrap(), "(?:a)+|b");
        assert_eq!(flatten_captures("(?i:a)").unwrap(), "(?i:a)");
        assert_eq!(
            capture_count(&parse(&flatten_captures("((a)|(b))*c").unwrap()).unwrap()),
            0
        );
    }

    #[test]
    fn test_canonical() {
        assert_eq!(canonical("[0-9]+").unwrap(), "[0-9]+");
        assert_eq!(canonical("(?x) [a-z]+ # letters").unwrap(), "(?x)[a-z]+");
        assert_eq!(
            union([canonical("(?x) a+ # tail").unwrap(), "b".to_string()]),
            "(?:(?:(?x)a+)|(?:b))"
        );
        assert!(matches!(
            *canonical("(").unwrap_err().source,
            LexErrorKind::RegexSyntax(_, ref p) if p == "("
        ));
    }

    #[test]
    fn test_parse_error() {
        let err = parse("[").unwrap_err();
        assert!(matches!(*err.source, LexErrorKind::RegexSyntax(_, ref p) if p == "["));
    }
}
