use std::collections::VecDeque;

use log::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    internal::{diagnostics, rule::Transition, CompiledState, ErrorRule, RuleMatch, StateID},
    LexError, LexErrorKind, LexerTable, Position, Result, Token,
};

/// The part of a scanner's state that is needed to continue scanning in a new buffer, e.g. when
/// an editor rescans the input line by line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SavedInfo {
    /// The line number.
    pub line: usize,
    /// The column number.
    pub col: usize,
    /// The name of the current state.
    pub state: String,
    /// The names of the states on the state stack, bottom first.
    pub stack: Vec<String>,
}

/// A scanner over one buffer.
///
/// Scanners are created by [`LexerTable::instantiate`]. They pull one token per call to
/// [`ScannerState::next_token`] and switch between the states of the table as the rules demand.
/// A scanner is also an iterator over the tokens of its buffer.
///
/// Cloning a scanner yields an independent scanner at the same position that shares the
/// compiled table.
#[derive(Debug, Clone)]
pub struct ScannerState {
    table: LexerTable,
    buffer: String,
    offset: usize,
    line: usize,
    col: usize,
    state: StateID,
    stack: Vec<StateID>,
    // Matches found behind a fallback token. They are emitted on the next call.
    pending: VecDeque<(StateID, RuleMatch)>,
}

impl ScannerState {
    pub(crate) fn new(table: LexerTable, buffer: String) -> Self {
        let state = table.start_id();
        Self {
            table,
            buffer,
            offset: 0,
            line: 1,
            col: 1,
            state,
            stack: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    /// Returns the next token that is not ignored, or `None` at the end of the buffer.
    ///
    /// Input that no rule matches is returned as [`LexErrorKind::UnmatchedInput`] unless the
    /// current state has an error or fallback rule. The error consumes the rest of the buffer,
    /// the following call returns `None`.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            let (state_id, matched) = match self.pending.pop_front() {
                Some(pending) => pending,
                None => {
                    if self.offset >= self.buffer.len() {
                        return Ok(None);
                    }
                    let state_id = self.state;
                    let found = scan(self.table.state(state_id), &self.buffer, self.offset);
                    match found {
                        Some((matched, queued)) => {
                            if let Some(queued) = queued {
                                self.pending.push_back((state_id, queued));
                            }
                            (state_id, matched)
                        }
                        None => return Err(self.unmatched_input()),
                    }
                }
            };
            let (token, ignore) = self.emit(state_id, matched);
            if ignore {
                trace!("Skipping ignored token {:?}", token);
                continue;
            }
            trace!("Token {:?}", token);
            return Ok(Some(token));
        }
    }

    /// Turns a match into a token and advances the cursor behind it. The flag tells if the rule
    /// of the match is ignored.
    fn emit(&mut self, state_id: StateID, matched: RuleMatch) -> (Token, bool) {
        let rule = self.table.state(state_id).rule(matched.rule);
        let text = &self.buffer[matched.start..matched.end];
        let source = matched
            .value
            .map_or(text, |(start, end)| &self.buffer[start..end]);
        let value = match &rule.value {
            Some(transform) => transform(source),
            None => source.to_string(),
        };
        let (token_type, categories) = match rule.keywords.as_ref().and_then(|k| k.lookup(text)) {
            Some(keyword) => (keyword.token_type.clone(), keyword.categories.clone()),
            None => (rule.token_type.clone(), rule.categories.clone()),
        };
        let (count_lines, transition, ignore) = (rule.line_breaks, rule.transition, rule.ignore);
        let text = text.to_string();
        let (line, col) = (self.line, self.col);
        let line_breaks = self.advance(matched.end, count_lines);
        self.apply_transition(transition);
        let token = Token::new(
            token_type,
            value,
            text,
            matched.start,
            line_breaks,
            line,
            col,
            categories,
        );
        (token, ignore)
    }

    /// Moves the cursor to `end` and returns the number of line breaks passed.
    fn advance(&mut self, end: usize, count_lines: bool) -> usize {
        let text = &self.buffer[self.offset..end];
        let line_breaks = if count_lines {
            text.matches('\n').count()
        } else {
            0
        };
        let col = match text.rfind('\n') {
            Some(last) if line_breaks > 0 => text[last + 1..].chars().count() + 1,
            _ => self.col + text.chars().count(),
        };
        self.offset = end;
        self.line += line_breaks;
        self.col = col;
        line_breaks
    }

    fn apply_transition(&mut self, transition: Transition) {
        match transition {
            Transition::None => {}
            Transition::Push(state) => {
                self.stack.push(self.state);
                self.switch_to(state);
            }
            Transition::Pop => match self.stack.pop() {
                Some(state) => self.switch_to(state),
                None => trace!(
                    "Ignoring pop in state '{}' on an empty state stack",
                    self.current_state()
                ),
            },
            Transition::Next(state) => self.switch_to(state),
        }
    }

    fn switch_to(&mut self, state: StateID) {
        trace!(
            "Switching from state '{}' to state '{}'",
            self.current_state(),
            self.table.state(state).name
        );
        self.state = state;
    }

    /// Creates the error for unmatched input at the cursor and skips the rest of the buffer.
    fn unmatched_input(&mut self) -> LexError {
        let (offset, line, col) = (self.offset, self.line, self.col);
        let message = diagnostics::format_error(&self.buffer, offset, line, col, "invalid syntax");
        self.advance(self.buffer.len(), true);
        LexError::new(LexErrorKind::UnmatchedInput {
            offset,
            line,
            col,
            message,
        })
    }

    /// Replaces the buffer and moves the cursor to its start.
    ///
    /// Without saved info the scanner starts at line 1, column 1 in the start state with an empty
    /// state stack. With saved info the line, column, state and stack are restored from it. A
    /// saved state that the table does not know is reported as [`LexErrorKind::UnknownState`]
    /// and leaves the scanner unchanged.
    pub fn reset<S: Into<String>>(
        &mut self,
        buffer: S,
        info: Option<&SavedInfo>,
    ) -> Result<&mut Self> {
        let (line, col, state, stack) = match info {
            Some(info) => (
                info.line,
                info.col,
                self.resolve(&info.state)?,
                info.stack
                    .iter()
                    .map(|name| self.resolve(name))
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => (1, 1, self.table.start_id(), Vec::new()),
        };
        self.buffer = buffer.into();
        self.offset = 0;
        self.line = line;
        self.col = col;
        self.state = state;
        self.stack = stack;
        self.pending.clear();
        Ok(self)
    }

    /// Saves the position and the states, to continue in another buffer with
    /// [`ScannerState::reset`].
    pub fn save(&self) -> SavedInfo {
        SavedInfo {
            line: self.line,
            col: self.col,
            state: self.current_state().to_string(),
            stack: self.state_stack().map(str::to_string).collect(),
        }
    }

    /// Appends text to the buffer without moving the cursor.
    pub fn feed(&mut self, text: &str) -> &mut Self {
        self.buffer.push_str(text);
        self
    }

    /// Formats a message with the position of the token, or of the cursor if no token is given,
    /// and an excerpt of the buffer around it.
    pub fn format_error(&self, token: Option<&Token>, message: &str) -> String {
        let (offset, line, col) = match token {
            Some(token) => (token.offset(), token.line(), token.col()),
            None => (self.offset, self.line, self.col),
        };
        diagnostics::format_error(&self.buffer, offset, line, col, message)
    }

    /// Switches to the named state without touching the state stack.
    pub fn set_state(&mut self, name: &str) -> Result<()> {
        let state = self.resolve(name)?;
        self.switch_to(state);
        Ok(())
    }

    /// Pushes the current state on the state stack and switches to the named state.
    pub fn push_state(&mut self, name: &str) -> Result<()> {
        let state = self.resolve(name)?;
        self.apply_transition(Transition::Push(state));
        Ok(())
    }

    /// Switches back to the state on top of the state stack. Does nothing if the stack is empty.
    pub fn pop_state(&mut self) {
        self.apply_transition(Transition::Pop);
    }

    /// Returns the name of the current state.
    pub fn current_state(&self) -> &str {
        &self.table.state(self.state).name
    }

    /// Returns the names of the states on the state stack, bottom first.
    pub fn state_stack(&self) -> impl Iterator<Item = &str> {
        self.stack
            .iter()
            .map(|id| self.table.state(*id).name.as_str())
    }

    /// Returns the byte offset of the cursor.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the line of the cursor.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the column of the cursor.
    #[inline]
    pub fn col(&self) -> usize {
        self.col
    }

    /// Returns the position of the cursor.
    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Checks if the whole buffer was scanned.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pending.is_empty() && self.offset >= self.buffer.len()
    }

    /// Returns the buffer.
    #[inline]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Returns the table the scanner was created from.
    #[inline]
    pub fn table(&self) -> &LexerTable {
        &self.table
    }

    fn resolve(&self, name: &str) -> Result<StateID> {
        self.table
            .state_id(name)
            .ok_or_else(|| LexError::new(LexErrorKind::UnknownState(name.to_string())))
    }
}

/// Finds the rule match at `offset` in the given state.
///
/// A fallback token in front of a later match comes with that match, which has to be emitted
/// after it. `None` means that nothing matched and the state has no error or fallback rule.
fn scan(
    state: &CompiledState,
    buffer: &str,
    offset: usize,
) -> Option<(RuleMatch, Option<RuleMatch>)> {
    if let Some(c) = buffer[offset..].chars().next() {
        if let Some(rule) = state.fast_rule(c) {
            let matched = RuleMatch {
                rule,
                start: offset,
                end: offset + c.len_utf8(),
                value: None,
            };
            return Some((matched, None));
        }
    }

    let found = state.find_at(buffer, offset);
    match state.error {
        ErrorRule::Default => found.map(|matched| (matched, None)),
        ErrorRule::Error(rule) => {
            let matched = found.unwrap_or(RuleMatch {
                rule,
                start: offset,
                end: buffer.len(),
                value: None,
            });
            Some((matched, None))
        }
        ErrorRule::Fallback(rule) => {
            let (end, queued) = match found {
                Some(matched) if matched.start == offset => return Some((matched, None)),
                Some(matched) => (matched.start, Some(matched)),
                None => (buffer.len(), None),
            };
            trace!("Fallback token at {}..{}", offset, end);
            let gap = RuleMatch {
                rule,
                start: offset,
                end,
                value: None,
            };
            Some((gap, queued))
        }
    }
}

impl Iterator for ScannerState {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile, compile_states, RuleOptions, RuleSpec, StateSpec};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn types(scanner: &mut ScannerState) -> Vec<String> {
        scanner
            .map(|t| t.unwrap().token_type().to_string())
            .collect()
    }

    #[test]
    fn test_line_and_column_tracking() {
        init();
        let table = compile(vec![
            ("word", RuleSpec::regex("[a-zäö]+")),
            ("ws", RuleOptions::new().regex("[ \n]+").line_breaks().into()),
        ])
        .unwrap();
        let mut scanner = table.instantiate("äb cd\n  ef");
        let tokens = scanner.by_ref().map(Result::unwrap).collect::<Vec<_>>();
        let positions = tokens
            .iter()
            .map(|t| (t.text(), t.offset(), t.line(), t.col(), t.line_breaks()))
            .collect::<Vec<_>>();
        assert_eq!(
            positions,
            vec![
                ("äb", 0, 1, 1, 0),
                (" ", 3, 1, 3, 0),
                ("cd", 4, 1, 4, 0),
                ("\n  ", 6, 1, 6, 1),
                ("ef", 9, 2, 3, 0),
            ]
        );
        assert_eq!(scanner.position(), Position::new(2, 5));
        assert!(scanner.is_at_end());
    }

    #[test]
    fn test_fallback_queues_match() {
        init();
        let table = compile(vec![
            ("open", RuleSpec::literal("${")),
            ("text", RuleSpec::fallback()),
        ])
        .unwrap();
        let mut scanner = table.instantiate("ab${${cd");
        let tokens = scanner
            .by_ref()
            .map(|t| {
                let t = t.unwrap();
                (t.token_type().to_string(), t.text().to_string())
            })
            .collect::<Vec<_>>();
        assert_eq!(
            tokens,
            vec![
                ("text".to_string(), "ab".to_string()),
                ("open".to_string(), "${".to_string()),
                ("open".to_string(), "${".to_string()),
                ("text".to_string(), "cd".to_string()),
            ]
        );
    }

    #[test]
    fn test_error_rule_consumes_rest() {
        init();
        let table = compile(vec![
            ("word", RuleSpec::regex("[a-z]+")),
            ("error", RuleSpec::error()),
        ])
        .unwrap();
        let mut scanner = table.instantiate("ab!cd");
        let first = scanner.next_token().unwrap().unwrap();
        assert_eq!(first.text(), "ab");
        let error = scanner.next_token().unwrap().unwrap();
        assert_eq!(error.token_type(), "error");
        assert_eq!(error.text(), "!cd");
        assert!(scanner.next_token().unwrap().is_none());
    }

    #[test]
    fn test_unmatched_input() {
        init();
        let table = compile(vec![
            ("word", RuleSpec::regex("[a-z]+")),
            ("nl", RuleOptions::new().literal("\n").line_breaks().into()),
        ])
        .unwrap();
        let mut scanner = table.instantiate("ab\ncd!ef");
        let tokens = (0..3)
            .map(|_| scanner.next_token().unwrap().unwrap().token_type().to_string())
            .collect::<Vec<_>>();
        assert_eq!(tokens, vec!["word", "nl", "word"]);
        let error = scanner.next_token().unwrap_err();
        match error.kind() {
            LexErrorKind::UnmatchedInput {
                offset,
                line,
                col,
                message,
            } => {
                assert_eq!((*offset, *line, *col), (5, 2, 3));
                assert!(message.starts_with("invalid syntax at line 2 col 3:"));
            }
            kind => panic!("unexpected error {:?}", kind),
        }
        assert!(scanner.is_at_end());
        assert!(scanner.next_token().unwrap().is_none());
    }

    #[test]
    fn test_state_switching() {
        init();
        let table = compile_states(
            vec![
                StateSpec::new(
                    "a",
                    vec![
                        ("x", RuleSpec::literal("x")),
                        ("to_b", RuleOptions::new().literal(">").next("b").into()),
                    ],
                ),
                StateSpec::new(
                    "b",
                    vec![
                        ("y", RuleSpec::literal("y")),
                        ("to_a", RuleOptions::new().literal("<").next("a").into()),
                    ],
                ),
            ],
            None,
        )
        .unwrap();
        let mut scanner = table.instantiate("x>y<x");
        assert_eq!(types(&mut scanner), vec!["x", "to_b", "y", "to_a", "x"]);
        assert_eq!(scanner.current_state(), "a");

        scanner.reset("yy", None).unwrap();
        scanner.set_state("b").unwrap();
        assert_eq!(types(&mut scanner), vec!["y", "y"]);

        scanner.reset("", None).unwrap();
        scanner.push_state("b").unwrap();
        scanner.push_state("a").unwrap();
        assert_eq!(scanner.state_stack().collect::<Vec<_>>(), vec!["a", "b"]);
        scanner.pop_state();
        scanner.pop_state();
        scanner.pop_state();
        assert_eq!(scanner.current_state(), "a");
        assert_eq!(scanner.state_stack().count(), 0);
        assert!(matches!(
            *scanner.set_state("c").unwrap_err().source,
            LexErrorKind::UnknownState(_)
        ));
    }
}
