//! Formatting of error messages that point into the buffer of a scanner.

use std::fmt::Write;

/// The number of lines shown in front of the offending line.
const CONTEXT_LINES: usize = 2;

/// Formats `message` with the position and an excerpt of the buffer.
///
/// The excerpt shows the offending line and up to two lines before it, each prefixed with its
/// line number. A caret below the excerpt marks the column. Tabs in front of the column are kept
/// in the caret line so that the caret lines up.
pub(crate) fn format_error(
    buffer: &str,
    offset: usize,
    line: usize,
    col: usize,
    message: &str,
) -> String {
    let mut offset = offset.min(buffer.len());
    while !buffer.is_char_boundary(offset) {
        offset -= 1;
    }
    let line_start = buffer[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line_end = buffer[offset..]
        .find('\n')
        .map_or(buffer.len(), |i| offset + i);

    let mut lines = vec![(line, &buffer[line_start..line_end])];
    let mut start = line_start;
    let mut number = line;
    while lines.len() <= CONTEXT_LINES && start > 0 && number > 1 {
        let end = start - 1;
        start = buffer[..end].rfind('\n').map_or(0, |i| i + 1);
        number -= 1;
        lines.push((number, &buffer[start..end]));
    }
    lines.reverse();

    let width = line.to_string().len();
    let mut result = format!("{} at line {} col {}:\n\n", message, line, col);
    for (number, text) in lines {
        let _ = writeln!(
            result,
            "  {:>width$}  {}",
            number,
            text.trim_end_matches('\r'),
            width = width
        );
    }
    let caret = buffer[line_start..offset]
        .chars()
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect::<String>();
    let _ = write!(result, "  {:width$}  {}^", "", caret, width = width);
    result
}
