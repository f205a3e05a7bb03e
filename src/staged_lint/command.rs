//! Turning a configured command string into the shell line that runs.

use std::borrow::Cow;

/// Replaced with the matched file list when present in a command.
pub const FILES_PLACEHOLDER: &str = "{files}";

fn quote(file: &str) -> Cow<'_, str> {
    shlex::try_quote(file).unwrap_or(Cow::Borrowed(file))
}

/// Substitute the matched files into a command.
///
/// Every `{files}` occurrence is replaced with the space-joined file list;
/// without a placeholder the files are appended. Paths are shell-quoted only
/// when they need it.
pub fn render(command: &str, files: &[String]) -> String {
    let joined = files
        .iter()
        .map(|file| quote(file))
        .collect::<Vec<_>>()
        .join(" ");

    if command.contains(FILES_PLACEHOLDER) {
        command.replace(FILES_PLACEHOLDER, &joined)
    } else if joined.is_empty() {
        command.to_string()
    } else {
        format!("{command} {joined}")
    }
}

const FIX_FLAG: &str = "--fix";

/// Characters that end a flag besides whitespace: shell control operators.
fn ends_flag(c: char) -> bool {
    c.is_whitespace() || matches!(c, ';' | '&' | '|' | ')')
}

/// Drop `--fix` and `--fix=<value>` tokens so a linter runs in check-only mode.
///
/// Only the flag and the blanks in front of it are removed; everything else,
/// including quoting and line breaks between chained commands, is kept as
/// written.
pub fn strip_fix_flags(command: &str) -> String {
    let mut stripped = String::with_capacity(command.len());
    let mut rest = command;

    while let Some(pos) = rest.find(FIX_FLAG) {
        let (before, after) = rest.split_at(pos);
        let tail = &after[FIX_FLAG.len()..];
        let value_len = match tail.strip_prefix('=') {
            Some(value) => 1 + value.find(ends_flag).unwrap_or(value.len()),
            None => 0,
        };
        let following = &tail[value_len..];

        let previous = before.chars().next_back().or_else(|| stripped.chars().next_back());
        let starts_token = previous.is_none_or(char::is_whitespace);
        let ends_token = following.chars().next().is_none_or(ends_flag);

        if !(starts_token && ends_token) {
            stripped.push_str(&rest[..pos + FIX_FLAG.len()]);
            rest = tail;
            continue;
        }

        let kept = before.trim_end_matches([' ', '\t']);
        stripped.push_str(kept);
        let at_line_start = stripped.chars().next_back().is_none_or(|c| c == '\n');
        rest = if at_line_start {
            following.trim_start_matches([' ', '\t'])
        } else {
            following
        };
    }

    stripped.push_str(rest);
    stripped
}
