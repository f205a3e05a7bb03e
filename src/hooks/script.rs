//! Hook script template.

use std::borrow::Cow;
use std::path::Path;

use super::GitHook;
use crate::config::HookAction;

/// Binary name hook scripts call back into.
pub const HOOK_RUNNER: &str = "git-hooks";

/// Set to `1` to make every installed hook exit successfully without running.
pub const SKIP_ENV: &str = "SKIP_GIT_HOOKS";

/// Names a shell file sourced before the hook command runs.
pub const RC_ENV: &str = "GIT_HOOKS_RC";

/// Shared head of every installed hook.
pub const PREAMBLE: &str = r#"#!/bin/sh

if [ "$SKIP_GIT_HOOKS" = "1" ]; then
    echo "[INFO] SKIP_GIT_HOOKS is set to 1, skipping hook."
    exit 0
fi

if [ -f "$GIT_HOOKS_RC" ]; then
    . "$GIT_HOOKS_RC"
fi

"#;

/// The command a hook script runs for a configured action.
///
/// Staged-lint hooks call back into the binary, passing along the config
/// file hooks were installed from, if one was given explicitly.
pub fn hook_command(hook: GitHook, action: &HookAction, config_path: Option<&Path>) -> String {
    match action {
        HookAction::Command(command) => command.clone(),
        HookAction::StagedLint(_) => match config_path {
            Some(path) => {
                let path = path.to_string_lossy();
                let quoted = shlex::try_quote(&path).unwrap_or(Cow::Borrowed(&*path));
                format!("{HOOK_RUNNER} --config {quoted} run-staged-lint {hook}")
            }
            None => format!("{HOOK_RUNNER} run-staged-lint {hook}"),
        },
    }
}

/// Full script contents for a hook command.
pub fn render_hook_script(command: &str) -> String {
    let mut script = String::with_capacity(PREAMBLE.len() + command.len() + 1);
    script.push_str(PREAMBLE);
    script.push_str(command);
    if !command.ends_with('\n') {
        script.push('\n');
    }
    script
}
