//! Configuration management for git hooks
//!
//! A configuration maps git hook names to actions. An action is either a
//! plain shell command or, for `pre-commit`, a staged-lint pattern map:
//!
//! ```json
//! {
//!   "pre-commit": {
//!     "staged-lint": {
//!       "**/*.{js,ts}": ["eslint --fix", "tsc --noEmit"]
//!     },
//!     "autoRestage": true
//!   },
//!   "commit-msg": "gitlint .git/COMMIT_EDITMSG",
//!   "verbose": true
//! }
//! ```
//!
//! Hook names are accepted in kebab-case or camelCase, and option keys in
//! either spelling (`stagedLint`/`staged-lint`). [`HooksConfig::from_value`]
//! folds all of them into canonical fields, so nothing downstream has to
//! know about the aliases.

mod error;
pub mod loader;
pub mod settings;


use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

use crate::hooks::GitHook;

pub use error::ConfigError;
pub use loader::{ConfigFormat, ConfigSource, load};
pub use settings::EnvOverrides;

/// One or more shell commands run against the files a pattern matched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    Single(String),
    Sequence(Vec<String>),
}

impl CommandSpec {
    /// The commands in execution order.
    pub fn commands(&self) -> &[String] {
        match self {
            CommandSpec::Single(command) => std::slice::from_ref(command),
            CommandSpec::Sequence(commands) => commands,
        }
    }
}

impl From<&str> for CommandSpec {
    fn from(command: &str) -> Self {
        CommandSpec::Single(command.to_string())
    }
}

impl From<Vec<&str>> for CommandSpec {
    fn from(commands: Vec<&str>) -> Self {
        CommandSpec::Sequence(commands.into_iter().map(str::to_string).collect())
    }
}

/// A glob pattern and the commands to run on the staged files it matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    pub pattern: String,
    pub commands: CommandSpec,
}

/// Ordered glob pattern → command mapping.
///
/// Order is significant: entries are linted in the order they were written,
/// and the first failing entry stops the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternMap {
    entries: Vec<PatternEntry>,
}

impl PatternMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, replacing the commands of an existing identical pattern.
    pub fn insert(&mut self, pattern: impl Into<String>, commands: CommandSpec) {
        let pattern = pattern.into();
        match self.entries.iter_mut().find(|entry| entry.pattern == pattern) {
            Some(entry) => entry.commands = commands,
            None => self.entries.push(PatternEntry { pattern, commands }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternEntry> {
        self.entries.iter()
    }

}

impl<S: Into<String>> FromIterator<(S, CommandSpec)> for PatternMap {
    fn from_iter<I: IntoIterator<Item = (S, CommandSpec)>>(iter: I) -> Self {
        let mut map = PatternMap::new();
        for (pattern, commands) in iter {
            map.insert(pattern, commands);
        }
        map
    }
}

impl<'de> Deserialize<'de> for PatternMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PatternMapVisitor;

        impl<'de> Visitor<'de> for PatternMapVisitor {
            type Value = PatternMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of glob patterns to a command or list of commands")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PatternMap, A::Error> {
                let mut map = PatternMap::new();
                while let Some((pattern, commands)) =
                    access.next_entry::<String, CommandSpec>()?
                {
                    map.insert(pattern, commands);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(PatternMapVisitor)
    }
}

/// What a configured hook does when git invokes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookAction {
    /// A literal shell command written into the hook script.
    Command(String),
    /// Lint staged files through a pattern map.
    StagedLint(PatternMap),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookEntry {
    pub action: HookAction,
    /// Hook-level auto-restage setting; overrides the global one.
    pub auto_restage: Option<bool>,
}

/// Which unconfigured hooks the installer must leave alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreserveUnused {
    #[default]
    None,
    All,
    Hooks(Vec<GitHook>),
}

impl PreserveUnused {
    pub fn preserves(&self, hook: GitHook) -> bool {
        match self {
            PreserveUnused::None => false,
            PreserveUnused::All => true,
            PreserveUnused::Hooks(hooks) => hooks.contains(&hook),
        }
    }
}

/// Normalized configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HooksConfig {
    hooks: Vec<(GitHook, HookEntry)>,
    /// Global pattern map used when the hook has none of its own.
    pub staged_lint: Option<PatternMap>,
    /// Global auto-restage setting.
    pub auto_restage: Option<bool>,
    pub verbose: bool,
    pub preserve_unused: PreserveUnused,
    /// Per-command timeout in seconds.
    pub timeout: Option<u64>,
    unknown_keys: Vec<String>,
}

enum TopLevelKey {
    Hook(GitHook),
    StagedLint,
    AutoRestage,
    Verbose,
    PreserveUnused,
    Timeout,
    Unknown,
}

fn classify(key: &str) -> TopLevelKey {
    match key {
        "stagedLint" | "staged-lint" => TopLevelKey::StagedLint,
        "autoRestage" | "auto-restage" => TopLevelKey::AutoRestage,
        "verbose" => TopLevelKey::Verbose,
        "preserveUnused" | "preserve-unused" => TopLevelKey::PreserveUnused,
        "timeout" => TopLevelKey::Timeout,
        other => GitHook::from_name(other)
            .map(TopLevelKey::Hook)
            .unwrap_or(TopLevelKey::Unknown),
    }
}

fn is_staged_lint_key(key: &str) -> bool {
    matches!(key, "stagedLint" | "staged-lint")
}

fn is_auto_restage_key(key: &str) -> bool {
    matches!(key, "autoRestage" | "auto-restage")
}

fn parse_bool(key: &str, value: &Value) -> Result<bool, ConfigError> {
    value
        .as_bool()
        .ok_or_else(|| ConfigError::invalid(key, format!("expected a boolean, found {value}")))
}

fn parse_pattern_map(key: &str, value: Value) -> Result<PatternMap, ConfigError> {
    serde_json::from_value(value).map_err(|e| ConfigError::invalid(key, e.to_string()))
}

fn parse_preserve_unused(key: &str, value: &Value) -> Result<PreserveUnused, ConfigError> {
    match value {
        Value::Bool(true) => Ok(PreserveUnused::All),
        Value::Bool(false) => Ok(PreserveUnused::None),
        Value::Array(names) => names
            .iter()
            .map(|name| {
                name.as_str()
                    .and_then(GitHook::from_name)
                    .ok_or_else(|| ConfigError::invalid(key, format!("{name} is not a git hook")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(PreserveUnused::Hooks),
        other => Err(ConfigError::invalid(
            key,
            format!("expected a boolean or a list of hook names, found {other}"),
        )),
    }
}

impl HooksConfig {
    /// Parse a raw configuration document, folding every alias into its canonical form.
    ///
    /// Unknown keys are remembered rather than rejected; see [`HooksConfig::validate`].
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let Value::Object(map) = value else {
            return Err(ConfigError::invalid(
                "<root>",
                format!("expected an object, found {value}"),
            ));
        };

        let mut config = HooksConfig::default();
        let mut seen_staged_lint = false;

        for (key, value) in map {
            match classify(&key) {
                TopLevelKey::Hook(hook) => {
                    if config.hook(hook).is_some() {
                        return Err(ConfigError::invalid(
                            key,
                            format!("{hook} is configured more than once"),
                        ));
                    }
                    let entry = config.parse_hook_entry(hook, &key, value)?;
                    config.hooks.push((hook, entry));
                }
                TopLevelKey::StagedLint => {
                    if seen_staged_lint {
                        return Err(ConfigError::invalid(
                            key,
                            "staged-lint is configured more than once",
                        ));
                    }
                    seen_staged_lint = true;
                    config.staged_lint = Some(parse_pattern_map(&key, value)?);
                }
                TopLevelKey::AutoRestage => config.auto_restage = Some(parse_bool(&key, &value)?),
                TopLevelKey::Verbose => config.verbose = parse_bool(&key, &value)?,
                TopLevelKey::PreserveUnused => {
                    config.preserve_unused = parse_preserve_unused(&key, &value)?
                }
                TopLevelKey::Timeout => {
                    let seconds = value.as_u64().ok_or_else(|| {
                        ConfigError::invalid(&key, format!("expected seconds, found {value}"))
                    })?;
                    if seconds == 0 {
                        return Err(ConfigError::invalid(key, "must be at least one second"));
                    }
                    config.timeout = Some(seconds);
                }
                TopLevelKey::Unknown => config.unknown_keys.push(key),
            }
        }

        Ok(config)
    }

    fn parse_hook_entry(
        &mut self,
        hook: GitHook,
        key: &str,
        value: Value,
    ) -> Result<HookEntry, ConfigError> {
        match value {
            Value::String(command) => Ok(HookEntry {
                action: HookAction::Command(command),
                auto_restage: None,
            }),
            Value::Object(fields) => {
                let mut pattern_map = None;
                let mut auto_restage = None;

                for (field, value) in fields {
                    if is_staged_lint_key(&field) {
                        if pattern_map.is_some() {
                            return Err(ConfigError::invalid(
                                format!("{key}.{field}"),
                                "staged-lint is configured more than once",
                            ));
                        }
                        pattern_map = Some(parse_pattern_map(&format!("{key}.{field}"), value)?);
                    } else if is_auto_restage_key(&field) {
                        auto_restage = Some(parse_bool(&format!("{key}.{field}"), &value)?);
                    } else {
                        self.unknown_keys.push(format!("{hook}.{field}"));
                    }
                }

                let pattern_map = pattern_map.ok_or_else(|| {
                    ConfigError::invalid(key, "expected a command or an object with a stagedLint map")
                })?;

                Ok(HookEntry {
                    action: HookAction::StagedLint(pattern_map),
                    auto_restage,
                })
            }
            other => Err(ConfigError::invalid(
                key,
                format!("expected a command string or an object, found {other}"),
            )),
        }
    }

    /// Parse a JSON document. Mostly useful for programmatic configuration and tests.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| ConfigError::invalid("<root>", e.to_string()))?;
        Self::from_value(value)
    }

    /// The entry configured for a hook, if any.
    pub fn hook(&self, hook: GitHook) -> Option<&HookEntry> {
        self.hooks
            .iter()
            .find_map(|(configured, entry)| (*configured == hook).then_some(entry))
    }

    /// Configured hooks in document order.
    pub fn hooks(&self) -> impl Iterator<Item = (GitHook, &HookEntry)> {
        self.hooks.iter().map(|(hook, entry)| (*hook, entry))
    }

    /// Add or replace a hook entry.
    pub fn set_hook(&mut self, hook: GitHook, entry: HookEntry) {
        match self.hooks.iter_mut().find(|(configured, _)| *configured == hook) {
            Some((_, existing)) => *existing = entry,
            None => self.hooks.push((hook, entry)),
        }
    }

    /// Keys that were neither hooks nor known options.
    pub fn unknown_keys(&self) -> &[String] {
        &self.unknown_keys
    }

    /// Install-time checks. Running a hook never calls this.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(key) = self.unknown_keys.first() {
            return Err(ConfigError::UnknownKey(key.clone()));
        }

        for (hook, entry) in self.hooks() {
            match &entry.action {
                HookAction::Command(command) if command.trim().is_empty() => {
                    return Err(ConfigError::EmptyCommand(hook));
                }
                HookAction::StagedLint(_) if hook != GitHook::PreCommit => {
                    return Err(ConfigError::StagedLintNotAllowed(hook));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Layer environment overrides on top of the file values.
    pub fn apply_env(&mut self, overrides: &EnvOverrides) {
        if let Some(verbose) = overrides.verbose {
            self.verbose = verbose;
        }
        if let Some(auto_restage) = overrides.auto_restage {
            self.auto_restage = Some(auto_restage);
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = Some(timeout);
        }
    }
}
