//! Glob pattern utilities
//!
//! Staged-lint patterns are matched against repository-relative paths with a
//! small glob dialect:
//!
//! - `*` matches any run of characters except `/`
//! - `**` matches any run of characters including `/`; `**/` also matches
//!   zero leading directories
//! - `?` matches a single character except `/`
//! - `{a,b,c}` expands into one pattern per option
//! - a leading `!` negates the pattern
//!
//! Everything else is matched literally and matching is always anchored to
//! the whole path.

use regex::Regex;

/// Expand every `{a,b,...}` group in a pattern into the cross product of its options.
///
/// Groups are expanded left to right, so the first group varies slowest.
/// A pattern without braces expands to itself. Empty groups (`{}`) are kept
/// as literal text.
pub fn expand(pattern: &str) -> Vec<String> {
    let Some((open, close)) = find_brace_group(pattern) else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let body = &pattern[open + 1..close];
    let suffix = &pattern[close + 1..];

    body.split(',')
        .flat_map(|option| expand(&format!("{prefix}{}{suffix}", option.trim())))
        .collect()
}

/// Locate the first innermost `{...}` group with a non-empty body.
fn find_brace_group(pattern: &str) -> Option<(usize, usize)> {
    let mut open = None;
    for (index, byte) in pattern.bytes().enumerate() {
        match byte {
            b'{' => open = Some(index),
            b'}' => {
                if let Some(start) = open.take() {
                    if index > start + 1 {
                        return Some((start, index));
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// A single compiled glob (no brace groups left), possibly negated.
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    negated: bool,
    regex: Option<Regex>,
}

impl Glob {
    /// Compile a glob. Compilation never fails: a pattern that cannot be
    /// turned into a matcher simply matches nothing.
    pub fn new(pattern: &str) -> Self {
        let (negated, body) = match pattern.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };

        let regex = match Regex::new(&glob_to_regex(body)) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::debug!("glob {pattern:?} could not be compiled: {e}");
                None
            }
        };

        Self {
            pattern: pattern.to_string(),
            negated,
            regex,
        }
    }

    /// The pattern this glob was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Test the pattern body, ignoring negation.
    fn matches_body(&self, path: &str) -> bool {
        self.regex.as_ref().is_some_and(|regex| regex.is_match(path))
    }

    /// Test a path against this glob, honouring negation.
    pub fn is_match(&self, path: &str) -> bool {
        self.matches_body(path) != self.negated
    }
}

/// Translate a glob body into an anchored regular expression.
fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut regex = String::with_capacity(glob.len() * 2 + 2);
    regex.push('^');

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                while chars.get(i) == Some(&'*') {
                    i += 1;
                }
                if chars.get(i) == Some(&'/') {
                    regex.push_str("(?:.*/)?");
                    i += 1;
                } else {
                    regex.push_str(".*");
                }
                continue;
            }
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            c => {
                let mut buf = [0u8; 4];
                regex.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
        }
        i += 1;
    }

    regex.push('$');
    regex
}

/// Test a path against a single (already brace-expanded) pattern.
pub fn matches(path: &str, pattern: &str) -> bool {
    Glob::new(pattern).is_match(path)
}

/// A brace-expanded pattern split into include and exclude globs.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    includes: Vec<Glob>,
    excludes: Vec<Glob>,
}

impl PatternFilter {
    pub fn new(pattern: &str) -> Self {
        let mut includes = Vec::new();
        let mut excludes = Vec::new();

        for expanded in expand(pattern) {
            match expanded.strip_prefix('!') {
                Some(body) => excludes.push(Glob::new(body)),
                None => includes.push(Glob::new(&expanded)),
            }
        }

        Self { includes, excludes }
    }

    /// A path passes when it matches any include (or there are none) and no exclude.
    pub fn is_match(&self, path: &str) -> bool {
        let included =
            self.includes.is_empty() || self.includes.iter().any(|glob| glob.is_match(path));
        included && !self.excludes.iter().any(|glob| glob.is_match(path))
    }

    /// Keep the files that pass, in input order.
    pub fn filter(&self, files: &[String]) -> Vec<String> {
        files
            .iter()
            .filter(|file| self.is_match(file))
            .cloned()
            .collect()
    }
}

/// Filter files through a pattern, expanding braces and applying negations.
pub fn filter_by_pattern(files: &[String], pattern: &str) -> Vec<String> {
    PatternFilter::new(pattern).filter(files)
}
