//! The fixed set of git hook names.
//!
//! Hooks are written in kebab-case on disk (`prepare-commit-msg`) but
//! configuration files may also use the camelCase spelling
//! (`prepareCommitMsg`). Both are folded into [`GitHook`] when parsing.

use std::fmt;
use std::str::FromStr;

macro_rules! git_hooks {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// A git hook that can be installed into the hooks directory.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum GitHook {
            $($variant),+
        }

        impl GitHook {
            /// Every hook git knows about, in the order git documents them.
            pub const ALL: &'static [GitHook] = &[$(GitHook::$variant),+];

            /// The on-disk (kebab-case) hook name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(GitHook::$variant => $name),+
                }
            }
        }
    };
}

git_hooks! {
    ApplypatchMsg => "applypatch-msg",
    PreApplypatch => "pre-applypatch",
    PostApplypatch => "post-applypatch",
    PreCommit => "pre-commit",
    PreMergeCommit => "pre-merge-commit",
    PrepareCommitMsg => "prepare-commit-msg",
    CommitMsg => "commit-msg",
    PostCommit => "post-commit",
    PreRebase => "pre-rebase",
    PostCheckout => "post-checkout",
    PostMerge => "post-merge",
    PrePush => "pre-push",
    PreReceive => "pre-receive",
    Update => "update",
    ProcReceive => "proc-receive",
    PostReceive => "post-receive",
    PostUpdate => "post-update",
    ReferenceTransaction => "reference-transaction",
    PushToCheckout => "push-to-checkout",
    PreAutoGc => "pre-auto-gc",
    PostRewrite => "post-rewrite",
    SendemailValidate => "sendemail-validate",
    FsmonitorWatchman => "fsmonitor-watchman",
    P4Changelist => "p4-changelist",
    P4PrepareChangelist => "p4-prepare-changelist",
    P4PostChangelist => "p4-post-changelist",
    P4PreSubmit => "p4-pre-submit",
    PostIndexChange => "post-index-change",
}

impl GitHook {
    /// Look a hook up by either its kebab-case or camelCase spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        let kebab = if name.chars().any(|c| c.is_ascii_uppercase()) {
            camel_to_kebab(name)
        } else {
            name.to_string()
        };
        Self::ALL.iter().copied().find(|hook| hook.as_str() == kebab)
    }

    /// The camelCase alias accepted in configuration files.
    pub fn camel_case(self) -> String {
        let mut out = String::with_capacity(self.as_str().len());
        let mut upper_next = false;
        for c in self.as_str().chars() {
            if c == '-' {
                upper_next = true;
            } else if upper_next {
                out.push(c.to_ascii_uppercase());
                upper_next = false;
            } else {
                out.push(c);
            }
        }
        out
    }
}

fn camel_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

impl fmt::Display for GitHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GitHook {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown git hook: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_hooks_round_trip_both_spellings() {
        assert_eq!(GitHook::ALL.len(), 28);
        for hook in GitHook::ALL {
            assert_eq!(GitHook::from_name(hook.as_str()), Some(*hook));
            assert_eq!(GitHook::from_name(&hook.camel_case()), Some(*hook));
        }
    }

    #[test]
    fn test_camel_case_aliases() {
        assert_eq!(GitHook::PreCommit.camel_case(), "preCommit");
        assert_eq!(GitHook::PrepareCommitMsg.camel_case(), "prepareCommitMsg");
        assert_eq!(GitHook::P4PreSubmit.camel_case(), "p4PreSubmit");
        assert_eq!(GitHook::Update.camel_case(), "update");
        assert_eq!(GitHook::from_name("postRewrite"), Some(GitHook::PostRewrite));
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(GitHook::from_name("pre_commit"), None);
        assert_eq!(GitHook::from_name("precommit"), None);
        assert_eq!(GitHook::from_name(""), None);
        assert!("not-a-hook".parse::<GitHook>().is_err());
    }
}
