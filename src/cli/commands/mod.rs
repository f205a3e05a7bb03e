pub mod install;
pub mod run_staged_lint;
pub mod uninstall;
