//! Command shell over a [`Budget`](crate::ledger::Budget).

pub mod errors;
pub mod handlers;
pub mod output;
mod shell;
pub mod shell_context;

pub use errors::{CliError, CommandError};
pub use shell::{run_cli, CliMode};
pub use shell_context::ShellContext;
