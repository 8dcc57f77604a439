//! Output abstraction for user-facing messages.
//!
//! Commands write through the [`Output`] trait instead of printing directly,
//! so the same code path serves the CLI ([`CliOutput`]) and tests
//! ([`TestOutput`], which captures entries for assertions).
//!
//! Output follows git conventions: primary results on stdout, `error:` and
//! `warning:` prefixed diagnostics on stderr, progress detail only when
//! verbose.

mod cli;

pub use cli::CliOutput;
pub use test::{OutputEntry, TestOutput};

/// Configuration for output behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Suppress all non-error output.
    pub quiet: bool,
    /// Show step-by-step progress and debug detail.
    pub verbose: bool,
}

impl OutputConfig {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self { quiet, verbose }
    }
}

/// Sink for user-facing messages.
pub trait Output {
    /// Informational message, suppressed when quiet.
    fn info(&mut self, msg: &str);

    /// Success confirmation, suppressed when quiet.
    fn success(&mut self, msg: &str);

    /// Warning to stderr; shown even when quiet.
    fn warning(&mut self, msg: &str);

    /// Error to stderr; shown even when quiet.
    fn error(&mut self, msg: &str);

    /// Diagnostic detail, shown only when verbose.
    fn debug(&mut self, msg: &str);

    /// Progress step, shown only when verbose.
    fn step(&mut self, msg: &str);

    /// Primary outcome of a command, suppressed when quiet.
    fn result(&mut self, msg: &str);

    /// Indented key/value line, suppressed when quiet.
    fn detail(&mut self, key: &str, value: &str);

    /// Bulleted list entry, suppressed when quiet.
    fn list_item(&mut self, item: &str);

    /// Verbatim content (machine output such as JSON); never suppressed.
    fn raw(&mut self, content: &str);

    fn is_quiet(&self) -> bool;

    fn is_verbose(&self) -> bool;
}
