//! Reports results back to the GitHub Actions runner through workflow commands.

use std::io::{self, Write as _};

/// Escapes a workflow command message so it stays on a single line.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Formats the `::error::` command that marks the current step as failed.
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Marks the current step as failed with `message`.
///
/// The caller is responsible for exiting with a non-zero code afterwards.
pub fn set_failed(message: &str) {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", error_command(message)).ok();
    stdout.flush().ok();
}
