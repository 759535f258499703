//! Span guard tagging every event of one command invocation.

use tracing::span::EnteredSpan;

use crate::init::build_sha;

/// Keeps the per-command span entered until dropped.
pub struct CommandSpanGuard {
    entered: EnteredSpan,
}

impl CommandSpanGuard {
    /// Enter a span carrying the command name, trace id and build SHA.
    #[must_use]
    pub fn enter(command: &str, trace_id: &str) -> Self {
        let span = tracing::info_span!(
            "command",
            command = %command,
            trace_id = %trace_id,
            build_sha = %build_sha(),
            exit_code = tracing::field::Empty
        );
        Self {
            entered: span.entered(),
        }
    }

    /// Record the process exit code on the command span.
    pub fn record_exit_code(&self, exit_code: i32) {
        self.entered.record("exit_code", exit_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_enters_and_exits_cleanly() {
        let guard = CommandSpanGuard::enter("search", "trace-1");
        guard.record_exit_code(0);
        drop(guard);
    }
}
