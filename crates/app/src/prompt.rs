//! Terminal prompts

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    io::{self, BufRead, Write},
    sync::{Mutex, PoisonError},
};

use quickfund::prompt::Prompt;
use tracing::warn;

/// Asks questions on one stream and reads answers line by line from another.
///
/// End of input, or a read error, dismisses the question.
pub(crate) struct LinePrompt<R, W> {
    io: Mutex<(R, W)>,
}

impl LinePrompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr and read from stdin.
    pub(crate) fn terminal() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new((input, output)),
        }
    }

    fn read_answer(&self, question: &str) -> Option<String> {
        let mut io = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        let (input, output) = &mut *io;

        if let Err(error) = write!(output, "{question} ").and_then(|()| output.flush()) {
            warn!(%error, "failed to write prompt");
        }

        let mut line = String::new();

        match input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(error) => {
                warn!(%error, "failed to read answer");

                None
            }
        }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn confirm(&self, question: &str) -> bool {
        self.read_answer(&format!("{question} [y/N]"))
            .is_some_and(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn ask(&self, question: &str) -> Option<String> {
        self.read_answer(question)
    }
}

impl<R, W> Debug for LinePrompt<R, W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LinePrompt").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn confirm_accepts_yes_only() {
        let yes = LinePrompt::new(Cursor::new("Yes\n"), Vec::new());
        let no = LinePrompt::new(Cursor::new("n\n"), Vec::new());
        let eof = LinePrompt::new(Cursor::new(""), Vec::new());

        assert!(yes.confirm("Clear all items from cart?"));
        assert!(!no.confirm("Clear all items from cart?"));
        assert!(!eof.confirm("Clear all items from cart?"));
    }

    #[test]
    fn ask_returns_line_or_dismissal() {
        let answered = LinePrompt::new(Cursor::new("TX-42\r\nignored\n"), Vec::new());
        let blank = LinePrompt::new(Cursor::new("\n"), Vec::new());
        let dismissed = LinePrompt::new(Cursor::new(""), Vec::new());

        assert_eq!(answered.ask("Reference?").as_deref(), Some("TX-42"));
        assert_eq!(blank.ask("Reference?").as_deref(), Some(""));
        assert_eq!(dismissed.ask("Reference?"), None);
    }

    #[test]
    fn question_is_written_to_output() {
        let prompt = LinePrompt::new(Cursor::new("y\n"), Vec::new());

        prompt.confirm("Clear?");

        let (_, output) = prompt.io.into_inner().unwrap_or_else(PoisonError::into_inner);

        assert_eq!(String::from_utf8_lossy(&output), "Clear? [y/N] ");
    }
}
