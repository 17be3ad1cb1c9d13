//! Line-based terminal prompts

use bridge_traits::prompt::{parse_confirmation, parse_selection, Prompter};
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Asks questions on a writer and reads one-line answers from a reader.
///
/// Defaults to stdin/stdout. End of input counts as a blank answer.
pub struct TerminalPrompter<R = BufReader<Stdin>, W = Stdout> {
    io: Mutex<(R, W)>,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::with_io(BufReader::new(io::stdin()), io::stdout())
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead + Send, W: Write + Send> TerminalPrompter<R, W> {
    pub fn with_io(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }

    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn ask(&self, lines: &[String], question: &str) -> String {
        let mut guard = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        let (reader, writer) = &mut *guard;

        let written = lines
            .iter()
            .try_for_each(|line| writeln!(writer, "{}", line))
            .and_then(|_| write!(writer, "{} ", question))
            .and_then(|_| writer.flush());
        if let Err(e) = written {
            debug!(error = %e, "Failed to write prompt");
        }

        let mut answer = String::new();
        if let Err(e) = reader.read_line(&mut answer) {
            debug!(error = %e, "Failed to read answer");
            answer.clear();
        }
        answer
    }
}

impl<R: BufRead + Send, W: Write + Send> Prompter for TerminalPrompter<R, W> {
    fn confirm(&self, prompt: &str) -> bool {
        parse_confirmation(&self.ask(&[], &format!("{} (y/N):", prompt)))
    }

    fn select_index(&self, prompt: &str, options: &[String]) -> Option<usize> {
        let lines: Vec<String> = options
            .iter()
            .enumerate()
            .map(|(index, option)| format!("[{}] {}", index + 1, option))
            .collect();

        parse_selection(&self.ask(&lines, &format!("{}:", prompt)), options.len())
    }
}
