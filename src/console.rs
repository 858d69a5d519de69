//! Interactive console: confirmations, line input, and result output.
//!
//! One console instance lives for the whole process and is handed to the
//! workflow by `&mut`, so all prompts share the same buffered input.

use std::io::{BufRead, Write};

use dialoguer::Input;

/// Line-oriented user interaction.
pub trait Console {
    /// Print `prompt` and read one line of input, without its line terminator.
    ///
    /// Returns `None` on end of input or a read failure.
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    /// Print one line of output.
    fn println(&mut self, line: &str);

    /// Ask a yes/no question. Any read failure counts as "no".
    fn confirm(&mut self, prompt: &str) -> bool {
        self.read_line(&format!("{} (y/n)", prompt))
            .is_some_and(|answer| is_affirmative(&answer))
    }
}

/// Whether an answer to a yes/no prompt means yes.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Console over an arbitrary reader and writer.
///
/// Used for piped stdin and in tests.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.output, "{}: ", prompt);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }

    fn println(&mut self, line: &str) {
        let _ = writeln!(self.output, "{}", line);
    }
}

/// Console for an interactive terminal, built on `dialoguer`.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .ok()
    }

    fn println(&mut self, line: &str) {
        println!("{}", line);
    }
}
