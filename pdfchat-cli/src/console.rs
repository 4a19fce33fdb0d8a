//! Interactive question loop.
//!
//! Each line is classified as an exit command, a blank line or a question.
//! Questions go through the [`AnswerEngine`]; a failure is printed as a
//! single line and the loop keeps going.

use std::io::Write;

use pdfchat_rag::AnswerEngine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

/// Inputs that end the session, compared case-insensitively after trimming.
pub const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", "sair"];

const PROMPT: &str = "Ask a question: ";
const SEPARATOR: &str = "--------------------------------------------------";
const GOODBYE: &str = "Goodbye!";

/// What a line of input asks the loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    /// One of [`EXIT_COMMANDS`].
    Exit,
    /// A blank line.
    Skip,
    /// A question, trimmed.
    Ask(&'a str),
}

/// Whether the loop continues after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Prompt for the next line.
    Continue,
    /// Leave the loop.
    Exit,
}

/// Classify a raw line. Surrounding whitespace is ignored.
pub fn classify(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Input::Skip
    } else if EXIT_COMMANDS.iter().any(|cmd| trimmed.eq_ignore_ascii_case(cmd)) {
        Input::Exit
    } else {
        Input::Ask(trimmed)
    }
}

/// Handle one line of input, writing any output to `out`.
pub async fn handle_line<W: Write>(
    engine: &AnswerEngine,
    line: &str,
    out: &mut W,
) -> std::io::Result<Flow> {
    match classify(line) {
        Input::Skip => Ok(Flow::Continue),
        Input::Exit => {
            writeln!(out, "{GOODBYE}")?;
            Ok(Flow::Exit)
        }
        Input::Ask(question) => {
            match engine.answer(question).await {
                Ok(answer) => writeln!(out, "\n{SEPARATOR}\n{answer}\n{SEPARATOR}\n")?,
                Err(e) => {
                    warn!(error = %e, "question failed");
                    let message = e.to_string().split_whitespace().collect::<Vec<_>>().join(" ");
                    writeln!(out, "Error: {message}")?;
                }
            }
            Ok(Flow::Continue)
        }
    }
}

/// Add a non-blank line to the editor history. Failures are logged and ignored.
fn remember(editor: &mut DefaultEditor, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    if let Err(e) = editor.add_history_entry(line) {
        debug!(error = %e, "line not added to history");
    }
}

/// Read questions from the terminal until an exit command, Ctrl-D or Ctrl-C.
pub async fn run_console(engine: &AnswerEngine) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut stdout = std::io::stdout();

    println!("Chat with your PDF. Type 'exit', 'quit' or 'sair' to leave.\n");

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                remember(&mut editor, &line);
                if handle_line(engine, &line, &mut stdout).await? == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("{GOODBYE}");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
