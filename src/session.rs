//! Session controller.
//!
//! Runs either a single completion over the assembled prompt, or an
//! interactive loop that resends the whole conversation on every turn.

use crate::error::{Error, Result};
use crate::gateway::Completer;
use crate::prompt::PromptText;
use std::fs::OpenOptions;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Lines that end an interactive session.
pub const QUIT_TOKENS: [&str; 3] = ["quit", "q", "exit"];

/// Marker printed before each interactive read.
const PROMPT_MARKER: &str = "> ";

/// Where a single-shot result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Print to standard output.
    Stdout,
    /// Append to a file, creating it if needed.
    AppendFile(PathBuf),
}

impl OutputSink {
    /// Append to `file` only when writing was requested.
    pub fn select(file: Option<&Path>, write: bool) -> Self {
        match file {
            Some(path) if write => Self::AppendFile(path.to_path_buf()),
            _ => Self::Stdout,
        }
    }

    fn emit<W: Write>(&self, text: &str, stdout: &mut W) -> Result<()> {
        match self {
            Self::Stdout => writeln!(stdout, "{text}").map_err(stdout_error),
            Self::AppendFile(path) => append_to_file(path, text),
        }
    }
}

/// Append `text` to `path`, creating the file if it doesn't exist.
pub fn append_to_file(path: &Path, text: &str) -> Result<()> {
    let to_error = |source: std::io::Error| Error::WriteOutput {
        target: path.display().to_string(),
        source,
    };
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(to_error)?;
    file.write_all(text.as_bytes()).map_err(to_error)?;
    file.flush().map_err(to_error)
}

fn stdout_error(source: std::io::Error) -> Error {
    Error::WriteOutput {
        target: "stdout".to_string(),
        source,
    }
}

/// One run of the program: a completer, a token budget and the prompt so far.
pub struct Session<C> {
    completer: C,
    max_tokens: u32,
    prompt: PromptText,
}

impl<C: Completer> Session<C> {
    pub fn new(completer: C, max_tokens: u32, prompt: PromptText) -> Self {
        Self {
            completer,
            max_tokens,
            prompt,
        }
    }

    /// Complete the prompt once and send the result to `sink`.
    ///
    /// Nothing is written if the completion fails.
    pub async fn run_once<W: Write>(self, sink: &OutputSink, stdout: &mut W) -> Result<()> {
        let response = self
            .completer
            .complete(self.prompt.as_str(), self.max_tokens)
            .await?;
        debug!("Received {} bytes, writing to {:?}", response.len(), sink);
        sink.emit(&response, stdout)
    }

    /// Read lines from `input` until a quit token or end-of-input.
    ///
    /// Each line becomes a turn: it is appended to the prompt, the whole
    /// prompt is completed, and the response is appended and printed. A
    /// failed completion ends the session with that error. On a clean exit
    /// the final prompt is handed back.
    pub async fn run_interactive<R: BufRead, W: Write>(
        mut self,
        mut input: R,
        out: &mut W,
    ) -> Result<PromptText> {
        if !self.prompt.is_empty() {
            writeln!(out, "{}", self.prompt).map_err(stdout_error)?;
        }

        let mut turns = 0usize;
        let mut line = String::new();
        loop {
            write!(out, "{PROMPT_MARKER}").map_err(stdout_error)?;
            out.flush().map_err(stdout_error)?;

            line.clear();
            if input.read_line(&mut line).map_err(Error::ReadStdin)? == 0 {
                debug!("End of input after {} turns", turns);
                break;
            }
            let question = line.trim_end_matches(['\n', '\r']);

            if QUIT_TOKENS.contains(&question) {
                debug!("Quit after {} turns", turns);
                break;
            }

            self.prompt.push_str("\n\n> ");
            self.prompt.push_str(question);
            self.prompt.push_str("\n");

            turns += 1;
            info!("Turn {} ({} bytes of history)", turns, self.prompt.len());
            let response = self
                .completer
                .complete(self.prompt.as_str(), self.max_tokens)
                .await?;

            self.prompt.push_str("\n");
            self.prompt.push_str(&response);
            self.prompt.push_str("\n");

            writeln!(out, "{response}\n").map_err(stdout_error)?;
        }

        Ok(self.prompt)
    }
}
