//! Prompt assembly.
//!
//! The prompt is built once before the first completion call: pretext first,
//! then the input source (stdin or a file), then the question.

use crate::error::{Error, Result};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The accumulated prompt buffer.
///
/// Append-only: an interactive session grows it turn by turn and nothing
/// ever shortens it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptText(String);

impl PromptText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_str(&mut self, text: &str) {
        self.0.push_str(text);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for PromptText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the prompt body comes from.
///
/// Standard input can only be consumed once, either drained here or read
/// line by line by the interactive loop, so the source is picked up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Drain standard input to end-of-stream.
    Stdin,
    /// Read a whole file.
    File(PathBuf),
    /// No body; pretext and question only.
    Nothing,
}

impl InputSource {
    /// Pick the source from the command-line shape.
    ///
    /// A file always wins. Without one, stdin is drained only when there is
    /// no question and the session is not interactive.
    pub fn select(file: Option<&Path>, has_question: bool, interactive: bool) -> Self {
        match file {
            Some(path) => Self::File(path.to_path_buf()),
            None if !has_question && !interactive => Self::Stdin,
            None => Self::Nothing,
        }
    }

    /// The file path, if this is a file source.
    pub fn file(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            _ => None,
        }
    }
}

/// Build the initial prompt.
///
/// `stdin` is only read for [`InputSource::Stdin`].
pub fn assemble<R: Read>(
    pretext: Option<&str>,
    source: &InputSource,
    question: Option<&str>,
    stdin: R,
) -> Result<PromptText> {
    let mut prompt = PromptText::new();

    if let Some(pretext) = pretext {
        prompt.push_str(pretext);
    }

    match source {
        InputSource::Stdin => {
            let body = drain(stdin)?;
            debug!("Read {} bytes from stdin", body.len());
            prompt.push_str(&body);
        }
        InputSource::File(path) => {
            let bytes = std::fs::read(path).map_err(|source| Error::ReadInput {
                path: path.clone(),
                source,
            })?;
            debug!("Read {} bytes from {}", bytes.len(), path.display());
            prompt.push_str(&String::from_utf8_lossy(&bytes));
        }
        InputSource::Nothing => {}
    }

    if let Some(question) = question {
        prompt.push_str("\n");
        prompt.push_str(question);
    }

    Ok(prompt)
}

fn drain<R: Read>(mut reader: R) -> Result<String> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).map_err(Error::ReadStdin)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};

    /// A reader that fails the test if touched.
    struct Untouched;

    impl Read for Untouched {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            panic!("stdin must not be read for this source");
        }
    }

    fn temp_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_select_source() {
        let path = Path::new("convo.txt");
        assert_eq!(
            InputSource::select(Some(path), false, false),
            InputSource::File(path.to_path_buf())
        );
        assert_eq!(
            InputSource::select(Some(path), true, true),
            InputSource::File(path.to_path_buf())
        );
        assert_eq!(InputSource::select(None, false, false), InputSource::Stdin);
        assert_eq!(InputSource::select(None, true, false), InputSource::Nothing);
        assert_eq!(InputSource::select(None, false, true), InputSource::Nothing);
    }

    #[test]
    fn test_file_then_question() {
        let file = temp_file("A");
        let source = InputSource::File(file.path().to_path_buf());
        let prompt = assemble(None, &source, Some("B"), Untouched).unwrap();
        assert_eq!(prompt.as_str(), "A\nB");
    }

    #[test]
    fn test_pretext_then_stdin() {
        let prompt = assemble(Some("T"), &InputSource::Stdin, None, "S".as_bytes()).unwrap();
        assert_eq!(prompt.as_str(), "TS");
    }

    #[test]
    fn test_stdin_kept_byte_for_byte() {
        let input = "line one\n\nline three\r\n";
        let prompt = assemble(None, &InputSource::Stdin, None, input.as_bytes()).unwrap();
        assert_eq!(prompt.as_str(), input);
    }

    #[test]
    fn test_file_source_ignores_stdin() {
        let file = temp_file("from file");
        let source = InputSource::File(file.path().to_path_buf());
        let prompt = assemble(Some("P:"), &source, None, Untouched).unwrap();
        assert_eq!(prompt.as_str(), "P:from file");
    }

    #[test]
    fn test_question_only() {
        let prompt = assemble(None, &InputSource::Nothing, Some("why?"), Untouched).unwrap();
        assert_eq!(prompt.as_str(), "\nwhy?");
    }

    #[test]
    fn test_missing_file_is_resource_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let err = assemble(None, &InputSource::File(path.clone()), None, Untouched).unwrap_err();
        match err {
            Error::ReadInput { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_prompt_text_only_grows() {
        let mut prompt = PromptText::new();
        assert!(prompt.is_empty());
        prompt.push_str("a");
        prompt.push_str("bc");
        assert_eq!(prompt.len(), 3);
        assert_eq!(prompt.to_string(), "abc");
    }
}
