//! chatgpt - chat with a text-completion service from the console.
//!
//! Builds a prompt from a pretext, a file or stdin, and an optional question,
//! then either completes it once or starts an interactive session that
//! resends the whole conversation on every turn.

mod config;
mod error;
mod gateway;
mod pretext;
mod prompt;
mod session;

use clap::Parser;
use config::Config;
use error::{Error, Result};
use gateway::OpenAiCompleter;
use pretext::{PretextSelector, Resolution};
use prompt::InputSource;
use session::{OutputSink, Session};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "\
Examples:
  # start an interactive session
  chatgpt -i

  # ask for a one-time response
  chatgpt -q \"answer me this...\"

  # provide context to a question or conversation
  chatgpt context.txt -i
  chatgpt context.txt -q \"answer me this...\"

  # read context from a file and append the response to it
  chatgpt convo.txt -w

  # pipe content from another program, useful for ! in vim visual mode
  cat convo.txt | chatgpt

  # inspect the predefined pretexts, which set the mood
  chatgpt -p list
  chatgpt -p view:<name>

  # use a pretext with any of the previous modes
  chatgpt -p optimistic -i
  chatgpt -p cynic -q \"Is the world going to be ok?\"
  chatgpt -p teacher convo.txt";

#[derive(Parser)]
#[command(name = "chatgpt")]
#[command(version, about = "Chat with ChatGPT in console.")]
#[command(after_long_help = EXAMPLES)]
struct Cli {
    /// File to read the prompt from
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Ask a single question and print the response back
    #[arg(short, long, value_name = "TEXT")]
    question: Option<String>,

    /// Pretext to add to the input: 'list' or 'view:<name>' to inspect the
    /// predefined ones, '<name>' to use one, or any custom text
    #[arg(short, long, value_name = "PRETEXT")]
    pretext: Option<String>,

    /// Start an interactive session
    #[arg(short, long)]
    interactive: bool,

    /// Maximum number of tokens to generate per response [default: 420]
    #[arg(short = 'T', long, value_name = "N")]
    tokens: Option<u32>,

    /// Append the response to FILE instead of printing it
    #[arg(short, long, requires = "file", conflicts_with = "interactive")]
    write: bool,

    /// Override the model from the config file
    #[arg(short, long, value_name = "MODEL")]
    model: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let api_key = match config::api_key() {
        Ok(key) => key,
        Err(e) => {
            println!("{e}\n");
            return ExitCode::FAILURE;
        }
    };

    match run(cli, api_key).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so stdout carries only completions.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chatgpt=warn,reqwest=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli, api_key: String) -> Result<()> {
    let config = Config::load().map_err(Error::InvalidConfig)?;
    let stdout = io::stdout();

    let pretext = match cli.pretext.as_deref().map(PretextSelector::parse) {
        Some(selector) => match pretext::resolve(selector, &mut stdout.lock())? {
            Resolution::Finished => return Ok(()),
            Resolution::Prefix(text) => Some(text),
        },
        None => None,
    };

    let source = InputSource::select(cli.file.as_deref(), cli.question.is_some(), cli.interactive);
    if source == InputSource::Stdin && atty::is(atty::Stream::Stdin) {
        eprintln!("Reading prompt from stdin, press Ctrl-D when done");
    }
    let prompt = prompt::assemble(pretext, &source, cli.question.as_deref(), io::stdin().lock())?;

    let mut completer = OpenAiCompleter::new(api_key, &config.completion)?;
    if let Some(model) = cli.model {
        completer = completer.with_model(model);
    }
    let max_tokens = cli.tokens.unwrap_or(config.completion.max_tokens);
    debug!("Using model {} with max_tokens {}", completer.model, max_tokens);

    let session = Session::new(completer, max_tokens, prompt);
    if cli.interactive {
        let history = session
            .run_interactive(io::stdin().lock(), &mut stdout.lock())
            .await?;
        debug!("Session closed with {} bytes of history", history.len());
    } else {
        let sink = OutputSink::select(source.file(), cli.write);
        session.run_once(&sink, &mut stdout.lock()).await?;
    }

    Ok(())
}
