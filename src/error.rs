//! Error taxonomy for chatgpt.
//!
//! Every error is terminal for the current invocation. The variants are grouped
//! by where they come from: configuration, local resources, or the completion
//! service.

use crate::gateway::GatewayError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the top level.
#[derive(Debug, Error)]
pub enum Error {
    /// The credential environment variable is absent or empty.
    #[error(
        "{var} environment var is missing\nVisit https://platform.openai.com/account/api-keys to get one"
    )]
    MissingCredential { var: &'static str },

    /// The config file exists but could not be loaded.
    #[error("invalid configuration: {0:#}")]
    InvalidConfig(anyhow::Error),

    /// `view:<name>` named a template that is not bundled.
    #[error("pretext '{0}' not found, use '-p list' to see the available pretexts")]
    UnknownPretext(String),

    /// The positional input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Standard input could not be read.
    #[error("failed to read standard input: {0}")]
    ReadStdin(#[source] std::io::Error),

    /// Writing the result (to a file or the terminal) failed.
    #[error("failed to write output to {target}: {source}")]
    WriteOutput {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// The completion service call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type Result<T> = std::result::Result<T, Error>;
