//! Error types for Cypher emission and script reading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing a Cypher script.
#[derive(Error, Debug)]
pub enum EmitError {
    /// The output file could not be created
    #[error("Could not create output file {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the output failed
    #[error("Write error: {0}")]
    Io(#[from] std::io::Error),

    /// A parameter payload could not be serialized
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while reading an emitted script.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// Content other than a comment where a `:param` directive was expected
    #[error("Line {line}: expected ':param', found '{found}'")]
    ExpectedParam { line: usize, found: String },

    /// The `:param` directive has no parameter name
    #[error("Line {line}: missing parameter name")]
    MissingParamName { line: usize },

    /// The parameter name is not followed by `=>`
    #[error("Line {line}: expected '=>' after parameter '{parameter}'")]
    ExpectedArrow { line: usize, parameter: String },

    /// The payload is not valid JSON
    #[error("Line {line}: invalid payload for parameter '{parameter}': {source}")]
    Payload {
        line: usize,
        parameter: String,
        #[source]
        source: serde_json::Error,
    },

    /// The payload is not terminated by `;`
    #[error("Line {line}: expected ';' after payload of parameter '{parameter}'")]
    ExpectedSemicolon { line: usize, parameter: String },

    /// The statement following a payload never ends
    #[error("Line {line}: statement for parameter '{parameter}' is not terminated by ';'")]
    UnterminatedStatement { line: usize, parameter: String },
}
