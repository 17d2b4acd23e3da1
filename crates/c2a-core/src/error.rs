//! Error taxonomy.
//!
//! `AccessError` is fatal to a run. Every other kind is scoped to one
//! transcript: the driver logs it and moves on to the next file.

use crate::timestamp::TimestampError;
use std::path::PathBuf;
use thiserror::Error;

/// The input root cannot be enumerated at all.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("input directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("input path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot read input directory {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A transcript is not a well-formed Colloquy document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read transcript: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("document has no root element")]
    Empty,

    #[error("unexpected root element <{0}>, expected <log>")]
    UnexpectedRoot(String),

    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("<{parent}> is missing required child <{element}>")]
    MissingElement {
        parent: &'static str,
        element: &'static str,
    },

    #[error("<{element} {attribute}=...>: {source}")]
    InvalidTimestamp {
        element: &'static str,
        attribute: &'static str,
        #[source]
        source: TimestampError,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("no self nickname in transcript and no --nickname fallback given")]
pub struct MissingNicknameError;

/// The chatlog could not be serialized or stored.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize chatlog: {0}")]
    Serialize(String),

    #[error("no usable file name in {}", .0.display())]
    BadFileName(PathBuf),
}

/// Anything that makes the driver skip one transcript.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    MissingNickname(#[from] MissingNicknameError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
