use std::path::PathBuf;

use thiserror::Error;

use crate::pose::PlayerId;

/// Malformed command input. Always reported before any state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Speed must be a number between 1 and 10, got `{0}`.")]
    InvalidSpeed(String),

    #[error("Please provide a value for --speed (1-10).")]
    MissingSpeedValue,

    #[error("Please provide a value for --show-player (true/false).")]
    MissingShowPlayerValue,

    #[error("Show-player must be true or false, got `{0}`.")]
    InvalidShowPlayer(String),

    #[error("--{0} was given more than once.")]
    Duplicate(&'static str),

    #[error("Unknown argument `{0}`.")]
    UnknownArgument(String),
}

/// The avatar's live transform could not be read.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("transform of {player} is unavailable: {reason}")]
pub struct PoseUnavailable {
    pub player: PlayerId,
    pub reason: String,
}

impl PoseUnavailable {
    pub fn new(player: PlayerId, reason: impl Into<String>) -> Self {
        Self {
            player,
            reason: reason.into(),
        }
    }
}

/// Failure of a single freecam command. The session is left as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    PoseUnavailable(#[from] PoseUnavailable),
}

/// Outbound packet could not be delivered. Never retried by the core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("client {0} is not connected")]
    Disconnected(PlayerId),

    #[error("camera packet could not be encoded: {0}")]
    Encode(String),

    #[error("send failed: {0}")]
    Send(String),
}

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

impl From<ProtocolError> for TransportError {
    fn from(err: ProtocolError) -> Self {
        TransportError::Encode(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("io error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid section [{section}]: {source}")]
    Section {
        section: &'static str,
        #[source]
        source: toml::de::Error,
    },
}
