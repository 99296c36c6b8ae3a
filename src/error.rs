use std::io;
use thiserror::Error;

use crate::client::RawReply;

/// type alias for all operations on a [`McClient`] that could fail with an [`McError`]
///
/// [`McClient`]: ./struct.McClient.html
pub type Result<T> = std::result::Result<T, McError>;

/// The Error variants used by [`McClient`] and the command layer.
///
/// Transport failures are split into [`McError::Timeout`], [`McError::Network`] and
/// [`McError::Unclassified`] so the shell can tell a slow server from a broken one.
///
/// [`McClient`]: ./struct.McClient.html
#[derive(Debug, Error)]
pub enum McError {
    /// the transport did not complete within its configured timeout
    #[error("timeout: {0}")]
    Timeout(String),

    /// any other IO failure while dialing, writing or reading
    #[error("network error: {0}")]
    Network(#[source] io::Error),

    /// failures that are neither a timeout nor an IO error
    #[error("unknown error: {0}")]
    Unclassified(String),

    /// a read failed after the command was written. `partial` holds the bytes received so far
    #[error("reply interrupted after {} bytes: {source}", .partial.bytes)]
    Incomplete {
        /// the part of the reply that did arrive
        partial: RawReply,
        /// the read error that stopped the reply
        source: io::Error,
    },

    /// the key pattern could not be compiled
    #[error("condition invalid: {0}")]
    Pattern(#[from] regex::Error),

    /// invalid user input, i.e. a bad port or an unknown command name
    #[error("{0}")]
    Parsing(String),
}

impl McError {
    /// classifies an IO error coming off the transport
    pub fn from_io(err: io::Error) -> McError {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => McError::Timeout(err.to_string()),
            _ => McError::Network(err),
        }
    }

    /// returns `true` if this error was caused by a transport timeout
    pub fn is_timeout(&self) -> bool {
        match self {
            McError::Timeout(_) => true,
            McError::Incomplete { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

impl From<io::Error> for McError {
    fn from(err: io::Error) -> Self {
        McError::from_io(err)
    }
}
