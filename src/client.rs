use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use tracing::debug;

use crate::connection;
use crate::{ClientConfig, McError, Result};

/// the protocol's line terminator, appended to every command line
const LINE_TERMINATOR: &str = "\r\n";

/// The text of one reply, together with the number of bytes actually received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReply {
    /// the reply decoded as (lossy) UTF-8
    pub text: String,
    /// the number of bytes read off the transport
    pub bytes: usize,
}

impl RawReply {
    /// returns `true` if the server sent nothing back
    pub fn is_empty(&self) -> bool {
        self.bytes == 0
    }

    /// iterates over the lines of the reply with their trailing `\r` removed
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n').map(|line| line.trim_end_matches('\r'))
    }
}

/// `McClient` sends text commands to a memcached-style server and reads back their replies.
///
/// Only one command is ever in flight: [`exec`] writes a line and drains the full reply before
/// it returns, so replies never interleave on the shared stream.
///
/// The client is generic over its transport `S`, which is a [`TcpStream`] in production.
///
/// [`exec`]: #method.exec
pub struct McClient<S = TcpStream> {
    stream: S,
    chunk_size: usize,
}

impl McClient<TcpStream> {
    /// creates a client and establishes a socket connection to the server at the given `addr`
    ///
    /// # Errors
    /// see [`connection::connect`] for how connect failures are classified
    pub fn connect<A: ToSocketAddrs>(addr: A, config: &ClientConfig) -> Result<Self> {
        check_chunk_size(config.chunk_size)?;
        let stream = connection::connect(addr, config)?;
        McClient::new(stream, config.chunk_size)
    }

    /// returns `true` while the socket still has a connected peer
    pub fn is_connected(&self) -> bool {
        self.stream.peer_addr().is_ok()
    }
}

impl<S: Read + Write> McClient<S> {
    /// wraps an already established transport. `chunk_size` is the number of bytes requested
    /// per read
    ///
    /// # Errors
    /// returns [`McError::Parsing`] if `chunk_size` is zero
    pub fn new(stream: S, chunk_size: usize) -> Result<Self> {
        check_chunk_size(chunk_size)?;
        Ok(McClient { stream, chunk_size })
    }

    /// the number of bytes requested per read
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// a reference to the underlying transport
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Sends `line` to the server and returns its complete reply.
    ///
    /// The reply has no length prefix, so it is read in `chunk_size` pieces until a read comes
    /// back short. A reply whose length is an exact multiple of `chunk_size` therefore costs one
    /// extra read, which blocks until more data arrives, the server closes the connection, or
    /// the read timeout fires. A timeout on that extra read ends the reply like a short read.
    ///
    /// # Errors
    /// - [`McError::Timeout`] or [`McError::Network`] if the command could not be written
    /// - [`McError::Incomplete`] if a read failed, carrying whatever was received before it
    pub fn exec(&mut self, line: &str) -> Result<RawReply> {
        let mut msg = String::with_capacity(line.len() + LINE_TERMINATOR.len());
        msg.push_str(line);
        msg.push_str(LINE_TERMINATOR);
        self.stream.write_all(msg.as_bytes())?;
        self.stream.flush()?;

        let mut received = Vec::new();
        let mut chunk = vec![0u8; self.chunk_size];
        let mut reads = 0_usize;
        loop {
            let n = match self.stream.read(&mut chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                // only reached after a full chunk, the reply was an exact multiple of it
                Err(e) if !received.is_empty() && is_timeout(&e) => {
                    debug!(line, reads, bytes = received.len(), "extra read timed out");
                    break;
                }
                Err(source) => {
                    debug!(line, reads, bytes = received.len(), "read failed: {}", source);
                    return Err(McError::Incomplete {
                        partial: into_reply(received),
                        source,
                    });
                }
            };
            reads += 1;
            received.extend_from_slice(&chunk[..n]);
            if n < self.chunk_size {
                break;
            }
        }

        debug!(line, reads, bytes = received.len(), "reply received");
        Ok(into_reply(received))
    }

    /// deletes a single `key`, returning the server's raw reply
    pub fn delete(&mut self, key: &str) -> Result<RawReply> {
        self.exec(&format!("delete {}", key))
    }
}

fn check_chunk_size(chunk_size: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(McError::Parsing("invalid chunk size: 0".to_string()));
    }
    Ok(())
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

fn into_reply(received: Vec<u8>) -> RawReply {
    let bytes = received.len();
    let text = match String::from_utf8(received) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    };
    RawReply { text, bytes }
}
