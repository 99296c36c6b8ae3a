use std::time::Duration;

/// the port memcached listens on when none is given
pub const DEFAULT_PORT: u16 = 11211;

/// the host used when the shell is started without arguments
pub const DEFAULT_HOST: &str = "localhost";

/// how long to wait for the TCP handshake before giving up
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Size, in bytes, of a single read from the server.
///
/// A read that fills the whole chunk means "more may follow", a shorter read ends the reply.
/// Keep it fixed for the lifetime of a client, changing it changes when replies are considered
/// complete.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Configuration for a [`McClient`] connection.
///
/// [`McClient`]: ./struct.McClient.html
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// upper bound on the TCP connect
    pub connect_timeout: Duration,
    /// optional TCP read timeout, `None` blocks until the server answers
    pub read_timeout: Option<Duration>,
    /// optional TCP write timeout
    pub write_timeout: Option<Duration>,
    /// bytes requested per read while draining a reply
    pub chunk_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: None,
            write_timeout: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}
