//! Connection Manager: dials the server once per session with a bounded timeout.

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, info};

use crate::{ClientConfig, McError, Result};

/// Dials the server at `addr`, trying every address it resolves to.
///
/// Each attempt is bounded by `config.connect_timeout`. The configured read/write timeouts are
/// applied to the returned stream.
///
/// # Errors
/// - [`McError::Timeout`] if the last attempt timed out
/// - [`McError::Network`] for any other IO failure
/// - [`McError::Unclassified`] if `addr` did not resolve to any socket address
pub fn connect<A: ToSocketAddrs>(addr: A, config: &ClientConfig) -> Result<TcpStream> {
    connect_with(addr, config, TcpStream::connect_timeout)
}

/// Same as [`connect`], but each resolved address is dialed with `dial`, which receives the
/// socket address and `config.connect_timeout`.
pub fn connect_with<A, D>(addr: A, config: &ClientConfig, mut dial: D) -> Result<TcpStream>
where
    A: ToSocketAddrs,
    D: FnMut(&SocketAddr, Duration) -> io::Result<TcpStream>,
{
    let addrs = addr
        .to_socket_addrs()
        .map_err(|e| McError::Unclassified(format!("could not resolve address: {}", e)))?;

    let mut last_err = None;
    for sock_addr in addrs {
        debug!(%sock_addr, timeout = ?config.connect_timeout, "connecting");
        match dial(&sock_addr, config.connect_timeout) {
            Ok(stream) => {
                stream.set_read_timeout(config.read_timeout)?;
                stream.set_write_timeout(config.write_timeout)?;
                stream.set_nodelay(true)?;
                info!("connected to {}", sock_addr);
                return Ok(stream);
            }
            Err(e) => last_err = Some(McError::from_io(e)),
        }
    }

    Err(last_err.unwrap_or_else(|| McError::Unclassified("address resolved to nothing".to_string())))
}
