#![deny(missing_docs)]
//! An interactive administrative client for memcached-style cache servers.
//!
//! This crate provides the [`McClient`] implementation itself, as well as an [`mcli`]
//! executable that reads commands from a terminal and prints the server's replies.
//! All traffic uses memcached's line-oriented text protocol over a single synchronous
//! TCP connection.
//!
//! ## Supported Commands
//! The shell supports the following commands (see [`Command`]):
//!
//! - `get <key>`, `set <key> <value>`, `add <key> <value>`, `del <key>` and `stats [group]`
//! are passed through to the server as a single command line, and the raw reply is printed
//! - `keys <pattern> [bound]` lists every key on the server matching a glob pattern
//! - `flush <pattern>` deletes every key matching a glob pattern
//!
//! ## Reply Framing
//! Text protocol replies carry no length prefix, so [`McClient::exec`] reads a reply in fixed
//! size chunks and treats the first short read as the end of the reply.
//! A reply whose length is an exact multiple of the chunk size costs one extra read, which waits
//! for the read timeout (if any) before returning.
//!
//! ## Key Enumeration
//! The server cannot list its keys directly. Instead [`McClient::enumerate`] asks for the slab
//! class directory (`stats items`), dumps the keys of each class (`stats cachedump <id> 0`) and
//! filters them with a [`KeyPattern`]. [`McClient::erase_matching`] reuses the enumeration to
//! delete every matching key, one `delete` at a time.
//!
//! ## Glob Patterns
//! A `*` matches one or more characters. Patterns that do not start with `*` are anchored at
//! the beginning of the key, so `user_*` matches `user_42` but not `old_user_42`.
//!
//! [`mcli`]: ./bin/mcli.rs
//! [`McClient`]: ./struct.McClient.html
//! [`McClient::exec`]: ./struct.McClient.html#method.exec
//! [`McClient::enumerate`]: ./struct.McClient.html#method.enumerate
//! [`McClient::erase_matching`]: ./struct.McClient.html#method.erase_matching
//! [`Command`]: ./enum.Command.html
//! [`KeyPattern`]: ./struct.KeyPattern.html


pub use error::{Result, McError};
pub use client::{McClient, RawReply};
pub use config::{ClientConfig, DEFAULT_CHUNK_SIZE, DEFAULT_CONNECT_TIMEOUT, DEFAULT_HOST, DEFAULT_PORT};
pub use command::{Command, Output};
pub use keys::{parse_bound, EnumerationMode, KeyListing};
pub use pattern::KeyPattern;

mod client;
mod command;
mod config;
pub mod connection;
mod erase;
mod error;
mod keys;
mod pattern;
