use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use crate::keys::parse_bound;
use crate::{EnumerationMode, McClient, McError, Result};

/// These are the commands that can be typed into the shell.
///
/// A command is looked up by its name and then executed with the remaining words of the input
/// line as its arguments. Commands with too few arguments do not touch the network.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// `get <key>`, fetch a value
    Get,
    /// `set <key> <value> [flags] [exptime]`, store a value
    Set,
    /// `add <key> <value> [flags] [exptime]`, store a value only if the key is new
    Add,
    /// `del <key>`, delete one key
    Del,
    /// `stats [group]`, show server statistics
    Stats,
    /// `keys <pattern> [bound]`, list matching keys
    Keys,
    /// `flush <pattern>`, delete every matching key
    Flush,
}

/// What a [`Command`] produces for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// a reply or listing, printed as-is
    Text(String),
    /// success/failure of commands that do not return data
    Bool(bool),
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Text(text) => f.write_str(text),
            Output::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl FromStr for Command {
    type Err = McError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "get" => Ok(Command::Get),
            "set" => Ok(Command::Set),
            "add" => Ok(Command::Add),
            "del" => Ok(Command::Del),
            "stats" => Ok(Command::Stats),
            "keys" => Ok(Command::Keys),
            "flush" => Ok(Command::Flush),
            _ => Err(McError::Parsing("command not support".to_string())),
        }
    }
}

impl Command {
    /// runs this command on `client` with the given arguments
    ///
    /// # Errors
    /// transport errors are returned to the caller, the session itself remains usable
    pub fn execute<S: Read + Write>(&self, client: &mut McClient<S>, args: &[&str]) -> Result<Output> {
        match self {
            Command::Get => match args.first() {
                Some(key) => Ok(Output::Text(client.exec(&format!("get {}", key))?.text)),
                None => Ok(Output::Text(String::new())),
            },
            Command::Set => store(client, "set", args),
            Command::Add => store(client, "add", args),
            Command::Del => match args.first() {
                Some(key) => Ok(Output::Text(client.delete(key)?.text)),
                None => Ok(Output::Bool(false)),
            },
            Command::Stats => {
                let line = match args.first() {
                    Some(group) => format!("stats {}", group),
                    None => "stats".to_string(),
                };
                Ok(Output::Text(client.exec(&line)?.text))
            }
            Command::Keys => {
                let listing = client.enumerate(
                    args.first().copied(),
                    parse_bound(args.get(1).copied()),
                    EnumerationMode::Text,
                )?;
                Ok(Output::Text(listing.to_string()))
            }
            Command::Flush => match args {
                [pattern] => Ok(Output::Bool(client.erase_matching(pattern)?)),
                _ => Ok(Output::Bool(false)),
            },
        }
    }
}

/// sends a storage command: `<verb> <key> <flags> <exptime> <bytes>` followed by the data block
fn store<S: Read + Write>(client: &mut McClient<S>, verb: &str, args: &[&str]) -> Result<Output> {
    let (key, value) = match args {
        [key, value, ..] => (key, value),
        _ => return Ok(Output::Bool(false)),
    };
    let flags = args.get(2).copied().unwrap_or("0");
    let exptime = args.get(3).copied().unwrap_or("0");
    let line = format!("{} {} {} {} {}\r\n{}", verb, key, flags, exptime, value.len(), value);
    Ok(Output::Text(client.exec(&line)?.text))
}
