//! Key enumeration over the server's slab classes.
//!
//! memcached has no "list keys" command, so keys are discovered in two passes:
//! 1. `stats items` lists every active slab class as lines of the form
//!    `STAT items:<class-id>:<field> <value>`
//! 2. `stats cachedump <class-id> 0` dumps the keys of one class as lines of the form
//!    `ITEM <key> [<size> b; <expiry> s]`
//!
//! Enumeration only reads from the server. Nothing in this module issues a write command.
use std::collections::BTreeSet;
use std::fmt;
use std::io::{Read, Write};

use tracing::{debug, instrument, warn};

use crate::{KeyPattern, McClient, Result};

const DIRECTORY_MARKER: &str = "STAT";
const ITEM_MARKER: &str = "ITEM";

/// Selects the shape of the value returned by [`McClient::enumerate`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EnumerationMode {
    /// matching keys joined by `\n`, for display
    Text,
    /// matching keys as a list, for programmatic use
    Structured,
}

/// The result of an enumeration, shaped by the [`EnumerationMode`] it was requested with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyListing {
    /// keys joined by newlines
    Text(String),
    /// keys in the order they were found
    Keys(Vec<String>),
}

impl KeyListing {
    fn build(keys: Vec<String>, mode: EnumerationMode) -> KeyListing {
        match mode {
            EnumerationMode::Text => KeyListing::Text(keys.join("\n")),
            EnumerationMode::Structured => KeyListing::Keys(keys),
        }
    }

    /// returns the listed keys as a list, splitting a text listing on newlines
    pub fn into_keys(self) -> Vec<String> {
        match self {
            KeyListing::Keys(keys) => keys,
            KeyListing::Text(text) if text.is_empty() => Vec::new(),
            KeyListing::Text(text) => text.split('\n').map(String::from).collect(),
        }
    }
}

impl fmt::Display for KeyListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyListing::Text(text) => f.write_str(text),
            KeyListing::Keys(keys) => f.write_str(&keys.join("\n")),
        }
    }
}

/// Parses an optional bound argument. A missing or unparsable argument means "unbounded".
pub fn parse_bound(arg: Option<&str>) -> Option<usize> {
    arg.and_then(|s| s.parse().ok())
}

impl<S: Read + Write> McClient<S> {
    /// Lists the keys held by the server that match the glob `pattern`.
    ///
    /// Slab classes are walked in ascending class id and keys keep the order of each class
    /// dump. Keys are not deduplicated across classes. When `bound` is `Some(n)` with `n > 0`,
    /// enumeration stops as soon as `n` keys have matched, so at most `n` keys are returned.
    /// Note that this is a hard cap: the count is checked after each match and enumeration does
    /// not run on until the count exceeds `n`, which would return `n + 1` keys.
    ///
    /// A `None` pattern lists nothing. A pattern that does not compile is reported with a
    /// warning and also lists nothing.
    ///
    /// # Errors
    /// transport errors from any of the underlying commands are returned as-is
    #[instrument(skip(self))]
    pub fn enumerate(
        &mut self,
        pattern: Option<&str>,
        bound: Option<usize>,
        mode: EnumerationMode,
    ) -> Result<KeyListing> {
        let empty = || KeyListing::build(Vec::new(), mode);

        let pattern = match pattern {
            Some(glob) => match KeyPattern::compile(glob) {
                Ok(pattern) => pattern,
                Err(e) => {
                    warn!("{}", e);
                    return Ok(empty());
                }
            },
            None => return Ok(empty()),
        };
        let bound = bound.filter(|&n| n > 0);

        let directory = self.exec("stats items")?;
        if directory.is_empty() {
            debug!("slab directory is empty");
            return Ok(empty());
        }
        let classes = slab_classes(directory.lines());
        debug!(?classes);

        let mut keys = Vec::new();
        'classes: for class in classes {
            let dump = self.exec(&format!("stats cachedump {} 0", class))?;
            if dump.is_empty() {
                continue;
            }
            for key in item_keys(dump.lines()) {
                if !pattern.is_match(key) {
                    continue;
                }
                keys.push(key.to_string());
                if bound.map_or(false, |n| keys.len() >= n) {
                    debug!(class, matched = keys.len(), "bound reached");
                    break 'classes;
                }
            }
        }

        Ok(KeyListing::build(keys, mode))
    }
}

/// collects the distinct slab class ids named by a `stats items` reply
fn slab_classes<'a>(lines: impl Iterator<Item = &'a str>) -> BTreeSet<u32> {
    lines
        .filter(|line| line.starts_with(DIRECTORY_MARKER))
        .filter_map(|line| line.split(':').nth(1))
        .filter_map(|id| match id.parse::<u32>() {
            Ok(id) => Some(id),
            Err(_) => {
                debug!(id, "skipping non-numeric slab class id");
                None
            }
        })
        .collect()
}

/// extracts the key (second space-delimited field) of every `ITEM` line
fn item_keys<'a>(lines: impl Iterator<Item = &'a str> + 'a) -> impl Iterator<Item = &'a str> + 'a {
    lines
        .filter(|line| line.starts_with(ITEM_MARKER))
        .filter_map(|line| line.split(' ').nth(1))
}
