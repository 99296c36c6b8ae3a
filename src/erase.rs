use std::io::{Read, Write};

use tracing::{debug, info, warn};

use crate::{EnumerationMode, McClient, Result};

impl<S: Read + Write> McClient<S> {
    /// Deletes every key matching the glob `pattern`.
    ///
    /// The keys are enumerated first, then deleted one `delete` command at a time. Deletes are
    /// best-effort: their replies are not inspected and a failed delete does not stop the loop,
    /// so an interrupted erase leaves the remaining keys in place. Use [`delete`] when the
    /// outcome for a single key matters.
    ///
    /// Returns `Ok(true)` once every enumerated key has been sent a delete.
    ///
    /// # Errors
    /// only transport errors raised while enumerating the keys are returned
    ///
    /// [`delete`]: #method.delete
    pub fn erase_matching(&mut self, pattern: &str) -> Result<bool> {
        let keys = self
            .enumerate(Some(pattern), None, EnumerationMode::Structured)?
            .into_keys();
        info!("erasing {} keys matching {}", keys.len(), pattern);

        for key in &keys {
            match self.delete(key) {
                Ok(reply) => debug!(key = key.as_str(), reply = reply.text.trim_end(), "delete sent"),
                Err(e) => warn!("could not delete {}: {}", key, e),
            }
        }
        Ok(true)
    }
}
