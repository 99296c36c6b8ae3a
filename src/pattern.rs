use regex::Regex;

use crate::Result;

/// the wildcard marker accepted in key patterns
pub const WILDCARD: char = '*';

/// A glob-like key filter, compiled into a regular expression.
///
/// The glob is translated, not escaped:
/// - unless it starts with `*`, the match is anchored at the start of the key
/// - every `*` matches one or more characters (`.+`), never zero
///
/// Other regex syntax in the glob keeps its regex meaning. There is no end anchor, so
/// `foo` matches `foobar`.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    regex: Regex,
}

impl KeyPattern {
    /// compiles `glob` into a matcher
    ///
    /// # Errors
    /// returns [`McError::Pattern`] if the translated expression is not a valid regex
    ///
    /// [`McError::Pattern`]: ./enum.McError.html
    pub fn compile(glob: &str) -> Result<KeyPattern> {
        let regex = Regex::new(&translate(glob))?;
        Ok(KeyPattern { regex })
    }

    /// tests `key` against the pattern
    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    /// the regular expression the glob was translated into
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

fn translate(glob: &str) -> String {
    let mut expr = String::with_capacity(glob.len() + 8);
    if !glob.starts_with(WILDCARD) {
        expr.push('^');
    }
    for c in glob.chars() {
        if c == WILDCARD {
            expr.push_str(".+");
        } else {
            expr.push(c);
        }
    }
    expr
}
