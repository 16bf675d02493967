//! The boundary between developer-authored text and everything else.
//!
//! Template text enters the engine as a [`Source`]. A `&'static str` becomes a
//! [`Source::Literal`] and is trusted as-is; owned or borrowed runtime strings become
//! [`Source::Runtime`] and are handed to the host's [`TrustGate`]; an [`UnsafeValue`]
//! skips the gate and is easy to find in a code review.

use std::borrow::Cow;
use std::str::FromStr;

use serde::Deserialize;

use crate::errors::{Error, Result};

/// Decides whether a runtime string can be used as template text.
///
/// Hosts plug their own policy in here, eg a set of strings pre-registered at startup.
pub trait TrustGate: Sync + Send {
    /// Returns true if `value` originated from program source
    fn is_trusted(&self, value: &str) -> bool;
}

impl<F> TrustGate for F
where
    F: Fn(&str) -> bool + Sync + Send,
{
    fn is_trusted(&self, value: &str) -> bool {
        self(value)
    }
}

/// The default gate: only `&'static str` literals are trusted, no runtime string is.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralsOnly;

impl TrustGate for LiteralsOnly {
    fn is_trusted(&self, _value: &str) -> bool {
        false
    }
}

/// What happens when a runtime string fails the trust gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protection {
    /// Use the text without a word
    Silent,
    /// Log a warning and carry on
    Warn,
    /// Refuse the text
    Fail,
}

impl Default for Protection {
    fn default() -> Self {
        Protection::Warn
    }
}

impl FromStr for Protection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" => Ok(Protection::Silent),
            "warn" => Ok(Protection::Warn),
            "fail" => Ok(Protection::Fail),
            _ => Err(Error::msg(format!(
                "Unknown protection level `{}`, expected one of `silent`, `warn` or `fail`",
                s
            ))),
        }
    }
}

/// Text that knowingly bypasses the trust gate.
///
/// This only relaxes the check on the template text itself; values rendered into
/// the template are still validated and encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsafeValue(String);

impl UnsafeValue {
    /// Marks `value` as template text exempt from the trust gate
    pub fn new(value: impl Into<String>) -> Self {
        UnsafeValue(value.into())
    }

    /// The wrapped text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Template text along with where it came from.
#[derive(Debug, Clone)]
pub enum Source<'a> {
    /// A string literal from the program source
    Literal(&'static str),
    /// Text built at runtime, checked by the trust gate
    Runtime(Cow<'a, str>),
    /// Text the caller explicitly exempted from the trust gate
    Unsafe(UnsafeValue),
}

impl<'a> Source<'a> {
    /// The template text
    pub fn as_str(&self) -> &str {
        match self {
            Source::Literal(s) => s,
            Source::Runtime(s) => s,
            Source::Unsafe(u) => u.as_str(),
        }
    }
}

impl From<&'static str> for Source<'static> {
    fn from(s: &'static str) -> Self {
        Source::Literal(s)
    }
}

impl<'a> From<String> for Source<'a> {
    fn from(s: String) -> Self {
        Source::Runtime(Cow::Owned(s))
    }
}

impl<'a> From<&'a String> for Source<'a> {
    fn from(s: &'a String) -> Self {
        Source::Runtime(Cow::Borrowed(s.as_str()))
    }
}

impl<'a> From<UnsafeValue> for Source<'a> {
    fn from(u: UnsafeValue) -> Self {
        Source::Unsafe(u)
    }
}

/// Applies the gate and the protection level to `source`.
///
/// Returns whether the text is trusted: `Ok(false)` means it can be used but only
/// because the protection level or an [`UnsafeValue`] tolerates it.
pub(crate) fn check(source: &Source<'_>, gate: &dyn TrustGate, protection: Protection) -> Result<bool> {
    let text = match source {
        Source::Literal(_) => return Ok(true),
        Source::Unsafe(_) => return Ok(false),
        Source::Runtime(text) => text,
    };

    if gate.is_trusted(text) {
        return Ok(true);
    }

    match protection {
        Protection::Fail => Err(Error::untrusted_template()),
        Protection::Warn => {
            tracing::warn!(text = %text, "Non-literal template text detected");
            Ok(false)
        }
        Protection::Silent => Ok(false),
    }
}
