use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::value::Value;

lazy_static! {
    static ref REFERENCE_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_-]+$").unwrap();
    // T=Time, W=Week, Z=Zulu, and PTHMS for durations
    static ref DATETIME_RE: Regex = Regex::new(r"(?i)^[0-9TWZPHMS :.+-]+$").unwrap();
    static ref TOKEN_SPLIT_RE: Regex = Regex::new(r" +").unwrap();
}

/// The safety-relevant type of a placeholder.
///
/// Every kind owns its validation rule, see [`ValueKind::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Anything, it is only encoded
    Text,
    /// A url minted by the url composer or a root-relative path
    Url,
    /// Same as `Url`, but inline image data is allowed too
    UrlImage,
    /// An integer value, no numeric strings
    Integer,
    /// One or more space separated references (ids, class names), optionally
    /// restricted to a set of tokens
    ReferenceToken(Option<&'static [&'static str]>),
    /// One or more space separated tokens out of a fixed set
    EnumeratedSet(&'static [&'static str]),
    /// Something that looks like an ISO-8601 date, time or duration
    DateTime,
}

/// Why a value was not accepted for a kind.
pub type Rejection = String;

impl ValueKind {
    /// A human readable description of what the kind accepts
    pub fn describe(&self) -> String {
        match self {
            ValueKind::Text => "text".to_string(),
            ValueKind::Url => "a url".to_string(),
            ValueKind::UrlImage => "an image url".to_string(),
            ValueKind::Integer => "an integer".to_string(),
            ValueKind::ReferenceToken(_) => "one or more valid references".to_string(),
            ValueKind::EnumeratedSet(tokens) => format!("one of \"{}\"", tokens.join("\", \"")),
            ValueKind::DateTime => "a valid datetime".to_string(),
        }
    }

    /// Checks `value` against the rule of this kind.
    pub fn validate(&self, value: &Value) -> Result<(), Rejection> {
        match self {
            ValueKind::Text => Ok(()),
            ValueKind::Url => url(value, false),
            ValueKind::UrlImage => url(value, true),
            ValueKind::Integer => integer(value),
            ValueKind::ReferenceToken(allowed) => reference(value, *allowed),
            ValueKind::EnumeratedSet(tokens) => enumerated(value, tokens),
            ValueKind::DateTime => datetime(value),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Text => "text",
            ValueKind::Url => "url",
            ValueKind::UrlImage => "url-image",
            ValueKind::Integer => "int",
            ValueKind::ReferenceToken(_) => "ref",
            ValueKind::EnumeratedSet(_) => "enum",
            ValueKind::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

fn text_of<'a>(value: &'a Value) -> Result<&'a str, Rejection> {
    match value {
        Value::Text(s) => Ok(s),
        other => Err(format!("got {}", other.type_name())),
    }
}

fn url(value: &Value, image: bool) -> Result<(), Rejection> {
    match value {
        Value::Url(_) => Ok(()),
        Value::Data(data) if image => {
            if data.mime().starts_with("image/") {
                Ok(())
            } else {
                Err(format!("inline data has the media type `{}`", data.mime()))
            }
        }
        Value::Text(s) => {
            // `//host` and `/\host` are read by browsers as protocol-relative urls
            if s.starts_with('/') && !s.starts_with("//") && !s.starts_with("/\\") {
                Ok(())
            } else {
                Err(format!("`{}` is not a root-relative path, build it with `Url`", s))
            }
        }
        other => Err(format!("got {}", other.type_name())),
    }
}

fn integer(value: &Value) -> Result<(), Rejection> {
    match value {
        Value::Integer(_) => Ok(()),
        other => Err(format!("got {}", other.type_name())),
    }
}

fn reference(value: &Value, allowed: Option<&[&str]>) -> Result<(), Rejection> {
    let text = text_of(value)?;
    for token in text.split(' ').map(str::trim) {
        if !REFERENCE_RE.is_match(token) {
            return Err(format!("`{}` is not a valid reference", token));
        }
        if let Some(allowed) = allowed {
            if !allowed.contains(&token) {
                return Err(format!("`{}` is not an allowed reference", token));
            }
        }
    }
    Ok(())
}

fn enumerated(value: &Value, tokens: &[&str]) -> Result<(), Rejection> {
    let text = text_of(value)?;
    if tokens.contains(&text) {
        return Ok(());
    }
    // supporting "space-separated tokens"
    for token in TOKEN_SPLIT_RE.split(text) {
        if !tokens.contains(&token) {
            return Err(format!("`{}` is not allowed", token));
        }
    }
    Ok(())
}

fn datetime(value: &Value) -> Result<(), Rejection> {
    let text = text_of(value)?;
    if DATETIME_RE.is_match(text) {
        Ok(())
    } else {
        Err(format!("`{}` doesn't look like a datetime", text))
    }
}
