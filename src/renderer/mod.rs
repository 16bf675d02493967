//! Responsible for rendering compiled templates

use std::fmt;

use serde::{Serialize, Serializer};

use crate::errors::{Error, Result};
use crate::template::{SlotContext, Template};
use crate::utils::escape_html;
use crate::value::Value;

#[cfg(test)]
mod tests;

/// Markup produced by rendering a template.
///
/// Only the renderer can build one, so holding an `Html` means every value in it went
/// through its slot validator and was encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Html {
    value: String,
    _minted: Minted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Minted;

impl Html {
    /// The rendered markup
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consumes the `Html`, returning the markup
    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for Html {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl PartialEq<&str> for Html {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

// Serialized as a plain string, typically on its way to a browser or an API client
impl Serialize for Html {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

/// Puts a `<br />` before every line break of already escaped text.
///
/// `\r\n` counts as one line break.
fn break_lines(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' | '\n' => {
                output.push_str("<br />");
                output.push(c);
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                    output.push('\n');
                }
            }
            _ => output.push(c),
        }
    }
    output
}

/// Renders `values` into `template`.
///
/// Nothing is written until the arity and every value have been checked, so a
/// failure never leaks part of the output.
pub fn render(template: &Template, values: &[Value]) -> Result<Html> {
    let expected = template.slot_count();
    if values.len() != expected {
        return Err(Error::arity_mismatch(expected, values.len()));
    }

    for (k, (slot, value)) in template.slots().iter().zip(values).enumerate() {
        if let Some(kind) = slot.kind {
            kind.validate(value).map_err(|reason| Error::value_kind_mismatch(k, kind.describe(), reason))?;
        }
    }

    let fragments = template.fragments();
    let mut output = String::with_capacity(fragments.iter().map(String::len).sum::<usize>() * 2);
    for ((fragment, slot), value) in fragments.iter().zip(template.slots()).zip(values) {
        output.push_str(fragment);
        let encoded = escape_html(&value.to_string());
        match slot.context {
            // line breaks already show in <pre>
            SlotContext::Text { ref element } if element != "pre" => {
                output.push_str(&break_lines(&encoded))
            }
            _ => output.push_str(&encoded),
        }
    }
    // one more fragment than values
    if let Some(last) = fragments.last() {
        output.push_str(last);
    }

    tracing::trace!(slots = expected, "Rendered template");

    Ok(Html { value: output, _minted: Minted })
}
