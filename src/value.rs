use std::convert::TryFrom;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value as Json;

use crate::errors::{Error, Result};
use crate::url::RenderedUrl;

/// A value supplied by the caller for one placeholder.
///
/// Values are never trusted: they always go through the validator of their slot and
/// are encoded for the context they land in.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Renders as an empty string; only accepted by `text` slots
    Null,
    /// Plain text
    Text(String),
    /// An integer, the only thing `int` slots accept
    Integer(i64),
    /// A float, accepted by `text` slots and SQL parameters
    Float(f64),
    /// A url minted by the url composer
    Url(RenderedUrl),
    /// Inline binary data
    Data(DataUrl),
}

impl Value {
    /// A short description of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Integer(_) => "an integer",
            Value::Float(_) => "a float",
            Value::Url(_) => "a url",
            Value::Data(_) => "a data url",
        }
    }

    /// The text of the value when it is a `Text`
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for `Value::Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(n) => write!(f, "{}", n),
            Value::Url(u) => write!(f, "{}", u),
            Value::Data(d) => write!(f, "{}", d),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(i: $ty) -> Self {
                    Value::Integer(i64::from(i))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<RenderedUrl> for Value {
    fn from(u: RenderedUrl) -> Self {
        Value::Url(u)
    }
}

impl From<DataUrl> for Value {
    fn from(d: DataUrl) -> Self {
        Value::Data(d)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl TryFrom<Json> for Value {
    type Error = Error;

    fn try_from(json: Json) -> Result<Self> {
        match json {
            Json::Null => Ok(Value::Null),
            Json::String(s) => Ok(Value::Text(s)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Integer(i)),
                None => n
                    .as_f64()
                    .map(Value::Float)
                    .ok_or_else(|| Error::msg(format!("Number `{}` is out of range", n))),
            },
            Json::Bool(b) => Ok(Value::Text(b.to_string())),
            other => Err(Error::msg(format!(
                "Only scalar JSON values can be used as template values, got `{}`",
                other
            ))),
        }
    }
}

#[cfg(feature = "datetime")]
mod datetime {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone};

    use super::Value;

    impl<Tz: TimeZone> From<DateTime<Tz>> for Value
    where
        Tz::Offset: std::fmt::Display,
    {
        fn from(dt: DateTime<Tz>) -> Self {
            Value::Text(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }
    }

    impl From<NaiveDate> for Value {
        fn from(date: NaiveDate) -> Self {
            Value::Text(date.format("%Y-%m-%d").to_string())
        }
    }

    impl From<NaiveDateTime> for Value {
        fn from(dt: NaiveDateTime) -> Self {
            Value::Text(dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        }
    }
}

/// Inline binary content rendered as a `data:` url.
///
/// Only accepted by `url-image` slots, and only when the media type is an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime: String,
    data: Vec<u8>,
}

impl DataUrl {
    /// Wraps `data` with its declared media type
    pub fn new(mime: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        DataUrl { mime: mime.into(), data: data.into() }
    }

    /// The declared media type, eg `image/png`
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// The raw bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, STANDARD.encode(&self.data))
    }
}

/// Builds a `Vec<Value>` out of anything convertible into a [`Value`].
///
/// ```rust
/// use trusted_templates::{values, Value};
///
/// let values = values!["/example/", 100, None::<i64>];
/// assert_eq!(values[1], Value::Integer(100));
/// ```
#[macro_export]
macro_rules! values {
    () => { ::std::vec::Vec::<$crate::Value>::new() };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Value::from($value)),+]
    };
}
