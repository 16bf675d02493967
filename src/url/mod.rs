//! Building urls that templates accept without checking them again.
//!
//! A [`Url`] collects a scheme, a host, a path with optional `:name` segments, query
//! parameters and a fragment, and [`Url::get`] turns it into a [`RenderedUrl`]. Only
//! this module can create a `RenderedUrl` so `url` slots trust them as they are.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::errors::{Error, Result};

mod encode;
mod parse;

lazy_static! {
    static ref SCHEME_NAME_RE: Regex = Regex::new(r"(?i)^[a-z][a-z0-9+.-]+$").unwrap();
    static ref NAMED_SEGMENT_RE: Regex = Regex::new(r"^:([A-Za-z0-9_]+)$").unwrap();
}

/// Schemes allowed when none are set
pub const DEFAULT_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// How much of the url `get` writes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `https://example.com/path/`
    Full,
    /// `/path/`
    Absolute,
    /// `../path/`, seen from the current path
    Relative,
}

impl Default for Format {
    fn default() -> Format {
        Format::Absolute
    }
}

/// A url made by [`Url::get`].
///
/// There is no way to make one from a string, which is what lets the `url` value
/// kinds accept it without looking at it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedUrl {
    value: String,
    _minted: Minted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Minted;

impl RenderedUrl {
    /// The url as a string
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for RenderedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl PartialEq<&str> for RenderedUrl {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl Serialize for RenderedUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

/// The value of a query or path parameter
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Param {
    /// Removes a `:name` path segment, and is left out of the query
    Null,
    /// A single value
    Value(String),
    /// Serialized as repeated `key[]=` entries
    List(Vec<String>),
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Param::Value(s.to_string())
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Param::Value(s)
    }
}

impl From<&String> for Param {
    fn from(s: &String) -> Self {
        Param::Value(s.clone())
    }
}

impl From<RenderedUrl> for Param {
    fn from(u: RenderedUrl) -> Self {
        Param::Value(u.value)
    }
}

macro_rules! param_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Param {
                fn from(n: $ty) -> Self {
                    Param::Value(n.to_string())
                }
            }
        )*
    };
}

param_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Param::Null,
        }
    }
}

impl<T: ToString> From<Vec<T>> for Param {
    fn from(values: Vec<T>) -> Self {
        Param::List(values.iter().map(ToString::to_string).collect())
    }
}

/// Parameters keyed by name, in the order they were first set.
///
/// Setting a key that exists replaces its value where it is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, Param)>);

impl Params {
    /// Sets `key` to `value`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Param>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Appends `value` to the list under `key`, making it a list if needed
    pub(crate) fn push_to_list(&mut self, key: &str, value: String) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, Param::List(values))) => values.push(value),
            Some(entry) => entry.1 = Param::List(vec![value]),
            None => self.0.push((key.to_string(), Param::List(vec![value]))),
        }
    }

    /// The value of `key`
    pub fn get(&self, key: &str) -> Option<&Param> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Removes `key`, returning its value
    pub fn remove(&mut self, key: &str) -> Option<Param> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    /// Iterates over the parameters in order
    pub fn iter(&self) -> impl Iterator<Item = &(String, Param)> {
        self.0.iter()
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Param>> std::iter::FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::default();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

/// A url builder.
///
/// ```
/// use trusted_templates::Url;
///
/// let mut url = Url::new("/path/:id/");
/// url.param_set("id", 42);
/// assert_eq!(url.get().unwrap(), "/path/42/");
/// url.param_set("sort", "name");
/// assert_eq!(url.get().unwrap(), "/path/42/?sort=name");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Url {
    format: Format,
    schemes: Vec<String>,
    /// Set with `scheme_set`, takes precedence over the parsed one
    scheme: Option<String>,
    parts: parse::Parts,
    params: Params,
    fragment: Option<String>,
    current_path: String,
    current_host: Option<String>,
}

impl Default for Url {
    fn default() -> Url {
        Url {
            format: Format::default(),
            schemes: DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect(),
            scheme: None,
            parts: parse::Parts::default(),
            params: Params::default(),
            fragment: None,
            current_path: "/".to_string(),
            current_host: None,
        }
    }
}

impl Url {
    /// Starts from `source`, anything from a path to a full url with a query and a
    /// fragment.
    pub fn new(source: &str) -> Url {
        let mut parts = parse::parse(source);
        let mut params = Params::default();
        if let Some(query) = parts.query.take() {
            parse::parse_query(&query, &mut params);
        }
        let fragment = parts.fragment.take();

        Url { parts, params, fragment, ..Url::default() }
    }

    /// Starts from the current request: its path, and its query parameters behind
    /// any set later.
    pub fn current(path_and_query: &str) -> Url {
        let (path, query) = match path_and_query.find('?') {
            Some(pos) => (&path_and_query[..pos], Some(&path_and_query[pos + 1..])),
            None => (path_and_query, None),
        };
        let path = if path.is_empty() { "/" } else { path };

        let mut url = Url { current_path: path.to_string(), ..Url::default() };
        url.parts.path = Some(path.to_string());
        if let Some(query) = query {
            parse::parse_query(query, &mut url.params);
        }
        url
    }

    /// Sets the output format, a scheme, host, port or credentials make it `Full`
    /// whatever is set here
    pub fn format_set(&mut self, format: Format) -> &mut Self {
        self.format = format;
        self
    }

    /// Replaces the allowed schemes.
    ///
    /// `javascript` is always refused. On error the previous schemes are kept.
    pub fn schemes_allowed_set<I, S>(&mut self, schemes: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = vec![];
        for scheme in schemes {
            let scheme = scheme.as_ref();
            if !SCHEME_NAME_RE.is_match(scheme) {
                return Err(Error::invalid_scheme(scheme));
            }
            let scheme = scheme.to_ascii_lowercase();
            if scheme == "javascript" {
                return Err(Error::invalid_scheme(scheme));
            }
            allowed.push(scheme);
        }
        self.schemes = allowed;
        Ok(self)
    }

    /// Sets the scheme, which makes the format `Full`
    pub fn scheme_set(&mut self, scheme: &str) -> &mut Self {
        self.format = Format::Full;
        self.scheme = Some(scheme.to_string());
        self
    }

    /// Sets the host
    pub fn host_set(&mut self, host: &str) -> &mut Self {
        self.parts.host = Some(host.to_string());
        self
    }

    /// Sets the port
    pub fn port_set(&mut self, port: u16) -> &mut Self {
        self.parts.port = Some(port);
        self
    }

    /// Sets the user and optionally the password
    pub fn auth_set(&mut self, user: &str, pass: Option<&str>) -> &mut Self {
        self.parts.user = Some(user.to_string());
        self.parts.pass = pass.map(str::to_string);
        self
    }

    /// Sets the path, a path not starting with `/` is relative to the current path
    pub fn path_set(&mut self, path: &str) -> &mut Self {
        self.parts.path = Some(path.to_string());
        self
    }

    /// Sets one parameter. It fills a `:key` path segment if there is one, otherwise
    /// it goes in the query.
    pub fn param_set(&mut self, key: impl Into<String>, value: impl Into<Param>) -> &mut Self {
        self.params.set(key, value);
        self
    }

    /// Sets several parameters
    pub fn params_set<I, K, V>(&mut self, params: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Param>,
    {
        for (k, v) in params {
            self.params.set(k, v);
        }
        self
    }

    /// Sets the fragment, percent-encoded
    pub fn fragment_set(&mut self, fragment: &str) -> &mut Self {
        self.fragment = Some(encode::component(fragment));
        self
    }

    /// Sets the fragment as it is, for fragments like `page=4` or `inbox/1a2b`
    pub fn fragment_set_raw(&mut self, fragment: &str) -> &mut Self {
        self.fragment = Some(fragment.to_string());
        self
    }

    /// Sets the path of the current request, relative paths and the `Relative`
    /// format are resolved against it
    pub fn current_path_set(&mut self, path: &str) -> &mut Self {
        self.current_path = path.to_string();
        self
    }

    /// Sets the host of the current request, used by `Full` urls without a host
    pub fn current_host_set(&mut self, host: &str) -> &mut Self {
        self.current_host = Some(host.to_string());
        self
    }

    /// The scheme, as set or as parsed
    pub fn scheme_get(&self) -> Option<&str> {
        self.scheme.as_deref().or_else(|| self.parts.scheme.as_deref())
    }

    /// The host
    pub fn host_get(&self) -> Option<&str> {
        self.parts.host.as_deref()
    }

    /// The path, as given
    pub fn path_get(&self) -> Option<&str> {
        self.parts.path.as_deref()
    }

    /// The parameters
    pub fn params_get(&self) -> &Params {
        &self.params
    }

    /// The fragment, as it will be written
    pub fn fragment_get(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Builds the url
    pub fn get(&self) -> Result<RenderedUrl> {
        self.build(self.params.clone())
    }

    /// Builds the url with `params` set on top of the ones already there
    pub fn get_with<I, K, V>(&self, params: I) -> Result<RenderedUrl>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Param>,
    {
        let mut merged = self.params.clone();
        for (k, v) in params {
            merged.set(k, v);
        }
        self.build(merged)
    }

    fn resolve_scheme(&self) -> Result<(String, bool)> {
        let explicit = self
            .scheme_get()
            .map(|s| parse::clean(s).to_ascii_lowercase())
            .filter(|s| !s.is_empty());
        let (scheme, explicit) = match explicit {
            Some(s) => (s, true),
            None => ("https".to_string(), false),
        };

        // Browsers run ` javascript:` and `java\nscript:` too, hence the cleaning.
        if scheme == "javascript" || !self.schemes.contains(&scheme) {
            return Err(Error::invalid_scheme(scheme));
        }

        Ok((scheme, explicit))
    }

    fn build(&self, mut params: Params) -> Result<RenderedUrl> {
        let (scheme, scheme_explicit) = self.resolve_scheme()?;
        let hierarchical = scheme == "http" || scheme == "https";
        let parts = &self.parts;

        let format = if scheme_explicit
            || parts.host.is_some()
            || parts.port.is_some()
            || parts.user.is_some()
            || parts.pass.is_some()
        {
            Format::Full
        } else {
            self.format
        };

        let mut output = String::new();

        if format == Format::Full {
            output.push_str(&scheme);
            output.push_str(if hierarchical { "://" } else { ":" });

            if let Some(user) = &parts.user {
                output.push_str(&encode::userinfo(user));
                if let Some(pass) = &parts.pass {
                    output.push(':');
                    output.push_str(&encode::userinfo(pass));
                }
                output.push('@');
            }

            let current_host = if hierarchical { self.current_host.as_ref() } else { None };
            match parts.host.as_ref().or(current_host) {
                Some(host) => output.push_str(&check_host(host)?),
                None if hierarchical => {
                    return Err(Error::msg(
                        "A full url needs a host, set one with `host_set` or `current_host_set`",
                    ))
                }
                None => (),
            }

            if let Some(port) = parts.port {
                output.push(':');
                output.push_str(&port.to_string());
            }
        }

        if hierarchical {
            let path = match &parts.path {
                Some(p) if p.starts_with('/') => p.clone(),
                Some(p) => format!("{}/{}", self.current_path, p),
                None if parts.host.is_none() => self.current_path.clone(),
                None => "/".to_string(),
            };
            let target = fill_segments(&path, &mut params)?;

            if format == Format::Relative {
                let current: Vec<String> =
                    encode::path_to_array(&self.current_path).iter().map(|s| encode::segment(s)).collect();
                output.push_str(&encode::relative_path(&current, &target));
            } else {
                output.push('/');
                output.push_str(&target.join("/"));
            }

            if path.ends_with('/') && !output.ends_with('/') {
                output.push('/');
            }
        } else if let Some(path) = &parts.path {
            output.push_str(&encode::component(path));
        }

        let query = build_query(&params);
        if !query.is_empty() {
            output.push('?');
            output.push_str(&query);
        }

        if let Some(fragment) = &self.fragment {
            output.push('#');
            output.push_str(fragment);
        }

        Ok(RenderedUrl { value: output, _minted: Minted })
    }
}

/// A url that always has its scheme and host
pub fn http_url(source: &str) -> Url {
    let mut url = Url::new(source);
    url.format_set(Format::Full);
    url
}

fn check_host(host: &str) -> Result<String> {
    if host.is_empty()
        || host.chars().any(|c| c.is_control() || matches!(c, ' ' | '/' | '?' | '#' | '@' | '\\'))
    {
        return Err(Error::msg(format!("`{}` is not a valid host", host)));
    }
    Ok(host.to_string())
}

/// Splits `path` into encoded segments, filling `:name` segments from `params` and
/// removing the parameters it uses.
fn fill_segments(path: &str, params: &mut Params) -> Result<Vec<String>> {
    let mut segments = vec![];

    for folder in encode::path_to_array(path) {
        let name = match NAMED_SEGMENT_RE.captures(&folder) {
            Some(caps) => caps[1].to_string(),
            None => {
                segments.push(encode::segment(&folder));
                continue;
            }
        };

        match params.remove(&name) {
            Some(Param::Value(value)) => segments.push(encode::component(&value)),
            Some(Param::Null) => (),
            Some(Param::List(_)) => {
                return Err(Error::invalid_path(format!(
                    "the path segment `:{}` can't be filled with a list",
                    name
                )))
            }
            None => {
                return Err(Error::invalid_path(format!(
                    "no parameter was given for the path segment `:{}`",
                    name
                )))
            }
        }
    }

    Ok(segments)
}

fn build_query(params: &Params) -> String {
    let mut pairs = vec![];

    for (key, value) in params.iter() {
        match value {
            Param::Null => (),
            Param::Value(v) if v.is_empty() => (),
            Param::Value(v) => pairs.push(format!("{}={}", encode::component(key), encode::component(v))),
            Param::List(values) => {
                for v in values {
                    pairs.push(format!("{}[]={}", encode::component(key), encode::component(v)));
                }
            }
        }
    }

    pairs.join("&")
}
