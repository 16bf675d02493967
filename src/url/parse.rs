use lazy_static::lazy_static;
use percent_encoding::percent_decode_str;
use regex::Regex;

use super::{Param, Params};

lazy_static! {
    static ref SCHEME_RE: Regex = Regex::new(r"^([A-Za-z][A-Za-z0-9+.-]*):").unwrap();
}

/// The pieces of a url given as text
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parts {
    pub scheme: Option<String>,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

/// Removes what browsers ignore before they look for a scheme.
///
/// Leading and trailing C0 controls and spaces are stripped and tabs or newlines
/// anywhere are dropped, so ` javascript:` and `java\nscript:` are seen for what
/// they are.
pub fn clean(input: &str) -> String {
    input
        .trim_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// Splits `input` into its parts, anything that isn't a scheme or an authority is
/// left in the path.
pub fn parse(input: &str) -> Parts {
    let input = clean(input);
    let mut parts = Parts::default();
    let mut rest = input.as_str();

    if let Some(pos) = rest.find('#') {
        parts.fragment = Some(rest[pos + 1..].to_string());
        rest = &rest[..pos];
    }

    if let Some(pos) = rest.find('?') {
        parts.query = Some(rest[pos + 1..].to_string());
        rest = &rest[..pos];
    }

    if let Some(caps) = SCHEME_RE.captures(rest) {
        let scheme = &caps[1];
        parts.scheme = Some(scheme.to_string());
        rest = &rest[scheme.len() + 1..];
    }

    if let Some(after) = rest.strip_prefix("//") {
        let end = after.find('/').unwrap_or_else(|| after.len());
        parse_authority(&after[..end], &mut parts);
        rest = &after[end..];
    }

    if !rest.is_empty() {
        parts.path = Some(rest.to_string());
    }

    parts
}

fn parse_authority(authority: &str, parts: &mut Parts) {
    let mut host_port = authority;

    if let Some(at) = authority.rfind('@') {
        let userinfo = &authority[..at];
        host_port = &authority[at + 1..];
        match userinfo.find(':') {
            Some(colon) => {
                parts.user = Some(decode(&userinfo[..colon]));
                parts.pass = Some(decode(&userinfo[colon + 1..]));
            }
            None => parts.user = Some(decode(userinfo)),
        }
    }

    // `[::1]:8080`
    let port_sep = if host_port.starts_with('[') {
        host_port.find(']').and_then(|end| host_port[end..].find(':').map(|i| end + i))
    } else {
        host_port.rfind(':')
    };

    match port_sep {
        Some(sep) => {
            parts.host = Some(host_port[..sep].to_string());
            parts.port = host_port[sep + 1..].parse().ok();
        }
        None => parts.host = Some(host_port.to_string()),
    }

    if parts.host.as_deref() == Some("") {
        parts.host = None;
    }
}

fn decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().to_string()
}

/// Parses a query string the way form submissions are read: `+` is a space, and
/// `key[]` keys collect their values in a list.
pub fn parse_query(query: &str, params: &mut Params) {
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = match pair.find('=') {
            Some(eq) => (&pair[..eq], &pair[eq + 1..]),
            None => (pair, ""),
        };
        let key = decode(&key.replace('+', " "));
        let value = decode(&value.replace('+', " "));

        match key.strip_suffix("[]") {
            Some(list_key) => params.push_to_list(list_key, value),
            None => params.set(key, Param::Value(value)),
        }
    }
}
