//! Parameterised queries.
//!
//! Values never become part of the SQL text: every `?` stays in the query and the
//! values travel next to it, for the database driver to bind.

use lazy_static::lazy_static;
use regex::Regex;

use crate::engine::Engine;
use crate::errors::{Error, Result};
use crate::parser::{scan_plain_markers, MARKER};
use crate::trust::Source;
use crate::value::Value;

lazy_static! {
    static ref ALIAS_RE: Regex = Regex::new(r"^[a-z0-9_]+$").unwrap();
}

/// A query ready for a database driver
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedQuery {
    sql: String,
    parameters: Vec<Value>,
    aliases: Vec<(String, String)>,
}

impl RenderedQuery {
    /// The SQL text, with its `?` placeholders
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The values to bind, one per placeholder
    pub fn parameters(&self) -> &[Value] {
        &self.parameters
    }

    /// The aliases that were substituted, by name
    pub fn aliases(&self) -> &[(String, String)] {
        &self.aliases
    }

    /// Consumes the query, returning the SQL and its parameters
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.parameters)
    }
}

/// Builds a query from SQL text that already went through the trust gate.
///
/// `{name}` is replaced by the back-ticked alias value. Names and values are limited
/// to lower case letters, digits and `_`.
pub(crate) fn render_query(text: &str, parameters: Vec<Value>, aliases: &[(&str, &str)]) -> Result<RenderedQuery> {
    let mut sql = text.to_string();
    let mut applied = Vec::with_capacity(aliases.len());

    for (name, value) in aliases {
        if !ALIAS_RE.is_match(name) {
            return Err(Error::invalid_alias(*name));
        }
        if !ALIAS_RE.is_match(value) {
            return Err(Error::invalid_alias(*value));
        }
        sql = sql.replace(&format!("{{{}}}", name), &format!("`{}`", value));
        applied.push((name.to_string(), value.to_string()));
    }

    let expected = scan_plain_markers(&sql).len();
    if expected != parameters.len() {
        return Err(Error::arity_mismatch(expected, parameters.len()));
    }

    tracing::trace!(parameters = expected, "Rendered query");

    Ok(RenderedQuery { sql, parameters, aliases: applied })
}

/// `?,?,?` with one placeholder per value, for `IN (...)` lists
pub fn placeholders(count: usize) -> Result<String> {
    if count == 0 {
        // `IN ()` is a syntax error in every database
        return Err(Error::arity_mismatch(1, 0));
    }
    let marker = MARKER.to_string();
    Ok(vec![marker.as_str(); count].join(","))
}

/// How the conditions of a group are joined
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conjunction {
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `XOR`
    Xor,
}

impl Conjunction {
    fn as_sql(self) -> &'static str {
        match self {
            Conjunction::And => " AND ",
            Conjunction::Or => " OR ",
            Conjunction::Xor => " XOR ",
        }
    }
}

/// One entry of a `Conditions` group
#[derive(Clone, Debug)]
enum Condition<'a> {
    Raw(Source<'a>, Vec<Value>),
    Eq(Source<'a>, Value),
    IsNull(Source<'a>),
    Group(Conditions<'a>),
}

/// A `WHERE` clause built from nested groups of conditions.
///
/// Every piece of SQL text in it, including field names, goes through the trust
/// gate when it is built; values only ever become parameters.
///
/// ```
/// use trusted_templates::{Conditions, Conjunction, Engine};
///
/// let engine = Engine::new();
/// let mut conditions = Conditions::new(Conjunction::And);
/// conditions.raw("u.deleted IS NULL").eq("u.type", "admin").group(
///     Conditions::new(Conjunction::Or).eq("u.id", 1).eq("u.id", 2).clone(),
/// );
/// let (sql, parameters) = conditions.build(&engine).unwrap();
/// assert_eq!(sql, "(u.deleted IS NULL AND u.type = ? AND (u.id = ? OR u.id = ?))");
/// assert_eq!(parameters.len(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct Conditions<'a> {
    conjunction: Conjunction,
    items: Vec<Condition<'a>>,
}

impl<'a> Conditions<'a> {
    /// An empty group joined by `conjunction`
    pub fn new(conjunction: Conjunction) -> Conditions<'a> {
        Conditions { conjunction, items: vec![] }
    }

    /// A SQL fragment without placeholders
    pub fn raw(&mut self, sql: impl Into<Source<'a>>) -> &mut Self {
        self.items.push(Condition::Raw(sql.into(), vec![]));
        self
    }

    /// A SQL fragment with one value per `?`
    pub fn raw_with(&mut self, sql: impl Into<Source<'a>>, values: Vec<Value>) -> &mut Self {
        self.items.push(Condition::Raw(sql.into(), values));
        self
    }

    /// `field = ?`
    pub fn eq(&mut self, field: impl Into<Source<'a>>, value: impl Into<Value>) -> &mut Self {
        self.items.push(Condition::Eq(field.into(), value.into()));
        self
    }

    /// `field IS NULL`
    pub fn is_null(&mut self, field: impl Into<Source<'a>>) -> &mut Self {
        self.items.push(Condition::IsNull(field.into()));
        self
    }

    /// A nested group, wrapped in parentheses
    pub fn group(&mut self, conditions: Conditions<'a>) -> &mut Self {
        self.items.push(Condition::Group(conditions));
        self
    }

    /// Whether nothing was added
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checks every SQL fragment against the trust gate of `engine` and returns the
    /// clause with its parameters in placeholder order.
    pub fn build(&self, engine: &Engine) -> Result<(String, Vec<Value>)> {
        let mut parameters = vec![];
        let sql = self.build_into(engine, &mut parameters)?;
        Ok((sql, parameters))
    }

    fn build_into(&self, engine: &Engine, parameters: &mut Vec<Value>) -> Result<String> {
        if self.items.is_empty() {
            return Err(Error::msg("A group of conditions needs at least one condition"));
        }

        let mut parts = Vec::with_capacity(self.items.len());
        for item in &self.items {
            match item {
                Condition::Raw(sql, values) => {
                    engine.check_trust(sql)?;
                    let expected = scan_plain_markers(sql.as_str()).len();
                    if expected != values.len() {
                        return Err(Error::arity_mismatch(expected, values.len()));
                    }
                    parts.push(sql.as_str().to_string());
                    parameters.extend(values.iter().cloned());
                }
                Condition::Eq(field, value) => {
                    engine.check_trust(field)?;
                    parts.push(format!("{} = {}", field.as_str(), MARKER));
                    parameters.push(value.clone());
                }
                Condition::IsNull(field) => {
                    engine.check_trust(field)?;
                    parts.push(format!("{} IS NULL", field.as_str()));
                }
                Condition::Group(group) => parts.push(group.build_into(engine, parameters)?),
            }
        }

        Ok(format!("({})", parts.join(self.conjunction.as_sql())))
    }
}
