use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use lazy_static::lazy_static;
use serde::Deserialize;

use crate::command::{self, RenderedCommand};
use crate::errors::{Error, Result};
use crate::grammar::Grammar;
use crate::renderer::Html;
use crate::sql::{self, RenderedQuery};
use crate::template::Template;
use crate::trust::{self, LiteralsOnly, Protection, Source, TrustGate};
use crate::value::Value;

lazy_static! {
    static ref DEFAULT_ENGINE: Engine = Engine::new();
}

/// Settings of an [`Engine`], deserializable from any serde format
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What happens to runtime text the trust gate refuses
    pub protection: Protection,
    /// Whether compiled markup templates are kept, keyed by their text
    pub cache_templates: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config { protection: Protection::default(), cache_templates: true }
    }
}

impl Config {
    /// Reads a config from JSON, missing fields keep their default
    pub fn from_json(text: &str) -> Result<Config> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::chain(format!("Couldn't read config file `{}`", path.display()), e)
        })?;
        Config::from_json(&text)
    }
}

/// Main point of interaction in this library.
///
/// An `Engine` holds the trust gate, the protection level, the allow-list grammar
/// and a cache of compiled markup templates. It is `Send + Sync` and meant to be
/// shared.
///
/// ```
/// use trusted_templates::{values, Engine};
///
/// let engine = Engine::new();
/// let html = engine.html(r#"<a href="?">?</a>"#, &values!["/example/", "My Profile"]).unwrap();
/// assert_eq!(html, r#"<a href="/example/">My Profile</a>"#);
/// ```
pub struct Engine {
    config: Config,
    gate: Box<dyn TrustGate>,
    grammar: &'static Grammar,
    cache: Mutex<HashMap<String, Arc<Template>>>,
}

impl Engine {
    /// An engine with the default config, the built-in HTML grammar and a gate that
    /// only trusts string literals
    pub fn new() -> Engine {
        Engine::with_config(Config::default())
    }

    /// An engine using `config`
    pub fn with_config(config: Config) -> Engine {
        Engine {
            config,
            gate: Box::new(LiteralsOnly),
            grammar: Grammar::html(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces the allow-list grammar. The cache is emptied since the same text can
    /// compile differently.
    pub fn with_grammar(mut self, grammar: &'static Grammar) -> Engine {
        self.grammar = grammar;
        self.clear_cache();
        self
    }

    /// Sets what happens when the trust gate refuses some text
    pub fn set_protection(&mut self, protection: Protection) {
        self.config.protection = protection;
    }

    /// Replaces the trust gate, closures taking a `&str` work.
    ///
    /// ```
    /// use trusted_templates::{Engine, Protection};
    ///
    /// let mut engine = Engine::new();
    /// engine.set_protection(Protection::Fail);
    /// engine.set_trust_gate(|text: &str| text.starts_with("<p"));
    /// assert!(engine.compile_html(String::from("<p>?</p>")).is_ok());
    /// assert!(engine.compile_html(String::from("<b>?</b>")).is_err());
    /// ```
    pub fn set_trust_gate(&mut self, gate: impl TrustGate + 'static) {
        self.gate = Box::new(gate);
    }

    /// The current config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether `source` is trusted, or an error when the protection level refuses it
    pub(crate) fn check_trust(&self, source: &Source<'_>) -> Result<bool> {
        trust::check(source, &*self.gate, self.config.protection)
    }

    /// Compiles markup, or gets it from the cache.
    ///
    /// Only trusted text is cached: runtime text that was merely tolerated, or passed
    /// as an [`UnsafeValue`](crate::UnsafeValue), is compiled on every call.
    pub fn compile_html<'a>(&self, source: impl Into<Source<'a>>) -> Result<Arc<Template>> {
        let source = source.into();
        let cacheable = self.check_trust(&source)? && self.config.cache_templates;
        let text = source.as_str();

        if cacheable {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(template) = cache.get(text) {
                tracing::debug!(len = text.len(), "Template cache hit");
                return Ok(Arc::clone(template));
            }
        }

        // Compiling twice in a race is harmless, the first one in stays
        let template = Arc::new(Template::compile_html(text, self.grammar)?);

        if cacheable {
            tracing::debug!(len = text.len(), "Template cache miss");
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            return Ok(Arc::clone(cache.entry(text.to_string()).or_insert(template)));
        }

        Ok(template)
    }

    /// Compiles and renders markup
    pub fn html<'a>(&self, source: impl Into<Source<'a>>, values: &[Value]) -> Result<Html> {
        self.compile_html(source)?.render(values)
    }

    /// A template without structure, every `?` is a text slot
    pub fn plain<'a>(&self, source: impl Into<Source<'a>>, values: &[Value]) -> Result<Html> {
        let source = source.into();
        self.check_trust(&source)?;
        Template::compile_plain(source.as_str()).render(values)
    }

    /// A parameterised query: values are kept apart from the SQL text and `{name}`
    /// aliases are replaced by back-ticked identifiers.
    ///
    /// ```
    /// use trusted_templates::{values, Engine};
    ///
    /// let engine = Engine::new();
    /// let query = engine
    ///     .query("SELECT {field} FROM user WHERE id = ?", values![123], &[("field", "email")])
    ///     .unwrap();
    /// assert_eq!(query.sql(), "SELECT `email` FROM user WHERE id = ?");
    /// ```
    pub fn query<'a>(
        &self,
        source: impl Into<Source<'a>>,
        parameters: Vec<Value>,
        aliases: &[(&str, &str)],
    ) -> Result<RenderedQuery> {
        let source = source.into();
        self.check_trust(&source)?;
        sql::render_query(source.as_str(), parameters, aliases)
    }

    /// A command whose `?` are each filled inside a single argument
    pub fn command<'a>(&self, source: impl Into<Source<'a>>, args: &[Value]) -> Result<RenderedCommand> {
        let source = source.into();
        self.check_trust(&source)?;
        command::render_command(source.as_str(), args)
    }

    /// Empties the template cache
    pub fn clear_cache(&self) {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Number of cached templates
    pub fn cached_count(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("cached", &self.cached_count())
            .finish()
    }
}

/// Renders markup with a process-wide default engine
pub fn ht<'a>(source: impl Into<Source<'a>>, values: &[Value]) -> Result<Html> {
    DEFAULT_ENGINE.html(source, values)
}
