#![doc(html_root_url = "https://docs.rs/trusted-templates")]
//! # Trusted Templates
//!
//! Injection-safe templates built from developer-authored text.
//!
//! A template is written by the developer, in the program source, with `?` standing
//! for each value. The text is compiled once into literal fragments and typed slots,
//! and values are only ever validated and encoded into those slots: they can't add
//! an element, an attribute, a SQL clause or a shell argument.
//!
//! ## Features
//!
//! - HTML templates checked against an allow-list of elements and attributes
//! - Slot kinds inferred from the markup (`href` takes a url, `width` an integer...)
//! - A url builder whose output `url` slots accept as is
//! - Parameterised SQL queries and a `WHERE` clause builder
//! - Commands whose values stay single arguments
//! - A pluggable trust gate deciding what runtime text may be used as a template
//!
//! ## Example
//!
//! ```rust
//! use trusted_templates::{values, Engine, Url};
//!
//! let engine = Engine::new();
//!
//! let mut profile = Url::new("/user/:id/");
//! profile.param_set("id", 42);
//!
//! let html = engine
//!     .html(r#"<a href="?" class="?">?</a>"#, &values![profile.get().unwrap(), "nav", "<My Profile>"])
//!     .unwrap();
//! assert_eq!(html, r#"<a href="/user/42/" class="nav">&lt;My Profile&gt;</a>"#);
//!
//! // Values can't change the structure, an absolute url has to go through `Url`
//! assert!(engine.html(r#"<a href="?">?</a>"#, &values!["javascript:alert(1)", "x"]).is_err());
//! ```
//!
//! ## Getting Started
//!
//! Add the following to your Cargo.toml file:
//!
//! ```toml
//! [dependencies]
//! trusted-templates = "0.3"
//! ```

#![deny(missing_docs)]

mod command;
mod engine;
mod errors;
mod grammar;
mod kinds;
mod parser;
mod renderer;
mod sql;
mod template;
mod trust;
mod url;
mod utils;
mod value;

// Library exports.

pub use crate::command::RenderedCommand;
pub use crate::engine::{ht, Config, Engine};
pub use crate::errors::{Error, ErrorKind, Result};
pub use crate::grammar::{ElementRule, Grammar};
pub use crate::kinds::{Rejection, ValueKind};
pub use crate::renderer::Html;
pub use crate::sql::{placeholders, Conditions, Conjunction, RenderedQuery};
pub use crate::template::{Slot, SlotContext, Template};
pub use crate::trust::{LiteralsOnly, Protection, Source, TrustGate, UnsafeValue};
pub use crate::url::{http_url, Format, Param, Params, RenderedUrl, Url, DEFAULT_SCHEMES};
pub use crate::utils::{escape_html, escape_shell_arg};
pub use crate::value::{DataUrl, Value};

// Exposes the markup AST if one needs it but changing the AST is not considered
// a breaking change so it isn't public
#[doc(hidden)]
pub use crate::parser::ast;
