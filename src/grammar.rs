//! The allow-list of elements and attributes templates may use.
//!
//! Anything not listed is rejected: there is no `<script>`, `<style>`, `<link>`,
//! `<object>` or `<embed>`, and no attribute that can carry script such as `style`,
//! `onload` or `dynsrc`. `<meta http-equiv>` is absent on purpose since it can
//! refresh the page or set cookies.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::kinds::ValueKind;

/// The allowed attributes of one element.
#[derive(Debug)]
pub struct ElementRule {
    /// Element name, lowercase
    pub name: &'static str,
    /// Allowed attributes and the kind of value they take
    pub attributes: &'static [(&'static str, ValueKind)],
    /// Whether a placeholder can be used as the whole text of the element
    pub text: bool,
}

impl ElementRule {
    /// The kind of `attribute` on this element, if it is allowed
    pub fn attribute(&self, attribute: &str) -> Option<ValueKind> {
        self.attributes.iter().find(|(name, _)| *name == attribute).map(|(_, kind)| *kind)
    }
}

/// A process-wide, read-only table of [`ElementRule`]s indexed by element name.
#[derive(Debug)]
pub struct Grammar {
    rules: HashMap<&'static str, &'static ElementRule>,
}

impl Grammar {
    /// Indexes `rules`, the last rule wins if an element appears twice
    pub fn new(rules: &'static [ElementRule]) -> Grammar {
        Grammar { rules: rules.iter().map(|rule| (rule.name, rule)).collect() }
    }

    /// The built-in HTML table
    pub fn html() -> &'static Grammar {
        &HTML_GRAMMAR
    }

    /// The rule for `element`, if the element is allowed
    pub fn element(&self, element: &str) -> Option<&'static ElementRule> {
        self.rules.get(element).copied()
    }

    /// Resolves the kind of an attribute value.
    ///
    /// `data-*` attributes are opaque to the engine: whatever script or CSS reads them
    /// is in charge of their content, so they are plain `Text`.
    pub fn attribute(&self, element: &str, attribute: &str) -> Option<ValueKind> {
        let rule = self.element(element)?;
        match rule.attribute(attribute) {
            Some(kind) => Some(kind),
            None if attribute.starts_with("data-") => Some(ValueKind::Text),
            None => None,
        }
    }

    /// Whether a placeholder can stand for the text content of `element`
    pub fn allows_text(&self, element: &str) -> bool {
        self.element(element).map_or(false, |rule| rule.text)
    }
}

const REF: ValueKind = ValueKind::ReferenceToken(None);
const TEXT: ValueKind = ValueKind::Text;
const INT: ValueKind = ValueKind::Integer;
const URL: ValueKind = ValueKind::Url;

const COMMON: &[(&str, ValueKind)] = &[("id", REF), ("class", REF)];
const TITLED: &[(&str, ValueKind)] = &[("id", REF), ("class", REF), ("title", TEXT)];
const CITED: &[(&str, ValueKind)] = &[("id", REF), ("class", REF), ("cite", URL)];
const BOX: &[(&str, ValueKind)] =
    &[("id", REF), ("class", REF), ("role", TEXT), ("title", TEXT), ("tabindex", INT)];

macro_rules! rule {
    (void $name:expr, $attributes:expr) => {
        ElementRule { name: $name, attributes: $attributes, text: false }
    };
    ($name:expr, $attributes:expr) => {
        ElementRule { name: $name, attributes: $attributes, text: true }
    };
}

static HTML_RULES: &[ElementRule] = &[
    rule!(void "meta", &[("name", TEXT), ("content", TEXT)]),
    rule!("div", BOX),
    rule!("span", BOX),
    rule!("h1", COMMON),
    rule!("h2", COMMON),
    rule!("h3", COMMON),
    rule!("h4", COMMON),
    rule!("h5", COMMON),
    rule!("h6", COMMON),
    rule!("p", COMMON),
    rule!("ul", COMMON),
    rule!("ol", &[("id", REF), ("class", REF), ("start", INT)]),
    rule!("li", COMMON),
    rule!("dl", COMMON),
    rule!("dt", COMMON),
    rule!("dd", COMMON),
    rule!("pre", COMMON),
    rule!("table", COMMON),
    rule!("caption", COMMON),
    rule!("thead", COMMON),
    rule!("tbody", COMMON),
    rule!("tfoot", COMMON),
    rule!("tr", COMMON),
    rule!(
        "th",
        &[("id", REF), ("class", REF), ("rowspan", INT), ("colspan", INT), ("scope", TEXT)]
    ),
    rule!("td", &[("id", REF), ("class", REF), ("rowspan", INT), ("colspan", INT)]),
    rule!("em", TITLED),
    rule!("strong", TITLED),
    rule!(void "hr", COMMON),
    rule!("sub", COMMON),
    rule!("sup", COMMON),
    rule!("abbr", &[("id", REF), ("class", REF), ("title", TEXT), ("aria-label", TEXT)]),
    rule!("cite", COMMON),
    rule!("code", COMMON),
    rule!("samp", COMMON),
    rule!("mark", COMMON),
    rule!("var", COMMON),
    rule!(void "wbr", COMMON),
    rule!("del", CITED),
    rule!("ins", CITED),
    rule!("blockquote", CITED),
    rule!("q", CITED),
    rule!(
        "a",
        &[
            ("id", REF),
            ("class", REF),
            ("href", URL),
            ("target", ValueKind::EnumeratedSet(&["_blank"])),
            ("rel", ValueKind::EnumeratedSet(&["noopener", "noreferrer", "nofollow"])),
        ]
    ),
    rule!(
        void "img",
        &[
            ("id", REF),
            ("class", REF),
            ("src", ValueKind::UrlImage),
            ("alt", TEXT),
            ("width", INT),
            ("height", INT),
        ]
    ),
    rule!("time", &[("id", REF), ("class", REF), ("datetime", ValueKind::DateTime)]),
    rule!("data", &[("id", REF), ("class", REF), ("value", TEXT)]),
    rule!("figure", COMMON),
    rule!("figcaption", COMMON),
    rule!(void "br", &[]),
];

lazy_static! {
    static ref HTML_GRAMMAR: Grammar = Grammar::new(HTML_RULES);
}
