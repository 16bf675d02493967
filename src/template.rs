use crate::errors::{Error, Result};
use crate::grammar::Grammar;
use crate::kinds::ValueKind;
use crate::parser::ast::{Element, Node};
use crate::parser::{self, MARKER};
use crate::renderer::{self, Html};
use crate::value::Value;

/// Where a slot sits in its template
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotContext {
    /// The whole value of a quoted attribute
    Attribute {
        /// Element name
        element: String,
        /// Attribute name
        attribute: String,
    },
    /// The whole text of an element
    Text {
        /// Element name
        element: String,
    },
    /// A position in a template without structure
    Positional,
}

/// One placeholder of a compiled template
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    /// The kind values must have, `None` when only encoding applies
    pub kind: Option<ValueKind>,
    /// Where the slot is
    pub context: SlotContext,
}

/// A compiled template: literal fragments with one slot between each pair.
///
/// There is always exactly one more fragment than there are slots.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    fragments: Vec<String>,
    slots: Vec<Slot>,
}

/// A placeholder found in the markup structure
struct Found {
    offset: usize,
    element: Option<String>,
    attribute: Option<String>,
}

fn walk(nodes: &[Node], parent: Option<&Element>, grammar: &Grammar, found: &mut Vec<Found>) -> Result<()> {
    for node in nodes {
        match node {
            Node::Text(text) => {
                if text.raw.len() == MARKER.len_utf8() && text.raw.starts_with(MARKER) {
                    found.push(Found {
                        offset: text.offset,
                        element: parent.map(|p| p.name.clone()),
                        attribute: None,
                    });
                }
            }
            Node::Comment(_) => return Err(Error::disallowed_element("#comment")),
            Node::Element(element) => {
                let rule = match grammar.element(&element.name) {
                    Some(rule) => rule,
                    None => return Err(Error::disallowed_element(&element.name)),
                };

                for attr in &element.attributes {
                    if rule.attribute(&attr.name).is_none() && !attr.name.starts_with("data-") {
                        return Err(Error::disallowed_attribute(&element.name, &attr.name));
                    }

                    let is_marker = attr.raw.len() == MARKER.len_utf8() && attr.raw.starts_with(MARKER);

                    // <meta name="referrer"> would override the referrer policy of the page
                    if element.name == "meta"
                        && attr.name == "name"
                        && (is_marker || attr.value.trim().eq_ignore_ascii_case("referrer"))
                    {
                        return Err(Error::disallowed_policy_override(
                            &element.name,
                            &attr.name,
                            &attr.raw,
                        ));
                    }

                    if is_marker {
                        found.push(Found {
                            offset: attr.offset,
                            element: Some(element.name.clone()),
                            attribute: Some(attr.name.clone()),
                        });
                    }
                }

                walk(&element.children, Some(element), grammar, found)?;
            }
        }
    }

    Ok(())
}

fn resolve(slot: usize, found: Found, grammar: &Grammar) -> Result<Slot> {
    let element = match found.element {
        Some(e) => e,
        None => {
            return Err(Error::unresolved_placeholder(slot, "#document", found.attribute.as_deref()))
        }
    };

    match found.attribute {
        Some(attribute) => match grammar.attribute(&element, &attribute) {
            Some(kind) => Ok(Slot { kind: Some(kind), context: SlotContext::Attribute { element, attribute } }),
            None => Err(Error::unresolved_placeholder(slot, element, Some(&attribute))),
        },
        None if grammar.allows_text(&element) => {
            Ok(Slot { kind: Some(ValueKind::Text), context: SlotContext::Text { element } })
        }
        None => Err(Error::unresolved_placeholder(slot, element, None)),
    }
}

impl Template {
    /// Compiles markup against `grammar`.
    ///
    /// The text is scanned for markers and parsed as well-formed markup; both must
    /// find the same placeholders at the same offsets.
    pub fn compile_html(text: &str, grammar: &Grammar) -> Result<Template> {
        let offsets = parser::scan_markers(text);
        let nodes = parser::parse(text)?;

        let mut found = vec![];
        walk(&nodes, None, grammar, &mut found)?;

        if found.len() != offsets.len() || found.iter().zip(&offsets).any(|(f, o)| f.offset != *o) {
            return Err(Error::placeholder_mismatch(offsets.len(), found.len()));
        }

        let slots = found
            .into_iter()
            .enumerate()
            .map(|(k, f)| resolve(k, f, grammar))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(slots = slots.len(), "Compiled markup template");

        Ok(Template { fragments: parser::split_at_markers(text, &offsets), slots })
    }

    /// Compiles a template without structure: every marker is a slot with no kind.
    pub fn compile_plain(text: &str) -> Template {
        let offsets = parser::scan_plain_markers(text);
        let slots = offsets.iter().map(|_| Slot { kind: None, context: SlotContext::Positional }).collect();
        Template { fragments: parser::split_at_markers(text, &offsets), slots }
    }

    /// The literal fragments around the slots
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// The slots in document order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of values the template needs
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The template text with markers put back in place
    pub fn text(&self) -> String {
        self.fragments.join(&MARKER.to_string())
    }

    /// Validates and encodes `values` into the template.
    pub fn render(&self, values: &[Value]) -> Result<Html> {
        renderer::render(self, values)
    }
}
