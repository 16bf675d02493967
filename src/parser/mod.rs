use std::collections::HashSet;

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::errors::{Error, Result};

// This include forces recompiling this source file if the grammar file changes.
// Uncomment it when doing changes to the .pest file
const _GRAMMAR: &str = include_str!("markup.pest");

#[derive(Parser)]
#[grammar = "parser/markup.pest"]
pub struct MarkupParser;

/// The AST of a markup template
pub mod ast;
mod scan;

#[cfg(test)]
mod tests;

use self::ast::*;
pub use self::scan::{scan_markers, scan_plain_markers, split_at_markers};

/// The character standing for a value in every kind of template
pub const MARKER: char = '?';

fn line_col(pair: &Pair<Rule>) -> (usize, usize) {
    pair.as_span().start_pos().line_col()
}

/// Decodes the XML entities and character references the grammar lets through
fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('&') {
        output.push_str(&rest[..start]);
        // the grammar guarantees a `;` after every `&`
        let end = rest[start..].find(';').map_or(rest.len(), |i| start + i);
        let entity = &rest[start + 1..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ if entity.starts_with("#x") => {
                u32::from_str_radix(&entity[2..], 16).ok().and_then(std::char::from_u32)
            }
            _ if entity.starts_with('#') => {
                entity[1..].parse::<u32>().ok().and_then(std::char::from_u32)
            }
            _ => None,
        };
        output.push(decoded.unwrap_or('\u{FFFD}'));
        rest = &rest[(end + 1).min(rest.len())..];
    }
    output.push_str(rest);
    output
}

fn parse_attribute(pair: Pair<Rule>) -> Attribute {
    let mut name = String::new();
    let mut raw = String::new();
    let mut offset = 0;

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::name => name = p.as_str().to_string(),
            Rule::double_quoted | Rule::single_quoted => {
                raw = p.as_str().to_string();
                offset = p.as_span().start();
            }
            _ => unreachable!("{:?} not supposed to get there (parse_attribute)!", p.as_rule()),
        }
    }

    let value = decode_entities(&raw);
    Attribute { name, raw, value, offset }
}

fn parse_element(pair: Pair<Rule>) -> Result<Element> {
    let position = line_col(&pair);
    let mut name = String::new();
    let mut attributes: Vec<Attribute> = vec![];
    let mut seen = HashSet::new();
    let mut children = vec![];

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::name => name = p.as_str().to_string(),
            Rule::attribute => {
                let (line, column) = line_col(&p);
                let attribute = parse_attribute(p);
                if !seen.insert(attribute.name.clone()) {
                    return Err(Error::malformed(
                        line,
                        column,
                        format!("attribute `{}` is redefined in <{}>", attribute.name, name),
                        None,
                    ));
                }
                attributes.push(attribute);
            }
            Rule::self_closing => (),
            Rule::end_tag => {
                let (line, column) = line_col(&p);
                let closing = p.into_inner().next().map(|n| n.as_str()).unwrap_or_default();
                if closing != name {
                    return Err(Error::malformed(
                        line,
                        column,
                        format!("closing tag </{}> does not match <{}>", closing, name),
                        None,
                    ));
                }
            }
            _ => children.push(parse_node(p)?),
        }
    }

    Ok(Element { name, attributes, children, position })
}

fn parse_node(pair: Pair<Rule>) -> Result<Node> {
    match pair.as_rule() {
        Rule::element => Ok(Node::Element(parse_element(pair)?)),
        Rule::text => {
            Ok(Node::Text(Text { raw: pair.as_str().to_string(), offset: pair.as_span().start() }))
        }
        Rule::comment => Ok(Node::Comment(line_col(&pair))),
        _ => unreachable!("unexpected node: {:?}", pair.as_rule()),
    }
}

/// Parses `input` as well-formed markup.
///
/// Anything a strict XML parser would reject is a `MalformedStructure` error:
/// unquoted or repeated attributes, unclosed or mismatched tags, stray `<` and `&`.
pub fn parse(input: &str) -> Result<Vec<Node>> {
    let mut pairs = match MarkupParser::parse(Rule::document, input) {
        Ok(p) => p,
        Err(e) => {
            let fancy_e = e.renamed_rules(|rule| {
                match *rule {
                    Rule::EOI => "end of input",
                    Rule::name => "a name",
                    Rule::text => "some text",
                    Rule::attribute => "an attribute",
                    Rule::double_quoted | Rule::single_quoted => "an attribute value",
                    Rule::self_closing => "`/>`",
                    Rule::end_tag => "a closing tag",
                    Rule::element => "an element",
                    Rule::comment => "a comment",
                    Rule::document => "a document",
                    Rule::node => "an element or some text",
                    Rule::entity => "an entity reference (eg `&amp;`)",
                    Rule::ws => "whitespace",
                }
                .to_string()
            });
            let (line, column) = match fancy_e.line_col {
                pest::error::LineColLocation::Pos(pos) => pos,
                pest::error::LineColLocation::Span(start, _) => start,
            };
            let message = fancy_e.variant.message().to_string();
            return Err(Error::malformed(line, column, message, Some(Box::new(fancy_e))));
        }
    };

    let mut nodes = vec![];
    // We must have at least a `document` pair if we got there
    for p in pairs.next().unwrap().into_inner() {
        match p.as_rule() {
            Rule::EOI => (),
            _ => nodes.push(parse_node(p)?),
        }
    }

    Ok(nodes)
}
