/// An attribute of an element, with its value as written and decoded
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    /// Attribute name
    pub name: String,
    /// The value between the quotes, entities left untouched
    pub raw: String,
    /// The value with entity and character references decoded
    pub value: String,
    /// Byte offset of the first character of the value in the template
    pub offset: usize,
}

/// A text node
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    /// The text as written
    pub raw: String,
    /// Byte offset of the first character in the template
    pub offset: usize,
}

/// An element and everything below it
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Element name
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<Attribute>,
    /// Child nodes in document order
    pub children: Vec<Node>,
    /// 1-based line and column of the `<`
    pub position: (usize, usize),
}

/// All Markup nodes
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// `<name attr="value">...</name>` or `<name />`
    Element(Element),
    /// Text between tags
    Text(Text),
    /// `<!-- ... -->`, 1-based line and column of the opening
    Comment((usize, usize)),
}
