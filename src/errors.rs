use std::convert::Into;
use std::error::Error as StdError;
use std::fmt;

/// The kind of an error (non-exhaustive)
#[non_exhaustive]
#[allow(clippy::large_enum_variant)]
#[derive(Debug)]
pub enum ErrorKind {
    /// Generic error
    Msg(String),
    /// The template text did not pass the trust gate
    UntrustedTemplate,
    /// The markup is not well-formed
    MalformedStructure {
        /// 1-based line of the problem
        line: usize,
        /// 1-based column of the problem
        column: usize,
        /// What went wrong
        message: String,
    },
    /// An element that is not in the allow-list grammar
    DisallowedElement(String),
    /// An attribute that is not allowed on its element
    DisallowedAttribute {
        /// The element carrying the attribute
        element: String,
        /// The rejected attribute
        attribute: String,
    },
    /// An attribute value that would override a document policy, eg `<meta name="referrer">`
    DisallowedPolicyOverride {
        /// The element carrying the attribute
        element: String,
        /// The attribute name
        attribute: String,
        /// The rejected value
        value: String,
    },
    /// A placeholder sits somewhere the grammar has no value-kind for
    UnresolvedPlaceholder {
        /// 0-based slot index
        slot: usize,
        /// The element holding the placeholder
        element: String,
        /// The attribute holding the placeholder, `None` for element text
        attribute: Option<String>,
    },
    /// The lexical placeholder scan and the structural walk disagree
    PlaceholderMismatch {
        /// Markers found by the lexical scan
        scanned: usize,
        /// Placeholders found by the structural walk
        structural: usize,
    },
    /// A value was rejected by the validator of its slot
    ValueKindMismatch {
        /// 0-based slot index
        slot: usize,
        /// Name of the expected value-kind
        kind: String,
        /// Why the value was rejected
        reason: String,
    },
    /// Wrong number of values for a template
    ArityMismatch {
        /// Number of slots in the template
        expected: usize,
        /// Number of values given
        actual: usize,
    },
    /// A url scheme outside of the allowed set
    InvalidScheme(String),
    /// A url path that cannot be built
    InvalidPath(String),
    /// A SQL alias name or value that isn't a plain identifier
    InvalidAlias(String),
    /// An error while converting a JSON value
    Json(serde_json::Error),
}

/// The Error type
#[derive(Debug)]
pub struct Error {
    /// Kind of error
    pub kind: ErrorKind,
    source: Option<Box<dyn StdError + Sync + Send>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Msg(ref message) => write!(f, "{}", message),
            ErrorKind::UntrustedTemplate => {
                write!(f, "Template text did not come from a trusted source")
            }
            ErrorKind::MalformedStructure { line, column, ref message } => write!(
                f,
                "Templates must be well-formed markup ({}:{}): {}",
                line, column, message
            ),
            ErrorKind::DisallowedElement(ref name) => {
                write!(f, "Templates cannot use <{}>", name)
            }
            ErrorKind::DisallowedAttribute { ref element, ref attribute } => write!(
                f,
                "Templates cannot use the `{}` attribute in <{}>",
                attribute, element
            ),
            ErrorKind::DisallowedPolicyOverride { ref element, ref attribute, ref value } => {
                write!(
                    f,
                    "Templates cannot set the `{}` attribute of <{}> to `{}`",
                    attribute, element, value
                )
            }
            ErrorKind::UnresolvedPlaceholder { slot, ref element, attribute: Some(ref attr) } => {
                write!(
                    f,
                    "Placeholder {} is for unrecognised element `{}` and attribute `{}`",
                    slot + 1,
                    element,
                    attr
                )
            }
            ErrorKind::UnresolvedPlaceholder { slot, ref element, attribute: None } => write!(
                f,
                "Placeholder {} is for the text of unrecognised element `{}`",
                slot + 1,
                element
            ),
            ErrorKind::PlaceholderMismatch { scanned, structural } => write!(
                f,
                "Found {} placeholder markers in the text but {} in the markup structure",
                scanned, structural
            ),
            ErrorKind::ValueKindMismatch { slot, ref kind, ref reason } => {
                write!(f, "Parameter {} should be {}: {}", slot + 1, kind, reason)
            }
            ErrorKind::ArityMismatch { expected, actual } if actual < expected => {
                write!(f, "Missing parameter {} (expected {}, got {})", actual + 1, expected, actual)
            }
            ErrorKind::ArityMismatch { expected, actual } => {
                write!(f, "Extra parameter {} (expected {}, got {})", expected + 1, expected, actual)
            }
            ErrorKind::InvalidScheme(ref scheme) => write!(f, "Invalid scheme `{}`", scheme),
            ErrorKind::InvalidPath(ref message) => write!(f, "Invalid url path: {}", message),
            ErrorKind::InvalidAlias(ref alias) => write!(f, "Invalid alias `{}`", alias),
            ErrorKind::Json(ref e) => write!(f, "{}", e),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|c| &**c as &(dyn StdError + 'static))
    }
}

impl Error {
    /// Creates generic error
    pub fn msg(value: impl ToString) -> Self {
        Self { kind: ErrorKind::Msg(value.to_string()), source: None }
    }

    /// Creates generic error with a source
    pub fn chain(value: impl ToString, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self { kind: ErrorKind::Msg(value.to_string()), source: Some(source.into()) }
    }

    /// Creates an error from a kind, without a source
    pub(crate) fn from_kind(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Creates an untrusted template error
    pub fn untrusted_template() -> Self {
        Self::from_kind(ErrorKind::UntrustedTemplate)
    }

    /// Creates a malformed structure error, keeping the parser error as source
    pub fn malformed(
        line: usize,
        column: usize,
        message: impl ToString,
        source: Option<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            kind: ErrorKind::MalformedStructure { line, column, message: message.to_string() },
            source,
        }
    }

    /// Creates a disallowed element error
    pub fn disallowed_element(name: impl ToString) -> Self {
        Self::from_kind(ErrorKind::DisallowedElement(name.to_string()))
    }

    /// Creates a disallowed attribute error
    pub fn disallowed_attribute(element: impl ToString, attribute: impl ToString) -> Self {
        Self::from_kind(ErrorKind::DisallowedAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        })
    }

    /// Creates a policy override error
    pub fn disallowed_policy_override(
        element: impl ToString,
        attribute: impl ToString,
        value: impl ToString,
    ) -> Self {
        Self::from_kind(ErrorKind::DisallowedPolicyOverride {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        })
    }

    /// Creates an unresolved placeholder error
    pub fn unresolved_placeholder(
        slot: usize,
        element: impl ToString,
        attribute: Option<&str>,
    ) -> Self {
        Self::from_kind(ErrorKind::UnresolvedPlaceholder {
            slot,
            element: element.to_string(),
            attribute: attribute.map(ToString::to_string),
        })
    }

    /// Creates a placeholder mismatch error
    pub fn placeholder_mismatch(scanned: usize, structural: usize) -> Self {
        Self::from_kind(ErrorKind::PlaceholderMismatch { scanned, structural })
    }

    /// Creates a value-kind mismatch error
    pub fn value_kind_mismatch(slot: usize, kind: impl ToString, reason: impl ToString) -> Self {
        Self::from_kind(ErrorKind::ValueKindMismatch {
            slot,
            kind: kind.to_string(),
            reason: reason.to_string(),
        })
    }

    /// Creates an arity mismatch error
    pub fn arity_mismatch(expected: usize, actual: usize) -> Self {
        Self::from_kind(ErrorKind::ArityMismatch { expected, actual })
    }

    /// Creates an invalid scheme error
    pub fn invalid_scheme(scheme: impl ToString) -> Self {
        Self::from_kind(ErrorKind::InvalidScheme(scheme.to_string()))
    }

    /// Creates an invalid path error
    pub fn invalid_path(message: impl ToString) -> Self {
        Self::from_kind(ErrorKind::InvalidPath(message.to_string()))
    }

    /// Creates an invalid alias error
    pub fn invalid_alias(alias: impl ToString) -> Self {
        Self::from_kind(ErrorKind::InvalidAlias(alias.to_string()))
    }

    /// Creates JSON error
    pub fn json(value: serde_json::Error) -> Self {
        Self { kind: ErrorKind::Json(value), source: None }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::json(e)
    }
}

/// Convenient wrapper around std::Result.
pub type Result<T> = ::std::result::Result<T, Error>;
