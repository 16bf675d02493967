/// Escape HTML following [OWASP](https://www.owasp.org/index.php/XSS_(Cross_Site_Scripting)_Prevention_Cheat_Sheet)
///
/// Escape the following characters with HTML entity encoding to prevent switching
/// into any execution context, such as script, style, or event handlers. Quotes are
/// always encoded so the same function is safe for quoted attribute values and for
/// element text.
///
/// ```text
/// & --> &amp;
/// < --> &lt;
/// > --> &gt;
/// " --> &quot;
/// ' --> &#x27;     &apos; is not recommended
/// ```
///
/// Control characters other than tab, line feed and carriage return are not allowed
/// in HTML documents and are replaced with U+FFFD.
#[inline]
pub fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len() * 2);
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            '\t' | '\n' | '\r' => output.push(c),
            _ if c.is_control() => output.push('\u{FFFD}'),
            _ => output.push(c),
        }
    }

    // Not using shrink_to_fit() on purpose
    output
}

/// Quotes a value as a single POSIX shell word.
///
/// The value is wrapped in single quotes and every embedded single quote is closed,
/// escaped and reopened, so the shell always sees exactly one argument.
pub fn escape_shell_arg(input: &str) -> String {
    let mut output = String::with_capacity(input.len() + 2);
    output.push('\'');
    for c in input.chars() {
        if c == '\'' {
            output.push_str("'\\''");
        } else {
            output.push(c);
        }
    }
    output.push('\'');
    output
}
