//! Commands with their arguments kept apart from the command text.

use std::process::Command;

use crate::errors::{Error, Result};
use crate::parser::{scan_plain_markers, split_at_markers};
use crate::utils::escape_shell_arg;
use crate::value::Value;

/// A command ready to run.
///
/// Each `?` of the command text was filled inside its own argument: a value can
/// never add arguments, redirections or pipes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedCommand {
    argv: Vec<String>,
    shell_line: String,
}

impl RenderedCommand {
    /// The program followed by its arguments
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The program to run
    pub fn program(&self) -> &str {
        // there is always a program, see `render_command`
        &self.argv[0]
    }

    /// The command as a line for `sh -c`, every value single-quoted.
    ///
    /// The text around the values keeps its meaning for the shell, pipes included.
    pub fn shell_line(&self) -> &str {
        &self.shell_line
    }

    /// A `std::process::Command` for the program and its arguments, not spawned
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.argv[0]);
        command.args(&self.argv[1..]);
        command
    }
}

/// Fills `text`, which already went through the trust gate, with `args`.
pub(crate) fn render_command(text: &str, args: &[Value]) -> Result<RenderedCommand> {
    let expected = scan_plain_markers(text).len();
    if expected != args.len() {
        return Err(Error::arity_mismatch(expected, args.len()));
    }

    match text.split_whitespace().next() {
        None => return Err(Error::msg("A command needs a program to run")),
        Some(program) if !scan_plain_markers(program).is_empty() => {
            return Err(Error::msg(format!("The program `{}` can't take a value", program)))
        }
        Some(_) => (),
    }

    let mut values = args.iter().map(ToString::to_string);
    let mut argv = vec![];
    for token in text.split_whitespace() {
        let offsets = scan_plain_markers(token);
        let fragments = split_at_markers(token, &offsets);
        let mut arg = String::with_capacity(token.len());
        for (k, fragment) in fragments.iter().enumerate() {
            arg.push_str(fragment);
            if k < offsets.len() {
                // same count as the markers, checked above
                arg.push_str(&values.next().unwrap_or_default());
            }
        }
        argv.push(arg);
    }

    let offsets = scan_plain_markers(text);
    let fragments = split_at_markers(text, &offsets);
    let mut shell_line = String::with_capacity(text.len());
    for (fragment, value) in fragments.iter().zip(args) {
        shell_line.push_str(fragment);
        shell_line.push_str(&escape_shell_arg(&value.to_string()));
    }
    if let Some(last) = fragments.last() {
        shell_line.push_str(last);
    }

    tracing::trace!(arguments = argv.len() - 1, "Rendered command");

    Ok(RenderedCommand { argv, shell_line })
}
