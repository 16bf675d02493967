mod basic;
mod errors;

use crate::errors::Result;
use crate::grammar::Grammar;
use crate::renderer::Html;
use crate::template::Template;
use crate::value::Value;

fn render_template(content: &str, values: &[Value]) -> Result<Html> {
    Template::compile_html(content, Grammar::html())?.render(values)
}
