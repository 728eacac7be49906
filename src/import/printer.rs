//! Renders canonical records as kennel declarations.
//!
//! Output is deterministic: keys follow [`SORT_ORDER`] and then sort
//! alphabetically, so repeated imports of unchanged resources diff cleanly.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::error::ImportResult;
use super::normalizer::TITLE_FIELDS;
use crate::models::{ModelDescriptor, Record};

/// Keys that lead every declaration, in this order
pub const SORT_ORDER: [&str; 11] = [
    TITLE_FIELDS[0],
    TITLE_FIELDS[1],
    TITLE_FIELDS[2],
    "id",
    "kennel_id",
    "type",
    "tags",
    "query",
    "message",
    "description",
    "template_variables",
];

/// Field rendered as a heredoc instead of a quoted string
const MESSAGE_FIELD: &str = "message";

lazy_static! {
    static ref JSON_NULL: Regex = Regex::new(r#"(?m)^(\s*(?:"(?:[^"\\]|\\.)*": )?)null(,?)$"#)
        .expect("Invalid null pattern regex");
    static ref JSON_SYMBOL_KEY: Regex = Regex::new(r#"(?m)^(\s*)"([a-zA-Z][a-zA-Z\d_]*)":"#)
        .expect("Invalid key pattern regex");
}

/// Render a full declaration: `Model.new(self, key: -> { value }, ...)`
pub fn render_declaration(model: &ModelDescriptor, record: &Record) -> ImportResult<String> {
    let fields = render_fields(record)?;
    Ok(format!(
        "{}.new(\n  self,\n  {}\n)\n",
        model.name,
        fields.trim_start()
    ))
}

/// Render every field as `  key: -> { value }`, joined with `,\n`
pub fn render_fields(record: &Record) -> ImportResult<String> {
    let mut entries: Vec<(&String, &Value)> = record.iter().collect();
    entries.sort_by(|(a, _), (b, _)| sort_rank(a).cmp(&sort_rank(b)).then_with(|| a.cmp(b)));

    let mut lines = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        lines.push(format!("  {}: -> {{{}}}", key, render_value(key, value)?));
    }

    Ok(lines.join(",\n"))
}

fn sort_rank(key: &str) -> usize {
    SORT_ORDER
        .iter()
        .position(|k| *k == key)
        .unwrap_or(SORT_ORDER.len())
}

fn render_value(key: &str, value: &Value) -> ImportResult<String> {
    match value {
        Value::Object(_) => render_block(value),
        Value::Array(items) if !items.iter().all(Value::is_string) => render_block(value),
        Value::String(text) if key == MESSAGE_FIELD => Ok(render_heredoc(text)),
        _ => Ok(format!(" {} ", ruby_literal(value))),
    }
}

/// Nested structures become an indented hash/array literal
fn render_block(value: &Value) -> ImportResult<String> {
    let json = serde_json::to_string_pretty(value)?;
    let json = JSON_NULL.replace_all(&json, "${1}nil${2}");
    let json = JSON_SYMBOL_KEY.replace_all(&json, "${1}${2}:");

    let indented = json
        .lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!("\n{}\n  ", indented))
}

/// Multi-line text keeps its layout; blank lines stay blank
fn render_heredoc(text: &str) -> String {
    let delimiter = heredoc_delimiter(text);
    let body: String = text
        .split_inclusive('\n')
        .map(|line| {
            if line.trim().is_empty() {
                "\n".to_string()
            } else {
                format!("      {}", line)
            }
        })
        .collect();

    format!("\n    <<~{0}\n{1}\n    {0}\n  ", delimiter, body)
}

/// `TEXT`, suffixed with underscores until no line of `text` would close the heredoc
fn heredoc_delimiter(text: &str) -> String {
    let mut delimiter = String::from("TEXT");
    while text.lines().any(|line| line.trim() == delimiter) {
        delimiter.push('_');
    }
    delimiter
}

/// Inline ruby literal for scalars and string arrays
fn ruby_literal(value: &Value) -> String {
    match value {
        Value::Null => "nil".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => ruby_string(text),
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(ruby_literal).collect::<Vec<_>>().join(", ")
        ),
        Value::Object(_) => value.to_string(),
    }
}

/// Double-quoted ruby string. `#{...}` is left unescaped so threshold
/// references written by the normalizer stay live interpolations.
fn ruby_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');

    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            '\u{1b}' => quoted.push_str("\\e"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04X}", c as u32)),
            c => quoted.push(c),
        }
    }

    quoted.push('"');
    quoted
}
