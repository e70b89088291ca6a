//! Lenient reader for CommonJS / ES module config objects
//!
//! Tool configs such as `tailwind.config.js` are JavaScript, not JSON.
//! This reads the exported object literal into a `serde_json::Value`:
//! plain literals are kept, any other expression (a `require(..)` call, a
//! function, an identifier) becomes `null`. Malformed literals are errors.

use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use serde_json::{Map, Number, Value};

#[derive(Parser)]
#[grammar = "source/object_literal.pest"]
struct ObjectLiteralParser;

/// Parse the object exported by a config module
pub fn parse_exported_object(source: &str) -> Result<Value, String> {
    let start = export_start(source).ok_or_else(|| "no exported object found".to_string())?;

    let mut pairs = ObjectLiteralParser::parse(Rule::exported, &source[start..])
        .map_err(|e| describe_error(&e, &source[..start]))?;

    pairs
        .next()
        .and_then(|exported| exported.into_inner().next())
        .map(build_value)
        .ok_or_else(|| "export is not an object literal".to_string())
}

/// Byte offset just after `module.exports =` or `export default`
fn export_start(source: &str) -> Option<usize> {
    if let Some(pos) = source.find("module.exports") {
        let rest = &source[pos..];
        return rest.find('=').map(|eq| pos + eq + 1);
    }
    source
        .find("export default")
        .map(|pos| pos + "export default".len())
}

/// Position relative to the whole file, not the parsed tail
fn describe_error(error: &pest::error::Error<Rule>, prefix: &str) -> String {
    let (line, col) = match error.line_col {
        LineColLocation::Pos(pos) | LineColLocation::Span(pos, _) => pos,
    };
    let skipped_lines = prefix.matches('\n').count();
    let col = if line == 1 {
        col + prefix.len() - prefix.rfind('\n').map_or(0, |nl| nl + 1)
    } else {
        col
    };
    format!(
        "{} at line {}, column {}",
        error.variant.message(),
        line + skipped_lines,
        col
    )
}

fn build_value(pair: Pair<'_, Rule>) -> Value {
    match pair.as_rule() {
        Rule::value => pair.into_inner().next().map_or(Value::Null, build_value),
        Rule::object => {
            let mut map = Map::new();
            for member in pair.into_inner() {
                match member.as_rule() {
                    Rule::pair => {
                        let mut parts = member.into_inner();
                        let key = parts.next().and_then(key_name);
                        let value = parts.next().map_or(Value::Null, build_value);
                        if let Some(key) = key {
                            map.insert(key, value);
                        }
                    }
                    Rule::shorthand | Rule::method => {
                        if let Some(key) = member.into_inner().next().and_then(key_name) {
                            map.insert(key, Value::Null);
                        }
                    }
                    _ => {}
                }
            }
            Value::Object(map)
        }
        Rule::array => Value::Array(
            pair.into_inner()
                .filter(|element| element.as_rule() != Rule::spread)
                .map(build_value)
                .collect(),
        ),
        Rule::string => Value::String(string_content(pair)),
        Rule::number => parse_number(pair.as_str()),
        Rule::boolean => Value::Bool(pair.as_str() == "true"),
        _ => Value::Null,
    }
}

/// Property name, `None` for computed keys
fn key_name(pair: Pair<'_, Rule>) -> Option<String> {
    match pair.as_rule() {
        Rule::identifier | Rule::number => Some(pair.as_str().to_string()),
        Rule::string => Some(string_content(pair)),
        _ => None,
    }
}

fn string_content(pair: Pair<'_, Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|chars| unescape(chars.as_str()))
        .unwrap_or_default()
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn parse_number(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        return Value::Number(i.into());
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}
