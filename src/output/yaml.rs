//! Block-style YAML rendering of JSON values
//!
//! Strings that a YAML parser could read as anything other than the same
//! string are emitted double-quoted using JSON escaping, which YAML accepts.

use serde_json::{Map, Value};

/// Renders `value` as a YAML document
pub fn to_yaml(value: &Value) -> String {
    let mut out = String::new();
    if is_block(value) {
        write_block(&mut out, value, 0);
    } else {
        out.push_str(&scalar(value));
        out.push('\n');
    }
    out
}

/// Non-empty collections are written as indented blocks; everything else inline
fn is_block(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => false,
    }
}

fn write_block(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Array(items) => write_seq(out, items, indent),
        Value::Object(map) => write_map(out, map, indent),
        _ => {}
    }
}

fn write_map(out: &mut String, map: &Map<String, Value>, indent: usize) {
    let pad = " ".repeat(indent);
    for (key, value) in map {
        if is_block(value) {
            out.push_str(&format!("{}{}:\n", pad, quote(key)));
            write_block(out, value, indent + 2);
        } else {
            out.push_str(&format!("{}{}: {}\n", pad, quote(key), scalar(value)));
        }
    }
}

fn write_seq(out: &mut String, items: &[Value], indent: usize) {
    let pad = " ".repeat(indent);
    for item in items {
        if is_block(item) {
            // Render one level deeper, then fold the dash into the first line's indent
            let mut nested = String::new();
            write_block(&mut nested, item, indent + 2);
            out.push_str(&pad);
            out.push_str("- ");
            out.push_str(&nested[indent + 2..]);
        } else {
            out.push_str(&format!("{}- {}\n", pad, scalar(item)));
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
    }
}

fn quote(s: &str) -> String {
    if is_plain_safe(s) {
        s.to_string()
    } else {
        serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
    }
}

fn is_plain_safe(s: &str) -> bool {
    const RESERVED: &[&str] = &[
        "~", "null", "true", "false", "yes", "no", "on", "off", "y", "n",
    ];

    let Some(first) = s.chars().next() else {
        return false;
    };
    if first.is_ascii_digit() || "-?:,[]{}#&*!|>'\"%@`.+ \t".contains(first) {
        return false;
    }
    if s.ends_with(' ') || s.ends_with(':') {
        return false;
    }
    if s.contains(": ") || s.contains(" #") || s.chars().any(char::is_control) {
        return false;
    }
    !RESERVED.contains(&s.to_ascii_lowercase().as_str())
}
