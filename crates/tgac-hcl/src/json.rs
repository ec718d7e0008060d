//! HCL JSON support.
//!
//! `hcl-rs` only parses the native syntax, so JSON documents are rendered
//! into equivalent native source and parsed from there. HCL JSON needs a
//! schema to tell blocks from attributes; [`BLOCK_SCHEMA`] lists the block
//! types tgac reads and how many labels each carries. Top-level keys outside
//! the schema are dropped.
//!
//! JSON strings are HCL templates, and a native quoted string is a template
//! too, so strings are rendered as quoted literals and keep their `${...}`
//! interpolations.

use serde_json::{Map, Value};

use crate::BARE_INCLUDE_LABEL;

/// Block types read from JSON documents, with their label counts.
pub(crate) const BLOCK_SCHEMA: &[(&str, usize)] = &[
    ("include", 1),
    ("locals", 0),
    ("dependency", 1),
    ("dependencies", 0),
    ("terraform", 0),
    ("module", 1),
];

/// Render a parsed HCL JSON document as native HCL source.
pub(crate) fn to_native_source(document: &Value) -> Result<String, String> {
    let Value::Object(root) = document else {
        return Err("an HCL JSON document must be an object".to_string());
    };

    let mut out = String::new();
    for (key, value) in root {
        let Some((_, label_count)) = BLOCK_SCHEMA.iter().find(|(ty, _)| ty == key) else {
            continue;
        };
        if key == "include" && is_bare_include(value) {
            // `"include": {"path": "..."}` carries no label
            render_block(&mut out, key, &[BARE_INCLUDE_LABEL.to_string()], value)?;
            continue;
        }
        let mut labels = Vec::with_capacity(*label_count);
        render_blocks(&mut out, key, *label_count, &mut labels, value)?;
    }
    Ok(out)
}

fn is_bare_include(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|body| body.get("path"))
        .is_some_and(|path| !path.is_object())
}

fn render_blocks(
    out: &mut String,
    ty: &str,
    remaining: usize,
    labels: &mut Vec<String>,
    value: &Value,
) -> Result<(), String> {
    match (remaining, value) {
        (_, Value::Array(items)) => {
            for item in items {
                render_blocks(out, ty, remaining, labels, item)?;
            }
            Ok(())
        }
        (0, body) => render_block(out, ty, labels, body),
        (_, Value::Object(map)) => {
            for (label, nested) in map {
                labels.push(label.clone());
                render_blocks(out, ty, remaining - 1, labels, nested)?;
                labels.pop();
            }
            Ok(())
        }
        _ => Err(format!("`{ty}` must be an object keyed by block label")),
    }
}

fn render_block(out: &mut String, ty: &str, labels: &[String], body: &Value) -> Result<(), String> {
    let Value::Object(attributes) = body else {
        return Err(format!("the body of a `{ty}` block must be an object"));
    };

    out.push_str(ty);
    for label in labels {
        out.push(' ');
        push_quoted(out, label);
    }
    out.push_str(" {\n");
    render_attributes(out, attributes)?;
    out.push_str("}\n");
    Ok(())
}

fn render_attributes(out: &mut String, attributes: &Map<String, Value>) -> Result<(), String> {
    for (key, value) in attributes {
        // HCL JSON treats "//" properties as comments
        if key == "//" {
            continue;
        }
        if !is_identifier(key) {
            return Err(format!("{key:?} is not a valid attribute name"));
        }
        out.push_str("  ");
        out.push_str(key);
        out.push_str(" = ");
        render_expression(out, value);
        out.push('\n');
    }
    Ok(())
}

fn render_expression(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => push_quoted(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_expression(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                push_quoted(out, key);
                out.push_str(" = ");
                render_expression(out, item);
            }
            out.push('}');
        }
    }
}

/// Push `s` as a native HCL quoted string.
fn push_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}
