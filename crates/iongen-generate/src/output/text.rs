use std::io::{self, Write};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::SecondsFormat;

use iongen_core::{Element, Value};

use crate::output::Encoder;

/// Ion text encoding, one top-level value per line.
#[derive(Debug, Default)]
pub struct TextEncoder;

impl Encoder for TextEncoder {
    fn encode(&self, element: &Element, out: &mut dyn Write) -> io::Result<()> {
        let mut rendered = String::new();
        render(element, &mut rendered);
        rendered.push('\n');
        out.write_all(rendered.as_bytes())
    }
}

fn render(element: &Element, out: &mut String) {
    for annotation in &element.annotations {
        render_symbol(annotation, out);
        out.push_str("::");
    }
    match &element.value {
        Value::Null => out.push_str("null"),
        Value::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
        Value::Int(value) => out.push_str(&value.to_string()),
        Value::Float(value) => render_float(*value, out),
        Value::Decimal(value) => {
            out.push_str(&format!("{}d{}", value.coefficient, value.exponent));
        }
        Value::Timestamp(value) => {
            out.push_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        Value::String(value) => render_string(value, out),
        Value::Symbol(value) => render_symbol(value, out),
        Value::Blob(bytes) => {
            out.push_str("{{");
            out.push_str(&STANDARD.encode(bytes));
            out.push_str("}}");
        }
        Value::Clob(bytes) => {
            out.push_str("{{\"");
            for byte in bytes {
                render_clob_byte(*byte, out);
            }
            out.push_str("\"}}");
        }
        Value::List(items) => render_sequence(items, '[', ']', ", ", out),
        Value::Sexp(items) => render_sequence(items, '(', ')', " ", out),
        Value::Struct(fields) => {
            out.push('{');
            for (index, (name, value)) in fields.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                render_symbol(name, out);
                out.push_str(": ");
                render(value, out);
            }
            out.push('}');
        }
    }
}

fn render_sequence(items: &[Element], open: char, close: char, separator: &str, out: &mut String) {
    out.push(open);
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            out.push_str(separator);
        }
        render(item, out);
    }
    out.push(close);
}

/// Floats always carry an exponent so they stay distinct from decimals in
/// the text form.
fn render_float(value: f64, out: &mut String) {
    if value.is_nan() {
        out.push_str("nan");
    } else if value.is_infinite() {
        out.push_str(if value > 0.0 { "+inf" } else { "-inf" });
    } else {
        out.push_str(&format!("{value:e}"));
    }
}

fn render_string(value: &str, out: &mut String) {
    out.push('"');
    for ch in value.chars() {
        escape_char(ch, '"', out);
    }
    out.push('"');
}

fn render_symbol(value: &str, out: &mut String) {
    if is_identifier(value) {
        out.push_str(value);
    } else {
        out.push('\'');
        for ch in value.chars() {
            escape_char(ch, '\'', out);
        }
        out.push('\'');
    }
}

fn render_clob_byte(byte: u8, out: &mut String) {
    match byte {
        b'"' => out.push_str("\\\""),
        b'\\' => out.push_str("\\\\"),
        0x20..=0x7e => out.push(byte as char),
        other => out.push_str(&format!("\\x{other:02x}")),
    }
}

fn escape_char(ch: char, quote: char, out: &mut String) {
    match ch {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        ch if ch == quote => {
            out.push('\\');
            out.push(quote);
        }
        ch if (ch as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", ch as u32)),
        ch => out.push(ch),
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
}
