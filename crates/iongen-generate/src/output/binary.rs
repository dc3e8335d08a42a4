use std::io::{self, Write};

use iongen_core::{Element, IonType, Value};

use crate::output::Encoder;

/// Compact self-describing binary encoding: one tag byte, the annotation
/// list, then a length-prefixed payload. Containers nest recursively.
#[derive(Debug, Default)]
pub struct BinaryEncoder;

impl Encoder for BinaryEncoder {
    fn encode(&self, element: &Element, out: &mut dyn Write) -> io::Result<()> {
        let mut buffer = Vec::new();
        write_element(element, &mut buffer);
        out.write_all(&buffer)
    }
}

fn write_element(element: &Element, out: &mut Vec<u8>) {
    out.push(type_code(element.ion_type()));
    write_varuint(element.annotations.len() as u64, out);
    for annotation in &element.annotations {
        write_bytes(annotation.as_bytes(), out);
    }

    let mut payload = Vec::new();
    write_payload(&element.value, &mut payload);
    write_bytes(&payload, out);
}

fn write_payload(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Null => {}
        Value::Bool(value) => out.push(*value as u8),
        Value::Int(value) => out.extend_from_slice(&value.to_be_bytes()),
        Value::Float(value) => out.extend_from_slice(&value.to_be_bytes()),
        Value::Decimal(value) => {
            out.extend_from_slice(&value.coefficient.to_be_bytes());
            out.extend_from_slice(&value.exponent.to_be_bytes());
        }
        Value::Timestamp(value) => out.extend_from_slice(&value.timestamp().to_be_bytes()),
        Value::String(text) | Value::Symbol(text) => out.extend_from_slice(text.as_bytes()),
        Value::Blob(bytes) | Value::Clob(bytes) => out.extend_from_slice(bytes),
        Value::List(items) | Value::Sexp(items) => {
            for item in items {
                write_element(item, out);
            }
        }
        Value::Struct(fields) => {
            for (name, value) in fields {
                write_bytes(name.as_bytes(), out);
                write_element(value, out);
            }
        }
    }
}

fn write_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    write_varuint(bytes.len() as u64, out);
    out.extend_from_slice(bytes);
}

fn write_varuint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

fn type_code(tag: IonType) -> u8 {
    match tag {
        IonType::Null => 0,
        IonType::Bool => 1,
        IonType::Int => 2,
        IonType::Float => 3,
        IonType::Decimal => 4,
        IonType::Timestamp => 5,
        IonType::String => 6,
        IonType::Symbol => 7,
        IonType::Blob => 8,
        IonType::Clob => 9,
        IonType::List => 10,
        IonType::Sexp => 11,
        IonType::Struct => 12,
    }
}
