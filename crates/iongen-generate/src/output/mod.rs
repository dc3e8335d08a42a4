mod binary;
mod counter;
mod text;

use std::io::{self, Write};
use std::str::FromStr;

use iongen_core::Element;

pub use binary::BinaryEncoder;
pub use counter::CountingWriter;
pub use text::TextEncoder;

/// Wire format selector. The generator core is format-agnostic; only the
/// encoder consumes this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Binary,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(Format::Text),
            "binary" => Ok(Format::Binary),
            other => Err(format!("unknown format '{other}', expected text or binary")),
        }
    }
}

/// Serializes one constructed element to a sink. Encoders are stateless;
/// every top-level value is self-contained.
pub trait Encoder {
    fn encode(&self, element: &Element, out: &mut dyn Write) -> io::Result<()>;
}

pub fn encoder_for(format: Format) -> &'static dyn Encoder {
    match format {
        Format::Text => &TextEncoder,
        Format::Binary => &BinaryEncoder,
    }
}
