//! JSON converter.

use std::io::Write;

use serde_json::Value;

use crate::converters::{ConversionError, Converter};

/// Renders a JSON value, compact unless `pretty` is set.
#[derive(Debug, Clone, Default)]
pub struct JsonConverter {
    target: Value,
    pretty: bool,
}

impl JsonConverter {
    pub fn new(target: Value) -> Self {
        Self {
            target,
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Converter for JsonConverter {
    fn set_target(&mut self, target: Value) {
        self.target = target;
    }

    fn content_type(&self) -> &str {
        "application/json"
    }

    fn render(&self, out: &mut dyn Write) -> Result<(), ConversionError> {
        if self.pretty {
            serde_json::to_writer_pretty(out, &self.target)?;
        } else {
            serde_json::to_writer(out, &self.target)?;
        }
        Ok(())
    }
}
