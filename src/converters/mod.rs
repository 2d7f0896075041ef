//! Converters Module
//!
//! Converters render a target object into a textual document. Every converter
//! gets a default [`Converter::render_to_string`].

mod json;

use std::io::Write;

use serde_json::Value;
use thiserror::Error;

use crate::error::{Result, ViewError};

pub use json::JsonConverter;

/// Failure raised by a converter while rendering itself.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("{0}")]
    Other(String),
}

/// Renders a target into a character stream.
pub trait Converter {
    /// Replaces the object being converted.
    fn set_target(&mut self, target: Value);

    /// Media type of the rendered document.
    fn content_type(&self) -> &str;

    /// Writes the rendered document to `out`.
    fn render(&self, out: &mut dyn Write) -> std::result::Result<(), ConversionError>;

    /// Renders into an in-memory buffer and returns exactly what was written.
    ///
    /// Any failure comes back as [`ViewError::Conversion`] with the original
    /// cause; nothing partial is returned.
    fn render_to_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.render(&mut buffer).map_err(ViewError::Conversion)?;
        String::from_utf8(buffer).map_err(|e| ViewError::Conversion(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    /// Writes a fixed byte sequence, optionally failing halfway.
    struct Scripted {
        bytes: Vec<u8>,
        fail_after_write: bool,
    }

    impl Converter for Scripted {
        fn set_target(&mut self, _target: Value) {}

        fn content_type(&self) -> &str {
            "text/plain"
        }

        fn render(&self, out: &mut dyn Write) -> std::result::Result<(), ConversionError> {
            out.write_all(&self.bytes)?;
            if self.fail_after_write {
                return Err(ConversionError::Other("target vanished".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_returns_exactly_what_was_written() {
        let converter = Scripted {
            bytes: "héllo\n\tworld ".as_bytes().to_vec(),
            fail_after_write: false,
        };
        assert_eq!(converter.render_to_string().unwrap(), "héllo\n\tworld ");
    }

    #[test]
    fn test_render_failure_propagates_with_cause() {
        let converter = Scripted {
            bytes: b"partial".to_vec(),
            fail_after_write: true,
        };
        let err = converter.render_to_string().unwrap_err();
        assert!(matches!(err, ViewError::Conversion(ConversionError::Other(_))));
        assert_eq!(err.source().unwrap().to_string(), "target vanished");
    }

    #[test]
    fn test_invalid_utf8_is_a_failure() {
        let converter = Scripted {
            bytes: vec![0xff, 0xfe],
            fail_after_write: false,
        };
        let err = converter.render_to_string().unwrap_err();
        assert!(matches!(err, ViewError::Conversion(ConversionError::Utf8(_))));
    }
}
