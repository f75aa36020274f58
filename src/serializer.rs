//! Serialization module for writing OpenAPI documents as YAML or JSON.
//!
//! The [`Sink`] trait is the seam between generation and output: the CLI picks a sink for
//! the requested format and hands it the finished document.

use crate::error::{Error, Result};
use crate::openapi::Document;
use log::debug;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Destination for a finished document.
pub trait Sink {
    /// Serializes the document and writes it out, consuming the sink.
    fn write(self, document: &Document) -> Result<()>;
}

/// Writes pretty-printed JSON followed by a newline.
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> Sink for JsonSink<W> {
    fn write(mut self, document: &Document) -> Result<()> {
        let content = serialize_json(document)?;
        write_all(&mut self.writer, &content)
    }
}

/// Writes a YAML document.
pub struct YamlSink<W: Write> {
    writer: W,
}

impl<W: Write> YamlSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> Sink for YamlSink<W> {
    fn write(mut self, document: &Document) -> Result<()> {
        let content = serialize_yaml(document)?;
        write_all(&mut self.writer, &content)
    }
}

fn write_all<W: Write>(writer: &mut W, content: &str) -> Result<()> {
    writer
        .write_all(content.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|source| Error::Io {
            path: "<output>".into(),
            source,
        })
}

/// Serializes a document to YAML.
pub fn serialize_yaml(doc: &Document) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    Ok(serde_yaml::to_string(doc)?)
}

/// Serializes a document to indented JSON with a trailing newline.
///
/// # Example
///
/// ```
/// use openapi_from_doc::openapi::Document;
/// use openapi_from_doc::serializer::serialize_json;
///
/// let json = serialize_json(&Document::new()).unwrap();
/// assert!(json.starts_with("{\n  \"openapi\": \"3.0.2\""));
/// ```
pub fn serialize_json(doc: &Document) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    let mut json = serde_json::to_string_pretty(doc)?;
    json.push('\n');
    Ok(json)
}

/// Opens the output destination: stdout for `None` or `-`, otherwise the named file.
pub fn resolve_output_writer(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        None => Ok(Box::new(io::stdout().lock())),
        Some(path) if path == Path::new("-") => Ok(Box::new(io::stdout().lock())),
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|source| Error::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            let file = fs::File::create(path).map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(io::BufWriter::new(file)))
        }
    }
}
