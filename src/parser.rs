use crate::declaration::{lower_items, Declaration};
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Source parser for Rust files.
///
/// The `AstParser` uses the `syn` crate to parse a file and lowers its items into the
/// flat [`Declaration`] list the directive extractor works on. Comments only survive as
/// doc attributes, so `//` comments never carry directives.
///
/// # Example
///
/// ```no_run
/// use openapi_from_doc::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("src/main.rs")).unwrap();
/// println!("Found {} declarations", parsed.declarations.len());
/// ```
pub struct AstParser;

/// A parsed source file, reduced to its declarations in source order.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// Declarations, including those of inline modules and impl blocks
    pub declarations: Vec<Declaration>,
}

impl AstParser {
    /// Reads and parses a single Rust source file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Parse`] if it does not
    /// contain valid Rust syntax.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse_source(path, &content)
    }

    /// Parses already-loaded source text, attributing errors to `path`.
    pub fn parse_source(path: &Path, content: &str) -> Result<ParsedFile> {
        let syntax_tree = syn::parse_file(content).map_err(|source| Error::Parse {
            file: path.to_path_buf(),
            source,
        })?;

        let declarations = lower_items(&syntax_tree.items);
        debug!(
            "Parsed {} declarations from {}",
            declarations.len(),
            path.display()
        );

        Ok(ParsedFile {
            path: path.to_path_buf(),
            declarations,
        })
    }
}
