//! End-to-end generation: scan, parse, then assemble.

use crate::assembler::DocumentAssembler;
use crate::error::Result;
use crate::openapi::Document;
use crate::parser::{AstParser, ParsedFile};
use crate::scanner::FileScanner;
use log::{debug, info};
use std::path::Path;

/// Builds the document for every Rust file under `root`.
///
/// Files are processed in traversal order and the first traversal, read, parse or
/// decode failure aborts the run.
pub fn generate(root: &Path) -> Result<Document> {
    info!("Scanning {}", root.display());
    let scanner = FileScanner::new(root.to_path_buf());
    let files = scanner
        .files()
        .map(|path| path.and_then(|path| AstParser::parse_file(&path)));
    assemble(files)
}

/// Merges the directives of already-parsed files into a fresh document.
pub fn assemble<I>(files: I) -> Result<Document>
where
    I: IntoIterator<Item = Result<ParsedFile>>,
{
    let mut assembler = DocumentAssembler::new();
    let mut file_count = 0usize;

    for parsed in files {
        let parsed = parsed?;
        debug!(
            "Assembling {} declarations from {}",
            parsed.declarations.len(),
            parsed.path.display()
        );
        for declaration in &parsed.declarations {
            assembler.add_declaration(declaration)?;
        }
        file_count += 1;
    }

    let document = assembler.finish();
    info!(
        "Processed {} files: {} paths, {} schemas, {} parameters",
        file_count,
        document.paths.len(),
        document.components.schemas.len(),
        document.components.parameters.len()
    );
    Ok(document)
}
