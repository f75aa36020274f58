//! Directive extraction from declaration doc comments.
//!
//! A directive is a tag such as `gopenapi:path` at the start of a doc comment, followed
//! by a YAML body. Object schemas are the exception: a type declaration only needs the
//! `gopenapi:objectSchema` tag somewhere in its doc comment, its shape is the payload.

use crate::declaration::{Declaration, TypeDecl, ValueDecl};
use log::debug;

pub const INFO_TAG: &str = "gopenapi:info";
pub const PATH_TAG: &str = "gopenapi:path";
pub const PARAMETER_TAG: &str = "gopenapi:parameter";
pub const OBJECT_SCHEMA_TAG: &str = "gopenapi:objectSchema";

/// A recognized documentation directive
#[derive(Debug, Clone, PartialEq)]
pub enum Directive<'a> {
    /// YAML body decoded onto the document info
    Info { body: String },
    /// YAML body decoded onto a map of path -> path item
    Path { body: String },
    /// YAML body decoded onto a parameter named after the declared literal
    Parameter {
        declaration: &'a ValueDecl,
        body: String,
    },
    /// Schema inferred from the shape of the type
    ObjectSchema { declaration: &'a TypeDecl },
}

impl Directive<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Directive::Info { .. } => "info",
            Directive::Path { .. } => "path",
            Directive::Parameter { .. } => "parameter",
            Directive::ObjectSchema { .. } => "objectSchema",
        }
    }
}

/// Trims the comment and replaces tabs, which YAML does not allow as indentation.
pub fn clean_comment(comment: &str) -> String {
    comment.trim().replace('\t', "    ")
}

/// Classifies a declaration, returning its directive if it carries one.
///
/// Declarations without a doc comment or without a known tag yield `None`.
pub fn extract(declaration: &Declaration) -> Option<Directive<'_>> {
    let doc = declaration.doc()?;
    let directive = match declaration {
        Declaration::Function(_) => {
            let comment = clean_comment(doc);
            if let Some(body) = comment.strip_prefix(INFO_TAG) {
                Some(Directive::Info {
                    body: body.to_string(),
                })
            } else {
                comment.strip_prefix(PATH_TAG).map(|body| Directive::Path {
                    body: body.to_string(),
                })
            }
        }
        Declaration::Type(type_decl) => doc
            .contains(OBJECT_SCHEMA_TAG)
            .then_some(Directive::ObjectSchema {
                declaration: type_decl,
            }),
        Declaration::Value(value_decl) => clean_comment(doc)
            .strip_prefix(PARAMETER_TAG)
            .map(|body| Directive::Parameter {
                declaration: value_decl,
                body: body.to_string(),
            }),
    };

    if let Some(directive) = &directive {
        debug!(
            "Found {} directive on {}",
            directive.kind(),
            declaration.name()
        );
    }
    directive
}
