use crate::declaration::{Declaration, Literal, TypeDecl, ValueDecl};
use crate::directive::{self, Directive};
use crate::error::{Error, Result};
use crate::openapi::{Document, Info, PathItem};
use crate::schema::{lower_first, schema_for_body};
use log::debug;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// OpenAPI document assembler
///
/// Owns the document for the duration of one run. Directives are merged in the order
/// they are fed; [`DocumentAssembler::finish`] hands the document over.
pub struct DocumentAssembler {
    document: Document,
}

impl DocumentAssembler {
    /// Create an assembler around an empty document
    pub fn new() -> Self {
        debug!("Initializing DocumentAssembler");
        Self {
            document: Document::new(),
        }
    }

    /// Extract the directive of a declaration, if any, and merge it in.
    pub fn add_declaration(&mut self, declaration: &Declaration) -> Result<()> {
        match directive::extract(declaration) {
            Some(directive) => self.apply(directive),
            None => Ok(()),
        }
    }

    /// Merge one directive into the document
    pub fn apply(&mut self, directive: Directive<'_>) -> Result<()> {
        match directive {
            Directive::Info { body } => self.apply_info(&body),
            Directive::Path { body } => self.apply_paths(&body),
            Directive::Parameter { declaration, body } => self.apply_parameter(declaration, &body),
            Directive::ObjectSchema { declaration } => {
                self.apply_object_schema(declaration);
                Ok(())
            }
        }
    }

    /// Hand over the finished document
    pub fn finish(self) -> Document {
        debug!(
            "Assembled document with {} paths, {} schemas, {} parameters",
            self.document.paths.len(),
            self.document.components.schemas.len(),
            self.document.components.parameters.len()
        );
        self.document
    }

    fn apply_info(&mut self, body: &str) -> Result<()> {
        let info: Info = decode(body)?;
        debug!("Setting info: {} {}", info.title, info.version);
        self.document.info = Some(info);
        Ok(())
    }

    fn apply_paths(&mut self, body: &str) -> Result<()> {
        let items: BTreeMap<String, PathItem> = decode(body)?;
        for (path, item) in items {
            debug!("Merging path item: {}", path);
            self.document.paths.entry(path).or_default().merge(item);
        }
        Ok(())
    }

    fn apply_parameter(&mut self, declaration: &ValueDecl, body: &str) -> Result<()> {
        let (name, literal) = match (declaration.names.as_slice(), declaration.values.as_slice()) {
            ([name], [literal]) => (name, literal),
            (names, values) => {
                return Err(Error::LiteralDecode {
                    declaration: names.join(", "),
                    message: format!(
                        "expected exactly one name bound to one literal, found {} names and {} values",
                        names.len(),
                        values.len()
                    ),
                })
            }
        };
        let parameter_name = match literal {
            Literal::Str(value) => value.clone(),
            Literal::Other(spelling) => {
                return Err(Error::LiteralDecode {
                    declaration: name.clone(),
                    message: format!("expected a string literal, found {}", spelling),
                })
            }
        };

        // The body is decoded on top of the literal name, so a `name` key overrides it
        let mut fields = decode::<Option<serde_yaml::Mapping>>(body)?.unwrap_or_default();
        let name_key = serde_yaml::Value::from("name");
        if !fields.contains_key(&name_key) {
            fields.insert(name_key, serde_yaml::Value::from(parameter_name));
        }
        let parameter = serde_yaml::from_value(serde_yaml::Value::Mapping(fields)).map_err(
            |source| Error::DirectiveDecode {
                comment: body.to_string(),
                source,
            },
        )?;

        debug!("Adding parameter component: {}", name);
        self.document
            .components
            .parameters
            .insert(name.clone(), parameter);
        Ok(())
    }

    fn apply_object_schema(&mut self, declaration: &TypeDecl) {
        let schema_name = lower_first(&declaration.name);
        let schema = schema_for_body(&declaration.body);
        if self
            .document
            .components
            .schemas
            .insert(schema_name.clone(), schema)
            .is_some()
        {
            debug!("Schema {} redeclared, keeping the latest", schema_name);
        } else {
            debug!("Adding schema component: {}", schema_name);
        }
    }
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a directive body, naming the body in the error
fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_yaml::from_str(body).map_err(|source| Error::DirectiveDecode {
        comment: body.to_string(),
        source,
    })
}
