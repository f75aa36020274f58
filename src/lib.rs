//! openapi-from-doc - OpenAPI documents from directives in doc comments.
//!
//! Documentation lives next to the code it describes: a function's doc comment can
//! start with `gopenapi:info` or `gopenapi:path` followed by YAML, a `const` or `static`
//! can declare a reusable parameter with `gopenapi:parameter`, and a struct or type alias
//! tagged with `gopenapi:objectSchema` gets a schema derived from its shape.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Walks the source tree for Rust files in a stable order
//! 2. [`parser`] - Parses each file with `syn` into [`declaration`] values
//! 3. [`directive`] - Recognizes directives in declaration doc comments
//! 4. [`schema`] - Maps declared types onto OpenAPI schemas
//! 5. [`assembler`] - Merges every directive into one [`openapi::Document`]
//! 6. [`generator`] - Runs the steps above for a directory
//! 7. [`serializer`] - Writes the document as JSON or YAML
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_doc::{
//!     generator::generate,
//!     serializer::{JsonSink, Sink},
//! };
//! use std::path::Path;
//!
//! let document = generate(Path::new("./my-project")).unwrap();
//! JsonSink::new(std::io::stdout()).write(&document).unwrap();
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod assembler;
pub mod cli;
pub mod declaration;
pub mod directive;
pub mod error;
pub mod generator;
pub mod openapi;
pub mod parser;
pub mod scanner;
pub mod schema;
pub mod serializer;
