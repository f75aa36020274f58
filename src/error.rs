use std::path::PathBuf;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug)]
pub enum Error {
    /// Enumerating the files under the project root failed
    Traversal { root: PathBuf, source: walkdir::Error },
    /// Reading a source file or creating an output file failed
    Io { path: PathBuf, source: std::io::Error },
    /// A source file is not valid Rust
    Parse { file: PathBuf, source: syn::Error },
    /// The YAML under a recognized directive tag does not fit its target
    DirectiveDecode { comment: String, source: serde_yaml::Error },
    /// A parameter directive sits on a declaration without a usable string literal
    LiteralDecode { declaration: String, message: String },
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Traversal { root, .. } => {
                write!(f, "failed to read files under {}", root.display())
            }
            Error::Io { path, .. } => write!(f, "I/O error on {}", path.display()),
            Error::Parse { file, .. } => {
                write!(f, "failed to interpret file {}", file.display())
            }
            Error::DirectiveDecode { comment, .. } => {
                write!(f, "failed to decode comment:\n{}", comment)
            }
            Error::LiteralDecode {
                declaration,
                message,
            } => write!(
                f,
                "failed to decode parameter literal of {}: {}",
                declaration, message
            ),
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Traversal { source, .. } => Some(source),
            Error::Io { source, .. } => Some(source),
            Error::Parse { source, .. } => Some(source),
            Error::DirectiveDecode { source, .. } => Some(source),
            Error::LiteralDecode { .. } | Error::SerializationError(_) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML: {}", err))
    }
}
