use crate::error::{Error, Result};
use log::debug;
use std::path::PathBuf;
use walkdir::WalkDir;

/// File scanner for traversing project directories.
///
/// The `FileScanner` recursively walks through a project directory to find all Rust source files.
/// It automatically skips common directories that should be ignored, such as `target` and hidden
/// directories (those starting with `.`). Entries are visited in file-name order, so two runs
/// over the same tree feed declarations in the same order.
///
/// # Example
///
/// ```no_run
/// use openapi_from_doc::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-project"));
/// let files = scanner.scan().unwrap();
/// println!("Found {} Rust files", files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Lazily yields every `.rs` file under the root.
    ///
    /// An entry that cannot be read yields an [`Error::Traversal`]; callers are expected to
    /// stop at the first one.
    pub fn files(&self) -> impl Iterator<Item = Result<PathBuf>> + '_ {
        WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.depth() == 0 {
                    return true;
                }

                // Skip target directory and hidden directories
                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_target = e.file_type().is_dir() && file_name == "target";

                !is_hidden && !is_target
            })
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    let path = entry.path();
                    let is_rust = entry.file_type().is_file()
                        && path.extension().and_then(|s| s.to_str()) == Some("rs");
                    if is_rust {
                        debug!("Found Rust file: {}", path.display());
                        Some(Ok(entry.into_path()))
                    } else {
                        None
                    }
                }
                Err(source) => Some(Err(Error::Traversal {
                    root: self.root_path.clone(),
                    source,
                })),
            })
    }

    /// Collects all `.rs` files, failing on the first inaccessible entry.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        self.files().collect()
    }
}
