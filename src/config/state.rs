// Application state module
// Immutable state shared by every connection task

use std::path::{Path, PathBuf};

use super::types::Config;
use crate::error::StartupError;
use crate::http::mime::MimeTable;

/// Application state
///
/// Built once at startup and shared through `Arc`; nothing in here is
/// mutated afterwards, so request handling never takes a lock.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonical form of `server.root`
    pub root: PathBuf,
    pub mime: MimeTable,
}

impl AppState {
    /// Create `AppState`, resolving the served root directory
    pub fn new(config: Config) -> Result<Self, StartupError> {
        let root = canonical_root(&config.server.root)?;
        let mime = MimeTable::new(&config.mime.types);

        Ok(Self { config, root, mime })
    }
}

fn canonical_root(root: &str) -> Result<PathBuf, StartupError> {
    let root_error = |source| StartupError::Root {
        path: root.to_string(),
        source,
    };

    let canonical = Path::new(root).canonicalize().map_err(root_error)?;
    if !canonical.is_dir() {
        return Err(root_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a directory",
        )));
    }
    Ok(canonical)
}
