//! Where definitions resources come from.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{DefsError, DefsResult};

/// Supplies the raw text of an option's definitions resource.
///
/// Called at most once per option per behavior instance under the default
/// policy, so implementations may block (file I/O).  They must be
/// `Send + Sync` because one source is shared by every instance of a team.
pub trait DefinitionSource: Send + Sync {
    /// Return the resource text for `option`.
    fn open(&self, option: &str) -> DefsResult<String>;
}

// ── Directory of `.cfg` files ─────────────────────────────────────────────────

/// Reads `<dir>/<option>.<extension>`; the extension defaults to `cfg`.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir:       PathBuf,
    extension: String,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), extension: "cfg".to_owned() }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_owned();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the resource of `option` is read from.
    pub fn path_for(&self, option: &str) -> PathBuf {
        self.dir.join(format!("{option}.{}", self.extension))
    }
}

impl DefinitionSource for DirSource {
    fn open(&self, option: &str) -> DefsResult<String> {
        let path = self.path_for(option);
        tracing::debug!(option, path = %path.display(), "reading definitions");
        std::fs::read_to_string(&path).map_err(|source| DefsError::Io {
            option: option.to_owned(),
            path,
            source,
        })
    }
}

// ── In-memory ─────────────────────────────────────────────────────────────────

/// Resources held in a map; handy in tests and for embedded defaults.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    resources: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the resource of `option`.
    pub fn insert(&mut self, option: &str, text: &str) -> &mut Self {
        self.resources.insert(option.to_owned(), text.to_owned());
        self
    }

    /// Builder-style [`insert`][Self::insert].
    pub fn with(mut self, option: &str, text: &str) -> Self {
        self.insert(option, text);
        self
    }
}

impl DefinitionSource for MemorySource {
    fn open(&self, option: &str) -> DefsResult<String> {
        self.resources
            .get(option)
            .cloned()
            .ok_or_else(|| DefsError::NotFound { option: option.to_owned() })
    }
}

// ── Nothing ───────────────────────────────────────────────────────────────────

/// A source without resources.  Options with compiled-in definitions never
/// consult it; options that load fail with [`DefsError::NotFound`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSource;

impl DefinitionSource for NoSource {
    fn open(&self, option: &str) -> DefsResult<String> {
        Err(DefsError::NotFound { option: option.to_owned() })
    }
}
