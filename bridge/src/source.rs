//! Byte sources that hand the bridge a compiled module.
//!
//! A failed fetch is fatal to the one-shot run; there is no retry policy.

use crate::{Error, Result};
use std::fs;
use std::path::PathBuf;

/// Where module bytes come from.
pub trait ModuleSource {
    /// Fetches the raw module bytes.
    fn fetch(&self) -> Result<Vec<u8>>;
}

/// Reads a module from the filesystem.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a source backed by a path on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ModuleSource for FileSource {
    fn fetch(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(Error::Source)
    }
}

/// Wraps module bytes already resident in memory.
pub struct StaticSource<'a> {
    bytes: &'a [u8],
}

impl<'a> StaticSource<'a> {
    /// Creates a source over a borrowed byte slice.
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl ModuleSource for StaticSource<'_> {
    fn fetch(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_source_returns_its_bytes() {
        let source = StaticSource::new(b"\0asm");
        assert_eq!(source.fetch().unwrap(), b"\0asm");
    }

    #[test]
    fn missing_file_is_a_source_error() {
        let source = FileSource::new("/definitely/not/here.wasm");
        assert!(matches!(source.fetch(), Err(Error::Source(_))));
    }
}
