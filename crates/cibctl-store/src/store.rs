//! CIB storage backends
//!
//! A store hands out a fresh `Cib` per load and accepts a whole constraint
//! section back. Concurrent writers are not coordinated: the last write wins.

use std::fs;
use std::path::{Path, PathBuf};

use cibctl_core::model::RawElement;
use cibctl_core::Cib;

use crate::atomic::atomic_write;
use crate::convert::{cib_from_raw, replace_constraints};
use crate::errors::{io_error, Result};
use crate::xml::{parse_document, write_document};

/// Source and sink of the cluster configuration
pub trait CibStore {
    /// Read the current configuration
    ///
    /// # Errors
    ///
    /// `Io` when the backing document cannot be read, `Serialization` when it
    /// is not a usable CIB.
    fn load(&self) -> Result<Cib>;

    /// Write back the constraint section of `cib`, keeping everything else
    ///
    /// # Errors
    ///
    /// `Io` or `Serialization` as for [`CibStore::load`].
    fn replace_configuration(&mut self, cib: &Cib) -> Result<()>;
}

/// CIB kept in an XML file on disk
#[derive(Debug, Clone)]
pub struct FileCibStore {
    path: PathBuf,
}

impl FileCibStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<RawElement> {
        let xml = fs::read_to_string(&self.path).map_err(|e| io_error("read_cib", e))?;
        parse_document(&xml)
    }
}

impl CibStore for FileCibStore {
    fn load(&self) -> Result<Cib> {
        tracing::debug!(path = %self.path.display(), "loading cib");
        cib_from_raw(&self.read_raw()?)
    }

    fn replace_configuration(&mut self, cib: &Cib) -> Result<()> {
        let mut root = self.read_raw()?;
        replace_constraints(&mut root, cib)?;
        atomic_write(&self.path, write_document(&root)?.as_bytes())
    }
}

/// CIB held as an XML string, for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryCibStore {
    xml: String,
    writes: usize,
}

impl MemoryCibStore {
    pub fn new(xml: impl Into<String>) -> Self {
        Self {
            xml: xml.into(),
            writes: 0,
        }
    }

    /// Current document text
    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// Number of successful `replace_configuration` calls
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl CibStore for MemoryCibStore {
    fn load(&self) -> Result<Cib> {
        cib_from_raw(&parse_document(&self.xml)?)
    }

    fn replace_configuration(&mut self, cib: &Cib) -> Result<()> {
        let mut root = parse_document(&self.xml)?;
        replace_constraints(&mut root, cib)?;
        self.xml = write_document(&root)?;
        self.writes += 1;
        Ok(())
    }
}
