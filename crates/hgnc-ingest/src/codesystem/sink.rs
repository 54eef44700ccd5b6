//! Destinations for generated code systems

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use super::model::CodeSystem;
use crate::hgnc::{IngestError, Result};

/// Which of the two generated code systems is being written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    GeneIds,
    GeneGroups,
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogKind::GeneIds => write!(f, "gene ids"),
            CatalogKind::GeneGroups => write!(f, "gene groups"),
        }
    }
}

/// Receives finished code systems
pub trait CatalogSink {
    /// Called once with every kind about to be written, before the first
    /// `write`. A sink that cannot accept one of them must fail here.
    fn prepare(&mut self, _kinds: &[CatalogKind]) -> Result<()> {
        Ok(())
    }

    fn write(&mut self, kind: CatalogKind, catalog: &CodeSystem) -> Result<()>;
}

/// Writes each code system as a JSON document to its own file
#[derive(Debug, Clone, Default)]
pub struct JsonFileSink {
    gene_ids: Option<PathBuf>,
    gene_groups: Option<PathBuf>,
    pretty: bool,
}

impl JsonFileSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gene_ids(mut self, path: impl Into<PathBuf>) -> Self {
        self.gene_ids = Some(path.into());
        self
    }

    pub fn with_gene_groups(mut self, path: impl Into<PathBuf>) -> Self {
        self.gene_groups = Some(path.into());
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self, kind: CatalogKind) -> Option<&Path> {
        match kind {
            CatalogKind::GeneIds => self.gene_ids.as_deref(),
            CatalogKind::GeneGroups => self.gene_groups.as_deref(),
        }
    }

    fn require_path(&self, kind: CatalogKind) -> Result<&Path> {
        self.path(kind)
            .ok_or_else(|| IngestError::Config(format!("no output file configured for {}", kind)))
    }
}

impl CatalogSink for JsonFileSink {
    fn prepare(&mut self, kinds: &[CatalogKind]) -> Result<()> {
        for kind in kinds {
            self.require_path(*kind)?;
        }
        Ok(())
    }

    fn write(&mut self, kind: CatalogKind, catalog: &CodeSystem) -> Result<()> {
        let path = self.require_path(kind)?;

        let mut writer = BufWriter::new(File::create(path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, catalog)?;
        } else {
            serde_json::to_writer(&mut writer, catalog)?;
        }
        writeln!(writer)?;
        writer.flush()?;

        info!(
            catalog = %kind,
            path = %path.display(),
            concepts = catalog.count,
            "Saved code system"
        );
        Ok(())
    }
}

/// Keeps written code systems in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    written: Vec<(CatalogKind, CodeSystem)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently written code system of `kind`
    pub fn get(&self, kind: CatalogKind) -> Option<&CodeSystem> {
        self.written
            .iter()
            .rev()
            .find(|(k, _)| *k == kind)
            .map(|(_, catalog)| catalog)
    }

    pub fn len(&self) -> usize {
        self.written.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }
}

impl CatalogSink for MemorySink {
    fn write(&mut self, kind: CatalogKind, catalog: &CodeSystem) -> Result<()> {
        self.written.push((kind, catalog.clone()));
        Ok(())
    }
}
