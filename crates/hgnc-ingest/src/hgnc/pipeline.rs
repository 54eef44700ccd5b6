//! HGNC code system generation pipeline
//!
//! Reads the HGNC downloads from disk, parses each one to completion, then
//! synthesizes the code systems. A run either produces every requested code
//! system or fails on the first malformed input; nothing is written on
//! failure.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use super::config::GeneratorConfig;
use super::parser::{GeneRecordParser, GroupMembershipParser, HierarchyParser};
use super::synthesizer::{CatalogSynthesizer, Diagnostic};
use super::{IngestError, Result};
use crate::codesystem::{CatalogKind, CatalogSink, CodeSystem};

/// Input files for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineInputs {
    /// HGNC complete set JSON
    pub genes: PathBuf,
    /// Gene group download JSON
    pub groups: Option<PathBuf>,
    /// Gene group closure CSV
    pub closure: Option<PathBuf>,
}

impl PipelineInputs {
    /// Gene ids only
    pub fn genes_only(genes: impl Into<PathBuf>) -> Self {
        Self {
            genes: genes.into(),
            groups: None,
            closure: None,
        }
    }

    pub fn with_groups(mut self, groups: impl Into<PathBuf>) -> Self {
        self.groups = Some(groups.into());
        self
    }

    pub fn with_closure(mut self, closure: impl Into<PathBuf>) -> Self {
        self.closure = Some(closure.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.closure.is_some() && self.groups.is_none() {
            return Err(IngestError::Config(
                "a closure file requires the gene group file".to_string(),
            ));
        }
        Ok(())
    }
}

/// Counts describing a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub version: String,
    pub genes: usize,
    pub groups: usize,
    pub memberships: usize,
    pub direct_edges: usize,
    pub dangling_parents: usize,
    pub unknown_genes: usize,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub gene_ids: CodeSystem,
    pub gene_groups: Option<CodeSystem>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: PipelineStats,
}

/// HGNC code system generation pipeline
pub struct GeneratorPipeline {
    config: GeneratorConfig,
}

impl GeneratorPipeline {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Parse all inputs and build the code systems
    ///
    /// Steps:
    /// 1. Parse the gene dataset (also fixes the version)
    /// 2. Parse the gene group dataset, if given
    /// 3. Parse the closure table, if given
    /// 4. Synthesize the code systems
    #[instrument(skip_all, fields(genes = %inputs.genes.display()))]
    pub fn run(&self, inputs: &PipelineInputs) -> Result<PipelineResult> {
        inputs.validate()?;

        info!("Phase 1: Parsing gene dataset");
        let genes = read_input(&inputs.genes, GeneRecordParser::parse_reader)?;

        let groups = match &inputs.groups {
            Some(path) => {
                info!("Phase 2: Parsing gene group dataset");
                Some(read_input(path, GroupMembershipParser::parse_reader)?)
            },
            None => None,
        };

        let hierarchy = match &inputs.closure {
            Some(path) => {
                info!("Phase 3: Parsing gene group closure");
                let parser = if self.config.closure_has_header {
                    HierarchyParser::with_header()
                } else {
                    HierarchyParser::new()
                };
                Some(read_input(path, |reader| parser.parse_reader(reader))?)
            },
            None => None,
        };

        info!("Phase 4: Synthesizing code systems");
        let output = CatalogSynthesizer::new(self.config.clone()).synthesize(
            &genes,
            groups.as_ref(),
            hierarchy.as_ref(),
        );

        let stats = PipelineStats {
            version: genes.version().to_string(),
            genes: genes.len(),
            groups: groups.as_ref().map_or(0, |g| g.group_count()),
            memberships: groups.as_ref().map_or(0, |g| g.association_count()),
            direct_edges: hierarchy.as_ref().map_or(0, |h| h.edge_count()),
            dangling_parents: output.dangling_parents(),
            unknown_genes: output
                .diagnostics
                .iter()
                .filter(|d| matches!(d, Diagnostic::UnknownGene { .. }))
                .count(),
        };

        info!(
            version = %stats.version,
            genes = stats.genes,
            groups = stats.groups,
            diagnostics = output.diagnostics.len(),
            "Generation complete"
        );

        Ok(PipelineResult {
            gene_ids: output.gene_ids,
            gene_groups: output.gene_groups,
            diagnostics: output.diagnostics,
            stats,
        })
    }

    /// Hand the generated code systems to `sink`
    ///
    /// The sink is asked to accept every code system before any of them is
    /// written, so a missing destination leaves nothing behind.
    pub fn write<S: CatalogSink + ?Sized>(&self, result: &PipelineResult, sink: &mut S) -> Result<()> {
        let mut kinds = Vec::with_capacity(2);
        if result.gene_groups.is_some() {
            kinds.push(CatalogKind::GeneGroups);
        }
        kinds.push(CatalogKind::GeneIds);
        sink.prepare(&kinds)?;

        if let Some(groups) = &result.gene_groups {
            sink.write(CatalogKind::GeneGroups, groups)?;
        }
        sink.write(CatalogKind::GeneIds, &result.gene_ids)
    }

    /// Run and write in one step
    pub fn run_into<S: CatalogSink + ?Sized>(
        &self,
        inputs: &PipelineInputs,
        sink: &mut S,
    ) -> Result<PipelineResult> {
        let result = self.run(inputs)?;
        self.write(&result, sink)?;
        Ok(result)
    }
}

/// Open `path`, hand it to `parse`, and close it once parsing is done
fn read_input<T, F>(path: &Path, parse: F) -> Result<T>
where
    F: FnOnce(BufReader<File>) -> Result<T>,
{
    debug!(path = %path.display(), "Opening input");
    let file = File::open(path).map_err(|source| IngestError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    parse(BufReader::new(file))
}
