// HGNC Ingestion Module
//
// Turns the HGNC downloads into two code systems:
// - Gene IDs: one concept per HGNC gene (hgnc_complete_set.json)
// - Gene Groups: one concept per gene group (gene group download-all.json),
//   optionally arranged into a hierarchy by the family closure table
//
// Architecture follows the per-source layout used for the other sources:
// - Parse: one parser per input shape, each returning an immutable dataset
// - Synthesize: build the code systems from the parsed datasets
// - Pipeline: open the inputs, run parsers and synthesizer, hand off to a sink

pub mod config;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod synthesizer;

// Re-export main types
pub use config::{CatalogMetadata, GeneratorConfig, GroupPropertyMode};
pub use models::{
    DatasetVersion, GeneDataset, GeneRecord, GroupDataset, GroupMembership, GroupMetadata,
    ParentEdges, DEFAULT_DATE_MODIFIED,
};
pub use parser::{GeneRecordParser, GroupMembershipParser, HierarchyParser};
pub use pipeline::{GeneratorPipeline, PipelineInputs, PipelineResult, PipelineStats};
pub use synthesizer::{CatalogSynthesizer, Diagnostic, SynthesisOutput};

/// Result type for HGNC ingestion
pub type Result<T> = std::result::Result<T, IngestError>;

/// Which HGNC input a failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Genes,
    Groups,
    Closure,
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dataset::Genes => write!(f, "gene"),
            Dataset::Groups => write!(f, "gene group"),
            Dataset::Closure => write!(f, "gene group closure"),
        }
    }
}

/// Error types for HGNC ingestion
///
/// Record numbers are 1-based: the position in the JSON array, or the CSV
/// line for the closure table.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open {}: {source}", .path.display())]
    Input {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed {dataset} dataset: expected {expected}")]
    Structure { dataset: Dataset, expected: String },

    #[error("Malformed {dataset} record {record}: {reason}")]
    InvalidRecord {
        dataset: Dataset,
        record: usize,
        reason: String,
    },

    #[error("Malformed {dataset} record {record}: missing required field \"{field}\"")]
    MissingField {
        dataset: Dataset,
        record: usize,
        field: &'static str,
    },

    #[error("Malformed {dataset} record {record}: invalid field \"{field}\": {reason}")]
    InvalidField {
        dataset: Dataset,
        record: usize,
        field: &'static str,
        reason: String,
    },

    #[error("Duplicate {dataset} id {id}")]
    DuplicateId { dataset: Dataset, id: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IngestError {
    pub(crate) fn structure(dataset: Dataset, expected: impl Into<String>) -> Self {
        IngestError::Structure {
            dataset,
            expected: expected.into(),
        }
    }

    /// The input has the wrong overall shape (e.g. no `response.docs`)
    pub fn is_structural(&self) -> bool {
        matches!(self, IngestError::Structure { .. })
    }

    /// A single entry is malformed
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            IngestError::InvalidRecord { .. }
                | IngestError::MissingField { .. }
                | IngestError::InvalidField { .. }
                | IngestError::DuplicateId { .. }
        )
    }
}
