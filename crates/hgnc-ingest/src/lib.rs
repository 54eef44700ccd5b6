//! HGNC Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Generates terminology code systems from the HGNC (HUGO Gene Nomenclature
//! Committee) downloads.
//!
//! # Outputs
//!
//! - **Gene IDs**: one concept per gene, previous symbols as synonyms,
//!   gene group membership as `groupId` properties
//! - **Gene Groups**: one concept per gene group, with `parent`/`root`
//!   properties derived from the family closure table
//!
//! # Example
//!
//! ```no_run
//! use hgnc_ingest::codesystem::JsonFileSink;
//! use hgnc_ingest::hgnc::{GeneratorConfig, GeneratorPipeline, PipelineInputs};
//!
//! fn main() -> anyhow::Result<()> {
//!     let inputs = PipelineInputs::genes_only("hgnc_complete_set.json")
//!         .with_groups("download-all.json")
//!         .with_closure("family_closure.csv");
//!
//!     let mut sink = JsonFileSink::new()
//!         .with_gene_ids("hgnc-gene-ids.json")
//!         .with_gene_groups("hgnc-gene-groups.json")
//!         .pretty(true);
//!
//!     let pipeline = GeneratorPipeline::new(GeneratorConfig::from_env()?);
//!     let result = pipeline.run_into(&inputs, &mut sink)?;
//!     println!("version {}", result.stats.version);
//!     Ok(())
//! }
//! ```

pub mod codesystem;
pub mod hgnc;
