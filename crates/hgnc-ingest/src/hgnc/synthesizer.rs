//! Code system synthesis
//!
//! Builds the gene ids and gene groups code systems from parsed datasets.
//! One synthesizer covers every combination of inputs: group data and
//! hierarchy data are optional, and their absence only removes the
//! properties derived from them.
//!
//! # Root policy
//!
//! A group is a root exactly when the closure table records no direct parent
//! for it. Parent references that do not resolve to a known group are
//! dropped with a [`Diagnostic`], but they still count as recorded parents,
//! so a group whose only parents dangle is emitted with `root = false`.

use tracing::{debug, info, instrument, warn};

use crate::codesystem::{
    CodeSystem, Coding, Concept, ConceptProperty, ContentMode, Designation, PropertyDefinition,
    PropertyType, PropertyValue, PublicationStatus,
};
use crate::hgnc::config::{CatalogMetadata, GeneratorConfig, GroupPropertyMode};
use crate::hgnc::models::{DatasetVersion, GeneDataset, GroupDataset, ParentEdges};

/// Gene concept property listing the groups the gene belongs to
pub const GROUP_ID_PROPERTY: &str = "groupId";

/// Group concept property pointing at a direct parent group
pub const PARENT_PROPERTY: &str = "parent";

/// Group concept property flagging groups without a direct parent
pub const ROOT_PROPERTY: &str = "root";

/// Recoverable inconsistency found while synthesizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Closure row names a parent that is not a known gene group
    DanglingParent { group_id: String, parent_id: String },
    /// Gene group entry references a gene absent from the gene dataset
    UnknownGene { gene_id: String, groups: usize },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::DanglingParent {
                group_id,
                parent_id,
            } => write!(f, "group {} has unknown parent {}", group_id, parent_id),
            Diagnostic::UnknownGene { gene_id, groups } => {
                write!(f, "gene {} is a member of {} group(s) but is not in the gene dataset", gene_id, groups)
            },
        }
    }
}

/// Both code systems plus whatever was dropped along the way
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    pub gene_ids: CodeSystem,
    /// Present only when group data was supplied
    pub gene_groups: Option<CodeSystem>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SynthesisOutput {
    pub fn dangling_parents(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::DanglingParent { .. }))
            .count()
    }
}

pub struct CatalogSynthesizer {
    config: GeneratorConfig,
}

impl CatalogSynthesizer {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Build every code system the supplied inputs allow.
    ///
    /// `hierarchy` is only meaningful together with `groups`; on its own it
    /// is ignored.
    #[instrument(skip_all, fields(version = %genes.version()))]
    pub fn synthesize(
        &self,
        genes: &GeneDataset,
        groups: Option<&GroupDataset>,
        hierarchy: Option<&ParentEdges>,
    ) -> SynthesisOutput {
        let (gene_ids, mut diagnostics) = self.gene_id_catalog(genes, groups);

        let gene_groups = match (groups, hierarchy) {
            (Some(groups), hierarchy) => {
                let (catalog, group_diagnostics) =
                    self.gene_group_catalog(groups, hierarchy, genes.version());
                diagnostics.extend(group_diagnostics);
                Some(catalog)
            },
            (None, Some(_)) => {
                warn!("Hierarchy supplied without gene groups; ignoring it");
                None
            },
            (None, None) => None,
        };

        SynthesisOutput {
            gene_ids,
            gene_groups,
            diagnostics,
        }
    }

    /// Gene ids code system: one concept per gene, previous symbols as
    /// synonyms, and group memberships when `groups` is given.
    pub fn gene_id_catalog(
        &self,
        genes: &GeneDataset,
        groups: Option<&GroupDataset>,
    ) -> (CodeSystem, Vec<Diagnostic>) {
        let mut concepts = Vec::with_capacity(genes.len());

        for gene in genes.records() {
            let mut concept = Concept::new(&gene.id, &gene.symbol);
            concept.designation = gene
                .previous_symbols
                .iter()
                .map(Designation::synonym)
                .collect();

            if let Some(groups) = groups {
                if let Some(group_ids) = groups.groups_for_gene(&gene.id) {
                    concept.property.extend(group_ids.iter().map(|group_id| {
                        ConceptProperty::new(GROUP_ID_PROPERTY, self.group_value(group_id, groups))
                    }));
                }
            }

            concepts.push(concept);
        }

        let properties = match groups {
            Some(_) => vec![PropertyDefinition::new(
                GROUP_ID_PROPERTY,
                "Gene group ids.",
                match self.config.group_property {
                    GroupPropertyMode::String => PropertyType::String,
                    GroupPropertyMode::Coding => PropertyType::Coding,
                },
            )],
            None => Vec::new(),
        };

        let diagnostics = groups
            .map(|groups| unknown_genes(genes, groups))
            .unwrap_or_default();

        info!(
            concepts = concepts.len(),
            with_groups = groups.is_some(),
            "Built gene ids code system"
        );

        (
            build_code_system(&self.config.gene_ids, genes.version(), properties, concepts),
            diagnostics,
        )
    }

    /// Gene groups code system: one concept per group, with `parent` and
    /// `root` properties when `hierarchy` is given.
    pub fn gene_group_catalog(
        &self,
        groups: &GroupDataset,
        hierarchy: Option<&ParentEdges>,
        version: &DatasetVersion,
    ) -> (CodeSystem, Vec<Diagnostic>) {
        let mut concepts = Vec::with_capacity(groups.group_count());
        let mut diagnostics = Vec::new();

        for (group_id, group_name) in groups.groups() {
            let mut concept = Concept::new(group_id, group_name);
            if let Some(edges) = hierarchy {
                attach_hierarchy(&mut concept, groups, edges, &mut diagnostics);
            }
            concepts.push(concept);
        }

        let properties = match hierarchy {
            Some(_) => vec![
                PropertyDefinition::new(PARENT_PROPERTY, "Parent gene group.", PropertyType::Code),
                PropertyDefinition::new(
                    ROOT_PROPERTY,
                    "Whether the gene group has no parent.",
                    PropertyType::Boolean,
                ),
            ],
            None => Vec::new(),
        };

        info!(
            concepts = concepts.len(),
            with_hierarchy = hierarchy.is_some(),
            dangling_parents = diagnostics.len(),
            "Built gene groups code system"
        );

        (
            build_code_system(&self.config.gene_groups, version, properties, concepts),
            diagnostics,
        )
    }

    fn group_value(&self, group_id: &str, groups: &GroupDataset) -> PropertyValue {
        match self.config.group_property {
            GroupPropertyMode::String => PropertyValue::String(group_id.to_string()),
            GroupPropertyMode::Coding => {
                let mut coding = Coding::new(&self.config.gene_groups.url, group_id);
                coding.display = groups.group_name(group_id).map(str::to_string);
                PropertyValue::Coding(coding)
            },
        }
    }
}

fn attach_hierarchy(
    concept: &mut Concept,
    groups: &GroupDataset,
    edges: &ParentEdges,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let parents = match edges.parents_of(&concept.code) {
        Some(parents) if !parents.is_empty() => parents,
        _ => {
            concept
                .property
                .push(ConceptProperty::new(ROOT_PROPERTY, PropertyValue::Boolean(true)));
            return;
        },
    };

    for parent_id in parents {
        if !groups.contains_group(parent_id) {
            warn!(
                group_id = %concept.code,
                parent_id = %parent_id,
                "Parent group not found; dropping parent reference"
            );
            diagnostics.push(Diagnostic::DanglingParent {
                group_id: concept.code.clone(),
                parent_id: parent_id.clone(),
            });
            continue;
        }

        concept.property.push(ConceptProperty::new(
            PARENT_PROPERTY,
            PropertyValue::Code(parent_id.clone()),
        ));
    }

    concept
        .property
        .push(ConceptProperty::new(ROOT_PROPERTY, PropertyValue::Boolean(false)));
}

fn unknown_genes(genes: &GeneDataset, groups: &GroupDataset) -> Vec<Diagnostic> {
    let diagnostics: Vec<Diagnostic> = groups
        .membership()
        .iter()
        .filter(|(gene_id, _)| !genes.contains(gene_id))
        .map(|(gene_id, group_ids)| {
            debug!(gene_id = %gene_id, "Group membership for unknown gene");
            Diagnostic::UnknownGene {
                gene_id: gene_id.clone(),
                groups: group_ids.len(),
            }
        })
        .collect();

    if !diagnostics.is_empty() {
        warn!(
            genes = diagnostics.len(),
            "Group memberships reference genes missing from the gene dataset"
        );
    }

    diagnostics
}

fn build_code_system(
    metadata: &CatalogMetadata,
    version: &DatasetVersion,
    property: Vec<PropertyDefinition>,
    concept: Vec<Concept>,
) -> CodeSystem {
    CodeSystem {
        resource_type: "CodeSystem".to_string(),
        url: metadata.url.clone(),
        name: metadata.name.clone(),
        title: metadata.title.clone(),
        status: PublicationStatus::Active,
        experimental: false,
        publisher: metadata.publisher.clone(),
        description: metadata.description.clone(),
        case_sensitive: true,
        version: version.to_string(),
        content: ContentMode::Complete,
        count: concept.len(),
        property,
        concept,
    }
}
