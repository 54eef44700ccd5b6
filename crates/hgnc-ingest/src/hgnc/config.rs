//! HGNC generator configuration

use hgnc_common::{HgncError, Result};

// ============================================================================
// Generator Configuration Constants
// ============================================================================

/// Publisher recorded on both code systems
pub const DEFAULT_PUBLISHER: &str = "CSIRO";

/// Canonical URL of the gene ids code system
pub const GENE_IDS_URL: &str = "http://www.genenames.org/geneId";

/// Canonical URL of the gene groups code system
pub const GENE_GROUPS_URL: &str = "http://www.genenames.org/genegroup";

/// Descriptive metadata stamped on a generated code system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMetadata {
    pub url: String,
    pub name: String,
    pub title: String,
    pub description: String,
    pub publisher: String,
}

impl CatalogMetadata {
    pub fn gene_ids() -> Self {
        Self {
            url: GENE_IDS_URL.to_string(),
            name: "HGNCGeneIDs".to_string(),
            title: "HGNC Gene IDs".to_string(),
            description: "Code system for gene IDs from HGNC.".to_string(),
            publisher: DEFAULT_PUBLISHER.to_string(),
        }
    }

    pub fn gene_groups() -> Self {
        Self {
            url: GENE_GROUPS_URL.to_string(),
            name: "HGNCGeneGroups".to_string(),
            title: "HGNC Gene Groups".to_string(),
            description: "Code system for gene groups from HGNC.".to_string(),
            publisher: DEFAULT_PUBLISHER.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self
    }

    fn validate(&self, label: &str) -> Result<()> {
        for (field, value) in [
            ("url", &self.url),
            ("name", &self.name),
            ("title", &self.title),
            ("publisher", &self.publisher),
        ] {
            if value.trim().is_empty() {
                return Err(HgncError::config(format!("{} {} cannot be empty", label, field)));
            }
        }
        Ok(())
    }
}

/// How gene group membership is represented on gene id concepts.
///
/// `String` is the default because some terminology servers reject
/// Coding-typed properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupPropertyMode {
    /// `valueString` holding the group id
    #[default]
    String,
    /// `valueCoding` into the gene groups code system
    Coding,
}

impl std::str::FromStr for GroupPropertyMode {
    type Err = HgncError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" => Ok(GroupPropertyMode::String),
            "coding" => Ok(GroupPropertyMode::Coding),
            _ => Err(HgncError::config(format!("Invalid group property mode: {}", s))),
        }
    }
}

impl std::fmt::Display for GroupPropertyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupPropertyMode::String => write!(f, "string"),
            GroupPropertyMode::Coding => write!(f, "coding"),
        }
    }
}

/// Configuration for a generator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Metadata for the gene ids code system
    pub gene_ids: CatalogMetadata,
    /// Metadata for the gene groups code system
    pub gene_groups: CatalogMetadata,
    /// Representation of the `groupId` property
    pub group_property: GroupPropertyMode,
    /// Skip the first row of the closure CSV
    pub closure_has_header: bool,
    /// Indent written JSON
    pub pretty_output: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            gene_ids: CatalogMetadata::gene_ids(),
            gene_groups: CatalogMetadata::gene_groups(),
            group_property: GroupPropertyMode::default(),
            closure_has_header: false,
            pretty_output: true,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from `.env` and the process environment
    ///
    /// Environment variables:
    /// - `HGNC_PUBLISHER`: publisher for both code systems
    /// - `HGNC_GENE_IDS_URL`: url of the gene ids code system
    /// - `HGNC_GENE_GROUPS_URL`: url of the gene groups code system
    /// - `HGNC_GROUP_PROPERTY`: `string` or `coding`
    /// - `HGNC_CLOSURE_HAS_HEADER`: true/false
    /// - `HGNC_PRETTY_OUTPUT`: true/false
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::default().merge_vars(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay values found through `lookup` (an environment-like source)
    pub fn merge_vars<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(publisher) = lookup("HGNC_PUBLISHER") {
            self.gene_ids.publisher = publisher.clone();
            self.gene_groups.publisher = publisher;
        }

        if let Some(url) = lookup("HGNC_GENE_IDS_URL") {
            self.gene_ids.url = url;
        }

        if let Some(url) = lookup("HGNC_GENE_GROUPS_URL") {
            self.gene_groups.url = url;
        }

        if let Some(mode) = lookup("HGNC_GROUP_PROPERTY") {
            self.group_property = mode.parse()?;
        }

        if let Some(value) = lookup("HGNC_CLOSURE_HAS_HEADER") {
            self.closure_has_header = parse_flag("HGNC_CLOSURE_HAS_HEADER", &value)?;
        }

        if let Some(value) = lookup("HGNC_PRETTY_OUTPUT") {
            self.pretty_output = parse_flag("HGNC_PRETTY_OUTPUT", &value)?;
        }

        Ok(self)
    }

    pub fn with_group_property(mut self, mode: GroupPropertyMode) -> Self {
        self.group_property = mode;
        self
    }

    pub fn with_closure_header(mut self, has_header: bool) -> Self {
        self.closure_has_header = has_header;
        self
    }

    pub fn with_pretty_output(mut self, pretty: bool) -> Self {
        self.pretty_output = pretty;
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        let publisher = publisher.into();
        self.gene_ids.publisher = publisher.clone();
        self.gene_groups.publisher = publisher;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.gene_ids.validate("gene ids")?;
        self.gene_groups.validate("gene groups")?;

        if self.gene_ids.url == self.gene_groups.url {
            return Err(HgncError::config(format!(
                "gene ids and gene groups code systems share the url {}",
                self.gene_ids.url
            )));
        }

        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(HgncError::config(format!("{} must be true or false, got '{}'", key, value))),
    }
}
