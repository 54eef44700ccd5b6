// HGNC Data Models
//
// Everything here is built once by a parser and read-only afterwards.
// Ordered collections keep every downstream iteration deterministic.

use std::collections::{BTreeMap, BTreeSet};

/// Floor for the dataset version and the value assumed for records
/// without a `date_modified`.
pub const DEFAULT_DATE_MODIFIED: &str = "1970-01-01";

/// Group id -> group name
pub type GroupMetadata = BTreeMap<String, String>;

/// Gene id -> ids of the groups the gene belongs to
pub type GroupMembership = BTreeMap<String, BTreeSet<String>>;

// ============================================================================
// Gene Record
// ============================================================================

/// One gene from the HGNC complete set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneRecord {
    /// HGNC identifier (e.g., "HGNC:5")
    pub id: String,

    /// Approved symbol (e.g., "A1BG")
    pub symbol: String,

    /// Symbols previously approved for this gene
    pub previous_symbols: BTreeSet<String>,

    /// Last modification date, ISO-8601 (e.g., "2023-01-20")
    pub date_modified: String,
}

impl GeneRecord {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>) -> Self {
        GeneRecord {
            id: id.into(),
            symbol: symbol.into(),
            previous_symbols: BTreeSet::new(),
            date_modified: DEFAULT_DATE_MODIFIED.to_string(),
        }
    }

    pub fn with_previous_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.previous_symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_date_modified(mut self, date: impl Into<String>) -> Self {
        self.date_modified = date.into();
        self
    }
}

// ============================================================================
// Dataset Version
// ============================================================================

/// Version shared by both code systems: the latest `date_modified` seen.
///
/// ISO-8601 dates order correctly as strings, so the maximum is taken
/// lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatasetVersion(String);

impl DatasetVersion {
    pub fn new(version: impl Into<String>) -> Self {
        DatasetVersion(version.into())
    }

    /// Raise the version to `date` if it is later
    pub fn observe(&mut self, date: &str) {
        if self.0.as_str() < date {
            self.0 = date.to_string();
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DatasetVersion {
    fn default() -> Self {
        DatasetVersion(DEFAULT_DATE_MODIFIED.to_string())
    }
}

impl std::fmt::Display for DatasetVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Gene Dataset
// ============================================================================

/// Parsed HGNC complete set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneDataset {
    records: BTreeMap<String, GeneRecord>,
    version: DatasetVersion,
}

impl GeneDataset {
    pub fn new(records: BTreeMap<String, GeneRecord>, version: DatasetVersion) -> Self {
        GeneDataset { records, version }
    }

    pub fn get(&self, id: &str) -> Option<&GeneRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Records in ascending id order
    pub fn records(&self) -> impl Iterator<Item = &GeneRecord> {
        self.records.values()
    }

    pub fn version(&self) -> &DatasetVersion {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// Group Dataset
// ============================================================================

/// Parsed gene group download: group names plus gene memberships
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDataset {
    metadata: GroupMetadata,
    membership: GroupMembership,
}

impl GroupDataset {
    pub fn new(metadata: GroupMetadata, membership: GroupMembership) -> Self {
        GroupDataset {
            metadata,
            membership,
        }
    }

    pub fn group_name(&self, group_id: &str) -> Option<&str> {
        self.metadata.get(group_id).map(String::as_str)
    }

    pub fn contains_group(&self, group_id: &str) -> bool {
        self.metadata.contains_key(group_id)
    }

    /// Groups in ascending id order as `(id, name)`
    pub fn groups(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metadata
            .iter()
            .map(|(id, name)| (id.as_str(), name.as_str()))
    }

    pub fn groups_for_gene(&self, gene_id: &str) -> Option<&BTreeSet<String>> {
        self.membership.get(gene_id)
    }

    /// Gene ids that have at least one membership
    pub fn member_gene_ids(&self) -> impl Iterator<Item = &str> {
        self.membership.keys().map(String::as_str)
    }

    pub fn metadata(&self) -> &GroupMetadata {
        &self.metadata
    }

    pub fn membership(&self) -> &GroupMembership {
        &self.membership
    }

    pub fn group_count(&self) -> usize {
        self.metadata.len()
    }

    /// Number of distinct gene/group associations
    pub fn association_count(&self) -> usize {
        self.membership.values().map(BTreeSet::len).sum()
    }
}

// ============================================================================
// Parent Edges
// ============================================================================

/// Direct parent adjacency: child group id -> parent group ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentEdges {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl ParentEdges {
    pub fn new(edges: BTreeMap<String, BTreeSet<String>>) -> Self {
        ParentEdges { edges }
    }

    pub fn parents_of(&self, child: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(child)
    }

    /// Whether any direct parent was recorded for `child`, resolvable or not
    pub fn has_parents(&self, child: &str) -> bool {
        self.edges.get(child).is_some_and(|parents| !parents.is_empty())
    }

    pub fn child_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl FromIterator<(String, String)> for ParentEdges {
    /// Collect `(child, parent)` pairs
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut edges: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (child, parent) in iter {
            edges.entry(child).or_default().insert(parent);
        }
        ParentEdges { edges }
    }
}
