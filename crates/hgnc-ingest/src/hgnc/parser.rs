// HGNC Parsers (complete set JSON, gene group JSON, family closure CSV)

use crate::hgnc::models::{
    DatasetVersion, GeneDataset, GeneRecord, GroupDataset, GroupMembership, GroupMetadata,
    ParentEdges,
};
use crate::hgnc::{Dataset, IngestError, Result};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use tracing::{debug, info, instrument, warn};

/// Direct parents sit exactly one step up in the closure table
const DIRECT_PARENT_DISTANCE: i64 = 1;

// ============================================================================
// Gene Record Parser (hgnc_complete_set.json)
// ============================================================================

/// Parses the HGNC complete set (`response.docs[]`) into gene records and
/// derives the dataset version from their `date_modified` values.
pub struct GeneRecordParser;

impl GeneRecordParser {
    /// Parse from any reader; the reader is fully consumed
    #[instrument(skip_all)]
    pub fn parse_reader<R: Read>(reader: R) -> Result<GeneDataset> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::parse_value(document)
    }

    pub fn parse_str(content: &str) -> Result<GeneDataset> {
        let document: Value = serde_json::from_str(content)?;
        Self::parse_value(document)
    }

    pub fn parse_value(document: Value) -> Result<GeneDataset> {
        let response = document
            .get("response")
            .ok_or_else(|| IngestError::structure(Dataset::Genes, "an attribute \"response\""))?;
        let docs = response
            .get("docs")
            .ok_or_else(|| {
                IngestError::structure(Dataset::Genes, "an attribute \"response.docs\"")
            })?
            .as_array()
            .ok_or_else(|| {
                IngestError::structure(Dataset::Genes, "\"response.docs\" to be an array")
            })?;

        let mut records: BTreeMap<String, GeneRecord> = BTreeMap::new();
        let mut version = DatasetVersion::default();

        for (index, doc) in docs.iter().enumerate() {
            let record = index + 1;
            let gene = Self::parse_doc(doc, record)?;

            if !is_iso_date(&gene.date_modified) {
                warn!(
                    hgnc_id = %gene.id,
                    date_modified = %gene.date_modified,
                    "date_modified is not a YYYY-MM-DD date; using it verbatim"
                );
            }
            version.observe(&gene.date_modified);

            match records.entry(gene.id.clone()) {
                Entry::Occupied(_) => {
                    return Err(IngestError::DuplicateId {
                        dataset: Dataset::Genes,
                        id: gene.id,
                    });
                },
                Entry::Vacant(slot) => {
                    slot.insert(gene);
                },
            }
        }

        info!(genes = records.len(), version = %version, "Parsed HGNC gene dataset");

        Ok(GeneDataset::new(records, version))
    }

    fn parse_doc(doc: &Value, record: usize) -> Result<GeneRecord> {
        let entry = as_object(doc, Dataset::Genes, record)?;

        let id = required_str(entry, Dataset::Genes, record, "hgnc_id")?;
        let symbol = required_str(entry, Dataset::Genes, record, "symbol")?;
        let mut gene = GeneRecord::new(id, symbol);

        if let Some(date) = optional_str(entry, Dataset::Genes, record, "date_modified")? {
            gene.date_modified = date.to_string();
        }

        if let Some(previous) = present(entry, "prev_symbol") {
            gene.previous_symbols = string_set(previous, Dataset::Genes, record, "prev_symbol")?;
        }

        Ok(gene)
    }
}

// ============================================================================
// Group Membership Parser (gene group download-all.json)
// ============================================================================

/// Parses the flat gene group download: one entry per gene/group pair
pub struct GroupMembershipParser;

impl GroupMembershipParser {
    /// Parse from any reader; the reader is fully consumed
    #[instrument(skip_all)]
    pub fn parse_reader<R: Read>(reader: R) -> Result<GroupDataset> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::parse_value(document)
    }

    pub fn parse_str(content: &str) -> Result<GroupDataset> {
        let document: Value = serde_json::from_str(content)?;
        Self::parse_value(document)
    }

    pub fn parse_value(document: Value) -> Result<GroupDataset> {
        let entries = document
            .as_array()
            .ok_or_else(|| IngestError::structure(Dataset::Groups, "a top-level JSON array"))?;

        let mut metadata = GroupMetadata::new();
        let mut membership = GroupMembership::new();

        for (index, value) in entries.iter().enumerate() {
            let record = index + 1;
            let entry = as_object(value, Dataset::Groups, record)?;

            let group_id = match present(entry, "groupID") {
                Some(raw) => canonical_group_id(raw, record)?,
                None => {
                    return Err(IngestError::MissingField {
                        dataset: Dataset::Groups,
                        record,
                        field: "groupID",
                    })
                },
            };
            let group_name = required_str(entry, Dataset::Groups, record, "groupName")?;
            let gene_id = required_str(entry, Dataset::Groups, record, "hgncID")?;

            if let Some(previous) = metadata.insert(group_id.clone(), group_name.to_string()) {
                if previous != group_name {
                    debug!(
                        group_id = %group_id,
                        previous = %previous,
                        current = %group_name,
                        "Group name changed between entries; keeping the latest"
                    );
                }
            }

            membership
                .entry(gene_id.to_string())
                .or_default()
                .insert(group_id);
        }

        let groups = GroupDataset::new(metadata, membership);

        info!(
            entries = entries.len(),
            groups = groups.group_count(),
            genes = groups.membership().len(),
            "Parsed HGNC gene group dataset"
        );

        Ok(groups)
    }
}

/// Canonical decimal form of a group id given as a JSON integer, a float
/// without a fractional part, or an integer string, so `12`, `12.0`, `"12"`
/// and `"012"` all become `"12"`.
fn canonical_group_id(value: &Value, record: usize) -> Result<String> {
    let invalid = |reason: String| IngestError::InvalidField {
        dataset: Dataset::Groups,
        record,
        field: "groupID",
        reason,
    };

    match value {
        Value::Number(n) => n
            .as_i64()
            .map(|id| id.to_string())
            .or_else(|| n.as_u64().map(|id| id.to_string()))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| (f as i64).to_string())
            })
            .ok_or_else(|| invalid(format!("expected an integer, found {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(|id| id.to_string())
            .map_err(|_| invalid(format!("expected an integer, found \"{}\"", s))),
        other => Err(invalid(format!("expected an integer, found {}", json_kind(other)))),
    }
}

// ============================================================================
// Hierarchy Parser (family closure CSV)
// ============================================================================

/// Parses `parent,child,distance` closure rows into direct parent edges.
///
/// Rows with a distance other than 1 are transitive ancestry (or the
/// distance-0 self rows) and are skipped. Ids are not checked against the
/// group dataset here.
#[derive(Debug, Clone, Default)]
pub struct HierarchyParser {
    has_header: bool,
}

impl HierarchyParser {
    /// Parser for headerless closure files
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser that skips the first row as a header
    pub fn with_header() -> Self {
        Self { has_header: true }
    }

    /// Parse CSV from any reader; the reader is fully consumed
    #[instrument(skip_all, fields(has_header = self.has_header))]
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<ParentEdges> {
        let mut rows = csv::ReaderBuilder::new()
            .has_headers(self.has_header)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut builder = EdgeBuilder::default();
        for result in rows.records() {
            let row = result?;
            let line = row
                .position()
                .map(|position| position.line() as usize)
                .unwrap_or(builder.rows + 1);
            builder.push(row.get(0), row.get(1), row.get(2), line)?;
        }

        Ok(builder.finish())
    }

    pub fn parse_str(&self, content: &str) -> Result<ParentEdges> {
        self.parse_reader(content.as_bytes())
    }

    /// Build edges from already split `(parent, child, distance)` triples
    pub fn parse_rows<I, S>(&self, rows: I) -> Result<ParentEdges>
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: AsRef<str>,
    {
        let mut builder = EdgeBuilder::default();
        for (index, (parent, child, distance)) in rows.into_iter().enumerate() {
            builder.push(
                Some(parent.as_ref().trim()),
                Some(child.as_ref().trim()),
                Some(distance.as_ref().trim()),
                index + 1,
            )?;
        }

        Ok(builder.finish())
    }
}

#[derive(Default)]
struct EdgeBuilder {
    edges: BTreeMap<String, BTreeSet<String>>,
    rows: usize,
    skipped: usize,
}

impl EdgeBuilder {
    fn push(
        &mut self,
        parent: Option<&str>,
        child: Option<&str>,
        distance: Option<&str>,
        record: usize,
    ) -> Result<()> {
        let parent = closure_field(parent, "parent", record)?;
        let child = closure_field(child, "child", record)?;
        let distance = closure_field(distance, "distance", record)?;

        let distance: i64 = distance.parse().map_err(|_| IngestError::InvalidField {
            dataset: Dataset::Closure,
            record,
            field: "distance",
            reason: format!("expected an integer, found \"{}\"", distance),
        })?;

        self.rows += 1;
        if distance != DIRECT_PARENT_DISTANCE {
            self.skipped += 1;
            return Ok(());
        }

        self.edges
            .entry(child.to_string())
            .or_default()
            .insert(parent.to_string());
        Ok(())
    }

    fn finish(self) -> ParentEdges {
        let edges = ParentEdges::new(self.edges);
        info!(
            rows = self.rows,
            indirect = self.skipped,
            children = edges.child_count(),
            direct_edges = edges.edge_count(),
            "Parsed gene group closure"
        );
        edges
    }
}

fn closure_field<'a>(value: Option<&'a str>, field: &'static str, record: usize) -> Result<&'a str> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(IngestError::MissingField {
            dataset: Dataset::Closure,
            record,
            field,
        })
}

// ============================================================================
// JSON field helpers
// ============================================================================

fn as_object(value: &Value, dataset: Dataset, record: usize) -> Result<&Map<String, Value>> {
    value.as_object().ok_or_else(|| IngestError::InvalidRecord {
        dataset,
        record,
        reason: format!("expected a JSON object, found {}", json_kind(value)),
    })
}

/// Field value, treating an explicit `null` as absent
fn present<'a>(entry: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    entry.get(field).filter(|value| !value.is_null())
}

fn required_str<'a>(
    entry: &'a Map<String, Value>,
    dataset: Dataset,
    record: usize,
    field: &'static str,
) -> Result<&'a str> {
    optional_str(entry, dataset, record, field)?.ok_or(IngestError::MissingField {
        dataset,
        record,
        field,
    })
}

fn optional_str<'a>(
    entry: &'a Map<String, Value>,
    dataset: Dataset,
    record: usize,
    field: &'static str,
) -> Result<Option<&'a str>> {
    match present(entry, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(IngestError::InvalidField {
            dataset,
            record,
            field,
            reason: format!("expected a string, found {}", json_kind(other)),
        }),
    }
}

fn string_set(
    value: &Value,
    dataset: Dataset,
    record: usize,
    field: &'static str,
) -> Result<BTreeSet<String>> {
    let invalid = |found: &Value| IngestError::InvalidField {
        dataset,
        record,
        field,
        reason: format!("expected an array of strings, found {}", json_kind(found)),
    };

    value
        .as_array()
        .ok_or_else(|| invalid(value))?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid(item)))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn is_iso_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
