//! Code system record shapes
//!
//! Field names follow the FHIR R4 `CodeSystem` JSON representation so the
//! written files load directly into a terminology server.

use serde::{Deserialize, Serialize};

/// SNOMED CT system used for designation use codes
pub const SNOMED_SYSTEM: &str = "http://snomed.info/sct";

/// SNOMED CT "Synonym" description type
pub const SYNONYM_CODE: &str = "900000000000013009";

/// A versioned, named set of concepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSystem {
    #[serde(default = "CodeSystem::resource_type")]
    pub resource_type: String,
    pub url: String,
    pub name: String,
    pub title: String,
    pub status: PublicationStatus,
    pub experimental: bool,
    pub publisher: String,
    pub description: String,
    pub case_sensitive: bool,
    pub version: String,
    pub content: ContentMode,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property: Vec<PropertyDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concept: Vec<Concept>,
}

impl CodeSystem {
    fn resource_type() -> String {
        "CodeSystem".to_string()
    }

    pub fn concept(&self, code: &str) -> Option<&Concept> {
        self.concept.iter().find(|c| c.code == code)
    }

    pub fn property_definition(&self, code: &str) -> Option<&PropertyDefinition> {
        self.property.iter().find(|p| p.code == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Draft,
    Active,
    Retired,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentMode {
    NotPresent,
    Example,
    Fragment,
    Complete,
    Supplement,
}

/// Declared concept property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub code: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
}

impl PropertyDefinition {
    pub fn new(code: impl Into<String>, description: impl Into<String>, kind: PropertyType) -> Self {
        PropertyDefinition {
            code: code.into(),
            description: description.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    #[serde(rename = "code")]
    Code,
    #[serde(rename = "Coding")]
    Coding,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "boolean")]
    Boolean,
}

/// One entry of a code system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub code: String,
    pub display: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub designation: Vec<Designation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property: Vec<ConceptProperty>,
}

impl Concept {
    pub fn new(code: impl Into<String>, display: impl Into<String>) -> Self {
        Concept {
            code: code.into(),
            display: display.into(),
            designation: Vec::new(),
            property: Vec::new(),
        }
    }

    /// All values of the property named `code`, in emission order
    pub fn properties<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a PropertyValue> + 'a {
        self.property
            .iter()
            .filter(move |p| p.code == code)
            .map(|p| &p.value)
    }

    pub fn synonyms(&self) -> impl Iterator<Item = &str> {
        self.designation
            .iter()
            .filter(|d| d.usage.as_ref().is_some_and(|u| u.code == SYNONYM_CODE))
            .map(|d| d.value.as_str())
    }
}

/// Alternate label with a usage classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Designation {
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Coding>,
    pub value: String,
}

impl Designation {
    pub fn synonym(value: impl Into<String>) -> Self {
        Designation {
            usage: Some(Coding::new(SNOMED_SYSTEM, SYNONYM_CODE).with_display("Synonym")),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    pub fn new(system: impl Into<String>, code: impl Into<String>) -> Self {
        Coding {
            system: Some(system.into()),
            code: code.into(),
            display: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }
}

/// Property occurrence on a concept: `{"code": ..., "value[x]": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptProperty {
    pub code: String,
    #[serde(flatten)]
    pub value: PropertyValue,
}

impl ConceptProperty {
    pub fn new(code: impl Into<String>, value: PropertyValue) -> Self {
        ConceptProperty {
            code: code.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    #[serde(rename = "valueCode")]
    Code(String),
    #[serde(rename = "valueCoding")]
    Coding(Coding),
    #[serde(rename = "valueString")]
    String(String),
    #[serde(rename = "valueBoolean")]
    Boolean(bool),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Code(v) | PropertyValue::String(v) => Some(v),
            PropertyValue::Coding(coding) => Some(&coding.code),
            PropertyValue::Boolean(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}
