//! Output side of the generator: code system records and where they go

pub mod model;
pub mod sink;

pub use model::{
    CodeSystem, Coding, Concept, ConceptProperty, ContentMode, Designation, PropertyDefinition,
    PropertyType, PropertyValue, PublicationStatus, SNOMED_SYSTEM, SYNONYM_CODE,
};
pub use sink::{CatalogKind, CatalogSink, JsonFileSink, MemorySink};
