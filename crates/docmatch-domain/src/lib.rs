//! docmatch Domain Layer
//!
//! This crate contains the data model shared by every other docmatch crate and
//! the trait interfaces for the collaborators the resolution engine talks to.
//!
//! ## Key Concepts
//!
//! - **Template**: a named schema of typed fields a document may be mapped onto
//! - **Extracted document**: digitized text plus optional entities and key/value pairs
//! - **Field result**: a typed value for one template field, with confidence and source
//! - **Resolution**: the chosen template, its populated fields and the scoring trace
//!
//! ## Architecture
//!
//! - No engine logic lives here, only values and their invariants
//! - Collaborators (template registry, semantic classifier, text analyzer,
//!   audit sink) are traits; implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod confidence;
pub mod document;
pub mod field;
pub mod resolution;
pub mod template;
pub mod traits;

// Re-exports for convenience
pub use audit::{AuditEvent, AuditEventKind};
pub use document::{Entity, ExtractedDocument, KvPair, LineSignal};
pub use field::{FieldResult, FieldSource, FieldValue};
pub use resolution::{Diagnostic, ResolutionId, ScoreBreakdown, TemplateResolution};
pub use template::{FieldSpec, FieldType, TemplateDefinition, TemplateDescriptor};
