//! docmatch Resolver
//!
//! Decides which registered document template an extracted document matches
//! and fills every field of that template with a typed, confidence-scored value.
//!
//! # Overview
//!
//! The Resolver combines local, deterministic evidence (keywords, patterns,
//! entity categories, field-name overlap) with two optional remote
//! collaborators: a semantic classifier and an entity/key-phrase analyzer.
//! When a collaborator is slow, down or returns garbage, a local fallback
//! takes its place and the resolution records why.
//!
//! # Architecture
//!
//! ```text
//! Input → Normalizer → { Scorer, Classifier, Analyzer } → Combiner → Cascade → Resolution
//! ```
//!
//! # Key Features
//!
//! - **Multi-signal scoring**: keyword, pattern, entity and field-name evidence per template
//! - **Graceful degradation**: timeouts, retries and a health cache around remote calls
//! - **Field cascade**: direct, entity, pattern and context strategies with type coercion
//! - **Traceability**: per-template score breakdown, reasoning string, diagnostics and audit events
//!
//! # Example Usage
//!
//! ```no_run
//! use docmatch_domain::ExtractedDocument;
//! use docmatch_llm::Offline;
//! use docmatch_resolver::{ResolutionRequest, Resolver, ResolverConfig, StaticRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = StaticRegistry::builtin()?;
//! let resolver = Resolver::new(registry, Offline, Offline, ResolverConfig::default())?;
//!
//! let document = ExtractedDocument::from_text("Application for earned leave from 01-02-2025");
//! let resolution = resolver.resolve(ResolutionRequest::new(document)).await?;
//!
//! println!("Template: {:?}", resolution.template_id());
//! println!("Confidence: {:.2}", resolution.confidence);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod adapter;
mod audit;
mod cascade;
mod coerce;
mod combine;
mod config;
mod error;
mod export;
mod fallback;
mod health;
mod normalize;
mod patterns;
mod reasoning;
mod registry;
mod resolver;
mod scoring;
mod types;


pub use adapter::{AdapterFailure, CallPolicy};
pub use audit::{MemoryAuditSink, TracingAuditSink};
pub use cascade::{extract_fields, CascadeInput};
pub use coerce::{coerce, default_value, parse_date, parse_number};
pub use combine::{combine, CombinedDecision, EXTERNAL_WEIGHT, LOCAL_WEIGHT};
pub use config::{FallbackConfig, FallbackRule, ResolverConfig};
pub use error::{RegistryError, ResolverError};
pub use export::{ExportMetadata, ResolutionExport};
pub use fallback::{fallback_analysis, FallbackClassifier, FALLBACK_MARKER};
pub use health::{HealthCache, Service};
pub use normalize::{flatten_value, normalize};
pub use reasoning::{overall_confidence, ClassifierTrace};
pub use registry::{parse_templates_json, parse_templates_toml, FileRegistry, StaticRegistry};
pub use resolver::Resolver;
pub use scoring::{normalize_scores, score_templates, ScoringInput};
pub use types::{DocumentInput, NormalizedSignals, ResolutionRequest};
