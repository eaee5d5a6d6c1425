//! Core Resolver implementation

use crate::adapter::{call_with_policy, AdapterFailure, CallPolicy};
use crate::audit::TracingAuditSink;
use crate::cascade::{extract_fields, CascadeInput};
use crate::combine::combine;
use crate::config::ResolverConfig;
use crate::error::ResolverError;
use crate::fallback::{fallback_analysis, FallbackClassifier};
use crate::health::{HealthCache, Service};
use crate::normalize::normalize;
use crate::reasoning::{build_reasoning, overall_confidence, ClassifierTrace, ReasoningParts};
use crate::scoring::{normalize_scores, score_templates, ScoringInput};
use crate::types::{NormalizedSignals, ResolutionRequest};
use chrono::Utc;
use docmatch_domain::traits::{
    AuditSink, Classification, ClassificationRequest, SemanticClassifier, TemplateRegistry,
    TextAnalysis, TextAnalyzer,
};
use docmatch_domain::{
    confidence, AuditEvent, AuditEventKind, Diagnostic, Entity, FieldSource, ResolutionId,
    TemplateDefinition, TemplateResolution,
};
use futures_util::future::join_all;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The Resolver picks a template for a document and fills its fields
pub struct Resolver<R, C, A>
where
    R: TemplateRegistry,
    C: SemanticClassifier,
    A: TextAnalyzer,
{
    registry: Arc<R>,
    classifier: Arc<C>,
    analyzer: Arc<A>,
    audit: Arc<dyn AuditSink + Send + Sync>,
    config: ResolverConfig,
    health: Arc<HealthCache>,
    fallback: FallbackClassifier,
}

impl<R, C, A> Clone for Resolver<R, C, A>
where
    R: TemplateRegistry,
    C: SemanticClassifier,
    A: TextAnalyzer,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            classifier: Arc::clone(&self.classifier),
            analyzer: Arc::clone(&self.analyzer),
            audit: Arc::clone(&self.audit),
            config: self.config.clone(),
            health: Arc::clone(&self.health),
            fallback: self.fallback.clone(),
        }
    }
}

impl<R, C, A> Resolver<R, C, A>
where
    R: TemplateRegistry + Send + Sync + 'static,
    C: SemanticClassifier + Send + Sync + 'static,
    A: TextAnalyzer + Send + Sync + 'static,
    R::Error: Display,
    C::Error: Display,
    A::Error: Display,
{
    /// Create a new Resolver
    ///
    /// Audit events go to `tracing` until another sink is set with
    /// [`Resolver::with_audit_sink`].
    pub fn new(
        registry: R,
        classifier: C,
        analyzer: A,
        config: ResolverConfig,
    ) -> Result<Self, ResolverError> {
        config.validate().map_err(ResolverError::Config)?;
        Ok(Self {
            registry: Arc::new(registry),
            classifier: Arc::new(classifier),
            analyzer: Arc::new(analyzer),
            audit: Arc::new(TracingAuditSink),
            health: Arc::new(HealthCache::new(config.health_recheck())),
            fallback: FallbackClassifier::new(config.fallback.clone()),
            config,
        })
    }

    /// Send audit events to `sink`
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink + Send + Sync>) -> Self {
        self.audit = sink;
        self
    }

    /// Health cache shared by every resolution of this resolver
    pub fn health(&self) -> &HealthCache {
        &self.health
    }

    /// Active configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve one document
    ///
    /// Only a failing template registry is an error; everything else
    /// degrades and is recorded in the resolution's diagnostics.
    pub async fn resolve(
        &self,
        request: ResolutionRequest,
    ) -> Result<TemplateResolution, ResolverError> {
        let id = ResolutionId::new();
        let resource_id = request.document_id.clone().unwrap_or_else(|| id.to_string());

        info!("Starting resolution for '{}'", resource_id);
        self.emit(AuditEvent::new(AuditEventKind::AnalysisStart, &resource_id, now()));

        let templates = match self.registry.list_templates() {
            Ok(templates) => templates,
            Err(e) => {
                let message = e.to_string();
                warn!("Template registry failed for '{}': {}", resource_id, message);
                self.emit(
                    AuditEvent::new(AuditEventKind::AnalysisError, &resource_id, now())
                        .with_detail("error", &message),
                );
                return Err(ResolverError::Registry(message));
            }
        };

        let signals = normalize(&request.input);
        debug!(
            "{} templates, {} chars of text, {} field names",
            templates.len(),
            signals.text.len(),
            signals.field_names.len()
        );

        let resolution = if templates.is_empty() {
            warn!("No templates available, nothing to match");
            let mut diagnostics = signals.diagnostics;
            diagnostics.push(Diagnostic::NoTemplatesAvailable);
            TemplateResolution {
                id,
                template: None,
                confidence: 0.0,
                template_confidence: 0.0,
                reasoning: build_reasoning(&ReasoningParts {
                    template: None,
                    entities: &signals.entities,
                    key_phrases: &[],
                    pattern_scores: &[],
                    classifier: &ClassifierTrace::NotRun,
                    analyzer_fallback: false,
                    max_key_phrases: self.config.reasoning_key_phrases,
                }),
                fields: Vec::new(),
                per_template_scores: BTreeMap::new(),
                diagnostics,
                resolved_at: Utc::now(),
            }
        } else {
            self.resolve_against(id, signals, templates).await
        };

        info!(
            "Resolved '{}' as {} (confidence {:.2}, {} fields, {} diagnostics)",
            resource_id,
            resolution.template_id().unwrap_or("no template"),
            resolution.confidence,
            resolution.fields.len(),
            resolution.diagnostics.len()
        );
        self.emit(
            AuditEvent::new(AuditEventKind::AnalysisComplete, &resource_id, now())
                .with_detail("template", resolution.template_id().unwrap_or("none"))
                .with_detail("confidence", format!("{:.4}", resolution.confidence))
                .with_detail("field_count", resolution.fields.len()),
        );

        Ok(resolution)
    }

    /// Resolve several documents concurrently
    ///
    /// Results come back in request order; one failure never affects the
    /// other requests.
    pub async fn resolve_batch(
        &self,
        requests: Vec<ResolutionRequest>,
    ) -> Vec<Result<TemplateResolution, ResolverError>> {
        info!("Resolving batch of {} documents", requests.len());
        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let resolver = self.clone();
                tokio::spawn(async move { resolver.resolve(request).await })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(result) => result,
                Err(e) => Err(ResolverError::Task(e.to_string())),
            })
            .collect()
    }

    async fn resolve_against(
        &self,
        id: ResolutionId,
        signals: NormalizedSignals,
        templates: Vec<TemplateDefinition>,
    ) -> TemplateResolution {
        let NormalizedSignals {
            text,
            lines,
            lines_meaningful,
            field_names,
            entities: document_entities,
            key_value_pairs,
            base_confidence,
            mut diagnostics,
        } = signals;

        let (classified, analyzed) = tokio::join!(
            self.classify(&text, &templates),
            self.analyze(&text)
        );

        let classifier_trace = match classified {
            Ok(classification) => {
                debug!(
                    "Classifier suggested {} ({:.2})",
                    classification.template_id, classification.confidence
                );
                ClassifierTrace::Remote(classification)
            }
            Err(failure) => {
                warn!("Classifier unavailable ({}), using fallback rules", failure);
                diagnostics.push(Diagnostic::ExternalServiceFailure {
                    service: Service::Classifier.to_string(),
                    reason: failure.to_string(),
                });
                ClassifierTrace::Fallback {
                    suggestion: self.fallback.classify(&text),
                    reason: failure.to_string(),
                }
            }
        };

        let (analysis, analyzer_fallback) = match analyzed {
            Ok(analysis) => (analysis, false),
            Err(failure) => {
                warn!("Analyzer unavailable ({}), using local analysis", failure);
                diagnostics.push(Diagnostic::ExternalServiceFailure {
                    service: Service::Analyzer.to_string(),
                    reason: failure.to_string(),
                });
                (fallback_analysis(&text, self.config.max_key_phrases), true)
            }
        };

        // document entities ahead of analyzer entities
        let entities: Vec<Entity> = document_entities
            .into_iter()
            .chain(analysis.entities)
            .map(|mut entity| {
                entity.confidence = confidence::clamp(entity.confidence);
                entity
            })
            .collect();

        let raw_scores = score_templates(
            &ScoringInput {
                text: &text,
                entities: &entities,
                key_phrases: &analysis.key_phrases,
                field_names: &field_names,
            },
            &templates,
        );
        let normalized_scores = normalize_scores(&raw_scores);
        let external = match &classifier_trace {
            ClassifierTrace::Remote(classification) => Some(classification),
            _ => None,
        };
        let decision = combine(&raw_scores, &normalized_scores, external);

        let template = decision
            .best_template
            .as_deref()
            .and_then(|best| templates.iter().find(|t| t.id == best));

        let fields = match template {
            Some(template) => extract_fields(
                template,
                &CascadeInput {
                    text: &text,
                    lines: &lines,
                    lines_meaningful,
                    entities: &entities,
                    key_value_pairs: &key_value_pairs,
                },
            ),
            None => Vec::new(),
        };

        if let Some(template) = template {
            for (spec, result) in template.fields.iter().zip(&fields) {
                if spec.required && result.source == FieldSource::Default {
                    diagnostics.push(Diagnostic::FieldExtractionGap {
                        field_id: spec.id.clone(),
                    });
                }
            }
        }

        let overall = match template {
            Some(_) => overall_confidence(
                base_confidence.unwrap_or(1.0),
                decision.confidence,
                &fields,
            ),
            None => 0.0,
        };

        let reasoning = build_reasoning(&ReasoningParts {
            template,
            entities: &entities,
            key_phrases: &analysis.key_phrases,
            pattern_scores: &raw_scores,
            classifier: &classifier_trace,
            analyzer_fallback,
            max_key_phrases: self.config.reasoning_key_phrases,
        });

        TemplateResolution {
            id,
            template: template.cloned(),
            confidence: overall,
            template_confidence: decision.confidence,
            reasoning,
            fields,
            per_template_scores: decision.per_template_scores,
            diagnostics,
            resolved_at: Utc::now(),
        }
    }

    async fn classify(
        &self,
        text: &str,
        templates: &[TemplateDefinition],
    ) -> Result<Classification, AdapterFailure> {
        let request = Arc::new(ClassificationRequest {
            text_excerpt: text.chars().take(self.config.excerpt_chars).collect(),
            candidate_templates: templates.iter().map(TemplateDefinition::descriptor).collect(),
        });
        let known: Arc<HashSet<String>> = Arc::new(templates.iter().map(|t| t.id.clone()).collect());
        let classifier = Arc::clone(&self.classifier);
        let probe = {
            let classifier = Arc::clone(&self.classifier);
            move || classifier.health_check()
        };

        let call = move || {
            let classification = classifier
                .classify(&request)
                .map_err(|e| AdapterFailure::Error(e.to_string()))?;
            check_classification(classification, &known)
        };

        call_with_policy(
            Service::Classifier,
            &self.health,
            self.policy(Service::Classifier),
            probe,
            call,
        )
        .await
    }

    async fn analyze(&self, text: &str) -> Result<TextAnalysis, AdapterFailure> {
        let text: Arc<str> = Arc::from(text);
        let analyzer = Arc::clone(&self.analyzer);
        let probe = {
            let analyzer = Arc::clone(&self.analyzer);
            move || analyzer.health_check()
        };

        let call = move || {
            analyzer
                .analyze(&text)
                .map_err(|e| AdapterFailure::Error(e.to_string()))
        };

        call_with_policy(
            Service::Analyzer,
            &self.health,
            self.policy(Service::Analyzer),
            probe,
            call,
        )
        .await
    }

    fn policy(&self, service: Service) -> CallPolicy {
        CallPolicy {
            timeout: match service {
                Service::Classifier => self.config.classifier_timeout(),
                Service::Analyzer => self.config.analyzer_timeout(),
            },
            max_retries: self.config.max_retries,
            backoff: self.config.retry_backoff(),
        }
    }

    fn emit(&self, event: AuditEvent) {
        self.audit.record(event);
    }
}

/// Reject classifications naming an unknown template or an invalid confidence
fn check_classification(
    classification: Classification,
    known: &HashSet<String>,
) -> Result<Classification, AdapterFailure> {
    if !known.contains(&classification.template_id) {
        return Err(AdapterFailure::Malformed(format!(
            "unknown template id '{}'",
            classification.template_id
        )));
    }
    if !confidence::is_valid(classification.confidence) {
        return Err(AdapterFailure::Malformed(format!(
            "confidence {} outside [0, 1]",
            classification.confidence
        )));
    }
    Ok(classification)
}

fn now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> HashSet<String> {
        ["a".to_string(), "b".to_string()].into_iter().collect()
    }

    fn classification(id: &str, confidence: f64) -> Classification {
        Classification {
            template_id: id.to_string(),
            confidence,
            reasoning: String::new(),
        }
    }

    #[test]
    fn test_check_classification_accepts_known() {
        assert!(check_classification(classification("a", 0.7), &known()).is_ok());
    }

    #[test]
    fn test_check_classification_unknown_id() {
        assert!(matches!(
            check_classification(classification("zzz", 0.7), &known()),
            Err(AdapterFailure::Malformed(_))
        ));
    }

    #[test]
    fn test_check_classification_bad_confidence() {
        assert!(check_classification(classification("a", 1.5), &known()).is_err());
        assert!(check_classification(classification("a", f64::NAN), &known()).is_err());
    }
}
