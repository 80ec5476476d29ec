// crates/hypergate-engine/src/engine.rs
// ============================================================================
// Module: Request Engine
// Description: Resolve, authorize, execute, and write one request.
// Purpose: Orchestrate the core runtime behind a transport-neutral call.
// Dependencies: hypergate-config, hypergate-core, hypergate-formats
// ============================================================================

//! ## Overview
//! [`Engine::handle`] runs the request pipeline against a snapshot of the
//! current deployment generation:
//!
//! 1. resolve method and path to one action (resolution audit event);
//! 2. negotiate the response format from `Accept`;
//! 3. provide parameters, check permission, and execute;
//! 4. write the output with the negotiated format (action audit event).
//!
//! Nothing executes when no enabled format satisfies the caller. A reload
//! builds a new generation off to the side and publishes it atomically;
//! requests already running keep the snapshot they started with.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use hypergate_config::AuditConfig;
use hypergate_config::DocsConfig;
use hypergate_config::HypergateConfig;
use hypergate_core::Action;
use hypergate_core::ActionAuditEvent;
use hypergate_core::ActionError;
use hypergate_core::ActionOutcome;
use hypergate_core::ActionOutput;
use hypergate_core::AuditSink;
use hypergate_core::EmbeddedSource;
use hypergate_core::ExecuteError;
use hypergate_core::FileAuditSink;
use hypergate_core::Generation;
use hypergate_core::GenerationHandle;
use hypergate_core::NoEmbedding;
use hypergate_core::NoopAuditSink;
use hypergate_core::PaginationLimits;
use hypergate_core::RegistryError;
use hypergate_core::ResolutionAuditEvent;
use hypergate_core::ResolutionOutcome;
use hypergate_core::ResolveError;
use hypergate_core::ResourceRouter;
use hypergate_core::StderrAuditSink;
use hypergate_core::UrlBuilder;
use hypergate_core::WriteError;
use hypergate_core::WriterContext;
use hypergate_core::writer::BatchWriter;
use hypergate_core::writer::DocumentationWriter;
use hypergate_core::writer::FormWriter;
use hypergate_core::writer::PageWriter;
use hypergate_core::writer::SingleModelWriter;
use hypergate_formats::Format;
use hypergate_formats::FormatError;
use hypergate_formats::FormatSet;
use thiserror::Error;

use crate::request::Outcome;
use crate::request::Request;
use crate::request::RequestParams;
use crate::request::Response;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Request and engine construction errors.
///
/// Failures reported by an execute function stay in [`EngineError::Execution`]
/// with the original [`ExecuteError`] as their source.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Nothing matches the path, or the requested form does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The path matches but not for this method.
    #[error("method not allowed; allowed: {}", join(allowed))]
    NotAllowed {
        /// Methods the matching actions support.
        allowed: BTreeSet<String>,
    },
    /// The permission check rejected the caller.
    #[error("permission denied for action `{action}`")]
    PermissionDenied {
        /// Action key.
        action: String,
    },
    /// A parameter or body could not be decoded or validated.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The execute function reported a failure.
    #[error("execution failed: {0}")]
    Execution(#[source] Arc<ExecuteError>),
    /// The action output could not be written.
    #[error("write failed: {0}")]
    Write(#[from] WriteError),
    /// No enabled format satisfies the `Accept` header.
    #[error("not acceptable: {accept}")]
    NotAcceptable {
        /// Raw `Accept` header.
        accept: String,
    },
    /// Routers produced an invalid or conflicting registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Configuration is invalid or its collaborators failed to start.
    #[error("config error: {0}")]
    Config(String),
}

/// Joins a method set for display.
fn join(methods: &BTreeSet<String>) -> String {
    methods.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

impl From<FormatError> for EngineError {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::NotAcceptable {
                accept,
            } => Self::NotAcceptable {
                accept,
            },
            other => Self::Config(other.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Request pipeline over the published generation.
pub struct Engine {
    /// Published deployment generation.
    generations: GenerationHandle,
    /// Enabled formats.
    formats: FormatSet,
    /// URL layout.
    urls: UrlBuilder,
    /// Page size bounds.
    limits: PaginationLimits,
    /// Documentation text.
    docs: DocsConfig,
    /// Audit sink for resolution and action events.
    audit: Arc<dyn AuditSink>,
    /// Loader for embedded models.
    source: Arc<dyn EmbeddedSource>,
}

impl Engine {
    /// Builds an engine from configuration and the deployment's routers.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] when the configuration is invalid or
    /// the audit file cannot be opened, and [`EngineError::Registry`] when
    /// the routers do not form a valid generation.
    pub fn from_config(
        mut config: HypergateConfig,
        routers: &[Arc<dyn ResourceRouter>],
    ) -> Result<Self, EngineError> {
        config.validate().map_err(|err| EngineError::Config(err.to_string()))?;
        let formats = FormatSet::from_media_types(
            config.formats.enabled.as_slice(),
            &config.formats.default_media_type,
        )?;
        let audit = audit_sink(&config.audit)?;
        let generation = Generation::from_routers(1, routers)?;
        Ok(Self {
            generations: GenerationHandle::new(generation),
            formats,
            urls: config.url_builder(),
            limits: config.pagination_limits(),
            docs: config.docs,
            audit,
            source: Arc::new(NoEmbedding),
        })
    }

    /// Returns a copy recording audit events into `audit`.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns a copy loading embedded models from `source`.
    #[must_use]
    pub fn with_embedded_source(mut self, source: Arc<dyn EmbeddedSource>) -> Self {
        self.source = source;
        self
    }

    /// Returns a snapshot of the current generation.
    #[must_use]
    pub fn generation(&self) -> Arc<Generation> {
        self.generations.current()
    }

    /// Returns the enabled formats.
    #[must_use]
    pub const fn formats(&self) -> &FormatSet {
        &self.formats
    }

    /// Returns the URL layout.
    #[must_use]
    pub const fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    /// Builds a generation from `routers` and publishes it.
    ///
    /// The current generation stays published when building fails.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Registry`] when the routers do not form a
    /// valid generation.
    pub fn reload(&self, routers: &[Arc<dyn ResourceRouter>]) -> Result<u64, EngineError> {
        let next = Generation::from_routers(self.generations.next_number(), routers)?;
        let number = next.number();
        self.generations.publish(next);
        Ok(number)
    }

    /// Handles one request.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] describing the first failing pipeline stage.
    pub fn handle(&self, request: &Request) -> Result<Response, EngineError> {
        let generation = self.generations.current();
        let action = self.resolve(&generation, request)?;
        let format = self.formats.negotiate(request.accept.as_deref())?;
        let key = action.semantics().key();
        let subject = request.credentials.as_ref().and_then(|credentials| credentials.subject.clone());
        let params = RequestParams::new(request, generation.paths(), self.limits);
        let output = match action.apply(&params) {
            Ok(output) => output,
            Err(err) => {
                let (outcome, error) = classify(err);
                self.audit.record_action(&ActionAuditEvent::new(key, outcome, None, subject));
                return Err(error);
            }
        };
        let outcome = match &output {
            ActionOutput::Nothing => Outcome::NoContent,
            _ if action.semantics().kind().creates() => Outcome::Created,
            _ => Outcome::Ok,
        };
        match self.write(&generation, request, format.as_ref(), &output) {
            Ok(body) => {
                let media_type = format.media_type().to_string();
                self.audit.record_action(&ActionAuditEvent::new(
                    key,
                    ActionOutcome::Ok,
                    Some(media_type.clone()),
                    subject,
                ));
                Ok(Response {
                    outcome,
                    media_type,
                    body,
                })
            }
            Err(err) => {
                self.audit.record_action(&ActionAuditEvent::new(
                    key,
                    ActionOutcome::WriteError,
                    Some(format.media_type().to_string()),
                    subject,
                ));
                Err(EngineError::Write(err))
            }
        }
    }

    /// Writes the API documentation in the format selected by `accept`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotAcceptable`] when no enabled format matches
    /// and [`EngineError::Write`] when serialization fails.
    pub fn documentation(&self, accept: Option<&str>) -> Result<Response, EngineError> {
        let format = self.formats.negotiate(accept)?;
        let generation = self.generations.current();
        let context = WriterContext::new(generation.representors(), generation.paths(), &self.urls);
        let body = DocumentationWriter::new(&context, format.documentation()).write(
            &self.docs.title,
            &self.docs.description,
            generation.registry(),
        )?;
        Ok(Response {
            outcome: Outcome::Ok,
            media_type: format.media_type().to_string(),
            body,
        })
    }

    /// Writes the form document `form_id` in the format selected by `accept`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] when no action declares the form,
    /// [`EngineError::NotAcceptable`] when no enabled format matches, and
    /// [`EngineError::Write`] when serialization fails.
    pub fn form(&self, form_id: &str, accept: Option<&str>) -> Result<Response, EngineError> {
        let generation = self.generations.current();
        let form = generation
            .registry()
            .find_form(form_id)
            .and_then(|semantics| semantics.form())
            .ok_or_else(|| EngineError::NotFound(format!("form `{form_id}`")))?;
        let format = self.formats.negotiate(accept)?;
        let body = FormWriter::new(&self.urls, format.form()).write(form.descriptor())?;
        Ok(Response {
            outcome: Outcome::Ok,
            media_type: format.media_type().to_string(),
            body,
        })
    }

    /// Resolves the request to one action and records the resolution.
    fn resolve(&self, generation: &Generation, request: &Request) -> Result<Action, EngineError> {
        let segments = request.segments();
        let resolved = generation.registry().resolve(&request.method, segments.as_slice());
        let (outcome, action_key, allowed) = match &resolved {
            Ok(action) => (ResolutionOutcome::Matched, Some(action.semantics().key()), BTreeSet::new()),
            Err(ResolveError::NotAllowed {
                allowed,
            }) => (ResolutionOutcome::NotAllowed, None, allowed.clone()),
            Err(_) => (ResolutionOutcome::NotFound, None, BTreeSet::new()),
        };
        self.audit.record_resolution(&ResolutionAuditEvent::new(
            &request.method,
            &request.path,
            outcome,
            action_key,
            allowed,
        ));
        resolved.map_err(|err| match err {
            ResolveError::NotFound {
                path,
            } => EngineError::NotFound(format!("/{path}")),
            ResolveError::NotAllowed {
                allowed,
            } => EngineError::NotAllowed {
                allowed,
            },
            ambiguous @ ResolveError::Ambiguous {
                ..
            } => EngineError::Config(ambiguous.to_string()),
        })
    }

    /// Writes an action output with `format`.
    fn write(
        &self,
        generation: &Generation,
        request: &Request,
        format: &dyn Format,
        output: &ActionOutput,
    ) -> Result<String, WriteError> {
        let context = WriterContext::new(generation.representors(), generation.paths(), &self.urls)
            .with_source(self.source.as_ref())
            .with_fields(request.fields_selection())
            .with_embedded(request.embedded_selection())
            .with_locale(request.locale())
            .with_operations(generation.registry(), request.caller());
        match output {
            ActionOutput::Nothing => Ok(String::new()),
            ActionOutput::Single(model) => SingleModelWriter::new(&context, format.single_model()).write(model),
            ActionOutput::Page(page) => PageWriter::new(&context, format.page()).write(page),
            ActionOutput::Batch(batch) => BatchWriter::new(&context, format.batch()).write(batch),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps an action failure to its audit outcome and engine error.
fn classify(err: ActionError) -> (ActionOutcome, EngineError) {
    match err {
        ActionError::Param(err) => (ActionOutcome::ParamError, EngineError::InvalidRequest(err.to_string())),
        ActionError::PermissionDenied {
            action,
        } => (
            ActionOutcome::PermissionDenied,
            EngineError::PermissionDenied {
                action,
            },
        ),
        ActionError::Execution(err) => (ActionOutcome::ExecutionError, EngineError::Execution(Arc::new(err))),
    }
}

/// Builds the audit sink described by `[audit]`.
fn audit_sink(config: &AuditConfig) -> Result<Arc<dyn AuditSink>, EngineError> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.path {
        Some(path) => {
            let sink = FileAuditSink::new(Path::new(path.trim()))
                .map_err(|err| EngineError::Config(format!("audit log {path}: {err}")))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
