// crates/hypergate-core/tests/runtime.rs
// ============================================================================
// Module: Runtime Tests
// Description: Action application, representor caching, and generations.
// Purpose: Ensure request-time pieces behave under sharing and failure.
// ============================================================================

//! ## Overview
//! Applies resolved actions through a parameter provider, checks the
//! compute-once representor cache across threads, builds generations from
//! routers, and verifies the file audit sink output.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use hypergate_core::ActionAuditEvent;
use hypergate_core::ActionError;
use hypergate_core::ActionOutcome;
use hypergate_core::ActionOutput;
use hypergate_core::ActionRegistry;
use hypergate_core::ActionSemantics;
use hypergate_core::AnyRepresentor;
use hypergate_core::AuditSink;
use hypergate_core::Body;
use hypergate_core::BuilderError;
use hypergate_core::Credentials;
use hypergate_core::ExecuteError;
use hypergate_core::FileAuditSink;
use hypergate_core::Form;
use hypergate_core::FormError;
use hypergate_core::Generation;
use hypergate_core::GenerationHandle;
use hypergate_core::HttpMethod;
use hypergate_core::Identifier;
use hypergate_core::IdentifierKind;
use hypergate_core::IdentifierType;
use hypergate_core::ParamError;
use hypergate_core::ParamProvider;
use hypergate_core::ParamType;
use hypergate_core::ParamValue;
use hypergate_core::PathMapper;
use hypergate_core::RelationIndex;
use hypergate_core::Representor;
use hypergate_core::RepresentorCache;
use hypergate_core::RepresentorLookup;
use hypergate_core::RepresentorSet;
use hypergate_core::ResolutionAuditEvent;
use hypergate_core::ResolutionOutcome;
use hypergate_core::Resource;
use hypergate_core::ResourceRouter;
use hypergate_core::ReturnType;
use hypergate_core::SingleModel;
use hypergate_core::StaticPathMapper;
use serde_json::json;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Review model.
#[derive(Debug, Clone, PartialEq)]
struct Review {
    /// Review id.
    id: i64,
    /// Reviewed book id.
    book_id: i64,
    /// Review text.
    text: String,
}

/// Data holder for new reviews.
#[derive(Debug, Default)]
struct NewReview {
    /// Review text.
    text: String,
}

/// Provider backed by fixed request values.
#[derive(Default)]
struct FixedParams {
    /// Caller credentials, if authenticated.
    credentials: Option<Credentials>,
    /// Decoded body, if any.
    body: Option<Body>,
}

impl ParamProvider for FixedParams {
    fn provide(&self, param: &ParamType, resource: &Resource) -> Result<ParamValue, ParamError> {
        let missing = || ParamError::Missing(param.label().to_string());
        match param {
            ParamType::Id => {
                let raw = resource.id().ok_or_else(missing)?;
                Identifier::parse(IdentifierKind::Integer, raw)
                    .map(ParamValue::Id)
                    .map_err(|err| ParamError::Invalid(err.to_string()))
            }
            ParamType::Body => self.body.clone().map(ParamValue::Body).ok_or_else(missing),
            ParamType::Credentials => {
                self.credentials.clone().map(ParamValue::Credentials).ok_or_else(missing)
            }
            _ => Err(missing()),
        }
    }
}

/// Builds the review creation action on `/books/{id}/reviews`.
fn create_review() -> ActionSemantics {
    ActionSemantics::of_resource(Resource::generic_parent("books", "reviews"))
        .name("create")
        .method(HttpMethod::Post)
        .receives_params([ParamType::ParentId, ParamType::Body])
        .returns(ReturnType::Single)
        .not_annotated()
        .form(
            Form::builder("new-review", NewReview::default)
                .required("text", |review: &mut NewReview, text: String| review.text = text)
                .build(),
        )
        .permission(|credentials: &Credentials, _: &[ParamValue]| credentials.has_role("reviewer"))
        .execute(|params: &[ParamValue]| {
            let book_id = match params[0].as_parent_id()? {
                Identifier::Integer(id) => *id,
                Identifier::Text(_) => return Err(ExecuteError::Invalid("book id".to_string())),
            };
            let form = params[1].form::<NewReview>()?;
            Ok(ActionOutput::Single(SingleModel::new(
                "reviews",
                Review {
                    id: 1,
                    book_id,
                    text: form.text.clone(),
                },
            )))
        })
        .build()
        .unwrap()
}

/// Provider that also resolves parent ids.
struct NestedParams(FixedParams);

impl ParamProvider for NestedParams {
    fn provide(&self, param: &ParamType, resource: &Resource) -> Result<ParamValue, ParamError> {
        match param {
            ParamType::ParentId => {
                let raw =
                    resource.parent_id().ok_or_else(|| ParamError::Missing("parent_id".to_string()))?;
                Identifier::parse(IdentifierKind::Integer, raw)
                    .map(ParamValue::ParentId)
                    .map_err(|err| ParamError::Invalid(err.to_string()))
            }
            other => self.0.provide(other, resource),
        }
    }
}

/// Registry holding only the review creation action.
fn review_registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry.register(create_review()).unwrap();
    registry
}

// ============================================================================
// SECTION: Action Application
// ============================================================================

/// Parameters are resolved in order and the body is parsed by the form.
#[test]
fn apply_parses_form_and_executes() {
    let action = review_registry().resolve("POST", &["books", "9", "reviews"]).unwrap();
    let provider = NestedParams(FixedParams {
        credentials: Some(Credentials::for_subject("ada").with_role("reviewer")),
        body: Some(Body::from_json(json!({"text": "Superb"})).unwrap()),
    });
    let ActionOutput::Single(single) = action.apply(&provider).unwrap() else {
        panic!("expected a single model");
    };
    assert_eq!(single.resource_name(), "reviews");
    let review = single.model().downcast_ref::<Review>().unwrap();
    assert_eq!(review.book_id, 9);
    assert_eq!(review.text, "Superb");
}

/// Missing credentials are anonymous and fail the permission check.
#[test]
fn apply_denies_anonymous_callers() {
    let action = review_registry().resolve("POST", &["books", "9", "reviews"]).unwrap();
    let provider = NestedParams(FixedParams {
        credentials: None,
        body: Some(Body::from_json(json!({"text": "Superb"})).unwrap()),
    });
    let err = action.apply(&provider).unwrap_err();
    assert!(matches!(err, ActionError::PermissionDenied { action } if action.ends_with("#create")));
}

/// Form validation failures surface before permission is evaluated.
#[test]
fn apply_reports_form_errors() {
    let action = review_registry().resolve("POST", &["books", "9", "reviews"]).unwrap();
    let provider = NestedParams(FixedParams {
        credentials: None,
        body: Some(Body::from_json(json!({"text": 5})).unwrap()),
    });
    let err = action.apply(&provider).unwrap_err();
    assert!(matches!(err, ActionError::Param(ParamError::Form(FormError::InvalidField { .. }))));
}

/// Missing parameters are reported by label.
#[test]
fn apply_reports_missing_parameters() {
    let action = review_registry().resolve("POST", &["books", "9", "reviews"]).unwrap();
    let err = action.apply(&NestedParams(FixedParams::default())).unwrap_err();
    assert!(matches!(err, ActionError::Param(ParamError::Missing(label)) if label == "body"));
}

/// Execute failures pass through unchanged.
#[test]
fn apply_propagates_execution_errors() {
    let semantics = ActionSemantics::of_resource(Resource::item("books"))
        .name("retrieve")
        .method(HttpMethod::Get)
        .receives_params([ParamType::Id])
        .returns(ReturnType::Single)
        .not_annotated()
        .execute(|params: &[ParamValue]| Err(ExecuteError::NotFound(params[0].as_id()?.to_string())))
        .build()
        .unwrap();
    let mut registry = ActionRegistry::new();
    registry.register(semantics).unwrap();
    let action = registry.resolve("GET", &["books", "77"]).unwrap();
    let err = action.apply(&FixedParams::default()).unwrap_err();
    assert!(matches!(err, ActionError::Execution(ExecuteError::NotFound(id)) if id == "77"));
}

// ============================================================================
// SECTION: Representor Cache
// ============================================================================

/// Builds the review representor.
fn review_representor() -> Representor<Review> {
    Representor::<Review>::builder()
        .types(["review"])
        .identifier("review", |review: &Review| review.id)
        .add_string("text", |review: &Review| Some(review.text.clone()))
        .build()
        .unwrap()
}

/// Concurrent first callers share one build.
#[test]
fn cache_builds_each_key_once() {
    let cache = RepresentorCache::new();
    let builds = AtomicUsize::new(0);
    let results: Vec<Arc<dyn AnyRepresentor>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    cache
                        .get_or_build::<Review>("reviews", || {
                            builds.fetch_add(1, Ordering::SeqCst);
                            Ok(Arc::new(review_representor()) as Arc<dyn AnyRepresentor>)
                        })
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(results.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    assert_eq!(cache.len(), 1);
}

/// Build failures are cached like successes.
#[test]
fn cache_keeps_failed_builds() {
    let cache = RepresentorCache::new();
    let first = cache.get_or_build::<Review>("reviews", || Err(BuilderError::MissingTypes));
    assert_eq!(first.err(), Some(BuilderError::MissingTypes));
    let second = cache.get_or_build::<Review>("reviews", || panic!("rebuilt a cached key"));
    assert_eq!(second.err(), Some(BuilderError::MissingTypes));
    let other = cache.get_or_build::<Review>("critiques", || {
        Ok(Arc::new(review_representor()) as Arc<dyn AnyRepresentor>)
    });
    assert!(other.is_ok());
    assert_eq!(cache.len(), 2);
}

// ============================================================================
// SECTION: Generations
// ============================================================================

/// Book model.
#[derive(Debug)]
struct Book {
    /// Book id.
    id: i64,
}

/// Router for books.
struct BooksRouter;

impl ResourceRouter for BooksRouter {
    fn resource_name(&self) -> &str {
        "books"
    }

    fn representor(
        &self,
        relations: &Arc<dyn RelationIndex>,
    ) -> Result<Option<Arc<dyn AnyRepresentor>>, BuilderError> {
        let representor = Representor::<Book>::builder_with_relations(Arc::clone(relations))
            .types(["book"])
            .identifier("book", |book: &Book| book.id)
            .build()?;
        Ok(Some(Arc::new(representor)))
    }

    fn actions(&self) -> Result<Vec<ActionSemantics>, BuilderError> {
        Ok(vec![
            ActionSemantics::of_resource(Resource::item("books"))
                .name("retrieve")
                .method(HttpMethod::Get)
                .receives_params([ParamType::Id])
                .returns(ReturnType::Single)
                .not_annotated()
                .execute(|_| Ok(ActionOutput::Nothing))
                .build()?,
        ])
    }
}

/// Router for reviews with a bidirectional relation to books.
struct ReviewsRouter;

impl ResourceRouter for ReviewsRouter {
    fn resource_name(&self) -> &str {
        "reviews"
    }

    fn identifier_kind(&self) -> IdentifierKind {
        IdentifierKind::Integer
    }

    fn representor(
        &self,
        relations: &Arc<dyn RelationIndex>,
    ) -> Result<Option<Arc<dyn AnyRepresentor>>, BuilderError> {
        let representor = Representor::<Review>::builder_with_relations(Arc::clone(relations))
            .types(["review"])
            .identifier("review", |review: &Review| review.id)
            .add_bidirectional_model("book", "reviews", "book", |review: &Review| Some(review.book_id))
            .build()?;
        Ok(Some(Arc::new(representor)))
    }

    fn actions(&self) -> Result<Vec<ActionSemantics>, BuilderError> {
        Ok(vec![create_review()])
    }
}

/// Generations assemble registry, representors, paths, and relations.
#[test]
fn generation_from_routers_indexes_everything() {
    let routers: Vec<Arc<dyn ResourceRouter>> = vec![Arc::new(BooksRouter), Arc::new(ReviewsRouter)];
    let generation = Generation::from_routers(1, &routers).unwrap();
    assert_eq!(generation.number(), 1);
    assert_eq!(generation.registry().len(), 2);
    assert_eq!(generation.representors().resource_names(), vec!["books", "reviews"]);
    assert_eq!(
        generation.paths().resource_for_identifier_type(&IdentifierType::new("review")).as_deref(),
        Some("reviews")
    );
    let inverse = generation.relations().related_collections(&IdentifierType::new("book"));
    assert_eq!(inverse.len(), 1);
    assert_eq!(inverse[0].name, "reviews");
    assert!(generation.registry().resolve("GET", &["books", "1"]).is_ok());
}

/// Router whose actions collide with the books router.
struct ShadowRouter;

impl ResourceRouter for ShadowRouter {
    fn resource_name(&self) -> &str {
        "books"
    }

    fn actions(&self) -> Result<Vec<ActionSemantics>, BuilderError> {
        BooksRouter.actions()
    }
}

/// Conflicting routers fail the whole generation.
#[test]
fn generation_rejects_conflicting_routers() {
    let routers: Vec<Arc<dyn ResourceRouter>> = vec![Arc::new(BooksRouter), Arc::new(ShadowRouter)];
    assert!(Generation::from_routers(1, &routers).is_err());
}

/// Readers keep their snapshot across a publish.
#[test]
fn handle_publishes_atomically() {
    let handle = GenerationHandle::new(Generation::new(
        1,
        ActionRegistry::new(),
        RepresentorSet::new(),
        StaticPathMapper::new(),
        Arc::new(hypergate_core::InMemoryRelationIndex::new()),
    ));
    let before = handle.current();
    let routers: Vec<Arc<dyn ResourceRouter>> = vec![Arc::new(BooksRouter)];
    let next = Generation::from_routers(handle.next_number(), &routers).unwrap();
    let replaced = handle.publish(next);
    assert_eq!(replaced.number(), 1);
    assert_eq!(before.number(), 1);
    assert!(before.registry().is_empty());
    assert_eq!(handle.current().number(), 2);
    assert_eq!(handle.current().registry().len(), 1);
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// File sinks append one JSON object per event.
#[test]
fn file_audit_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let sink = FileAuditSink::new(&path).unwrap();
    sink.record_resolution(&ResolutionAuditEvent::new(
        "DELETE",
        "/books/1",
        ResolutionOutcome::NotAllowed,
        None,
        BTreeSet::from(["GET".to_string()]),
    ));
    sink.record_action(&ActionAuditEvent::new(
        "item:books#retrieve".to_string(),
        ActionOutcome::Ok,
        Some("application/json".to_string()),
        None,
    ));
    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "resolution");
    assert_eq!(lines[0]["outcome"], "not_allowed");
    assert_eq!(lines[0]["allowed"], json!(["GET"]));
    assert!(lines[0].get("action").is_none());
    assert_eq!(lines[1]["event"], "action");
    assert_eq!(lines[1]["outcome"], "ok");
    assert!(lines[1].get("subject").is_none());
}
