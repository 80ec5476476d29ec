// crates/hypergate-core/tests/representor.rs
// ============================================================================
// Module: Representor Tests
// Description: Field declaration, extraction, selection, and relations.
// Purpose: Ensure snapshots omit absent fields and never hide mutation.
// ============================================================================

//! ## Overview
//! Builds representors for a small book domain and checks snapshot content,
//! ordering, sparse field selection, localized fields, nested children, and
//! bidirectional relation registration.

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

use std::sync::Arc;

use hypergate_core::AcceptLanguage;
use hypergate_core::AnyRepresentor;
use hypergate_core::BuilderError;
use hypergate_core::FieldError;
use hypergate_core::FieldKind;
use hypergate_core::FieldValue;
use hypergate_core::FieldsSelection;
use hypergate_core::Identifier;
use hypergate_core::InMemoryRelationIndex;
use hypergate_core::RelationIndex;
use hypergate_core::Representor;
use hypergate_core::SnapshotScope;
use proptest::prelude::*;
use serde_json::Number;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Publisher nested inside a book.
#[derive(Debug, Clone)]
struct Publisher {
    /// Publisher name.
    name: String,
}

/// Book model.
#[derive(Debug, Clone)]
struct Book {
    /// Book id.
    id: i64,
    /// Optional title.
    title: Option<String>,
    /// Page count.
    pages: u32,
    /// Tags.
    tags: Vec<String>,
    /// Author id.
    author_id: Option<i64>,
    /// Cover image id.
    cover: Option<String>,
    /// Publisher.
    publisher: Option<Publisher>,
}

/// Returns a fully populated book.
fn book() -> Book {
    Book {
        id: 42,
        title: Some("Dune".to_string()),
        pages: 412,
        tags: vec!["classic".to_string()],
        author_id: Some(7),
        cover: Some("cover-1".to_string()),
        publisher: Some(Publisher {
            name: "Chilton".to_string(),
        }),
    }
}

/// Builds the book representor.
fn book_representor() -> Representor<Book> {
    Representor::<Book>::builder()
        .types(["book", "work"])
        .identifier("book", |book: &Book| book.id)
        .add_string("title", |book: &Book| book.title.clone())
        .add_number("pages", |book: &Book| Some(Number::from(book.pages)))
        .add_string_list("tags", |book: &Book| Some(book.tags.clone()))
        .add_binary("cover", |book: &Book| book.cover.clone())
        .add_nested(
            "publisher",
            |book: &Book| book.publisher.clone(),
            |builder| builder.types(["publisher"]).add_string("name", |p: &Publisher| Some(p.name.clone())),
        )
        .add_link("license", "https://example.org/license")
        .add_linked_model("author", "author", |book: &Book| book.author_id)
        .add_related_collection("reviews", "review")
        .build()
        .unwrap()
}

/// Runs a snapshot with default preferences and all fields.
fn snapshot(representor: &Representor<Book>, book: &Book) -> hypergate_core::ModelSnapshot {
    let locale = AcceptLanguage::default();
    let fields = FieldsSelection::all();
    representor
        .snapshot(
            book,
            &SnapshotScope {
                locale: &locale,
                fields: &fields,
            },
        )
        .unwrap()
}

// ============================================================================
// SECTION: Snapshots
// ============================================================================

/// Present fields appear in declaration order with their kinds.
#[test]
fn snapshot_lists_fields_in_declaration_order() {
    let snapshot = snapshot(&book_representor(), &book());
    assert_eq!(snapshot.types, vec!["book".to_string(), "work".to_string()]);
    assert_eq!(snapshot.identifier, Some(Identifier::Integer(42)));
    let names: Vec<&str> = snapshot.properties.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["title", "pages", "tags"]);
    assert_eq!(snapshot.property("pages"), Some(&FieldValue::Number(Number::from(412))));
    assert_eq!(snapshot.binaries, vec![("cover".to_string(), "cover-1".to_string())]);
    assert_eq!(snapshot.nested.len(), 1);
    assert_eq!(snapshot.nested[0].1.property("name"), Some(&FieldValue::String("Chilton".to_string())));
    assert_eq!(snapshot.links.len(), 1);
    assert_eq!(snapshot.linked_models[0].identifier, Identifier::Integer(7));
    assert_eq!(snapshot.related_collections[0].name, "reviews");
}

/// Absent values produce no entry at all.
#[test]
fn absent_values_are_omitted() {
    let mut book = book();
    book.title = None;
    book.author_id = None;
    book.publisher = None;
    let snapshot = snapshot(&book_representor(), &book);
    assert!(snapshot.property("title").is_none());
    assert!(snapshot.linked_models.is_empty());
    assert!(snapshot.nested.is_empty());
    assert_eq!(snapshot.related_collections.len(), 1);
}

/// Excluded fields are never extracted.
#[test]
fn excluded_fields_are_never_called() {
    let representor = Representor::<Book>::builder()
        .types(["book"])
        .identifier("book", |book: &Book| book.id)
        .add_string("title", |book: &Book| book.title.clone())
        .add_string("secret", |_: &Book| -> Option<String> { panic!("excluded extractor called") })
        .build()
        .unwrap();
    let locale = AcceptLanguage::default();
    let fields = FieldsSelection::parse("book.title");
    let snapshot = representor
        .snapshot(
            &book(),
            &SnapshotScope {
                locale: &locale,
                fields: &fields,
            },
        )
        .unwrap();
    assert_eq!(snapshot.properties.len(), 1);
}

/// Types without a selection entry expose every field.
#[test]
fn selection_applies_to_listed_types_only() {
    let fields = FieldsSelection::all().with("author", ["name"]);
    let types = vec!["book".to_string()];
    assert!(fields.allows(&types, "title"));
    assert!(!fields.allows(&["author".to_string()], "bio"));
}

/// Extractor failures abort the snapshot.
#[test]
fn extractor_failures_propagate() {
    let representor = Representor::<Book>::builder()
        .types(["book"])
        .identifier("book", |book: &Book| book.id)
        .add_string("title", |_: &Book| -> Result<Option<String>, FieldError> {
            Err(FieldError::Extraction {
                field: "title".to_string(),
                message: "storage offline".to_string(),
            })
        })
        .build()
        .unwrap();
    let locale = AcceptLanguage::default();
    let fields = FieldsSelection::all();
    let err = representor
        .snapshot(
            &book(),
            &SnapshotScope {
                locale: &locale,
                fields: &fields,
            },
        )
        .unwrap_err();
    assert!(matches!(err, FieldError::Extraction { .. }));
}

/// Erased snapshots reject models of the wrong type.
#[test]
fn erased_snapshot_rejects_wrong_type() {
    let representor = book_representor();
    let locale = AcceptLanguage::default();
    let fields = FieldsSelection::all();
    let scope = SnapshotScope {
        locale: &locale,
        fields: &fields,
    };
    assert!(matches!(
        representor.snapshot_any(&"not a book", &scope),
        Err(FieldError::TypeMismatch { .. })
    ));
    assert!(representor.snapshot_any(&book(), &scope).is_ok());
}

/// Localized fields follow the caller's preferences.
#[test]
fn localized_fields_use_caller_preferences() {
    let representor = Representor::<Book>::builder()
        .types(["book"])
        .identifier("book", |book: &Book| book.id)
        .add_localized_string("genre", |_: &Book, locale: &AcceptLanguage| {
            match locale.select(&["en", "fr"]) {
                Some("fr") => Some("roman".to_string()),
                _ => Some("novel".to_string()),
            }
        })
        .build()
        .unwrap();
    let fields = FieldsSelection::all();
    let french = AcceptLanguage::parse("fr-CA, en;q=0.5");
    let snapshot = representor
        .snapshot(
            &book(),
            &SnapshotScope {
                locale: &french,
                fields: &fields,
            },
        )
        .unwrap();
    assert_eq!(snapshot.property("genre"), Some(&FieldValue::String("roman".to_string())));
    assert_eq!(
        representor.property_value(&book(), "genre").unwrap(),
        Some(FieldValue::String("novel".to_string()))
    );
}

/// Descriptors cover every declared field with its kind.
#[test]
fn descriptors_cover_declared_fields() {
    let descriptors = book_representor().field_descriptors();
    let kinds: Vec<(String, FieldKind)> =
        descriptors.iter().map(|descriptor| (descriptor.name.clone(), descriptor.kind)).collect();
    assert!(kinds.contains(&("title".to_string(), FieldKind::String)));
    assert!(kinds.contains(&("cover".to_string(), FieldKind::Binary)));
    assert!(kinds.contains(&("publisher".to_string(), FieldKind::Nested)));
    assert!(kinds.contains(&("author".to_string(), FieldKind::LinkedModel)));
    assert!(kinds.contains(&("reviews".to_string(), FieldKind::RelatedCollection)));
}

// ============================================================================
// SECTION: Builder Errors
// ============================================================================

/// Builder misuse is reported at build time.
#[test]
fn builder_reports_declaration_errors() {
    let duplicate = Representor::<Book>::builder()
        .types(["book"])
        .identifier("book", |book: &Book| book.id)
        .add_string("title", |book: &Book| book.title.clone())
        .add_string("title", |book: &Book| book.title.clone())
        .build();
    assert!(matches!(duplicate, Err(BuilderError::DuplicateField { .. })));

    let untyped = Representor::<Book>::builder().identifier("book", |book: &Book| book.id).build();
    assert!(matches!(untyped, Err(BuilderError::MissingTypes)));

    let anonymous = Representor::<Book>::builder().types(["book"]).build();
    assert!(matches!(anonymous, Err(BuilderError::MissingIdentifier { .. })));

    let unindexed = Representor::<Book>::builder()
        .types(["book"])
        .identifier("book", |book: &Book| book.id)
        .add_bidirectional_model("author", "books", "author", |book: &Book| book.author_id)
        .build();
    assert!(matches!(unindexed, Err(BuilderError::MissingRelationIndex { .. })));
}

// ============================================================================
// SECTION: Relations
// ============================================================================

/// Author model.
#[derive(Debug)]
struct Author {
    /// Author id.
    id: i64,
}

/// Bidirectional relations surface on the target representor.
#[test]
fn bidirectional_relations_register_inverse_collection() {
    let relations: Arc<dyn RelationIndex> = Arc::new(InMemoryRelationIndex::new());
    let authors = Representor::<Author>::builder_with_relations(Arc::clone(&relations))
        .types(["author"])
        .identifier("author", |author: &Author| author.id)
        .build()
        .unwrap();
    let _books = Representor::<Book>::builder_with_relations(Arc::clone(&relations))
        .types(["book"])
        .identifier("book", |book: &Book| book.id)
        .add_bidirectional_model("author", "books", "author", |book: &Book| book.author_id)
        .build()
        .unwrap();
    let collections = authors.related_collections();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0].name, "books");
    assert_eq!(collections[0].target.as_str(), "book");
    assert!(authors.identify(&Author { id: 3 }).is_some());
}

proptest! {
    /// Extracting twice from the same model yields equal snapshots.
    #[test]
    fn extraction_is_idempotent(
        id in any::<i64>(),
        title in proptest::option::of("[a-z ]{0,16}"),
        pages in any::<u32>(),
        author_id in proptest::option::of(any::<i64>()),
    ) {
        let representor = book_representor();
        let book = Book { id, title, pages, author_id, ..book() };
        prop_assert_eq!(snapshot(&representor, &book), snapshot(&representor, &book));
    }
}
