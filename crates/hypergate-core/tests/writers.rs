// crates/hypergate-core/tests/writers.rs
// ============================================================================
// Module: Writer Pipeline Tests
// Description: Callback sequences driven by the format-neutral writers.
// Purpose: Ensure writers call mappers in order and only for present data.
// ============================================================================

//! ## Overview
//! A recording mapper captures every callback as a short label so tests can
//! assert the exact sequence each writer produces: single models, pages,
//! embedding, operations, documentation, forms, and batch results.

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

use std::any::Any;
use std::sync::Arc;
use std::sync::Mutex;

use hypergate_core::ActionOutput;
use hypergate_core::ActionRegistry;
use hypergate_core::ActionSemantics;
use hypergate_core::BatchResult;
use hypergate_core::Credentials;
use hypergate_core::EmbeddedError;
use hypergate_core::EmbeddedSource;
use hypergate_core::FieldDescriptor;
use hypergate_core::Form;
use hypergate_core::FormDescriptor;
use hypergate_core::FormField;
use hypergate_core::HttpMethod;
use hypergate_core::Identifier;
use hypergate_core::IdentifierKind;
use hypergate_core::IdentifierType;
use hypergate_core::PageModel;
use hypergate_core::Pagination;
use hypergate_core::ParamType;
use hypergate_core::Representor;
use hypergate_core::RepresentorSet;
use hypergate_core::Resource;
use hypergate_core::ReturnType;
use hypergate_core::SingleModel;
use hypergate_core::StaticPathMapper;
use hypergate_core::UrlBuilder;
use hypergate_core::WriteError;
use hypergate_core::WriterContext;
use hypergate_core::writer::BatchInfo;
use hypergate_core::writer::BatchMessageMapper;
use hypergate_core::writer::BatchWriter;
use hypergate_core::writer::DocumentationInfo;
use hypergate_core::writer::DocumentationMessageMapper;
use hypergate_core::writer::DocumentationWriter;
use hypergate_core::writer::EmbeddedSelection;
use hypergate_core::writer::FieldPath;
use hypergate_core::writer::FormMessageMapper;
use hypergate_core::writer::FormWriter;
use hypergate_core::writer::JsonObjectBuilder;
use hypergate_core::writer::MessageMapper;
use hypergate_core::writer::ModelInfo;
use hypergate_core::writer::OperationDoc;
use hypergate_core::writer::OperationInfo;
use hypergate_core::writer::OperationMapper;
use hypergate_core::writer::PageInfo;
use hypergate_core::writer::PageMessageMapper;
use hypergate_core::writer::PageWriter;
use hypergate_core::writer::ResourceInfo;
use hypergate_core::writer::SingleModelMessageMapper;
use hypergate_core::writer::SingleModelWriter;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Recording Mapper
// ============================================================================

/// Mapper that records each callback as a label.
#[derive(Default)]
struct Recorder {
    /// Recorded labels in call order.
    calls: Mutex<Vec<String>>,
}

impl Recorder {
    /// Records one label.
    fn record(&self, label: String) {
        self.calls.lock().unwrap().push(label);
    }

    /// Returns and clears the recorded labels.
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }
}

impl MessageMapper for Recorder {
    fn media_type(&self) -> &str {
        "application/x-recording"
    }
}

impl OperationMapper for Recorder {
    fn map_operation_method(&self, _doc: &mut JsonObjectBuilder, _path: &FieldPath, op: &OperationInfo) {
        self.record(format!("op:{} {} {}", op.name, op.method, op.target_url));
    }

    fn map_operation_form_url(
        &self,
        _doc: &mut JsonObjectBuilder,
        _path: &FieldPath,
        _op: &OperationInfo,
        form_url: &str,
    ) {
        self.record(format!("form:{form_url}"));
    }
}

impl SingleModelMessageMapper for Recorder {
    fn on_start(&self, _doc: &mut JsonObjectBuilder, path: &FieldPath, _model: &ModelInfo) {
        self.record(format!("start:{path}"));
    }

    fn map_self_url(&self, _doc: &mut JsonObjectBuilder, _path: &FieldPath, url: &str) {
        self.record(format!("self:{url}"));
    }

    fn map_types(&self, _doc: &mut JsonObjectBuilder, _path: &FieldPath, types: &[String]) {
        self.record(format!("types:{}", types.join(",")));
    }

    fn map_string(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, value: &str) {
        doc.set(&[], &path.dotted(name), Value::from(value));
        self.record(format!("string:{}={value}", path.dotted(name)));
    }

    fn map_number(
        &self,
        _doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        value: &serde_json::Number,
    ) {
        self.record(format!("number:{}={value}", path.dotted(name)));
    }

    fn map_link(&self, _doc: &mut JsonObjectBuilder, _path: &FieldPath, name: &str, url: &str) {
        self.record(format!("link:{name}={url}"));
    }

    fn map_linked_resource_url(
        &self,
        _doc: &mut JsonObjectBuilder,
        _path: &FieldPath,
        name: &str,
        url: &str,
    ) {
        self.record(format!("linked:{name}={url}"));
    }

    fn map_related_collection_url(
        &self,
        _doc: &mut JsonObjectBuilder,
        _path: &FieldPath,
        name: &str,
        url: &str,
    ) {
        self.record(format!("related:{name}={url}"));
    }

    fn on_start_embedded(&self, _doc: &mut JsonObjectBuilder, _path: &FieldPath, name: &str) {
        self.record(format!("embed:{name}"));
    }

    fn on_finish_embedded(&self, _doc: &mut JsonObjectBuilder, _path: &FieldPath, name: &str) {
        self.record(format!("end-embed:{name}"));
    }

    fn on_start_nested(&self, _doc: &mut JsonObjectBuilder, _path: &FieldPath, name: &str) {
        self.record(format!("nest:{name}"));
    }

    fn on_finish_nested(&self, _doc: &mut JsonObjectBuilder, _path: &FieldPath, name: &str) {
        self.record(format!("end-nest:{name}"));
    }

    fn on_finish(&self, _doc: &mut JsonObjectBuilder, path: &FieldPath, _model: &ModelInfo) {
        self.record(format!("finish:{path}"));
    }
}

impl PageMessageMapper for Recorder {
    fn item_mapper(&self) -> &dyn SingleModelMessageMapper {
        self
    }

    fn on_start(&self, _doc: &mut JsonObjectBuilder, page: &PageInfo) {
        self.record(format!("page:{}/{}", page.page, page.page_count));
    }

    fn on_start_item(&self, _doc: &mut JsonObjectBuilder, _page: &PageInfo, index: usize) {
        self.record(format!("item:{index}"));
    }

    fn on_finish_item(
        &self,
        doc: &mut JsonObjectBuilder,
        _page: &PageInfo,
        index: usize,
        item: JsonObjectBuilder,
    ) {
        doc.push(&[], "items", item.into_value());
        self.record(format!("end-item:{index}"));
    }

    fn map_collection_url(&self, _doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        self.record(format!("collection:{url}"));
    }

    fn map_current_page_url(&self, _doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        self.record(format!("current:{url}"));
    }

    fn map_first_page_url(&self, _doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        self.record(format!("first:{url}"));
    }

    fn map_last_page_url(&self, _doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        self.record(format!("last:{url}"));
    }

    fn map_next_page_url(&self, _doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        self.record(format!("next:{url}"));
    }

    fn map_previous_page_url(&self, _doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        self.record(format!("previous:{url}"));
    }

    fn map_item_total_count(&self, _doc: &mut JsonObjectBuilder, _page: &PageInfo, total: u64) {
        self.record(format!("total:{total}"));
    }

    fn map_page_count(&self, _doc: &mut JsonObjectBuilder, _page: &PageInfo, count: u64) {
        self.record(format!("pages:{count}"));
    }

    fn on_finish(&self, _doc: &mut JsonObjectBuilder, _page: &PageInfo) {
        self.record("page-finish".to_string());
    }
}

impl DocumentationMessageMapper for Recorder {
    fn on_start(&self, _doc: &mut JsonObjectBuilder, api: &DocumentationInfo) {
        self.record(format!("docs:{}@{}", api.title, api.documentation_url));
    }

    fn on_start_resource(&self, _doc: &mut JsonObjectBuilder, resource: &ResourceInfo) {
        self.record(format!("resource:{} {}", resource.name, resource.collection_url));
    }

    fn map_property(&self, _doc: &mut JsonObjectBuilder, resource: &ResourceInfo, field: &FieldDescriptor) {
        self.record(format!("property:{}.{}:{}", resource.name, field.name, field.kind.as_str()));
    }

    fn map_operation(&self, _doc: &mut JsonObjectBuilder, resource: &ResourceInfo, operation: &OperationDoc) {
        self.record(format!(
            "operation:{}.{} {} {} {}",
            resource.name,
            operation.name,
            operation.method,
            operation.route,
            operation.form_url.as_deref().unwrap_or("-")
        ));
    }

    fn on_finish_resource(&self, _doc: &mut JsonObjectBuilder, resource: &ResourceInfo) {
        self.record(format!("end-resource:{}", resource.name));
    }

    fn on_finish(&self, _doc: &mut JsonObjectBuilder, _api: &DocumentationInfo) {
        self.record("docs-finish".to_string());
    }
}

impl FormMessageMapper for Recorder {
    fn on_start(&self, _doc: &mut JsonObjectBuilder, form: &FormDescriptor, url: &str) {
        self.record(format!("form-start:{}@{url}", form.id));
    }

    fn map_field(&self, _doc: &mut JsonObjectBuilder, _form: &FormDescriptor, field: &FormField) {
        self.record(format!("field:{}:{}:{}", field.name, field.kind.as_str(), field.required));
    }

    fn on_finish(&self, _doc: &mut JsonObjectBuilder, form: &FormDescriptor) {
        self.record(format!("form-finish:{}", form.id));
    }
}

impl BatchMessageMapper for Recorder {
    fn on_start(&self, _doc: &mut JsonObjectBuilder, batch: &BatchInfo) {
        self.record(format!("batch:{} {}", batch.resource_name, batch.count));
    }

    fn map_created(
        &self,
        _doc: &mut JsonObjectBuilder,
        _batch: &BatchInfo,
        identifier: &Identifier,
        url: Option<&str>,
    ) {
        self.record(format!("created:{identifier}={}", url.unwrap_or("-")));
    }

    fn on_finish(&self, _doc: &mut JsonObjectBuilder, _batch: &BatchInfo) {
        self.record("batch-finish".to_string());
    }
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Base URL used by every test.
const BASE: &str = "http://api.test";

/// Book model.
#[derive(Debug, Clone)]
struct Book {
    /// Book id.
    id: i64,
    /// Optional title.
    title: Option<String>,
    /// Author id.
    author_id: Option<i64>,
}

/// Author model.
#[derive(Debug, Clone)]
struct Author {
    /// Author id.
    id: i64,
    /// Name.
    name: String,
}

/// Builds the representor set for books and authors.
fn representors() -> RepresentorSet {
    let books = Representor::<Book>::builder()
        .types(["book"])
        .identifier("book", |book: &Book| book.id)
        .add_string("title", |book: &Book| book.title.clone())
        .add_linked_model("author", "author", |book: &Book| book.author_id)
        .add_related_collection("reviews", "review")
        .build()
        .unwrap();
    let authors = Representor::<Author>::builder()
        .types(["author"])
        .identifier("author", |author: &Author| author.id)
        .add_string("name", |author: &Author| Some(author.name.clone()))
        .build()
        .unwrap();
    RepresentorSet::new().with("books", books).with("authors", authors)
}

/// Builds the path mapper for books and authors.
fn paths() -> StaticPathMapper {
    StaticPathMapper::new()
        .with_resource("books", Some(IdentifierType::new("book")), IdentifierKind::Integer)
        .with_resource("authors", Some(IdentifierType::new("author")), IdentifierKind::Integer)
}

/// Returns a book without a title.
fn untitled(id: i64) -> Book {
    Book {
        id,
        title: None,
        author_id: None,
    }
}

/// Source serving a single author.
struct Authors;

impl EmbeddedSource for Authors {
    fn fetch(
        &self,
        resource_name: &str,
        identifier: &Identifier,
    ) -> Result<Option<Arc<dyn Any + Send + Sync>>, EmbeddedError> {
        match (resource_name, identifier) {
            ("authors", Identifier::Integer(7)) => Ok(Some(Arc::new(Author {
                id: 7,
                name: "Frank".to_string(),
            }))),
            ("authors", Identifier::Integer(13)) => Err(EmbeddedError::Fetch {
                resource: resource_name.to_string(),
                identifier: identifier.to_string(),
                message: "offline".to_string(),
            }),
            _ => Ok(None),
        }
    }
}

/// Data holder for the publish form.
#[derive(Debug, Default)]
struct PublishRequest {
    /// Release date.
    on: String,
}

/// Builds the publish form.
fn publish_form() -> Form<PublishRequest> {
    Form::builder("publish-book", PublishRequest::default)
        .title("Publish")
        .required("on", |request: &mut PublishRequest, on: String| request.on = on)
        .build()
}

/// Builds a registry with retrieve, admin-only remove, publish, and create.
fn registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    let nothing = |_: &[hypergate_core::ParamValue]| Ok(ActionOutput::Nothing);
    registry
        .register(
            ActionSemantics::of_resource(Resource::item("books"))
                .name("retrieve")
                .method(HttpMethod::Get)
                .receives_params([ParamType::Id])
                .returns(ReturnType::Single)
                .not_annotated()
                .execute(nothing)
                .build()
                .unwrap(),
        )
        .unwrap();
    registry
        .register(
            ActionSemantics::of_resource(Resource::item("books"))
                .name("remove")
                .method(HttpMethod::Delete)
                .receives_params([ParamType::Id])
                .returns_nothing()
                .not_annotated()
                .permission(|credentials, _| credentials.has_role("admin"))
                .execute(nothing)
                .build()
                .unwrap(),
        )
        .unwrap();
    registry
        .register(
            ActionSemantics::of_resource(Resource::item("books"))
                .name("publish")
                .method(HttpMethod::Post)
                .receives_params([ParamType::Id, ParamType::Body])
                .returns_nothing()
                .not_annotated()
                .form(publish_form())
                .execute(nothing)
                .build()
                .unwrap(),
        )
        .unwrap();
    registry
        .register(
            ActionSemantics::of_resource(Resource::paged("books"))
                .name("create")
                .method(HttpMethod::Post)
                .receives_params([ParamType::Body])
                .returns(ReturnType::Single)
                .not_annotated()
                .execute(nothing)
                .build()
                .unwrap(),
        )
        .unwrap();
    registry
}

// ============================================================================
// SECTION: Single Models
// ============================================================================

/// Absent fields produce no callback; related collections still appear.
#[test]
fn single_model_omits_absent_fields() {
    let (representors, paths, urls) = (representors(), paths(), UrlBuilder::new(BASE));
    let context = WriterContext::new(&representors, &paths, &urls);
    let recorder = Recorder::default();
    let doc = SingleModelWriter::new(&context, &recorder)
        .write_document(&SingleModel::new("books", untitled(42)))
        .unwrap();
    assert_eq!(recorder.take(), vec![
        "start:".to_string(),
        "self:http://api.test/books/42".to_string(),
        "types:book".to_string(),
        "related:reviews=http://api.test/books/42/reviews".to_string(),
        "finish:".to_string(),
    ]);
    assert!(doc.is_empty());
}

/// Linked models are linked unless selected for embedding.
#[test]
fn linked_models_are_linked_by_default() {
    let (representors, paths, urls) = (representors(), paths(), UrlBuilder::new(BASE));
    let context = WriterContext::new(&representors, &paths, &urls).with_source(&Authors);
    let recorder = Recorder::default();
    let book = Book {
        id: 1,
        title: Some("Dune".to_string()),
        author_id: Some(7),
    };
    SingleModelWriter::new(&context, &recorder).write(&SingleModel::new("books", book)).unwrap();
    let calls = recorder.take();
    assert!(calls.contains(&"string:title=Dune".to_string()));
    assert!(calls.contains(&"linked:author=http://api.test/authors/7".to_string()));
    assert!(!calls.iter().any(|call| call.starts_with("embed:")));
}

/// Selected relations are embedded with their own full callback sequence.
#[test]
fn selected_relations_are_embedded() {
    let (representors, paths, urls) = (representors(), paths(), UrlBuilder::new(BASE));
    let context = WriterContext::new(&representors, &paths, &urls)
        .with_source(&Authors)
        .with_embedded(EmbeddedSelection::parse("author"));
    let recorder = Recorder::default();
    let book = Book {
        id: 1,
        title: None,
        author_id: Some(7),
    };
    let doc = SingleModelWriter::new(&context, &recorder)
        .write_document(&SingleModel::new("books", book))
        .unwrap();
    assert_eq!(recorder.take(), vec![
        "start:".to_string(),
        "self:http://api.test/books/1".to_string(),
        "types:book".to_string(),
        "embed:author".to_string(),
        "start:author".to_string(),
        "self:http://api.test/authors/7".to_string(),
        "types:author".to_string(),
        "string:author.name=Frank".to_string(),
        "finish:author".to_string(),
        "end-embed:author".to_string(),
        "related:reviews=http://api.test/books/1/reviews".to_string(),
        "finish:".to_string(),
    ]);
    assert_eq!(doc.get(&[], "author.name"), Some(&json!("Frank")));
}

/// Missing embedded models fall back to links; failures abort the document.
#[test]
fn embedded_fetch_outcomes() {
    let (representors, paths, urls) = (representors(), paths(), UrlBuilder::new(BASE));
    let context = WriterContext::new(&representors, &paths, &urls)
        .with_source(&Authors)
        .with_embedded(EmbeddedSelection::parse("author"));
    let recorder = Recorder::default();
    let writer = SingleModelWriter::new(&context, &recorder);

    let orphan = Book {
        id: 2,
        title: None,
        author_id: Some(99),
    };
    writer.write(&SingleModel::new("books", orphan)).unwrap();
    assert!(recorder.take().contains(&"linked:author=http://api.test/authors/99".to_string()));

    let failing = Book {
        id: 3,
        title: None,
        author_id: Some(13),
    };
    let err = writer.write(&SingleModel::new("books", failing)).unwrap_err();
    assert!(matches!(err, WriteError::Embedded(EmbeddedError::Fetch { .. })));
}

/// Unknown resources fail before any callback.
#[test]
fn missing_representor_is_reported() {
    let (representors, paths, urls) = (representors(), paths(), UrlBuilder::new(BASE));
    let context = WriterContext::new(&representors, &paths, &urls);
    let recorder = Recorder::default();
    let err = SingleModelWriter::new(&context, &recorder)
        .write(&SingleModel::new("movies", untitled(1)))
        .unwrap_err();
    assert_eq!(
        err,
        WriteError::MissingRepresentor {
            resource: "movies".to_string(),
        }
    );
    assert!(recorder.take().is_empty());
}

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Only permitted operations are listed, with form URLs where present.
#[test]
fn operations_follow_caller_permissions() {
    let (representors, paths, urls) = (representors(), paths(), UrlBuilder::new(BASE));
    let registry = registry();
    let recorder = Recorder::default();

    let anonymous = WriterContext::new(&representors, &paths, &urls)
        .with_operations(&registry, Credentials::anonymous());
    SingleModelWriter::new(&anonymous, &recorder)
        .write(&SingleModel::new("books", untitled(5)))
        .unwrap();
    let ops: Vec<String> = recorder
        .take()
        .into_iter()
        .filter(|call| call.starts_with("op:") || call.starts_with("form:"))
        .collect();
    assert_eq!(ops, vec![
        "op:retrieve GET http://api.test/books/5".to_string(),
        "op:publish POST http://api.test/books/5/publish".to_string(),
        "form:http://api.test/forms/publish-book".to_string(),
    ]);

    let admin = WriterContext::new(&representors, &paths, &urls)
        .with_operations(&registry, Credentials::for_subject("root").with_role("admin"));
    SingleModelWriter::new(&admin, &recorder)
        .write(&SingleModel::new("books", untitled(5)))
        .unwrap();
    assert!(recorder.take().contains(&"op:remove DELETE http://api.test/books/5".to_string()));
}

// ============================================================================
// SECTION: Pages
// ============================================================================

/// An empty page has no item callbacks and a total of zero.
#[test]
fn empty_page_writes_only_page_level_callbacks() {
    let (representors, paths, urls) = (representors(), paths(), UrlBuilder::new(BASE));
    let context = WriterContext::new(&representors, &paths, &urls);
    let recorder = Recorder::default();
    let page = PageModel::new(Resource::paged("books"), Vec::<Book>::new(), Pagination::new(1, 10), 0);
    PageWriter::new(&context, &recorder).write(&page).unwrap();
    assert_eq!(recorder.take(), vec![
        "page:1/1".to_string(),
        "collection:http://api.test/books".to_string(),
        "current:http://api.test/books?page=1&per_page=10".to_string(),
        "first:http://api.test/books?page=1&per_page=10".to_string(),
        "last:http://api.test/books?page=1&per_page=10".to_string(),
        "total:0".to_string(),
        "pages:1".to_string(),
        "page-finish".to_string(),
    ]);
}

/// Middle pages link both directions; items are written as documents.
#[test]
fn middle_page_links_next_and_previous() {
    let (representors, paths, urls) = (representors(), paths(), UrlBuilder::new(BASE));
    let context = WriterContext::new(&representors, &paths, &urls);
    let recorder = Recorder::default();
    let items = vec![
        Book {
            id: 3,
            title: Some("Emma".to_string()),
            author_id: None,
        },
        untitled(4),
    ];
    let page = PageModel::new(Resource::paged("books"), items, Pagination::new(2, 2), 5);
    let doc = PageWriter::new(&context, &recorder).write_document(&page).unwrap();
    let calls = recorder.take();
    assert_eq!(calls[0], "page:2/3");
    assert_eq!(calls[1], "item:0");
    assert!(calls.contains(&"end-item:1".to_string()));
    assert!(calls.contains(&"next:http://api.test/books?page=3&per_page=2".to_string()));
    assert!(calls.contains(&"previous:http://api.test/books?page=1&per_page=2".to_string()));
    assert!(calls.contains(&"total:5".to_string()));
    assert_eq!(doc.get(&[], "items"), Some(&json!([{"title": "Emma"}, {}])));
}

/// The last page has no next link; nested pages use the parent URL.
#[test]
fn nested_last_page_has_no_next_link() {
    let (representors, paths, urls) = (representors(), paths(), UrlBuilder::new(BASE));
    let context = WriterContext::new(&representors, &paths, &urls);
    let recorder = Recorder::default();
    let resource = Resource::nested(hypergate_core::Item::with_id("authors", "7"), "books");
    let page = PageModel::new(resource, vec![untitled(9)], Pagination::new(3, 1), 3);
    PageWriter::new(&context, &recorder).write(&page).unwrap();
    let calls = recorder.take();
    assert!(calls.contains(&"collection:http://api.test/authors/7/books".to_string()));
    assert!(!calls.iter().any(|call| call.starts_with("next:")));
    assert!(calls.contains(&"previous:http://api.test/authors/7/books?page=2&per_page=1".to_string()));
}

/// Collection operations target the collection URL.
#[test]
fn page_lists_collection_operations() {
    let (representors, paths, urls) = (representors(), paths(), UrlBuilder::new(BASE));
    let registry = registry();
    let context = WriterContext::new(&representors, &paths, &urls)
        .with_operations(&registry, Credentials::anonymous());
    let recorder = Recorder::default();
    let page = PageModel::new(Resource::paged("books"), Vec::<Book>::new(), Pagination::new(1, 10), 0);
    PageWriter::new(&context, &recorder).write(&page).unwrap();
    let calls = recorder.take();
    let position = |label: &str| calls.iter().position(|call| call == label).unwrap();
    assert!(position("op:create POST http://api.test/books") < position("page-finish"));
}

// ============================================================================
// SECTION: Documentation, Forms, Batches
// ============================================================================

/// Documentation covers every resource with its fields and operations.
#[test]
fn documentation_lists_resources_fields_and_operations() {
    let (representors, paths, urls) = (representors(), paths(), UrlBuilder::new(BASE));
    let context = WriterContext::new(&representors, &paths, &urls);
    let recorder = Recorder::default();
    DocumentationWriter::new(&context, &recorder).write("Library", "Books and authors", &registry()).unwrap();
    let calls = recorder.take();
    assert_eq!(calls.first().map(String::as_str), Some("docs:Library@http://api.test/docs"));
    assert_eq!(calls.last().map(String::as_str), Some("docs-finish"));
    let authors = calls.iter().position(|call| call == "resource:authors http://api.test/authors").unwrap();
    let books = calls.iter().position(|call| call == "resource:books http://api.test/books").unwrap();
    assert!(authors < books);
    assert!(calls.contains(&"property:books.title:string".to_string()));
    assert!(calls.contains(&"property:books.author:linked_model".to_string()));
    assert!(calls.contains(&"operation:books.retrieve GET /books/{id} -".to_string()));
    assert!(calls.contains(&"operation:books.publish POST /books/{id}/publish http://api.test/forms/publish-book".to_string()));
    assert!(calls.contains(&"operation:books.create POST /books -".to_string()));
}

/// Form documents list fields in declaration order.
#[test]
fn form_writer_lists_fields() {
    let urls = UrlBuilder::new(BASE).with_form_prefix("/input/");
    let recorder = Recorder::default();
    let form = publish_form();
    FormWriter::new(&urls, &recorder).write(form.descriptor()).unwrap();
    assert_eq!(recorder.take(), vec![
        "form-start:publish-book@http://api.test/input/publish-book".to_string(),
        "field:on:string:true".to_string(),
        "form-finish:publish-book".to_string(),
    ]);
}

/// Batch results link each created model that has a path.
#[test]
fn batch_writer_links_created_models() {
    let (representors, paths, urls) = (representors(), paths(), UrlBuilder::new(BASE));
    let context = WriterContext::new(&representors, &paths, &urls);
    let recorder = Recorder::default();
    let batch = BatchResult {
        resource_name: "books".to_string(),
        identifiers: vec![Identifier::Integer(1), Identifier::from("draft")],
    };
    BatchWriter::new(&context, &recorder).write(&batch).unwrap();
    assert_eq!(recorder.take(), vec![
        "batch:books 2".to_string(),
        "created:1=http://api.test/books/1".to_string(),
        "created:draft=-".to_string(),
        "batch-finish".to_string(),
    ]);
}

/// Text identifiers are percent-encoded into a single URL segment.
#[test]
fn batch_writer_encodes_text_identifiers() {
    let representors = representors();
    let paths = StaticPathMapper::new().with_resource("authors", None, IdentifierKind::Text);
    let urls = UrlBuilder::new(BASE);
    let context = WriterContext::new(&representors, &paths, &urls);
    let recorder = Recorder::default();
    let batch = BatchResult {
        resource_name: "authors".to_string(),
        identifiers: vec![Identifier::from("a/b c")],
    };
    BatchWriter::new(&context, &recorder).write(&batch).unwrap();
    assert_eq!(recorder.take(), vec![
        "batch:authors 1".to_string(),
        "created:a/b c=http://api.test/authors/a%2Fb%20c".to_string(),
        "batch-finish".to_string(),
    ]);
}

// ============================================================================
// SECTION: Document Builder
// ============================================================================

/// Writes through a non-object value are refused and recorded.
#[test]
fn builder_records_collisions_instead_of_replacing() {
    let mut doc = JsonObjectBuilder::new();
    doc.set(&[], "author", json!("Frank"));
    doc.set(&["author".to_string()], "name", json!("Frank Herbert"));
    doc.set(&["publisher".to_string()], "name", json!("Chilton"));
    doc.push(&["publisher".to_string()], "name", json!("Ace"));
    assert_eq!(doc.get(&[], "author"), Some(&json!("Frank")));
    assert_eq!(doc.get(&["publisher".to_string()], "name"), Some(&json!("Chilton")));
    assert_eq!(doc.collisions(), ["author".to_string(), "publisher.name".to_string()]);
}
