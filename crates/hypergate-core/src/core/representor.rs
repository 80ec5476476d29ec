// crates/hypergate-core/src/core/representor.rs
// ============================================================================
// Module: Representors
// Description: Per-type field descriptions and model snapshots.
// Purpose: Describe how a domain type is serialized without format knowledge.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! A [`Representor<T>`] lists the hypermedia types of `T`, how to extract its
//! identifier, and one extractor per declared field. It is built once through
//! [`RepresentorBuilder`] and is immutable afterwards.
//!
//! Writers never see `T`. They call [`AnyRepresentor::snapshot_any`], which
//! walks the declared fields in declaration order and produces a
//! [`ModelSnapshot`]: a format-neutral list of present values.
//!
//! Invariants:
//! - Field names are unique within a kind; cross-kind reuse is not checked.
//! - An extractor returning `None` produces no entry in the snapshot.
//! - Fields excluded by a [`FieldsSelection`] are never extracted.
//! - Extractor failures abort the whole snapshot.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::type_name;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Number;
use time::OffsetDateTime;

use crate::core::errors::BuilderError;
use crate::core::field::FieldDescriptor;
use crate::core::field::FieldError;
use crate::core::field::FieldKind;
use crate::core::field::FieldValue;
use crate::core::identifiers::Identifier;
use crate::core::identifiers::IdentifierType;
use crate::core::params::AcceptLanguage;

// ============================================================================
// SECTION: Extractor Outputs
// ============================================================================

/// Return types accepted from field extractors.
///
/// Extractors may return a plain `Option<V>` or a fallible
/// `Result<Option<V>, FieldError>`.
pub trait FieldOutput<V> {
    /// Normalizes the extractor output.
    ///
    /// # Errors
    ///
    /// Returns the extractor's own [`FieldError`].
    fn into_field(self) -> Result<Option<V>, FieldError>;
}

impl<V> FieldOutput<V> for Option<V> {
    fn into_field(self) -> Result<Option<V>, FieldError> {
        Ok(self)
    }
}

impl<V> FieldOutput<V> for Result<Option<V>, FieldError> {
    fn into_field(self) -> Result<Option<V>, FieldError> {
        self
    }
}

// ============================================================================
// SECTION: Relations
// ============================================================================

/// Related collection declaration: `{self}/{name}` lists `target` models.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RelatedCollection {
    /// Relation name, used as the URL segment.
    pub name: String,
    /// Identifier type of the listed models.
    pub target: IdentifierType,
}

/// Linked model reference extracted from one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedModelRef {
    /// Relation name.
    pub name: String,
    /// Identifier type of the linked model.
    pub target: IdentifierType,
    /// Identifier of the linked model.
    pub identifier: Identifier,
}

/// Index of inverse relations shared by the representors of one generation.
///
/// Bidirectional relations declared on one type register a related
/// collection on the other type so it can be discovered from that side.
pub trait RelationIndex: Send + Sync {
    /// Records that models of `owner` expose `relation`.
    fn register(&self, owner: &IdentifierType, relation: RelatedCollection);

    /// Returns the relations registered for `owner`, in registration order.
    fn related_collections(&self, owner: &IdentifierType) -> Vec<RelatedCollection>;
}

// ============================================================================
// SECTION: Field Selection
// ============================================================================

/// Sparse field selection keyed by hypermedia type.
///
/// # Invariants
/// - A type without an entry exposes all of its fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldsSelection(BTreeMap<String, BTreeSet<String>>);

impl FieldsSelection {
    /// Returns a selection that exposes every field.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Returns a copy restricting `type_name` to `fields`.
    #[must_use]
    pub fn with(
        mut self,
        type_name: impl Into<String>,
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.0.entry(type_name.into()).or_default().extend(fields.into_iter().map(Into::into));
        self
    }

    /// Parses `type.field` entries separated by commas.
    ///
    /// Entries without a dot are ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut selection = Self::default();
        for entry in raw.split(',').map(str::trim) {
            if let Some((type_name, field)) = entry.split_once('.')
                && !type_name.is_empty()
                && !field.is_empty()
            {
                selection = selection.with(type_name, [field]);
            }
        }
        selection
    }

    /// Returns true when `field` is exposed for a model of `types`.
    ///
    /// The first type with an entry decides.
    #[must_use]
    pub fn allows(&self, types: &[String], field: &str) -> bool {
        types
            .iter()
            .find_map(|type_name| self.0.get(type_name))
            .is_none_or(|fields| fields.contains(field))
    }
}

/// Per-call inputs to snapshot extraction.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotScope<'a> {
    /// Caller language preferences for localized fields.
    pub locale: &'a AcceptLanguage,
    /// Sparse field selection.
    pub fields: &'a FieldsSelection,
}

// ============================================================================
// SECTION: Snapshot
// ============================================================================

/// Format-neutral view of one model, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelSnapshot {
    /// Hypermedia types, most specific first.
    pub types: Vec<String>,
    /// Identifier, when the representor declares one.
    pub identifier: Option<Identifier>,
    /// Identifier type, when the representor declares one.
    pub identifier_type: Option<IdentifierType>,
    /// Present property values.
    pub properties: Vec<(String, FieldValue)>,
    /// Present binary fields as `(name, binary id)`.
    pub binaries: Vec<(String, String)>,
    /// Static links as `(name, url)`.
    pub links: Vec<(String, String)>,
    /// Present linked models.
    pub linked_models: Vec<LinkedModelRef>,
    /// Related collections, own declarations first.
    pub related_collections: Vec<RelatedCollection>,
    /// Present nested child models.
    pub nested: Vec<(String, Self)>,
}

impl ModelSnapshot {
    /// Returns the property value named `name`, if present.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&FieldValue> {
        self.properties.iter().find(|(field, _)| field == name).map(|(_, value)| value)
    }

    /// Returns the primary (most specific) type.
    #[must_use]
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }
}

// ============================================================================
// SECTION: Erased Representor
// ============================================================================

/// Object-safe view of a representor used by writers.
pub trait AnyRepresentor: Send + Sync {
    /// Returns the declared hypermedia types.
    fn types(&self) -> &[String];

    /// Returns the identifier type, if declared.
    fn identifier_type(&self) -> Option<&IdentifierType>;

    /// Returns descriptors for every declared field.
    fn field_descriptors(&self) -> Vec<FieldDescriptor>;

    /// Snapshots a type-erased model.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TypeMismatch`] when `model` is not of the
    /// representor's type, or the first extractor failure.
    fn snapshot_any(
        &self,
        model: &dyn Any,
        scope: &SnapshotScope<'_>,
    ) -> Result<ModelSnapshot, FieldError>;

    /// Extracts the identifier of a type-erased model.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TypeMismatch`] when `model` is not of the
    /// representor's type.
    fn identify_any(&self, model: &dyn Any) -> Result<Option<Identifier>, FieldError>;
}

// ============================================================================
// SECTION: Representor
// ============================================================================

/// Fallible extractor for one field kind.
type Extract<T, V> = Box<dyn Fn(&T) -> Result<Option<V>, FieldError> + Send + Sync>;

/// Extractor resolving a string against language preferences.
type LocalizedExtract<T> =
    Box<dyn Fn(&T, &AcceptLanguage) -> Result<Option<String>, FieldError> + Send + Sync>;

/// Extractor producing a nested child snapshot.
type NestedExtract<T> = Box<
    dyn Fn(&T, &SnapshotScope<'_>) -> Result<Option<ModelSnapshot>, FieldError> + Send + Sync,
>;

/// Identifier extractor.
type IdentifierFn<T> = Box<dyn Fn(&T) -> Identifier + Send + Sync>;

/// Extractor for one property field.
enum PropertyExtract<T> {
    /// String extractor.
    String(Extract<T, String>),
    /// String list extractor.
    StringList(Extract<T, Vec<String>>),
    /// Boolean extractor.
    Boolean(Extract<T, bool>),
    /// Boolean list extractor.
    BooleanList(Extract<T, Vec<bool>>),
    /// Number extractor.
    Number(Extract<T, Number>),
    /// Number list extractor.
    NumberList(Extract<T, Vec<Number>>),
    /// Date extractor.
    Date(Extract<T, OffsetDateTime>),
    /// Date list extractor.
    DateList(Extract<T, Vec<OffsetDateTime>>),
    /// Localized string extractor.
    Localized(LocalizedExtract<T>),
}

impl<T> PropertyExtract<T> {
    /// Returns the declared field kind.
    const fn kind(&self) -> FieldKind {
        match self {
            Self::String(_) => FieldKind::String,
            Self::StringList(_) => FieldKind::StringList,
            Self::Boolean(_) => FieldKind::Boolean,
            Self::BooleanList(_) => FieldKind::BooleanList,
            Self::Number(_) => FieldKind::Number,
            Self::NumberList(_) => FieldKind::NumberList,
            Self::Date(_) => FieldKind::Date,
            Self::DateList(_) => FieldKind::DateList,
            Self::Localized(_) => FieldKind::LocalizedString,
        }
    }

    /// Runs the extractor.
    fn extract(&self, model: &T, locale: &AcceptLanguage) -> Result<Option<FieldValue>, FieldError> {
        Ok(match self {
            Self::String(extract) => extract(model)?.map(FieldValue::String),
            Self::StringList(extract) => extract(model)?.map(FieldValue::StringList),
            Self::Boolean(extract) => extract(model)?.map(FieldValue::Boolean),
            Self::BooleanList(extract) => extract(model)?.map(FieldValue::BooleanList),
            Self::Number(extract) => extract(model)?.map(FieldValue::Number),
            Self::NumberList(extract) => extract(model)?.map(FieldValue::NumberList),
            Self::Date(extract) => extract(model)?.map(FieldValue::Date),
            Self::DateList(extract) => extract(model)?.map(FieldValue::DateList),
            Self::Localized(extract) => extract(model, locale)?.map(FieldValue::String),
        })
    }
}

/// Declared property field.
struct Property<T> {
    /// Field name.
    name: String,
    /// Extractor.
    extract: PropertyExtract<T>,
}

/// Declared linked-model field.
struct LinkedModel<T> {
    /// Relation name.
    name: String,
    /// Identifier type of the target.
    target: IdentifierType,
    /// Target identifier extractor.
    extract: Extract<T, Identifier>,
}

/// Declared nested child representor.
struct NestedField<T> {
    /// Field name.
    name: String,
    /// Child representor, for descriptors.
    child: Arc<dyn AnyRepresentor>,
    /// Child snapshot extractor.
    extract: NestedExtract<T>,
}

/// Immutable field description for domain type `T`.
pub struct Representor<T> {
    /// Hypermedia types, most specific first.
    types: Vec<String>,
    /// Identifier type and extractor.
    identifier: Option<(IdentifierType, IdentifierFn<T>)>,
    /// Property fields in declaration order.
    properties: Vec<Property<T>>,
    /// Binary fields in declaration order.
    binaries: Vec<(String, Extract<T, String>)>,
    /// Static links.
    links: Vec<(String, String)>,
    /// Linked-model fields.
    linked_models: Vec<LinkedModel<T>>,
    /// Own related collections.
    related_collections: Vec<RelatedCollection>,
    /// Nested child representors.
    nested: Vec<NestedField<T>>,
    /// Relation index consulted for inverse relations.
    relations: Option<Arc<dyn RelationIndex>>,
}

impl<T: 'static> Representor<T> {
    /// Starts a builder without a relation index.
    #[must_use]
    pub fn builder() -> RepresentorBuilder<T> {
        RepresentorBuilder::new(None)
    }

    /// Starts a builder that records bidirectional relations in `relations`.
    #[must_use]
    pub fn builder_with_relations(relations: Arc<dyn RelationIndex>) -> RepresentorBuilder<T> {
        RepresentorBuilder::new(Some(relations))
    }

    /// Returns the declared types.
    #[must_use]
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Returns the identifier of `model`, if an identifier is declared.
    #[must_use]
    pub fn identify(&self, model: &T) -> Option<Identifier> {
        self.identifier.as_ref().map(|(_, extract)| extract(model))
    }

    /// Returns the related collections: own declarations, then inverse
    /// relations registered by other representors (deduplicated by name).
    #[must_use]
    pub fn related_collections(&self) -> Vec<RelatedCollection> {
        let mut collections = self.related_collections.clone();
        if let (Some(relations), Some((identifier_type, _))) = (&self.relations, &self.identifier) {
            for inverse in relations.related_collections(identifier_type) {
                if !collections.iter().any(|own| own.name == inverse.name) {
                    collections.push(inverse);
                }
            }
        }
        collections
    }

    /// Extracts a single property field by name with default preferences.
    ///
    /// # Errors
    ///
    /// Returns the extractor's failure.
    pub fn property_value(&self, model: &T, name: &str) -> Result<Option<FieldValue>, FieldError> {
        let locale = AcceptLanguage::default();
        match self.properties.iter().find(|property| property.name == name) {
            Some(property) => property.extract.extract(model, &locale),
            None => Ok(None),
        }
    }

    /// Snapshots `model`.
    ///
    /// # Errors
    ///
    /// Returns the first extractor failure.
    pub fn snapshot(
        &self,
        model: &T,
        scope: &SnapshotScope<'_>,
    ) -> Result<ModelSnapshot, FieldError> {
        let allows = |field: &str| scope.fields.allows(&self.types, field);
        let mut snapshot = ModelSnapshot {
            types: self.types.clone(),
            identifier: self.identify(model),
            identifier_type: self.identifier.as_ref().map(|(identifier_type, _)| identifier_type.clone()),
            ..ModelSnapshot::default()
        };
        for property in self.properties.iter().filter(|property| allows(&property.name)) {
            if let Some(value) = property.extract.extract(model, scope.locale)? {
                snapshot.properties.push((property.name.clone(), value));
            }
        }
        for (name, extract) in self.binaries.iter().filter(|(name, _)| allows(name)) {
            if let Some(binary_id) = extract(model)? {
                snapshot.binaries.push((name.clone(), binary_id));
            }
        }
        for nested in self.nested.iter().filter(|nested| allows(&nested.name)) {
            if let Some(child) = (nested.extract)(model, scope)? {
                snapshot.nested.push((nested.name.clone(), child));
            }
        }
        snapshot.links =
            self.links.iter().filter(|(name, _)| allows(name)).cloned().collect();
        for linked in self.linked_models.iter().filter(|linked| allows(&linked.name)) {
            if let Some(identifier) = (linked.extract)(model)? {
                snapshot.linked_models.push(LinkedModelRef {
                    name: linked.name.clone(),
                    target: linked.target.clone(),
                    identifier,
                });
            }
        }
        snapshot.related_collections = self
            .related_collections()
            .into_iter()
            .filter(|collection| allows(&collection.name))
            .collect();
        Ok(snapshot)
    }
}

impl<T: 'static> AnyRepresentor for Representor<T> {
    fn types(&self) -> &[String] {
        &self.types
    }

    fn identifier_type(&self) -> Option<&IdentifierType> {
        self.identifier.as_ref().map(|(identifier_type, _)| identifier_type)
    }

    fn field_descriptors(&self) -> Vec<FieldDescriptor> {
        let mut descriptors: Vec<FieldDescriptor> = self
            .properties
            .iter()
            .map(|property| descriptor(&property.name, property.extract.kind(), None))
            .collect();
        descriptors.extend(
            self.binaries.iter().map(|(name, _)| descriptor(name, FieldKind::Binary, None)),
        );
        descriptors.extend(self.nested.iter().map(|nested| {
            descriptor(&nested.name, FieldKind::Nested, nested.child.types().first().cloned())
        }));
        descriptors.extend(self.links.iter().map(|(name, _)| descriptor(name, FieldKind::Link, None)));
        descriptors.extend(self.linked_models.iter().map(|linked| {
            descriptor(&linked.name, FieldKind::LinkedModel, Some(linked.target.to_string()))
        }));
        descriptors.extend(self.related_collections().into_iter().map(|collection| {
            descriptor(
                &collection.name,
                FieldKind::RelatedCollection,
                Some(collection.target.to_string()),
            )
        }));
        descriptors
    }

    fn snapshot_any(
        &self,
        model: &dyn Any,
        scope: &SnapshotScope<'_>,
    ) -> Result<ModelSnapshot, FieldError> {
        self.snapshot(downcast::<T>(model)?, scope)
    }

    fn identify_any(&self, model: &dyn Any) -> Result<Option<Identifier>, FieldError> {
        Ok(self.identify(downcast::<T>(model)?))
    }
}

/// Downcasts a model, reporting the expected type on mismatch.
fn downcast<T: 'static>(model: &dyn Any) -> Result<&T, FieldError> {
    model.downcast_ref::<T>().ok_or_else(|| FieldError::TypeMismatch {
        expected: type_name::<T>().to_string(),
    })
}

/// Builds one field descriptor.
fn descriptor(name: &str, kind: FieldKind, target: Option<String>) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        kind,
        target,
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Fluent builder for [`Representor`].
///
/// Declaration errors are recorded and reported by [`RepresentorBuilder::build`].
pub struct RepresentorBuilder<T> {
    /// Representor under construction.
    representor: Representor<T>,
    /// Inverse relations to register on build: (field, target type, inverse name).
    inverse: Vec<(String, IdentifierType, String)>,
    /// First declaration error.
    error: Option<BuilderError>,
}

impl<T: 'static> RepresentorBuilder<T> {
    /// Creates an empty builder.
    fn new(relations: Option<Arc<dyn RelationIndex>>) -> Self {
        Self {
            representor: Representor {
                types: Vec::new(),
                identifier: None,
                properties: Vec::new(),
                binaries: Vec::new(),
                links: Vec::new(),
                linked_models: Vec::new(),
                related_collections: Vec::new(),
                nested: Vec::new(),
                relations,
            },
            inverse: Vec::new(),
            error: None,
        }
    }

    /// Sets the hypermedia types, most specific first.
    #[must_use]
    pub fn types(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.representor.types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the identifier type and extractor.
    #[must_use]
    pub fn identifier<I: Into<Identifier> + 'static>(
        mut self,
        identifier_type: impl Into<IdentifierType>,
        extract: impl Fn(&T) -> I + Send + Sync + 'static,
    ) -> Self {
        let extract: IdentifierFn<T> = Box::new(move |model: &T| extract(model).into());
        self.representor.identifier = Some((identifier_type.into(), extract));
        self
    }

    /// Declares a string field.
    #[must_use]
    pub fn add_string<O: FieldOutput<String> + 'static>(
        self,
        name: impl Into<String>,
        extract: impl Fn(&T) -> O + Send + Sync + 'static,
    ) -> Self {
        self.property(name.into(), PropertyExtract::String(erase(extract)))
    }

    /// Declares a string list field.
    #[must_use]
    pub fn add_string_list<O: FieldOutput<Vec<String>> + 'static>(
        self,
        name: impl Into<String>,
        extract: impl Fn(&T) -> O + Send + Sync + 'static,
    ) -> Self {
        self.property(name.into(), PropertyExtract::StringList(erase(extract)))
    }

    /// Declares a boolean field.
    #[must_use]
    pub fn add_boolean<O: FieldOutput<bool> + 'static>(
        self,
        name: impl Into<String>,
        extract: impl Fn(&T) -> O + Send + Sync + 'static,
    ) -> Self {
        self.property(name.into(), PropertyExtract::Boolean(erase(extract)))
    }

    /// Declares a boolean list field.
    #[must_use]
    pub fn add_boolean_list<O: FieldOutput<Vec<bool>> + 'static>(
        self,
        name: impl Into<String>,
        extract: impl Fn(&T) -> O + Send + Sync + 'static,
    ) -> Self {
        self.property(name.into(), PropertyExtract::BooleanList(erase(extract)))
    }

    /// Declares a number field.
    #[must_use]
    pub fn add_number<O: FieldOutput<Number> + 'static>(
        self,
        name: impl Into<String>,
        extract: impl Fn(&T) -> O + Send + Sync + 'static,
    ) -> Self {
        self.property(name.into(), PropertyExtract::Number(erase(extract)))
    }

    /// Declares a number list field.
    #[must_use]
    pub fn add_number_list<O: FieldOutput<Vec<Number>> + 'static>(
        self,
        name: impl Into<String>,
        extract: impl Fn(&T) -> O + Send + Sync + 'static,
    ) -> Self {
        self.property(name.into(), PropertyExtract::NumberList(erase(extract)))
    }

    /// Declares a date field.
    #[must_use]
    pub fn add_date<O: FieldOutput<OffsetDateTime> + 'static>(
        self,
        name: impl Into<String>,
        extract: impl Fn(&T) -> O + Send + Sync + 'static,
    ) -> Self {
        self.property(name.into(), PropertyExtract::Date(erase(extract)))
    }

    /// Declares a date list field.
    #[must_use]
    pub fn add_date_list<O: FieldOutput<Vec<OffsetDateTime>> + 'static>(
        self,
        name: impl Into<String>,
        extract: impl Fn(&T) -> O + Send + Sync + 'static,
    ) -> Self {
        self.property(name.into(), PropertyExtract::DateList(erase(extract)))
    }

    /// Declares a localized string field.
    #[must_use]
    pub fn add_localized_string<O: FieldOutput<String> + 'static>(
        self,
        name: impl Into<String>,
        extract: impl Fn(&T, &AcceptLanguage) -> O + Send + Sync + 'static,
    ) -> Self {
        let extract: LocalizedExtract<T> =
            Box::new(move |model: &T, locale: &AcceptLanguage| extract(model, locale).into_field());
        self.property(name.into(), PropertyExtract::Localized(extract))
    }

    /// Declares a binary field; the extractor returns the binary id.
    #[must_use]
    pub fn add_binary<O: FieldOutput<String> + 'static>(
        mut self,
        name: impl Into<String>,
        extract: impl Fn(&T) -> O + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        let check =
            check_name(&name, FieldKind::Binary, self.representor.binaries.iter().map(|(n, _)| n));
        if self.accept(check) {
            self.representor.binaries.push((name, erase(extract)));
        }
        self
    }

    /// Declares a static link.
    #[must_use]
    pub fn add_link(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        let name = name.into();
        let check =
            check_name(&name, FieldKind::Link, self.representor.links.iter().map(|(n, _)| n));
        if self.accept(check) {
            self.representor.links.push((name, url.into()));
        }
        self
    }

    /// Declares a link to another model identified by `target`.
    #[must_use]
    pub fn add_linked_model<I: Into<Identifier> + 'static, O: FieldOutput<I> + 'static>(
        mut self,
        name: impl Into<String>,
        target: impl Into<IdentifierType>,
        extract: impl Fn(&T) -> O + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        let check = check_name(
            &name,
            FieldKind::LinkedModel,
            self.representor.linked_models.iter().map(|linked| &linked.name),
        );
        if self.accept(check) {
            self.representor.linked_models.push(LinkedModel {
                name,
                target: target.into(),
                extract: Box::new(move |model: &T| -> Result<Option<Identifier>, FieldError> {
                    Ok(extract(model).into_field()?.map(Into::into))
                }),
            });
        }
        self
    }

    /// Declares a related collection of `target` models.
    #[must_use]
    pub fn add_related_collection(
        mut self,
        name: impl Into<String>,
        target: impl Into<IdentifierType>,
    ) -> Self {
        let name = name.into();
        let check = check_name(
            &name,
            FieldKind::RelatedCollection,
            self.representor.related_collections.iter().map(|collection| &collection.name),
        );
        if self.accept(check) {
            self.representor.related_collections.push(RelatedCollection {
                name,
                target: target.into(),
            });
        }
        self
    }

    /// Declares a linked model and registers the inverse related collection
    /// `inverse_name` on the target type through the relation index.
    #[must_use]
    pub fn add_bidirectional_model<I: Into<Identifier> + 'static, O: FieldOutput<I> + 'static>(
        mut self,
        name: impl Into<String>,
        inverse_name: impl Into<String>,
        target: impl Into<IdentifierType>,
        extract: impl Fn(&T) -> O + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        let target = target.into();
        self.inverse.push((name.clone(), target.clone(), inverse_name.into()));
        self.add_linked_model(name, target, extract)
    }

    /// Declares an inline child model described by a nested representor.
    #[must_use]
    pub fn add_nested<C: 'static, O: FieldOutput<C> + 'static>(
        mut self,
        name: impl Into<String>,
        extract: impl Fn(&T) -> O + Send + Sync + 'static,
        configure: impl FnOnce(RepresentorBuilder<C>) -> RepresentorBuilder<C>,
    ) -> Self {
        let name = name.into();
        let check = check_name(
            &name,
            FieldKind::Nested,
            self.representor.nested.iter().map(|nested| &nested.name),
        );
        if !self.accept(check) {
            return self;
        }
        let child = match configure(RepresentorBuilder::new(self.representor.relations.clone()))
            .build_nested()
        {
            Ok(child) => Arc::new(child),
            Err(err) => {
                self.error.get_or_insert(err);
                return self;
            }
        };
        let snapshotter = Arc::clone(&child);
        self.representor.nested.push(NestedField {
            name,
            child,
            extract: Box::new(
                move |model: &T,
                      scope: &SnapshotScope<'_>|
                      -> Result<Option<ModelSnapshot>, FieldError> {
                    match extract(model).into_field()? {
                        Some(value) => snapshotter.snapshot(&value, scope).map(Some),
                        None => Ok(None),
                    }
                },
            ),
        });
        self
    }

    /// Finishes a top-level representor.
    ///
    /// # Errors
    ///
    /// Returns the first declaration error, [`BuilderError::MissingTypes`],
    /// or [`BuilderError::MissingIdentifier`].
    pub fn build(self) -> Result<Representor<T>, BuilderError> {
        if self.representor.identifier.is_none() && self.error.is_none() {
            let type_name = self.representor.types.first().cloned().unwrap_or_default();
            if type_name.is_empty() {
                return Err(BuilderError::MissingTypes);
            }
            return Err(BuilderError::MissingIdentifier {
                type_name,
            });
        }
        self.build_nested()
    }

    /// Finishes a representor that may lack an identifier (nested children).
    ///
    /// # Errors
    ///
    /// Returns the first declaration error or [`BuilderError::MissingTypes`].
    pub fn build_nested(self) -> Result<Representor<T>, BuilderError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.representor.types.is_empty() {
            return Err(BuilderError::MissingTypes);
        }
        if let Some((field, _, _)) = self.inverse.first() {
            let Some(relations) = &self.representor.relations else {
                return Err(BuilderError::MissingRelationIndex {
                    field: field.clone(),
                });
            };
            let Some((own_type, _)) = &self.representor.identifier else {
                return Err(BuilderError::MissingIdentifierType {
                    field: field.clone(),
                });
            };
            for (_, target, inverse_name) in &self.inverse {
                relations.register(
                    target,
                    RelatedCollection {
                        name: inverse_name.clone(),
                        target: own_type.clone(),
                    },
                );
            }
        }
        Ok(self.representor)
    }

    /// Records a property field after checking its name.
    fn property(mut self, name: String, extract: PropertyExtract<T>) -> Self {
        let kind = extract.kind();
        let check = check_name(
            &name,
            kind,
            self.representor
                .properties
                .iter()
                .filter(|property| property.extract.kind() == kind)
                .map(|property| &property.name),
        );
        if self.accept(check) {
            self.representor.properties.push(Property {
                name,
                extract,
            });
        }
        self
    }

    /// Records the outcome of a name check. Returns true when the field may
    /// be added.
    fn accept(&mut self, check: Result<(), BuilderError>) -> bool {
        match check {
            Ok(()) => true,
            Err(err) => {
                self.error.get_or_insert(err);
                false
            }
        }
    }
}

/// Validates a field name against the names already declared for its kind.
fn check_name<'a>(
    name: &str,
    kind: FieldKind,
    mut existing: impl Iterator<Item = &'a String>,
) -> Result<(), BuilderError> {
    if name.is_empty() {
        return Err(BuilderError::EmptyFieldName {
            kind,
        });
    }
    if existing.any(|current| current == name) {
        return Err(BuilderError::DuplicateField {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Boxes an extractor with normalized output.
fn erase<T: 'static, V: 'static, O: FieldOutput<V> + 'static>(
    extract: impl Fn(&T) -> O + Send + Sync + 'static,
) -> Extract<T, V> {
    Box::new(move |model: &T| extract(model).into_field())
}
