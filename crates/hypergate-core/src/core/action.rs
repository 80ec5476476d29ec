// crates/hypergate-core/src/core/action.rs
// ============================================================================
// Module: Action Semantics
// Description: Immutable operation descriptions and their staged builder.
// Purpose: Bind a resource address, method, name, and execute function.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`ActionSemantics`] describes one operation: the resource it acts on, its
//! HTTP method and name, declared parameter and return shapes, annotations,
//! an optional input form, an optional permission check, and the execute
//! function. Semantics are built once through a staged builder that makes
//! every mandatory stage a distinct type:
//!
//! ```text
//! of_resource -> name -> method -> params -> returns -> annotations
//!   -> [form] [permission] -> execute -> [form] -> build
//! ```
//!
//! Invariants:
//! - `method` is non-empty and upper-case.
//! - `name` is non-empty.
//! - Semantics are never mutated; `with_*` helpers return modified copies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::collections::BTreeSet;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::errors::BuilderError;
use crate::core::form::FormParser;
use crate::core::identifiers::Identifier;
use crate::core::params::Credentials;
use crate::core::params::Pagination;
use crate::core::params::ParamError;
use crate::core::params::ParamType;
use crate::core::params::ParamValue;
use crate::core::resource::Resource;

// ============================================================================
// SECTION: Methods
// ============================================================================

/// Standard HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl HttpMethod {
    /// Returns the canonical upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

/// Normalized (upper-case, trimmed) HTTP method name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Method(String);

impl Method {
    /// Normalizes a raw method name.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    /// Returns the normalized method name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the method name is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<HttpMethod> for Method {
    fn from(value: HttpMethod) -> Self {
        Self::new(value.as_str())
    }
}

impl From<&str> for Method {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Method {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

// ============================================================================
// SECTION: Kinds
// ============================================================================

/// Name of the standard retrieve action.
pub const RETRIEVE: &str = "retrieve";
/// Name of the standard create action.
pub const CREATE: &str = "create";
/// Name of the standard replace action.
pub const REPLACE: &str = "replace";
/// Name of the standard update action.
pub const UPDATE: &str = "update";
/// Name of the standard remove action.
pub const REMOVE: &str = "remove";

/// Returns true for names dispatched by method alone.
#[must_use]
pub fn is_standard_name(name: &str) -> bool {
    matches!(name, RETRIEVE | CREATE | REPLACE | UPDATE | REMOVE)
}

/// Closed set of action kinds that message mappers switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Read one item or one page.
    Retrieve,
    /// Create one item.
    Create,
    /// Create many items from a list body.
    BatchCreate,
    /// Replace an item.
    Replace,
    /// Partially update an item.
    Update,
    /// Delete an item.
    Remove,
    /// Named custom action.
    Custom,
}

impl ActionKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Retrieve => "retrieve",
            Self::Create => "create",
            Self::BatchCreate => "batch_create",
            Self::Replace => "replace",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::Custom => "custom",
        }
    }

    /// Returns true when a successful execution creates resources.
    #[must_use]
    pub const fn creates(self) -> bool {
        matches!(self, Self::Create | Self::BatchCreate)
    }
}

/// Declared return shape of an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnType {
    /// Returns nothing.
    Void,
    /// Returns one model.
    Single,
    /// Returns a page of models.
    Page,
    /// Returns identifiers of created models.
    Batch,
    /// Application-defined shape.
    Custom(String),
}

// ============================================================================
// SECTION: Outputs
// ============================================================================

/// Type-erased model handed from an execute function to the writers.
#[derive(Clone)]
pub struct SingleModel {
    /// Resource name used to look up the representor.
    resource_name: String,
    /// The model.
    model: Arc<dyn Any + Send + Sync>,
}

impl SingleModel {
    /// Wraps a model of resource `resource_name`.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(resource_name: impl Into<String>, model: T) -> Self {
        Self {
            resource_name: resource_name.into(),
            model: Arc::new(model),
        }
    }

    /// Wraps an already shared model.
    #[must_use]
    pub fn from_shared(resource_name: impl Into<String>, model: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            resource_name: resource_name.into(),
            model,
        }
    }

    /// Returns the resource name.
    #[must_use]
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Returns the model.
    #[must_use]
    pub fn model(&self) -> &(dyn Any + Send + Sync) {
        self.model.as_ref()
    }
}

impl fmt::Debug for SingleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleModel").field("resource_name", &self.resource_name).finish_non_exhaustive()
    }
}

/// One page of models of a collection.
#[derive(Clone)]
pub struct PageModel {
    /// Collection address (paged or nested).
    resource: Resource,
    /// Models on this page.
    items: Vec<Arc<dyn Any + Send + Sync>>,
    /// Requested page.
    pagination: Pagination,
    /// Total number of models across all pages.
    total_count: u64,
}

impl PageModel {
    /// Wraps a page of models.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(
        resource: Resource,
        items: Vec<T>,
        pagination: Pagination,
        total_count: u64,
    ) -> Self {
        Self {
            resource,
            items: items.into_iter().map(|item| Arc::new(item) as Arc<dyn Any + Send + Sync>).collect(),
            pagination,
            total_count,
        }
    }

    /// Returns the collection address.
    #[must_use]
    pub const fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Returns the item resource name.
    #[must_use]
    pub fn resource_name(&self) -> &str {
        self.resource.name()
    }

    /// Returns the models on this page.
    pub fn items(&self) -> impl Iterator<Item = &(dyn Any + Send + Sync)> {
        self.items.iter().map(AsRef::as_ref)
    }

    /// Returns the number of models on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the page holds no models.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the requested page.
    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Returns the total number of models.
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }
}

impl fmt::Debug for PageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageModel")
            .field("resource", &self.resource)
            .field("items", &self.items.len())
            .field("pagination", &self.pagination)
            .field("total_count", &self.total_count)
            .finish()
    }
}

/// Identifiers of models created by a batch action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// Resource name of the created models.
    pub resource_name: String,
    /// Created identifiers in request order.
    pub identifiers: Vec<Identifier>,
}

/// Result of a successful execution.
#[derive(Debug, Clone)]
pub enum ActionOutput {
    /// No content.
    Nothing,
    /// One model.
    Single(SingleModel),
    /// A page of models.
    Page(PageModel),
    /// Created identifiers.
    Batch(BatchResult),
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure reported by an execute function.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The addressed model does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The request is semantically invalid for this action.
    #[error("invalid request: {0}")]
    Invalid(String),
    /// A declared parameter had an unexpected shape.
    #[error(transparent)]
    Param(#[from] ParamError),
    /// The underlying operation failed.
    #[error("{message}")]
    Failed {
        /// Failure description.
        message: String,
        /// Underlying cause.
        #[source]
        cause: Box<dyn StdError + Send + Sync>,
    },
}

impl ExecuteError {
    /// Wraps an underlying failure.
    #[must_use]
    pub fn failed(
        message: impl Into<String>,
        cause: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::Failed {
            message: message.into(),
            cause: cause.into(),
        }
    }
}

// ============================================================================
// SECTION: Semantics
// ============================================================================

/// Execute function receiving resolved parameters in declaration order.
pub type ExecuteFn =
    Arc<dyn Fn(&[ParamValue]) -> Result<ActionOutput, ExecuteError> + Send + Sync>;

/// Permission predicate over caller credentials and resolved parameters.
pub type PermissionFn = Arc<dyn Fn(&Credentials, &[ParamValue]) -> bool + Send + Sync>;

/// Immutable description of one operation.
#[derive(Clone)]
pub struct ActionSemantics {
    /// Resource address the action is declared on.
    resource: Resource,
    /// Action name.
    name: String,
    /// Normalized HTTP method.
    method: Method,
    /// Declared parameter types in order.
    param_types: Vec<ParamType>,
    /// Declared return type.
    return_type: ReturnType,
    /// Marker annotations.
    annotations: BTreeSet<String>,
    /// Optional input form.
    form: Option<Arc<dyn FormParser>>,
    /// Optional permission check.
    permission: Option<PermissionFn>,
    /// Execute function.
    execute: ExecuteFn,
}

impl ActionSemantics {
    /// Starts the staged builder for an action on `resource`.
    #[must_use]
    pub const fn of_resource(resource: Resource) -> NameStep {
        NameStep {
            resource,
        }
    }

    /// Returns the resource address.
    #[must_use]
    pub const fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Returns the action name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the normalized method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the declared parameter types.
    #[must_use]
    pub fn param_types(&self) -> &[ParamType] {
        &self.param_types
    }

    /// Returns the declared return type.
    #[must_use]
    pub const fn return_type(&self) -> &ReturnType {
        &self.return_type
    }

    /// Returns the annotations.
    #[must_use]
    pub const fn annotations(&self) -> &BTreeSet<String> {
        &self.annotations
    }

    /// Returns true when `annotation` is present.
    #[must_use]
    pub fn is_annotated(&self, annotation: &str) -> bool {
        self.annotations.contains(annotation)
    }

    /// Returns the input form, if any.
    #[must_use]
    pub fn form(&self) -> Option<&Arc<dyn FormParser>> {
        self.form.as_ref()
    }

    /// Returns the execute function.
    #[must_use]
    pub const fn execute_fn(&self) -> &ExecuteFn {
        &self.execute
    }

    /// Returns true when the action declares a permission check.
    #[must_use]
    pub const fn has_permission_check(&self) -> bool {
        self.permission.is_some()
    }

    /// Evaluates the permission check; actions without one are permitted.
    #[must_use]
    pub fn permits(&self, credentials: &Credentials, params: &[ParamValue]) -> bool {
        self.permission.as_ref().is_none_or(|check| check(credentials, params))
    }

    /// Runs the execute function.
    ///
    /// # Errors
    ///
    /// Returns the execute function's failure.
    pub fn execute(&self, params: &[ParamValue]) -> Result<ActionOutput, ExecuteError> {
        (self.execute)(params)
    }

    /// Returns the action kind derived from name, method, and return type.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self.name.as_str() {
            RETRIEVE => ActionKind::Retrieve,
            CREATE if self.return_type == ReturnType::Batch => ActionKind::BatchCreate,
            CREATE => ActionKind::Create,
            REPLACE => ActionKind::Replace,
            UPDATE => ActionKind::Update,
            REMOVE => ActionKind::Remove,
            _ => ActionKind::Custom,
        }
    }

    /// Returns true when the action is routed by method alone.
    #[must_use]
    pub fn is_standard(&self) -> bool {
        is_standard_name(&self.name)
    }

    /// Returns the stable key `{resource}#{name}`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}#{}", self.resource, self.name)
    }

    /// Returns a copy with a different execute function.
    #[must_use]
    pub fn with_execute(
        &self,
        execute: impl Fn(&[ParamValue]) -> Result<ActionOutput, ExecuteError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            execute: Arc::new(execute),
            ..self.clone()
        }
    }

    /// Returns a copy with a different permission check.
    #[must_use]
    pub fn with_permission(
        &self,
        permission: impl Fn(&Credentials, &[ParamValue]) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            permission: Some(Arc::new(permission)),
            ..self.clone()
        }
    }
}

impl fmt::Debug for ActionSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionSemantics")
            .field("resource", &self.resource)
            .field("name", &self.name)
            .field("method", &self.method)
            .field("param_types", &self.param_types)
            .field("return_type", &self.return_type)
            .field("annotations", &self.annotations)
            .field("form", &self.form.as_ref().map(|form| form.descriptor().id.clone()))
            .field("permission", &self.permission.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Staged Builder
// ============================================================================

/// Builder stage expecting the action name.
#[derive(Debug)]
pub struct NameStep {
    /// Resource address.
    resource: Resource,
}

impl NameStep {
    /// Sets the action name.
    #[must_use]
    pub fn name(self, name: impl Into<String>) -> MethodStep {
        MethodStep {
            resource: self.resource,
            name: name.into(),
        }
    }
}

/// Builder stage expecting the HTTP method.
#[derive(Debug)]
pub struct MethodStep {
    /// Resource address.
    resource: Resource,
    /// Action name.
    name: String,
}

impl MethodStep {
    /// Sets the method from an [`HttpMethod`] or a raw string.
    #[must_use]
    pub fn method(self, method: impl Into<Method>) -> ParamsStep {
        ParamsStep {
            resource: self.resource,
            name: self.name,
            method: method.into(),
        }
    }
}

/// Builder stage expecting the parameter declaration.
#[derive(Debug)]
pub struct ParamsStep {
    /// Resource address.
    resource: Resource,
    /// Action name.
    name: String,
    /// Method.
    method: Method,
}

impl ParamsStep {
    /// Declares the ordered parameter types.
    #[must_use]
    pub fn receives_params(self, params: impl IntoIterator<Item = ParamType>) -> ReturnStep {
        ReturnStep {
            resource: self.resource,
            name: self.name,
            method: self.method,
            param_types: params.into_iter().collect(),
        }
    }

    /// Declares that the action takes no parameters.
    #[must_use]
    pub fn receives_no_params(self) -> ReturnStep {
        self.receives_params(Vec::new())
    }
}

/// Builder stage expecting the return type.
#[derive(Debug)]
pub struct ReturnStep {
    /// Resource address.
    resource: Resource,
    /// Action name.
    name: String,
    /// Method.
    method: Method,
    /// Parameter types.
    param_types: Vec<ParamType>,
}

impl ReturnStep {
    /// Declares the return type.
    #[must_use]
    pub fn returns(self, return_type: ReturnType) -> AnnotationsStep {
        AnnotationsStep {
            resource: self.resource,
            name: self.name,
            method: self.method,
            param_types: self.param_types,
            return_type,
        }
    }

    /// Declares that the action returns nothing.
    #[must_use]
    pub fn returns_nothing(self) -> AnnotationsStep {
        self.returns(ReturnType::Void)
    }
}

/// Builder stage expecting the annotations.
#[derive(Debug)]
pub struct AnnotationsStep {
    /// Resource address.
    resource: Resource,
    /// Action name.
    name: String,
    /// Method.
    method: Method,
    /// Parameter types.
    param_types: Vec<ParamType>,
    /// Return type.
    return_type: ReturnType,
}

impl AnnotationsStep {
    /// Declares the marker annotations.
    #[must_use]
    pub fn annotated_with(
        self,
        annotations: impl IntoIterator<Item = impl Into<String>>,
    ) -> ExecuteStep {
        ExecuteStep {
            resource: self.resource,
            name: self.name,
            method: self.method,
            param_types: self.param_types,
            return_type: self.return_type,
            annotations: annotations.into_iter().map(Into::into).collect(),
            form: None,
            permission: None,
        }
    }

    /// Declares that the action carries no annotations.
    #[must_use]
    pub fn not_annotated(self) -> ExecuteStep {
        self.annotated_with(Vec::<String>::new())
    }
}

/// Builder stage accepting optional form and permission, then the execute
/// function.
pub struct ExecuteStep {
    /// Resource address.
    resource: Resource,
    /// Action name.
    name: String,
    /// Method.
    method: Method,
    /// Parameter types.
    param_types: Vec<ParamType>,
    /// Return type.
    return_type: ReturnType,
    /// Annotations.
    annotations: BTreeSet<String>,
    /// Optional form.
    form: Option<Arc<dyn FormParser>>,
    /// Optional permission check.
    permission: Option<PermissionFn>,
}

impl ExecuteStep {
    /// Attaches an input form.
    #[must_use]
    pub fn form(mut self, form: impl FormParser + 'static) -> Self {
        self.form = Some(Arc::new(form));
        self
    }

    /// Attaches a permission check.
    #[must_use]
    pub fn permission(
        mut self,
        permission: impl Fn(&Credentials, &[ParamValue]) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.permission = Some(Arc::new(permission));
        self
    }

    /// Sets the execute function.
    #[must_use]
    pub fn execute(
        self,
        execute: impl Fn(&[ParamValue]) -> Result<ActionOutput, ExecuteError> + Send + Sync + 'static,
    ) -> BuildStep {
        BuildStep {
            semantics: ActionSemantics {
                resource: self.resource,
                name: self.name,
                method: self.method,
                param_types: self.param_types,
                return_type: self.return_type,
                annotations: self.annotations,
                form: self.form,
                permission: self.permission,
                execute: Arc::new(execute),
            },
        }
    }
}

/// Final builder stage.
pub struct BuildStep {
    /// Semantics awaiting validation.
    semantics: ActionSemantics,
}

impl BuildStep {
    /// Attaches an input form.
    #[must_use]
    pub fn form(mut self, form: impl FormParser + 'static) -> Self {
        self.semantics.form = Some(Arc::new(form));
        self
    }

    /// Validates and returns the semantics.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::EmptyName`] or [`BuilderError::EmptyMethod`].
    pub fn build(self) -> Result<ActionSemantics, BuilderError> {
        if self.semantics.name.trim().is_empty() {
            return Err(BuilderError::EmptyName);
        }
        if self.semantics.method.is_empty() {
            return Err(BuilderError::EmptyMethod {
                action: self.semantics.name,
            });
        }
        Ok(self.semantics)
    }
}
