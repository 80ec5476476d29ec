// crates/hypergate-engine/src/request.rs
// ============================================================================
// Module: Engine Requests
// Description: Transport-neutral request and response values.
// Purpose: Carry decoded request data in and written documents out.
// Dependencies: hypergate-core, serde_json
// ============================================================================

//! ## Overview
//! A [`Request`] is what a transport hands the engine after decoding headers,
//! the query string, and the body. [`RequestParams`] supplies declared action
//! parameters from it. A [`Response`] carries the written document and an
//! [`Outcome`] the transport maps to a status code.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use hypergate_core::AcceptLanguage;
use hypergate_core::Body;
use hypergate_core::Credentials;
use hypergate_core::FieldsSelection;
use hypergate_core::Identifier;
use hypergate_core::IdentifierKind;
use hypergate_core::Pagination;
use hypergate_core::PaginationLimits;
use hypergate_core::ParamError;
use hypergate_core::ParamProvider;
use hypergate_core::ParamType;
use hypergate_core::ParamValue;
use hypergate_core::PathMapper;
use hypergate_core::Resource;
use hypergate_core::decode_segment;
use hypergate_core::writer::EmbeddedSelection;
use serde_json::Value;

// ============================================================================
// SECTION: Request
// ============================================================================

/// Decoded request handed to the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    /// Request method.
    pub method: String,
    /// Request path relative to the base URL, without query string.
    pub path: String,
    /// Raw `Accept` header.
    pub accept: Option<String>,
    /// Raw `Accept-Language` header.
    pub accept_language: Option<String>,
    /// Decoded JSON body.
    pub body: Option<Value>,
    /// Requested page (`page` query parameter).
    pub page: Option<u32>,
    /// Requested page size (`per_page` query parameter).
    pub per_page: Option<u32>,
    /// Authenticated caller, if any.
    pub credentials: Option<Credentials>,
    /// Sparse field selection (`fields` query parameter).
    pub fields: Option<String>,
    /// Relations to embed (`embed` query parameter).
    pub embedded: Option<String>,
    /// Values for application-defined parameters.
    pub custom: BTreeMap<String, Value>,
}

impl Request {
    /// Creates a request for `method` and `path`.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with the `Accept` header.
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Returns a copy with the `Accept-Language` header.
    #[must_use]
    pub fn with_accept_language(mut self, accept_language: impl Into<String>) -> Self {
        self.accept_language = Some(accept_language.into());
        self
    }

    /// Returns a copy with a decoded body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns a copy asking for `page` of size `per_page`.
    #[must_use]
    pub const fn with_page(mut self, page: Option<u32>, per_page: Option<u32>) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    /// Returns a copy made by `credentials`.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Returns a copy restricted to the `type.field` entries in `fields`.
    #[must_use]
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Returns a copy embedding the dotted relation paths in `embedded`.
    #[must_use]
    pub fn with_embedded(mut self, embedded: impl Into<String>) -> Self {
        self.embedded = Some(embedded.into());
        self
    }

    /// Returns a copy supplying `value` for the custom parameter `name`.
    #[must_use]
    pub fn with_custom(mut self, name: impl Into<String>, value: Value) -> Self {
        self.custom.insert(name.into(), value);
        self
    }

    /// Returns the percent-decoded path segments.
    ///
    /// One leading and one trailing `/` are ignored. Empty interior segments
    /// are kept so the resolver can reject them.
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        let path = self.path.split(['?', '#']).next().unwrap_or_default();
        let path = path.strip_prefix('/').unwrap_or(path);
        let path = path.strip_suffix('/').unwrap_or(path);
        if path.is_empty() {
            return Vec::new();
        }
        path.split('/').map(decode_segment).collect()
    }

    /// Returns the caller credentials, anonymous when absent.
    #[must_use]
    pub fn caller(&self) -> Credentials {
        self.credentials.clone().unwrap_or_else(Credentials::anonymous)
    }

    /// Returns the parsed language preferences.
    #[must_use]
    pub fn locale(&self) -> AcceptLanguage {
        self.accept_language.as_deref().map(AcceptLanguage::parse).unwrap_or_default()
    }

    /// Returns the parsed sparse field selection.
    #[must_use]
    pub fn fields_selection(&self) -> FieldsSelection {
        self.fields.as_deref().map(FieldsSelection::parse).unwrap_or_default()
    }

    /// Returns the parsed embed selection.
    #[must_use]
    pub fn embedded_selection(&self) -> EmbeddedSelection {
        self.embedded.as_deref().map(EmbeddedSelection::parse).unwrap_or_default()
    }
}

// ============================================================================
// SECTION: Parameter Provider
// ============================================================================

/// Supplies declared action parameters from a [`Request`].
pub struct RequestParams<'a> {
    /// Decoded request.
    request: &'a Request,
    /// Identifier kinds by resource.
    paths: &'a dyn PathMapper,
    /// Page size bounds.
    limits: PaginationLimits,
}

impl<'a> RequestParams<'a> {
    /// Creates a provider for `request`.
    #[must_use]
    pub const fn new(
        request: &'a Request,
        paths: &'a dyn PathMapper,
        limits: PaginationLimits,
    ) -> Self {
        Self {
            request,
            paths,
            limits,
        }
    }

    /// Parses a raw path id using the identifier kind of `resource_name`.
    fn identifier(&self, resource_name: &str, raw: &str) -> Result<Identifier, ParamError> {
        let kind = self.paths.identifier_kind(resource_name).unwrap_or(IdentifierKind::Integer);
        Identifier::parse(kind, raw).map_err(|err| ParamError::Invalid(err.to_string()))
    }
}

impl ParamProvider for RequestParams<'_> {
    fn provide(&self, param: &ParamType, resource: &Resource) -> Result<ParamValue, ParamError> {
        let missing = || ParamError::Missing(param.label().to_string());
        match param {
            ParamType::Id => {
                let raw = resource.id().ok_or_else(missing)?;
                self.identifier(resource.name(), raw).map(ParamValue::Id)
            }
            ParamType::ParentId => {
                let raw = resource.parent_id().ok_or_else(missing)?;
                let parent = resource.parent_name().ok_or_else(missing)?;
                self.identifier(parent, raw).map(ParamValue::ParentId)
            }
            ParamType::Body => {
                let body = self.request.body.clone().ok_or_else(missing)?;
                Body::from_json(body).map(ParamValue::Body)
            }
            ParamType::Pagination => Ok(ParamValue::Pagination(Pagination::from_request(
                self.request.page,
                self.request.per_page,
                self.limits,
            ))),
            ParamType::Credentials => Ok(ParamValue::Credentials(self.request.caller())),
            ParamType::Locale => Ok(ParamValue::Locale(self.request.locale())),
            ParamType::Custom(name) => self
                .request
                .custom
                .get(name)
                .map(|value| ParamValue::Custom(Arc::new(value.clone())))
                .ok_or_else(missing),
        }
    }
}

// ============================================================================
// SECTION: Response
// ============================================================================

/// Successful request outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A document was written.
    Ok,
    /// A create or batch-create action succeeded.
    Created,
    /// The action returned nothing.
    NoContent,
}

/// Written response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Request outcome.
    pub outcome: Outcome,
    /// Media type of the negotiated format.
    pub media_type: String,
    /// Serialized document; empty for [`Outcome::NoContent`].
    pub body: String,
}

impl Response {
    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the body is not JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
