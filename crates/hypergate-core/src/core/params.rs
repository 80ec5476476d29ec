// crates/hypergate-core/src/core/params.rs
// ============================================================================
// Module: Action Parameters
// Description: Parameter type tags and decoded parameter values for actions.
// Purpose: Give execute functions a typed, ordered view of request inputs.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Actions declare an ordered list of [`ParamType`] tags. Before execution
//! each tag is resolved into a [`ParamValue`] by an external
//! [`crate::interfaces::ParamProvider`]. Execute functions receive the
//! values as a slice and use the typed accessors, which fail at call time
//! (never at build time) when the declared and expected shapes disagree.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::form::FormError;
use crate::core::identifiers::Identifier;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Language used when a request expresses no preference.
pub const DEFAULT_LANGUAGE: &str = "en";

// ============================================================================
// SECTION: Parameter Types
// ============================================================================

/// Type tag for one declared action parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    /// Identifier of the addressed item.
    Id,
    /// Identifier of the parent item of a nested collection.
    ParentId,
    /// Decoded request body (or the form parsed from it).
    Body,
    /// Requested page of a collection.
    Pagination,
    /// Caller credentials.
    Credentials,
    /// Caller language preferences.
    Locale,
    /// Application-defined parameter resolved by the provider.
    Custom(String),
}

impl ParamType {
    /// Returns a stable label for the tag.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Id => "id",
            Self::ParentId => "parent_id",
            Self::Body => "body",
            Self::Pagination => "pagination",
            Self::Credentials => "credentials",
            Self::Locale => "locale",
            Self::Custom(name) => name,
        }
    }
}

// ============================================================================
// SECTION: Body
// ============================================================================

/// Key-value map decoded from one request body object.
pub type BodyValues = BTreeMap<String, Value>;

/// Generic decoded request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A single object body.
    Single(BodyValues),
    /// A list of object bodies (batch requests).
    List(Vec<BodyValues>),
}

impl Body {
    /// Converts a decoded JSON value into a body.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Invalid`] when the value is neither an object nor
    /// an array of objects.
    pub fn from_json(value: Value) -> Result<Self, ParamError> {
        match value {
            Value::Object(map) => Ok(Self::Single(map.into_iter().collect())),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(map.into_iter().collect()),
                    _ => Err(ParamError::Invalid("body list entries must be objects".to_string())),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            _ => Err(ParamError::Invalid("body must be an object or a list".to_string())),
        }
    }
}

// ============================================================================
// SECTION: Pagination
// ============================================================================

/// Bounds applied when decoding pagination parameters.
///
/// # Invariants
/// - `0 < default_page_size <= max_page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLimits {
    /// Page size used when the request does not ask for one.
    pub default_page_size: u32,
    /// Largest page size a request may ask for.
    pub max_page_size: u32,
}

impl Default for PaginationLimits {
    fn default() -> Self {
        Self {
            default_page_size: 30,
            max_page_size: 500,
        }
    }
}

/// Requested page of a collection.
///
/// # Invariants
/// - `page >= 1` and `per_page >= 1`, including after deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawPagination")]
pub struct Pagination {
    /// 1-based page number.
    page: u32,
    /// Items per page.
    per_page: u32,
}

impl Pagination {
    /// Builds a pagination from raw request values, clamped to `limits`.
    #[must_use]
    pub fn from_request(page: Option<u32>, per_page: Option<u32>, limits: PaginationLimits) -> Self {
        let per_page = per_page
            .filter(|size| *size > 0)
            .unwrap_or(limits.default_page_size)
            .clamp(1, limits.max_page_size.max(1));
        Self {
            page: page.filter(|page| *page > 0).unwrap_or(1),
            per_page,
        }
    }

    /// Builds a pagination from exact values (zeros are raised to one).
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Returns the zero-based offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Returns the number of the last page for `total` items (at least 1).
    #[must_use]
    pub fn last_page(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.per_page.max(1))).max(1)
    }
}

/// Unchecked wire form of [`Pagination`].
#[derive(Deserialize)]
struct RawPagination {
    /// Requested page number.
    page: u32,
    /// Requested page size.
    per_page: u32,
}

impl From<RawPagination> for Pagination {
    fn from(raw: RawPagination) -> Self {
        Self::new(raw.page, raw.per_page)
    }
}

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Caller credentials as supplied by the authentication collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Authenticated subject, if any.
    pub subject: Option<String>,
    /// Granted roles.
    pub roles: BTreeSet<String>,
}

impl Credentials {
    /// Returns anonymous credentials.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns credentials for `subject` without roles.
    #[must_use]
    pub fn for_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            roles: BTreeSet::new(),
        }
    }

    /// Returns a copy with `role` granted.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Returns true when `role` is granted.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Returns true when no subject is authenticated.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.subject.is_none()
    }
}

// ============================================================================
// SECTION: Language Preferences
// ============================================================================

/// Ordered language preferences of the caller (most preferred first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptLanguage(Vec<String>);

impl AcceptLanguage {
    /// Creates preferences from an ordered list of language tags.
    #[must_use]
    pub fn new(tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(tags.into_iter().map(Into::into).collect())
    }

    /// Parses an `Accept-Language` header, honoring `q` weights.
    #[must_use]
    pub fn parse(header: &str) -> Self {
        let mut weighted: Vec<(u16, usize, String)> = header
            .split(',')
            .enumerate()
            .filter_map(|(position, part)| {
                let mut pieces = part.split(';');
                let tag = pieces.next()?.trim();
                if tag.is_empty() || tag == "*" {
                    return None;
                }
                let weight = pieces
                    .find_map(|piece| piece.trim().strip_prefix("q="))
                    .map_or(1000, parse_quality);
                (weight > 0).then(|| (weight, position, tag.to_string()))
            })
            .collect();
        weighted.sort_by(|left, right| right.0.cmp(&left.0).then(left.1.cmp(&right.1)));
        Self(weighted.into_iter().map(|(_, _, tag)| tag).collect())
    }

    /// Returns the preferred tags in order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the most preferred tag, or [`DEFAULT_LANGUAGE`].
    #[must_use]
    pub fn preferred(&self) -> &str {
        self.0.first().map_or(DEFAULT_LANGUAGE, String::as_str)
    }

    /// Picks the best match among `available` tags.
    ///
    /// Exact matches win; otherwise a primary-subtag match (`es` for `es-ES`)
    /// is accepted.
    #[must_use]
    pub fn select<'a>(&self, available: &[&'a str]) -> Option<&'a str> {
        for tag in self.tags() {
            if let Some(found) = available.iter().find(|candidate| candidate.eq_ignore_ascii_case(tag)) {
                return Some(*found);
            }
            let primary = tag.split('-').next().unwrap_or(tag);
            if let Some(found) = available.iter().find(|candidate| {
                candidate.split('-').next().is_some_and(|head| head.eq_ignore_ascii_case(primary))
            }) {
                return Some(*found);
            }
        }
        None
    }
}

impl Default for AcceptLanguage {
    fn default() -> Self {
        Self(vec![DEFAULT_LANGUAGE.to_string()])
    }
}

/// Parses a `q` weight into thousandths (`0.8` -> 800), defaulting to 0.
#[must_use]
pub fn parse_quality(raw: &str) -> u16 {
    let raw = raw.trim();
    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
    let whole: u16 = match whole {
        "1" => 1,
        "0" | "" => 0,
        _ => return 0,
    };
    let mut thousandths: u16 = 0;
    let mut scale = 100;
    for digit in fraction.chars().take(3) {
        let Some(value) = digit.to_digit(10) else {
            return 0;
        };
        thousandths += u16::try_from(value).unwrap_or(0) * scale;
        scale /= 10;
    }
    if whole == 1 { 1000 } else { thousandths }
}

// ============================================================================
// SECTION: Parameter Values
// ============================================================================

/// Decoded value for one declared parameter.
#[derive(Clone)]
pub enum ParamValue {
    /// Identifier of the addressed item.
    Id(Identifier),
    /// Identifier of the parent item.
    ParentId(Identifier),
    /// Raw decoded body.
    Body(Body),
    /// Body parsed through the action's form.
    Form(Arc<dyn Any + Send + Sync>),
    /// Requested page.
    Pagination(Pagination),
    /// Caller credentials.
    Credentials(Credentials),
    /// Caller language preferences.
    Locale(AcceptLanguage),
    /// Application-defined value.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl ParamValue {
    /// Returns a stable label for the variant.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::ParentId(_) => "parent_id",
            Self::Body(_) => "body",
            Self::Form(_) => "form",
            Self::Pagination(_) => "pagination",
            Self::Credentials(_) => "credentials",
            Self::Locale(_) => "locale",
            Self::Custom(_) => "custom",
        }
    }

    /// Returns the item identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Mismatch`] for any other variant.
    pub fn as_id(&self) -> Result<&Identifier, ParamError> {
        match self {
            Self::Id(id) => Ok(id),
            other => Err(ParamError::mismatch("id", other)),
        }
    }

    /// Returns the parent identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Mismatch`] for any other variant.
    pub fn as_parent_id(&self) -> Result<&Identifier, ParamError> {
        match self {
            Self::ParentId(id) => Ok(id),
            other => Err(ParamError::mismatch("parent_id", other)),
        }
    }

    /// Returns the raw body.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Mismatch`] for any other variant.
    pub fn as_body(&self) -> Result<&Body, ParamError> {
        match self {
            Self::Body(body) => Ok(body),
            other => Err(ParamError::mismatch("body", other)),
        }
    }

    /// Returns the pagination.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Mismatch`] for any other variant.
    pub fn as_pagination(&self) -> Result<Pagination, ParamError> {
        match self {
            Self::Pagination(pagination) => Ok(*pagination),
            other => Err(ParamError::mismatch("pagination", other)),
        }
    }

    /// Returns the credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Mismatch`] for any other variant.
    pub fn as_credentials(&self) -> Result<&Credentials, ParamError> {
        match self {
            Self::Credentials(credentials) => Ok(credentials),
            other => Err(ParamError::mismatch("credentials", other)),
        }
    }

    /// Returns the language preferences.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Mismatch`] for any other variant.
    pub fn as_locale(&self) -> Result<&AcceptLanguage, ParamError> {
        match self {
            Self::Locale(locale) => Ok(locale),
            other => Err(ParamError::mismatch("locale", other)),
        }
    }

    /// Downcasts a parsed form value to `T`.
    ///
    /// Batch bodies parse into `Vec<T>`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Mismatch`] when the value is not a form of `T`.
    pub fn form<T: Any>(&self) -> Result<&T, ParamError> {
        match self {
            Self::Form(value) => value.downcast_ref::<T>().ok_or_else(|| ParamError::Mismatch {
                expected: std::any::type_name::<T>().to_string(),
                found: "form".to_string(),
            }),
            other => Err(ParamError::mismatch("form", other)),
        }
    }

    /// Downcasts a custom value to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Mismatch`] when the value is not a custom `T`.
    pub fn custom<T: Any>(&self) -> Result<&T, ParamError> {
        match self {
            Self::Custom(value) => value.downcast_ref::<T>().ok_or_else(|| ParamError::Mismatch {
                expected: std::any::type_name::<T>().to_string(),
                found: "custom".to_string(),
            }),
            other => Err(ParamError::mismatch("custom", other)),
        }
    }
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => f.debug_tuple("Id").field(id).finish(),
            Self::ParentId(id) => f.debug_tuple("ParentId").field(id).finish(),
            Self::Body(body) => f.debug_tuple("Body").field(body).finish(),
            Self::Form(_) => f.write_str("Form(..)"),
            Self::Pagination(pagination) => f.debug_tuple("Pagination").field(pagination).finish(),
            Self::Credentials(credentials) => {
                f.debug_tuple("Credentials").field(credentials).finish()
            }
            Self::Locale(locale) => f.debug_tuple("Locale").field(locale).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Parameter resolution and access errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// The provider cannot supply the parameter.
    #[error("missing parameter `{0}`")]
    Missing(String),
    /// The parameter value has a different shape than expected.
    #[error("parameter mismatch: expected {expected}, found {found}")]
    Mismatch {
        /// Expected shape.
        expected: String,
        /// Actual shape.
        found: String,
    },
    /// The raw request value is invalid.
    #[error("invalid parameter: {0}")]
    Invalid(String),
    /// The body failed form validation.
    #[error(transparent)]
    Form(#[from] FormError),
}

impl ParamError {
    /// Builds a mismatch error for `found`.
    fn mismatch(expected: &str, found: &ParamValue) -> Self {
        Self::Mismatch {
            expected: expected.to_string(),
            found: found.label().to_string(),
        }
    }
}
