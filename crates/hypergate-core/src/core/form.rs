// crates/hypergate-core/src/core/form.rs
// ============================================================================
// Module: Input Forms
// Description: Typed form definitions that parse generic bodies into models.
// Purpose: Record (field, kind, required, setter) tuples against a data holder.
// Dependencies: serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! A [`Form<T>`] describes the input an action accepts. It is built through
//! [`FormBuilder`] from a constructor for a plain data holder and a list of
//! field setters; parsing a [`Body`] runs each setter against a fresh holder.
//! [`FormDescriptor`] is the type-erased metadata that documentation and form
//! writers render, and [`FormParser`] is the type-erased parsing seam that
//! action semantics store.
//!
//! Invariants:
//! - A JSON `null` is treated the same as an absent key.
//! - Required fields that are absent fail with [`FormError::MissingField`].
//! - Values of the wrong shape fail with [`FormError::InvalidField`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;

use crate::core::field::FieldKind;
use crate::core::field::parse_date;
use crate::core::params::Body;
use crate::core::params::BodyValues;

// ============================================================================
// SECTION: Form Values
// ============================================================================

/// Value type a form field can decode from JSON.
pub trait FormValue: Sized + Send + Sync + 'static {
    /// Field kind reported in form descriptors.
    const KIND: FieldKind;

    /// Decodes the value, returning `None` on a shape mismatch.
    fn from_json(value: &Value) -> Option<Self>;
}

impl FormValue for String {
    const KIND: FieldKind = FieldKind::String;

    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(ToString::to_string)
    }
}

impl FormValue for i64 {
    const KIND: FieldKind = FieldKind::Number;

    fn from_json(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FormValue for f64 {
    const KIND: FieldKind = FieldKind::Number;

    fn from_json(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FormValue for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FormValue for OffsetDateTime {
    const KIND: FieldKind = FieldKind::Date;

    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().and_then(parse_date)
    }
}

impl FormValue for Vec<String> {
    const KIND: FieldKind = FieldKind::StringList;

    fn from_json(value: &Value) -> Option<Self> {
        value.as_array()?.iter().map(String::from_json).collect()
    }
}

impl FormValue for Vec<i64> {
    const KIND: FieldKind = FieldKind::NumberList;

    fn from_json(value: &Value) -> Option<Self> {
        value.as_array()?.iter().map(i64::from_json).collect()
    }
}

impl FormValue for Vec<bool> {
    const KIND: FieldKind = FieldKind::BooleanList;

    fn from_json(value: &Value) -> Option<Self> {
        value.as_array()?.iter().map(bool::from_json).collect()
    }
}

// ============================================================================
// SECTION: Descriptor
// ============================================================================

/// Type-erased description of one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Body key.
    pub name: String,
    /// Decoded kind.
    pub kind: FieldKind,
    /// Whether the key must be present.
    pub required: bool,
}

/// Type-erased description of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormDescriptor {
    /// Form identifier, used in form URLs.
    pub id: String,
    /// Human-readable title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared fields in declaration order.
    pub fields: Vec<FormField>,
}

// ============================================================================
// SECTION: Form
// ============================================================================

/// Setter applying one decoded body value to the data holder.
type Setter<T> = Box<dyn Fn(&mut T, Option<&Value>) -> Result<(), FormError> + Send + Sync>;

/// Typed form parsing bodies into `T`.
pub struct Form<T> {
    /// Erased metadata.
    descriptor: FormDescriptor,
    /// Produces an empty data holder.
    constructor: Box<dyn Fn() -> T + Send + Sync>,
    /// One setter per declared field, in declaration order.
    setters: Vec<Setter<T>>,
}

impl<T: Send + Sync + 'static> Form<T> {
    /// Starts a form for the data holder produced by `constructor`.
    #[must_use]
    pub fn builder(
        id: impl Into<String>,
        constructor: impl Fn() -> T + Send + Sync + 'static,
    ) -> FormBuilder<T> {
        FormBuilder {
            descriptor: FormDescriptor {
                id: id.into(),
                title: None,
                description: None,
                fields: Vec::new(),
            },
            constructor: Box::new(constructor),
            setters: Vec::new(),
        }
    }

    /// Returns the erased metadata.
    #[must_use]
    pub const fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    /// Parses one body object.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] for the first missing or invalid field.
    pub fn parse(&self, values: &BodyValues) -> Result<T, FormError> {
        let mut holder = (self.constructor)();
        for (field, setter) in self.descriptor.fields.iter().zip(&self.setters) {
            let value = values.get(&field.name).filter(|value| !value.is_null());
            setter(&mut holder, value)?;
        }
        Ok(holder)
    }

    /// Parses a list of body objects.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] for the first entry that fails to parse.
    pub fn parse_list(&self, values: &[BodyValues]) -> Result<Vec<T>, FormError> {
        values.iter().map(|entry| self.parse(entry)).collect()
    }
}

/// Fluent builder for [`Form`].
pub struct FormBuilder<T> {
    /// Metadata accumulated so far.
    descriptor: FormDescriptor,
    /// Produces an empty data holder.
    constructor: Box<dyn Fn() -> T + Send + Sync>,
    /// Setters accumulated so far.
    setters: Vec<Setter<T>>,
}

impl<T: Send + Sync + 'static> FormBuilder<T> {
    /// Sets the form title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.descriptor.title = Some(title.into());
        self
    }

    /// Sets the form description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.descriptor.description = Some(description.into());
        self
    }

    /// Declares a field that must be present.
    #[must_use]
    pub fn required<V: FormValue>(
        self,
        name: impl Into<String>,
        setter: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        self.field(name.into(), true, setter)
    }

    /// Declares a field that may be absent.
    #[must_use]
    pub fn optional<V: FormValue>(
        self,
        name: impl Into<String>,
        setter: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        self.field(name.into(), false, setter)
    }

    /// Finishes the form.
    #[must_use]
    pub fn build(self) -> Form<T> {
        Form {
            descriptor: self.descriptor,
            constructor: self.constructor,
            setters: self.setters,
        }
    }

    /// Records one field and its setter.
    fn field<V: FormValue>(
        mut self,
        name: String,
        required: bool,
        setter: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        let form_id = self.descriptor.id.clone();
        let field_name = name.clone();
        self.setters.push(Box::new(move |holder: &mut T, value: Option<&Value>| match value {
            None if required => Err(FormError::MissingField {
                form: form_id.clone(),
                field: field_name.clone(),
            }),
            None => Ok(()),
            Some(raw) => {
                let decoded = V::from_json(raw).ok_or_else(|| FormError::InvalidField {
                    form: form_id.clone(),
                    field: field_name.clone(),
                    expected: V::KIND,
                })?;
                setter(holder, decoded);
                Ok(())
            }
        }));
        self.descriptor.fields.push(FormField {
            name,
            kind: V::KIND,
            required,
        });
        self
    }
}

// ============================================================================
// SECTION: Erased Parser
// ============================================================================

/// Type-erased form parsing seam stored on action semantics.
pub trait FormParser: Send + Sync {
    /// Returns the form metadata.
    fn descriptor(&self) -> &FormDescriptor;

    /// Parses a body into the erased form value.
    ///
    /// Single bodies parse into `T`; list bodies parse into `Vec<T>`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] when any field is missing or invalid.
    fn parse_body(&self, body: &Body) -> Result<Arc<dyn Any + Send + Sync>, FormError>;
}

impl<T: Send + Sync + 'static> FormParser for Form<T> {
    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn parse_body(&self, body: &Body) -> Result<Arc<dyn Any + Send + Sync>, FormError> {
        match body {
            Body::Single(values) => Ok(Arc::new(self.parse(values)?)),
            Body::List(values) => Ok(Arc::new(self.parse_list(values)?)),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Form parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A required field is absent.
    #[error("form `{form}` is missing required field `{field}`")]
    MissingField {
        /// Form identifier.
        form: String,
        /// Field name.
        field: String,
    },
    /// A field has the wrong shape.
    #[error("form `{form}` field `{field}` is not a valid {}", expected.as_str())]
    InvalidField {
        /// Form identifier.
        form: String,
        /// Field name.
        field: String,
        /// Expected kind.
        expected: FieldKind,
    },
}
