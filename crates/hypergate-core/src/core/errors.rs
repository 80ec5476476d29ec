// crates/hypergate-core/src/core/errors.rs
// ============================================================================
// Module: Builder Errors
// Description: Construction-time errors for action semantics and representors.
// Purpose: Fail builder misuse immediately instead of at first use.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`BuilderError`] reports misuse of the action semantics and representor
//! builders at the call that caused it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::field::FieldKind;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when a builder is finished in an invalid state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// The action name is empty.
    #[error("action name must not be empty")]
    EmptyName,
    /// The HTTP method is empty.
    #[error("action `{action}` has an empty method")]
    EmptyMethod {
        /// Action name.
        action: String,
    },
    /// A representor declares no hypermedia types.
    #[error("representor declares no types")]
    MissingTypes,
    /// A top-level representor has no identifier function.
    #[error("representor `{type_name}` has no identifier")]
    MissingIdentifier {
        /// Primary type name.
        type_name: String,
    },
    /// A field name is empty.
    #[error("{} field name must not be empty", kind.as_str())]
    EmptyFieldName {
        /// Field kind.
        kind: FieldKind,
    },
    /// The same field name is declared twice within one kind.
    #[error("duplicate {} field `{name}`", kind.as_str())]
    DuplicateField {
        /// Field kind.
        kind: FieldKind,
        /// Field name.
        name: String,
    },
    /// A bidirectional relation was declared without a relation index.
    #[error("bidirectional field `{field}` requires a relation index")]
    MissingRelationIndex {
        /// Field name.
        field: String,
    },
    /// A bidirectional relation was declared before the identifier.
    #[error("bidirectional field `{field}` requires the identifier type to be declared first")]
    MissingIdentifierType {
        /// Field name.
        field: String,
    },
}
