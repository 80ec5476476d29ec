// crates/hypergate-core/src/runtime/action.rs
// ============================================================================
// Module: Resolved Actions
// Description: Action semantics bound to a concrete request address.
// Purpose: Resolve parameters, check permission, and execute in order.
// Dependencies: crate::core, crate::interfaces, thiserror
// ============================================================================

//! ## Overview
//! An [`Action`] is what the resolver returns: shared [`ActionSemantics`]
//! plus the resource address bound to the ids found in the request path.
//! [`Action::apply`] is synchronous and runs on the calling thread:
//!
//! 1. resolve each declared parameter through the [`ParamProvider`],
//!    parsing the body through the action's form when one is attached;
//! 2. evaluate the permission check against the caller credentials;
//! 3. run the execute function.
//!
//! Failures are returned as [`ActionError`] values; nothing is retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::ActionOutput;
use crate::core::ActionSemantics;
use crate::core::Credentials;
use crate::core::ExecuteError;
use crate::core::ParamError;
use crate::core::ParamType;
use crate::core::ParamValue;
use crate::core::Resource;
use crate::interfaces::ParamProvider;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while applying a resolved action.
#[derive(Debug, Error)]
pub enum ActionError {
    /// A declared parameter could not be resolved or parsed.
    #[error(transparent)]
    Param(#[from] ParamError),
    /// The permission check rejected the caller.
    #[error("permission denied for action `{action}`")]
    PermissionDenied {
        /// Action key.
        action: String,
    },
    /// The execute function failed.
    #[error(transparent)]
    Execution(#[from] ExecuteError),
}

// ============================================================================
// SECTION: Action
// ============================================================================

/// Action semantics bound to a request address.
#[derive(Debug, Clone)]
pub struct Action {
    /// Shared semantics.
    semantics: Arc<ActionSemantics>,
    /// Address with ids bound from the path.
    resource: Resource,
}

impl Action {
    /// Binds `semantics` to `resource`.
    #[must_use]
    pub const fn new(semantics: Arc<ActionSemantics>, resource: Resource) -> Self {
        Self {
            semantics,
            resource,
        }
    }

    /// Returns the semantics.
    #[must_use]
    pub fn semantics(&self) -> &ActionSemantics {
        &self.semantics
    }

    /// Returns the shared semantics handle.
    #[must_use]
    pub const fn shared_semantics(&self) -> &Arc<ActionSemantics> {
        &self.semantics
    }

    /// Returns the bound address.
    #[must_use]
    pub const fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Resolves the declared parameters in order.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError`] when a parameter is missing or its body fails
    /// form validation.
    pub fn resolve_params(&self, provider: &dyn ParamProvider) -> Result<Vec<ParamValue>, ParamError> {
        self.semantics
            .param_types()
            .iter()
            .map(|param| -> Result<ParamValue, ParamError> {
                let value = provider.provide(param, &self.resource)?;
                match (param, value, self.semantics.form()) {
                    (ParamType::Body, ParamValue::Body(body), Some(form)) => {
                        Ok(ParamValue::Form(form.parse_body(&body)?))
                    }
                    (_, value, _) => Ok(value),
                }
            })
            .collect()
    }

    /// Resolves parameters, checks permission, and executes the action.
    ///
    /// Callers without credentials are treated as anonymous by the
    /// permission check.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] for parameter, permission, or execution
    /// failures.
    pub fn apply(&self, provider: &dyn ParamProvider) -> Result<ActionOutput, ActionError> {
        let params = self.resolve_params(provider)?;
        if self.semantics.has_permission_check() {
            let credentials = caller_credentials(provider, &self.resource)?;
            if !self.semantics.permits(&credentials, &params) {
                return Err(ActionError::PermissionDenied {
                    action: self.semantics.key(),
                });
            }
        }
        Ok(self.semantics.execute(&params)?)
    }
}

/// Resolves the caller credentials, defaulting to anonymous when absent.
fn caller_credentials(
    provider: &dyn ParamProvider,
    resource: &Resource,
) -> Result<Credentials, ParamError> {
    match provider.provide(&ParamType::Credentials, resource) {
        Ok(value) => value.as_credentials().cloned(),
        Err(ParamError::Missing(_)) => Ok(Credentials::anonymous()),
        Err(err) => Err(err),
    }
}
