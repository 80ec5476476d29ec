// crates/hypergate-core/src/writer/operations.rs
// ============================================================================
// Module: Operation Listing
// Description: Emits the permitted actions of an addressed resource.
// Purpose: Share operation callbacks between single-model and page writers.
// Dependencies: crate::core, crate::runtime
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ActionSemantics;
use crate::core::ParamValue;
use crate::core::RouteShape;
use crate::writer::context::WriterContext;
use crate::writer::json::JsonObjectBuilder;
use crate::writer::mapper::OperationInfo;
use crate::writer::mapper::OperationMapper;
use crate::writer::path::FieldPath;

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Emits operation callbacks for every permitted action on `shape`.
///
/// Method-dispatched actions target `base_url`; custom actions target
/// `{base_url}/{name}`. Permission checks see `params` only.
pub(crate) fn write_operations<M: OperationMapper + ?Sized>(
    context: &WriterContext<'_>,
    mapper: &M,
    doc: &mut JsonObjectBuilder,
    shape: &RouteShape,
    base_url: &str,
    params: &[ParamValue],
) {
    let Some((registry, credentials)) = context.operations() else {
        return;
    };
    let path = FieldPath::root();
    for semantics in registry.actions_for(shape) {
        if !semantics.permits(credentials, params) {
            continue;
        }
        let op = operation_info(context, semantics, base_url);
        mapper.on_start_operation(doc, &path, &op);
        mapper.map_operation_method(doc, &path, &op);
        if let Some(form_url) = &op.form_url {
            mapper.map_operation_form_url(doc, &path, &op, form_url);
        }
        mapper.on_finish_operation(doc, &path, &op);
    }
}

/// Describes one action relative to `base_url`.
fn operation_info(
    context: &WriterContext<'_>,
    semantics: &ActionSemantics,
    base_url: &str,
) -> OperationInfo {
    let target_url = if semantics.is_standard() {
        base_url.to_string()
    } else {
        format!("{base_url}/{}", semantics.name())
    };
    OperationInfo {
        name: semantics.name().to_string(),
        method: semantics.method().as_str().to_string(),
        kind: semantics.kind(),
        target_url,
        form_url: semantics.form().map(|form| context.urls().form(&form.descriptor().id)),
    }
}
