//! JSON envelopes for IPC messages.
//!
//! Module settings travel as `{"powertoys":{"<Module>":{...}}}` and general
//! settings as `{"general":{...}}`.

use crate::constants::ipc::{GENERAL_ROOT, MODULES_ROOT};
use crate::error::{LayoutError, LayoutResult};
use crate::sync::ModuleSettings;
use serde::Serialize;
use serde_json::{json, Value};

/// Wraps module settings in the modules envelope.
pub fn module_envelope<S: ModuleSettings>(settings: &S) -> LayoutResult<String> {
    let payload = serde_json::to_value(settings)?;
    let message = json!({ MODULES_ROOT: { (S::MODULE_NAME): payload } });
    Ok(serde_json::to_string(&message)?)
}

/// Wraps general settings in the general envelope.
pub fn general_envelope<T: Serialize>(general: &T) -> LayoutResult<String> {
    let payload = serde_json::to_value(general)?;
    Ok(serde_json::to_string(&json!({ GENERAL_ROOT: payload }))?)
}

/// Extracts module settings of type `S` from a modules envelope.
pub fn parse_module_envelope<S: ModuleSettings>(message: &str) -> LayoutResult<S> {
    let mut value: Value = serde_json::from_str(message)?;
    let payload = value
        .get_mut(MODULES_ROOT)
        .and_then(|modules| modules.get_mut(S::MODULE_NAME))
        .map(Value::take)
        .ok_or_else(|| LayoutError::InvalidValue {
            field: "envelope",
            reason: format!("no '{MODULES_ROOT}.{}' section", S::MODULE_NAME),
        })?;
    Ok(serde_json::from_value(payload)?)
}
