//! Reader del registro de invocación (`invocation_attrs.txt`).
//!
//! El archivo contiene un array JSON cuyo primer elemento es la invocación.
//! Archivos con más de una invocación están soportados sólo parcialmente:
//! se lee la primera y se registra un warning (limitación conocida).

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::model::{
    DatasetRef, DatasetRole, InputParameterEntry, InvocationRecord, InvocationStatus, StepState,
};

#[derive(Debug, Deserialize)]
struct RawInvocation {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    create_time: Option<String>,
    #[serde(default)]
    input_parameters: Vec<RawInputParameter>,
    #[serde(default)]
    step_states: Vec<RawStepState>,
    #[serde(default)]
    input_datasets: Vec<RawDatasetAssoc>,
    #[serde(default)]
    output_datasets: Vec<RawDatasetAssoc>,
}

#[derive(Debug, Deserialize)]
struct RawInputParameter {
    #[serde(default)]
    model_class: Option<String>,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct RawStepState {
    #[serde(default)]
    order_index: i64,
    #[serde(default)]
    value: serde_json::Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDatasetAssoc {
    #[serde(default)]
    dataset: RawDatasetId,
    #[serde(default)]
    order_index: i64,
    #[serde(default)]
    workflow_output: RawWorkflowOutput,
}

#[derive(Debug, Default, Deserialize)]
struct RawDatasetId {
    #[serde(default)]
    encoded_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawWorkflowOutput {
    #[serde(default)]
    label: Option<String>,
}

/// Lee el registro de invocación. Nunca falla: cualquier problema degrada a
/// `InvocationRecord::default()` con rastro en `warnings`, y los consumidores
/// deben tratar un registro vacío como señal (ver modelo).
pub fn read_invocation(path: &Path, warnings: &mut Vec<String>) -> InvocationRecord {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            warn!("invocation record {}: {e}", path.display());
            warnings.push(format!("invocation record {}: {e}", path.display()));
            return InvocationRecord::default();
        }
    };
    let parsed: Vec<RawInvocation> = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            warn!("invocation record {}: invalid JSON: {e}", path.display());
            warnings.push(format!("invocation record {}: invalid JSON: {e}", path.display()));
            return InvocationRecord::default();
        }
    };
    if parsed.len() > 1 {
        warnings.push(format!(
            "invocation record {}: {} invocations present, only the first is read",
            path.display(),
            parsed.len()
        ));
    }
    let Some(raw) = parsed.into_iter().next() else {
        warnings.push(format!("invocation record {}: empty array", path.display()));
        return InvocationRecord::default();
    };

    InvocationRecord {
        status: raw.state.as_deref().map(InvocationStatus::from_label).unwrap_or_default(),
        create_time: raw.create_time.as_deref().and_then(parse_create_time),
        step_states: raw
            .step_states
            .into_iter()
            .map(|s| StepState { order_index: s.order_index, raw: s.value })
            .collect(),
        input_parameters: raw
            .input_parameters
            .into_iter()
            .map(|p| InputParameterEntry {
                model_class: p.model_class.unwrap_or_default(),
                value: p.value,
            })
            .collect(),
        input_datasets: dataset_refs(raw.input_datasets, DatasetRole::Input, warnings),
        output_datasets: dataset_refs(raw.output_datasets, DatasetRole::Output, warnings),
    }
}

/// Las asociaciones sin `dataset.encoded_id` no pueden participar del join;
/// se descartan al parsear, con warning.
fn dataset_refs(
    raw: Vec<RawDatasetAssoc>,
    role: DatasetRole,
    warnings: &mut Vec<String>,
) -> Vec<DatasetRef> {
    let mut refs = Vec::with_capacity(raw.len());
    for assoc in raw {
        match assoc.dataset.encoded_id {
            Some(dataset_id) => refs.push(DatasetRef {
                dataset_id,
                order_index: assoc.order_index,
                role,
                label: assoc.workflow_output.label,
            }),
            None => warnings.push(format!(
                "{role} dataset at order {} has no encoded_id, dropped",
                assoc.order_index
            )),
        }
    }
    refs
}

/// `create_time` llega en RFC3339 o como timestamp naive del motor
/// (`2024-05-06T07:08:09.123456`); ambos se normalizan a UTC.
fn parse_create_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
