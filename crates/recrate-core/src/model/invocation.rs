//! Registro de invocación: un evento de ejecución ya ocurrido.
//!
//! El registro es inmutable después del parseo. Un registro completamente
//! vacío (status desconocido, sin steps ni datasets) es la señal de que el
//! reader degradó por archivo ausente o malformado; los consumidores deben
//! tratarlo como tal y no asumir que hubo una ejecución.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Estado terminal reportado por el motor de workflows para la invocación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvocationStatus {
    New,
    Ready,
    Scheduled,
    Cancelled,
    Failed,
    /// Etiqueta no reconocida o registro degradado.
    #[default]
    Unknown,
}

impl InvocationStatus {
    pub fn from_label(label: &str) -> Self {
        match label {
            "new" => Self::New,
            "ready" => Self::Ready,
            "scheduled" => Self::Scheduled,
            "cancelled" => Self::Cancelled,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::New => "new",
            Self::Ready => "ready",
            Self::Scheduled => "scheduled",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Snapshot de parámetros de un step tal como lo dejó el motor: un mapeo
/// plano nombre -> valor crudo (escalares, strings re-citados o JSON
/// embebido en string; ver `params::coerce_raw`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepState {
    pub order_index: i64,
    pub raw: serde_json::Map<String, Value>,
}

/// Entrada de `input_parameters` del request original. `model_class` es el
/// discriminador del motor; `value` llega como string con un literal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputParameterEntry {
    pub model_class: String,
    pub value: Value,
}

/// Rol de una referencia de dataset dentro de la invocación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetRole {
    Input,
    Output,
}

impl fmt::Display for DatasetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Input => "input",
            Self::Output => "output",
        })
    }
}

/// Referencia a un dataset por identificador opaco. El identificador sólo
/// adquiere significado al resolverse contra el manifiesto (`join`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRef {
    pub dataset_id: String,
    pub order_index: i64,
    pub role: DatasetRole,
    /// Etiqueta que el workflow declaró para el output (sólo rol output).
    pub label: Option<String>,
}

/// Un evento de ejecución completo, tal como lo reconstruye el reader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvocationRecord {
    pub status: InvocationStatus,
    pub create_time: Option<DateTime<Utc>>,
    pub step_states: Vec<StepState>,
    pub input_parameters: Vec<InputParameterEntry>,
    pub input_datasets: Vec<DatasetRef>,
    pub output_datasets: Vec<DatasetRef>,
}

impl InvocationRecord {
    /// True si el registro no aporta ningún dato: la marca de un reader que
    /// degradó (archivo ausente o JSON inválido).
    pub fn is_empty(&self) -> bool {
        self.status == InvocationStatus::Unknown
            && self.create_time.is_none()
            && self.step_states.is_empty()
            && self.input_parameters.is_empty()
            && self.input_datasets.is_empty()
            && self.output_datasets.is_empty()
    }
}
