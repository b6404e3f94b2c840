//! Normalización de los parámetros registrados por la invocación.
//!
//! Los valores crudos de `step_states` llegan con tipado flojo: escalares
//! planos, strings con una capa extra de comillas dobles, o strings que
//! empiezan con `{` y contienen JSON embebido. `CoercedParam` hace la
//! decisión de coerción explícita y total; `normalize_step_params` aplica la
//! tabla completa y aplana los steps en un único mapa nombre -> valor.

use indexmap::IndexMap;
use serde_json::Value;

use crate::constants::{PARAM_PRIVATE_PREFIX, RESERVED_PARAM_NAMES, WORKFLOW_REQUEST_PARAM_CLASS};
use crate::literal::parse_literal;
use crate::model::{InputParameterEntry, StepState};

/// Mapa aplanado nombre -> valor normalizado, en orden de aparición.
/// Colisiones entre steps: gana el último step (simplificación deliberada,
/// no se desambigua por índice de step).
pub type NormalizedParameterMap = IndexMap<String, Value>;

/// Resultado de la coerción de un valor crudo.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedParam {
    /// String al que se le quitó exactamente una capa de comillas dobles.
    Scalar(String),
    /// String `{`-prefijado que parseó como JSON embebido.
    Json(Value),
    /// Cualquier otro valor, intacto.
    Raw(Value),
}

impl CoercedParam {
    pub fn into_value(self) -> Value {
        match self {
            Self::Scalar(s) => Value::String(s),
            Self::Json(v) | Self::Raw(v) => v,
        }
    }
}

/// Coerción total de un valor crudo de step. Nunca falla: un JSON embebido
/// que no parsea se conserva como el string original.
pub fn coerce_raw(raw: &Value) -> CoercedParam {
    if let Value::String(s) = raw {
        if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
            return CoercedParam::Scalar(s[1..s.len() - 1].to_string());
        }
        if s.starts_with('{') {
            if let Ok(parsed) = serde_json::from_str::<Value>(s) {
                return CoercedParam::Json(parsed);
            }
        }
    }
    CoercedParam::Raw(raw.clone())
}

/// Nombres que nunca entran al mapa: internos del motor (`__*`) y reservados.
pub fn is_excluded_name(name: &str) -> bool {
    name.starts_with(PARAM_PRIVATE_PREFIX) || RESERVED_PARAM_NAMES.contains(&name)
}

/// Aplana la secuencia ordenada de steps en un `NormalizedParameterMap`.
pub fn normalize_step_params(steps: &[StepState]) -> NormalizedParameterMap {
    let mut out = NormalizedParameterMap::new();
    for step in steps {
        for (name, raw) in &step.raw {
            if is_excluded_name(name) {
                continue;
            }
            out.insert(name.clone(), coerce_raw(raw).into_value());
        }
    }
    out
}

/// Parámetros del request de workflow: entradas cuyo discriminador es
/// `WorkflowRequestInputParameter`, saltando el literal `"false"`, con el
/// valor string evaluado como literal de datos. Literales inválidos se
/// descartan dejando rastro en `warnings`.
pub fn collect_workflow_parameters(
    entries: &[InputParameterEntry],
    warnings: &mut Vec<String>,
) -> Vec<Value> {
    let mut out = Vec::new();
    for entry in entries {
        if entry.model_class != WORKFLOW_REQUEST_PARAM_CLASS {
            continue;
        }
        match &entry.value {
            Value::String(s) if s == "false" => {}
            Value::String(s) => match parse_literal(s) {
                Ok(v) => out.push(v),
                Err(e) => warnings.push(format!("workflow parameter `{s}` skipped: {e}")),
            },
            // Valor ya estructurado: se conserva tal cual.
            other => out.push(other.clone()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(order_index: i64, value: Value) -> StepState {
        let Value::Object(raw) = value else { panic!("object expected") };
        StepState { order_index, raw }
    }

    #[test]
    fn coercion_table_is_total() {
        // comillas dobles: se quita exactamente una capa
        assert_eq!(coerce_raw(&json!("\"hello\"")), CoercedParam::Scalar("hello".into()));
        assert_eq!(coerce_raw(&json!("\"\"5\"\"")).into_value(), json!("\"5\""));
        // JSON embebido válido
        assert_eq!(coerce_raw(&json!("{\"a\": 1}")), CoercedParam::Json(json!({"a": 1})));
        // `{`-prefijado inválido: queda el string original
        assert_eq!(coerce_raw(&json!("{broken")), CoercedParam::Raw(json!("{broken")));
        // todo lo demás pasa intacto
        assert_eq!(coerce_raw(&json!(5)), CoercedParam::Raw(json!(5)));
        assert_eq!(coerce_raw(&json!("plain")), CoercedParam::Raw(json!("plain")));
        // una comilla doble sola no puede perder "una capa"
        assert_eq!(coerce_raw(&json!("\"")), CoercedParam::Raw(json!("\"")));
    }

    #[test]
    fn normalize_drops_private_and_reserved_names() {
        let steps = vec![step(
            0,
            json!({"__job_resource": "x", "threshold": "\"5\"", "chromInfo": "?", "dbkey": "hg38"}),
        )];
        let map = normalize_step_params(&steps);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("threshold"), Some(&json!("5")));
        assert!(map.keys().all(|k| !k.starts_with("__")));
    }

    #[test]
    fn later_steps_overwrite_earlier_names() {
        let steps = vec![
            step(0, json!({"mode": "\"fast\"", "only_first": 1})),
            step(1, json!({"mode": "\"slow\""})),
        ];
        let map = normalize_step_params(&steps);
        assert_eq!(map.get("mode"), Some(&json!("slow")));
        assert_eq!(map.get("only_first"), Some(&json!(1)));
    }

    #[test]
    fn workflow_parameters_filter_and_literal_eval() {
        let entries = vec![
            InputParameterEntry {
                model_class: "WorkflowRequestInputParameter".into(),
                value: json!("{'threshold': 5}"),
            },
            InputParameterEntry {
                model_class: "WorkflowRequestInputParameter".into(),
                value: json!("false"),
            },
            InputParameterEntry { model_class: "WorkflowRequestStepState".into(), value: json!("'x'") },
            InputParameterEntry {
                model_class: "WorkflowRequestInputParameter".into(),
                value: json!("not a literal"),
            },
        ];
        let mut warnings = Vec::new();
        let params = collect_workflow_parameters(&entries, &mut warnings);
        assert_eq!(params, vec![json!({"threshold": 5})]);
        assert_eq!(warnings.len(), 1, "invalid literal leaves a trace");
    }
}
