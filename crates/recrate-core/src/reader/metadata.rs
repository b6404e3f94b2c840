//! Reader de `ro-crate-metadata.json` (JSON-LD plano con `@graph`).
//!
//! Sólo se minan el nombre del workflow principal y sus parámetros formales
//! para el reporte. Cualquier problema degrada a `None`: la metadata nunca
//! condiciona la reconciliación.

use std::fs;
use std::path::Path;

use log::debug;
use serde_json::Value;

use crate::model::{CrateMetadata, FormalParameter};

pub fn read_metadata(path: &Path) -> Option<CrateMetadata> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            debug!("crate metadata {}: {e}", path.display());
            return None;
        }
    };
    let doc: Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            debug!("crate metadata {}: invalid JSON: {e}", path.display());
            return None;
        }
    };
    let graph = doc.get("@graph")?.as_array()?;

    let workflow = graph.iter().find(|e| type_contains(e, "ComputationalWorkflow"))?;
    Some(CrateMetadata {
        workflow_name: workflow.get("name").and_then(Value::as_str).map(str::to_string),
        formal_inputs: formal_params(graph, workflow.get("input")),
        formal_outputs: formal_params(graph, workflow.get("output")),
    })
}

/// `@type` puede ser un string o una lista de strings.
fn type_contains(entity: &Value, wanted: &str) -> bool {
    match entity.get("@type") {
        Some(Value::String(s)) => s == wanted,
        Some(Value::Array(items)) => items.iter().any(|t| t.as_str() == Some(wanted)),
        _ => false,
    }
}

/// Una referencia puede ser `{"@id": ...}`, una lista de tales, o un string.
fn ref_ids(value: Option<&Value>) -> Vec<&str> {
    fn collect_one(v: &Value) -> Option<&str> {
        match v {
            Value::String(s) => Some(s.as_str()),
            Value::Object(o) => o.get("@id").and_then(Value::as_str),
            _ => None,
        }
    }
    match value {
        None => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(collect_one).collect(),
        Some(single) => collect_one(single).into_iter().collect(),
    }
}

fn formal_params(graph: &[Value], refs: Option<&Value>) -> Vec<FormalParameter> {
    ref_ids(refs)
        .into_iter()
        .filter_map(|id| graph.iter().find(|e| e.get("@id").and_then(Value::as_str) == Some(id)))
        .map(|entity| FormalParameter {
            name: entity.get("name").and_then(Value::as_str).map(str::to_string),
            additional_type: entity
                .get("additionalType")
                .and_then(Value::as_str)
                .map(str::to_string),
            description: entity.get("description").and_then(Value::as_str).map(str::to_string),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn mines_workflow_name_and_formal_params() {
        let doc = json!({
            "@graph": [
                {"@id": "ro-crate-metadata.json", "@type": "CreativeWork"},
                {"@id": "wf.ga", "@type": ["File", "SoftwareSourceCode", "ComputationalWorkflow"],
                 "name": "Variant analysis",
                 "input": [{"@id": "#param-table"}],
                 "output": {"@id": "#param-plot"}},
                {"@id": "#param-table", "@type": "FormalParameter",
                 "name": "table", "additionalType": "File", "description": "input table"},
                {"@id": "#param-plot", "@type": "FormalParameter",
                 "name": "plot", "additionalType": "File"}
            ]
        });
        let mut f = tempfile::NamedTempFile::new().expect("tmp file");
        f.write_all(doc.to_string().as_bytes()).expect("write tmp");

        let meta = read_metadata(f.path()).expect("metadata should parse");
        assert_eq!(meta.workflow_name.as_deref(), Some("Variant analysis"));
        assert_eq!(meta.formal_inputs.len(), 1);
        assert_eq!(meta.formal_inputs[0].description.as_deref(), Some("input table"));
        assert_eq!(meta.formal_outputs[0].name.as_deref(), Some("plot"));
    }

    #[test]
    fn absent_file_is_none() {
        assert!(read_metadata(Path::new("/nonexistent/ro-crate-metadata.json")).is_none());
    }

    #[test]
    fn graph_without_workflow_is_none() {
        let mut f = tempfile::NamedTempFile::new().expect("tmp file");
        f.write_all(br#"{"@graph": [{"@id": "x", "@type": "File"}]}"#).expect("write tmp");
        assert!(read_metadata(f.path()).is_none());
    }
}
