//! Reporte markdown de una reconciliación: qué corrió, con qué parámetros y
//! con qué archivos, más las notas de auditoría de la corrida.

use serde_json::Value;

use crate::model::{CrateMetadata, FormalParameter};
use crate::run::Reconciliation;

pub fn render_markdown(rec: &Reconciliation) -> String {
    let mut out = Vec::new();
    out.push("# Galaxy Workflow Rerun Information\n".to_string());

    if let Some(name) = rec.metadata.as_ref().and_then(|m| m.workflow_name.as_deref()) {
        out.push(format!("**Workflow:** {name}\n"));
    }
    out.push(format!("**Execution Status:** {}\n", rec.invocation.status));
    if let Some(ts) = rec.create_time() {
        out.push(format!("**Executed:** {ts}\n"));
    }
    out.push(format!("**Run:** {}\n", rec.run_id));

    out.push("\n## Workflow Inputs\n".to_string());
    push_formal(&mut out, rec.metadata.as_ref(), |m| &m.formal_inputs, "Formal Input Definitions");
    out.push("### Actual Input Files Used\n".to_string());
    push_files(&mut out, &rec.resolved.inputs);

    out.push("\n## Workflow Parameters\n".to_string());
    for (name, value) in &rec.parameters {
        push_param(&mut out, name, value);
    }
    if !rec.workflow_parameters.is_empty() {
        out.push("\n### Request Parameters\n".to_string());
        for value in &rec.workflow_parameters {
            out.push(format!("- `{value}`"));
        }
        out.push(String::new());
    }

    out.push("\n## Workflow Outputs\n".to_string());
    push_formal(&mut out, rec.metadata.as_ref(), |m| &m.formal_outputs, "Formal Output Definitions");
    out.push("### Actual Output Files Generated\n".to_string());
    push_files(&mut out, &rec.resolved.outputs);

    if !rec.warnings.is_empty() {
        out.push("\n## Reconciliation Notes\n".to_string());
        for w in &rec.warnings {
            out.push(format!("- {w}"));
        }
        out.push(String::new());
    }

    out.join("\n")
}

fn push_files(out: &mut Vec<String>, names: &[String]) {
    for name in names {
        out.push(format!("- `{name}`"));
    }
    out.push(String::new());
}

fn push_formal<'m>(
    out: &mut Vec<String>,
    metadata: Option<&'m CrateMetadata>,
    select: impl Fn(&'m CrateMetadata) -> &'m [FormalParameter],
    title: &str,
) {
    let Some(params) = metadata.map(select).filter(|p| !p.is_empty()) else {
        return;
    };
    out.push(format!("### {title}\n"));
    for p in params {
        let name = p.name.as_deref().unwrap_or("(unnamed)");
        match p.additional_type.as_deref() {
            Some(ty) => out.push(format!("- **{name}** ({ty})")),
            None => out.push(format!("- **{name}**")),
        }
        if let Some(desc) = p.description.as_deref() {
            out.push(format!("  - Description: {desc}"));
        }
    }
    out.push(String::new());
}

/// Los valores-mapeo se expanden un nivel, igual que el resto del reporte;
/// todo lo demás se imprime en una línea.
fn push_param(out: &mut Vec<String>, name: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            out.push(format!("- **{name}:**"));
            for (k, v) in map {
                out.push(format!("  - {k}: `{v}`"));
            }
        }
        other => out.push(format!("- **{name}:** `{other}`")),
    }
    out.push(String::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InvocationRecord, InvocationStatus, ResolvedDatasetSet};
    use crate::params::NormalizedParameterMap;
    use serde_json::json;
    use uuid::Uuid;

    fn sample() -> Reconciliation {
        let mut parameters = NormalizedParameterMap::new();
        parameters.insert("threshold".into(), json!("5"));
        parameters.insert("adv".into(), json!({"mode": "fast"}));
        Reconciliation {
            run_id: Uuid::new_v4(),
            layout: Default::default(),
            invocation: InvocationRecord {
                status: InvocationStatus::Scheduled,
                ..Default::default()
            },
            metadata: None,
            parameters,
            workflow_parameters: vec![json!({"threshold": 5})],
            resolved: ResolvedDatasetSet {
                inputs: vec!["in.csv".into()],
                outputs: vec!["out.png".into()],
            },
            warnings: vec!["input dataset `ghost` not present in manifest, dropped".into()],
        }
    }

    #[test]
    fn report_carries_parameters_files_and_notes() {
        let text = render_markdown(&sample());
        assert!(text.contains("**Execution Status:** scheduled"));
        assert!(text.contains("- **threshold:** `\"5\"`"));
        assert!(text.contains("  - mode: `\"fast\"`"), "nested params expand one level");
        assert!(text.contains("- `in.csv`"));
        assert!(text.contains("- `out.png`"));
        assert!(text.contains("## Reconciliation Notes"));
        assert!(text.contains("ghost"));
    }
}
