//! Reader de la plantilla de job (YAML). Única lectura fatal del pipeline.

use std::fs;
use std::path::Path;

use log::warn;
use serde_yaml::{Mapping, Value};

use crate::errors::ReconcileError;
use crate::model::JobTemplate;

/// Lee la plantilla: un documento YAML con una lista de un solo elemento,
/// cuyo elemento tiene las claves `job` y `outputs`. Ausencia de archivo,
/// YAML inválido o forma inesperada abortan la corrida (`Err`); una lista de
/// más de un elemento usa el primero y deja un warning en el log.
pub fn read_template(path: &Path) -> Result<JobTemplate, ReconcileError> {
    let text = fs::read_to_string(path)
        .map_err(|source| ReconcileError::TemplateRead { path: path.to_path_buf(), source })?;
    let doc: Value = serde_yaml::from_str(&text)
        .map_err(|source| ReconcileError::TemplateParse { path: path.to_path_buf(), source })?;

    let shape = |detail: &str| ReconcileError::TemplateShape {
        path: path.to_path_buf(),
        detail: detail.to_string(),
    };

    let seq = doc.as_sequence().ok_or_else(|| shape("expected a top-level list"))?;
    if seq.is_empty() {
        return Err(shape("top-level list is empty"));
    }
    if seq.len() > 1 {
        warn!(
            "job template {}: {} documents in list, only the first is used",
            path.display(),
            seq.len()
        );
    }
    let entry = seq[0].as_mapping().ok_or_else(|| shape("list element is not a mapping"))?;

    Ok(JobTemplate {
        job: section(entry, "job").ok_or_else(|| shape("`job` is not a mapping"))?,
        outputs: section(entry, "outputs").ok_or_else(|| shape("`outputs` is not a mapping"))?,
    })
}

/// Sección ausente == mapeo vacío; presente pero no-mapeo == None (fatal).
fn section(entry: &Mapping, key: &str) -> Option<Mapping> {
    match entry.get(&Value::String(key.to_string())) {
        None | Some(Value::Null) => Some(Mapping::new()),
        Some(Value::Mapping(m)) => Some(m.clone()),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("tmp file");
        f.write_all(content.as_bytes()).expect("write tmp");
        f
    }

    #[test]
    fn reads_job_and_outputs_sections() {
        let f = write_tmp(
            "- job:\n    input_table:\n      class: File\n      path: old.csv\n    threshold: 5\n  outputs:\n    plot:\n      class: File\n      path: old.png\n",
        );
        let tpl = read_template(f.path()).expect("template should parse");
        assert_eq!(tpl.job.len(), 2);
        assert_eq!(tpl.outputs.len(), 1);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let f = write_tmp("- job:\n    threshold: 5\n");
        let tpl = read_template(f.path()).expect("template should parse");
        assert!(tpl.outputs.is_empty());
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = read_template(Path::new("/nonexistent/job.yml"));
        assert!(matches!(err, Err(ReconcileError::TemplateRead { .. })));
    }

    #[test]
    fn invalid_yaml_is_fatal() {
        let f = write_tmp("]: not yaml [");
        assert!(matches!(read_template(f.path()), Err(ReconcileError::TemplateParse { .. })));
    }

    #[test]
    fn empty_list_is_fatal() {
        let f = write_tmp("[]\n");
        assert!(matches!(read_template(f.path()), Err(ReconcileError::TemplateShape { .. })));
    }

    #[test]
    fn non_list_document_is_fatal() {
        let f = write_tmp("job: {}\n");
        assert!(matches!(read_template(f.path()), Err(ReconcileError::TemplateShape { .. })));
    }
}
