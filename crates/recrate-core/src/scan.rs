//! Escaneo del árbol extraído: clasifica los archivos esperados por rol.
//!
//! Las precondiciones de multiplicidad (una invocación, un manifiesto, una
//! plantilla, un workflow por archivo) se validan acá, una sola vez y antes
//! de leer nada, según la política configurada.

use std::fmt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::AmbiguityPolicy;
use crate::constants::{
    CRATE_METADATA_NAME, DATASETS_ATTRS_NAME, INVOCATION_ATTRS_NAME, JOB_TEMPLATE_SUFFIX,
    REWRITTEN_JOB_FILENAME, WORKFLOW_SUFFIX,
};
use crate::errors::ReconcileError;

/// Rol de un archivo dentro del árbol extraído.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRole {
    Workflow,
    Invocation,
    Datasets,
    JobTemplate,
    Metadata,
}

impl fmt::Display for EntryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Workflow => "workflow definition (.ga)",
            Self::Invocation => "invocation record (invocation_attrs.txt)",
            Self::Datasets => "dataset manifest (datasets_attrs.txt)",
            Self::JobTemplate => "job template (.yml)",
            Self::Metadata => "crate metadata (ro-crate-metadata.json)",
        })
    }
}

/// Rutas elegidas para cada rol. `None` significa que el rol no apareció;
/// la fatalidad de esa ausencia depende del consumidor (ver `run`).
#[derive(Debug, Clone, Default)]
pub struct CrateLayout {
    pub root: PathBuf,
    pub workflow: Option<PathBuf>,
    pub invocation: Option<PathBuf>,
    pub datasets: Option<PathBuf>,
    pub job_template: Option<PathBuf>,
    pub metadata: Option<PathBuf>,
}

fn role_of(file_name: &str) -> Option<EntryRole> {
    if file_name == INVOCATION_ATTRS_NAME {
        Some(EntryRole::Invocation)
    } else if file_name == DATASETS_ATTRS_NAME {
        Some(EntryRole::Datasets)
    } else if file_name == CRATE_METADATA_NAME {
        Some(EntryRole::Metadata)
    } else if file_name.ends_with(WORKFLOW_SUFFIX) {
        Some(EntryRole::Workflow)
    } else if file_name.ends_with(JOB_TEMPLATE_SUFFIX) && file_name != REWRITTEN_JOB_FILENAME {
        // el job reescrito de una corrida previa no es candidato a plantilla
        Some(EntryRole::JobTemplate)
    } else {
        None
    }
}

/// Recorre `root` y devuelve el layout más los warnings de multiplicidad.
/// Con política `Error`, más de un candidato para un rol es fatal.
pub fn scan_tree(
    root: &Path,
    policy: AmbiguityPolicy,
) -> Result<(CrateLayout, Vec<String>), ReconcileError> {
    let mut workflows = Vec::new();
    let mut invocations = Vec::new();
    let mut datasets = Vec::new();
    let mut templates = Vec::new();
    let mut metadata = Vec::new();

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        match role_of(file_name) {
            Some(EntryRole::Workflow) => workflows.push(entry.into_path()),
            Some(EntryRole::Invocation) => invocations.push(entry.into_path()),
            Some(EntryRole::Datasets) => datasets.push(entry.into_path()),
            Some(EntryRole::JobTemplate) => templates.push(entry.into_path()),
            Some(EntryRole::Metadata) => metadata.push(entry.into_path()),
            None => {}
        }
    }

    let mut warnings = Vec::new();
    let layout = CrateLayout {
        root: root.to_path_buf(),
        workflow: pick(EntryRole::Workflow, workflows, policy, &mut warnings)?,
        invocation: pick(EntryRole::Invocation, invocations, policy, &mut warnings)?,
        datasets: pick(EntryRole::Datasets, datasets, policy, &mut warnings)?,
        job_template: pick(EntryRole::JobTemplate, templates, policy, &mut warnings)?,
        metadata: pick(EntryRole::Metadata, metadata, policy, &mut warnings)?,
    };
    Ok((layout, warnings))
}

/// Aplica la política de multiplicidad a los candidatos de un rol. "Primero"
/// es siempre el primero en orden lexicográfico de ruta, independiente del
/// orden de recorrido del directorio.
fn pick(
    role: EntryRole,
    mut candidates: Vec<PathBuf>,
    policy: AmbiguityPolicy,
    warnings: &mut Vec<String>,
) -> Result<Option<PathBuf>, ReconcileError> {
    candidates.sort();
    match (candidates.len(), policy) {
        (0, _) => Ok(None),
        (1, _) => Ok(candidates.pop()),
        (count, AmbiguityPolicy::Error) => Err(ReconcileError::AmbiguousEntry { role, count }),
        (count, AmbiguityPolicy::FirstByPath) => {
            let chosen = candidates.remove(0);
            warnings.push(format!(
                "ambiguous {role}: {count} candidates, using {}",
                chosen.display()
            ));
            Ok(Some(chosen))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, b"x").expect("touch");
    }

    #[test]
    fn classifies_the_expected_roles() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        touch(tmp.path(), "wf.ga");
        touch(tmp.path(), "invocation_attrs.txt");
        touch(tmp.path(), "nested/datasets_attrs.txt");
        touch(tmp.path(), "job.yml");
        touch(tmp.path(), "ro-crate-metadata.json");
        touch(tmp.path(), "datasets/ignored.tabular");

        let (layout, warnings) =
            scan_tree(tmp.path(), AmbiguityPolicy::FirstByPath).expect("scan");
        assert!(warnings.is_empty());
        assert!(layout.workflow.is_some());
        assert!(layout.invocation.is_some());
        assert!(layout.datasets.is_some());
        assert!(layout.job_template.is_some());
        assert!(layout.metadata.is_some());
    }

    #[test]
    fn first_by_path_takes_lexicographic_first_and_warns() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        touch(tmp.path(), "b_workflow.ga");
        touch(tmp.path(), "a_workflow.ga");

        let (layout, warnings) =
            scan_tree(tmp.path(), AmbiguityPolicy::FirstByPath).expect("scan");
        let chosen = layout.workflow.expect("workflow chosen");
        assert!(chosen.ends_with("a_workflow.ga"), "{}", chosen.display());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn error_policy_rejects_ambiguity() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        touch(tmp.path(), "one.yml");
        touch(tmp.path(), "two.yml");

        let err = scan_tree(tmp.path(), AmbiguityPolicy::Error);
        assert!(matches!(
            err,
            Err(ReconcileError::AmbiguousEntry { role: EntryRole::JobTemplate, count: 2 })
        ));
    }

    #[test]
    fn previous_rewritten_job_is_not_a_template_candidate() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        touch(tmp.path(), "workflow_input_params.yml");
        touch(tmp.path(), "job.yml");

        let (layout, warnings) = scan_tree(tmp.path(), AmbiguityPolicy::Error).expect("scan");
        assert!(warnings.is_empty());
        let chosen = layout.job_template.expect("template chosen");
        assert!(chosen.ends_with("job.yml"));
    }

    #[test]
    fn absent_roles_are_none() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        let (layout, _) = scan_tree(tmp.path(), AmbiguityPolicy::Error).expect("scan");
        assert!(layout.workflow.is_none());
        assert!(layout.job_template.is_none());
    }
}
