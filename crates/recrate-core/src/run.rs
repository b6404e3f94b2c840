//! Orquestación de una corrida completa de reconciliación.
//!
//! Una corrida procesa un árbol extraído de punta a punta, en forma
//! síncrona: escaneo, lectura de fuentes, join, normalización, y recién
//! entonces los artefactos (reporte y reescritura). Las fallas no fatales se
//! acumulan en `warnings` para maximizar la salida parcial; los únicos
//! puntos fatales son el escaneo bajo política `error`, la plantilla de job
//! y la copia/sustitución de la reescritura.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::debug;
use serde_json::Value;
use uuid::Uuid;

use crate::config::RunConfig;
use crate::constants::{REPORT_FILENAME, REWRITTEN_JOB_FILENAME, REWRITTEN_WORKFLOW_FILENAME};
use crate::errors::ReconcileError;
use crate::model::{CrateMetadata, InvocationRecord, ResolvedDatasetSet};
use crate::params::{collect_workflow_parameters, normalize_step_params, NormalizedParameterMap};
use crate::reader;
use crate::rewrite::{
    copy_workflow, rewrite_template, write_job_section, FileSlotQueue, RewrittenArtifacts,
    TemplateSection,
};
use crate::scan::{scan_tree, CrateLayout, EntryRole};
use crate::{join, report};

/// Estado reconciliado de una corrida. Todos los registros son propiedad
/// exclusiva de esta corrida; nada se comparte ni se muta después.
#[derive(Debug)]
pub struct Reconciliation {
    pub run_id: Uuid,
    pub layout: CrateLayout,
    pub invocation: InvocationRecord,
    pub metadata: Option<CrateMetadata>,
    pub parameters: NormalizedParameterMap,
    pub workflow_parameters: Vec<Value>,
    pub resolved: ResolvedDatasetSet,
    pub warnings: Vec<String>,
}

/// Reconcilia el árbol extraído bajo `root`. No produce artefactos: eso
/// queda en manos de `write_report` / `rewrite_job` sobre el resultado.
pub fn reconcile_tree(root: &Path, config: &RunConfig) -> Result<Reconciliation, ReconcileError> {
    let run_id = Uuid::new_v4();
    debug!("reconcile run {run_id} over {}", root.display());

    let (layout, mut warnings) = scan_tree(root, config.ambiguity)?;

    let invocation = match &layout.invocation {
        Some(path) => reader::read_invocation(path, &mut warnings),
        None => {
            warnings.push(format!("{} absent, invocation degraded to empty", EntryRole::Invocation));
            InvocationRecord::default()
        }
    };
    if layout.invocation.is_some() && invocation.is_empty() {
        warnings.push("invocation record is empty, downstream sections degrade".to_string());
    }

    let manifest = match &layout.datasets {
        Some(path) => reader::read_manifest(path, &mut warnings),
        None => {
            warnings.push(format!("{} absent, manifest degraded to empty", EntryRole::Datasets));
            Default::default()
        }
    };

    let metadata = layout.metadata.as_deref().and_then(reader::read_metadata);

    let resolved = join::resolve_datasets(
        &manifest,
        &invocation.input_datasets,
        &invocation.output_datasets,
        &mut warnings,
    );
    let parameters = normalize_step_params(&invocation.step_states);
    let workflow_parameters = collect_workflow_parameters(&invocation.input_parameters, &mut warnings);

    Ok(Reconciliation {
        run_id,
        layout,
        invocation,
        metadata,
        parameters,
        workflow_parameters,
        resolved,
        warnings,
    })
}

impl Reconciliation {
    pub fn create_time(&self) -> Option<DateTime<Utc>> {
        self.invocation.create_time
    }

    /// Escribe el reporte markdown de la corrida en `dir`.
    pub fn write_report(&self, dir: &Path) -> Result<std::path::PathBuf, ReconcileError> {
        fs::create_dir_all(dir)?;
        let dest = dir.join(REPORT_FILENAME);
        fs::write(&dest, report::render_markdown(self))
            .map_err(|source| ReconcileError::ArtifactWrite { path: dest.clone(), source })?;
        Ok(dest)
    }

    /// Reescribe la plantilla de job contra los datasets resueltos y copia la
    /// definición de workflow. Los nombres resueltos se prefijan con `dir`
    /// (ahí es donde el árbol extraído dejó los archivos físicos).
    ///
    /// Orden del contrato: primero la copia del workflow (fatal si falla),
    /// después la sustitución; un underflow aborta sin escribir el job.
    pub fn rewrite_job(&self, dir: &Path) -> Result<RewrittenArtifacts, ReconcileError> {
        let template_path = self
            .layout
            .job_template
            .as_deref()
            .ok_or(ReconcileError::MissingEntry(EntryRole::JobTemplate))?;
        let workflow_path = self
            .layout
            .workflow
            .as_deref()
            .ok_or(ReconcileError::MissingEntry(EntryRole::Workflow))?;

        let template = reader::read_template(template_path)?;

        fs::create_dir_all(dir)?;
        let workflow_file = dir.join(REWRITTEN_WORKFLOW_FILENAME);
        copy_workflow(workflow_path, &workflow_file)?;

        let with_dir = |names: &[String]| -> Vec<String> {
            names.iter().map(|n| dir.join(n).to_string_lossy().into_owned()).collect()
        };
        let rewritten = rewrite_template(
            &template,
            FileSlotQueue::new(TemplateSection::Job, with_dir(&self.resolved.inputs)),
            FileSlotQueue::new(TemplateSection::Outputs, with_dir(&self.resolved.outputs)),
        )?;

        let job_file = dir.join(REWRITTEN_JOB_FILENAME);
        write_job_section(&rewritten.job, &job_file)?;
        Ok(RewrittenArtifacts { job_file, workflow_file })
    }

    /// Render del reporte sin tocar disco (para consumidores embebidos).
    pub fn report_markdown(&self) -> String {
        report::render_markdown(self)
    }
}
