//! Reescritura posicional de la plantilla de job.
//!
//! La sustitución es estrictamente posicional: el orden de declaración de
//! los descriptores de archivo en la plantilla se consume contra el orden de
//! los nombres resueltos del join. `FileSlotQueue` hace ese contrato
//! explícito: el underflow (más slots que nombres) es un error con nombre de
//! clave, nunca un pánico ni un desfase silencioso.

use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::errors::ReconcileError;
use crate::model::{is_file_descriptor, JobTemplate};

/// Sección de la plantilla a la que pertenece una cola de slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSection {
    Job,
    Outputs,
}

impl fmt::Display for TemplateSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Job => "input",
            Self::Outputs => "output",
        })
    }
}

/// Cola de nombres de archivo resueltos, consumida de adelante hacia atrás.
#[derive(Debug)]
pub struct FileSlotQueue {
    section: TemplateSection,
    names: VecDeque<String>,
}

impl FileSlotQueue {
    pub fn new(section: TemplateSection, names: Vec<String>) -> Self {
        Self { section, names: names.into() }
    }

    /// Saca el próximo nombre para el slot `key`; si no queda ninguno, el
    /// error nombra la clave ofensora.
    pub fn take_for(&mut self, key: &str) -> Result<String, ReconcileError> {
        self.names.pop_front().ok_or_else(|| ReconcileError::SlotUnderflow {
            section: self.section,
            key: key.to_string(),
        })
    }

    pub fn remaining(&self) -> usize {
        self.names.len()
    }
}

/// Las dos secciones ya reescritas. Sólo `job` se serializa como artefacto;
/// `outputs` se conserva para inspección y para validar sus slots.
#[derive(Debug, Clone)]
pub struct RewrittenJob {
    pub job: Mapping,
    pub outputs: Mapping,
}

/// Rutas de los dos artefactos emitidos por una reescritura.
#[derive(Debug, Clone)]
pub struct RewrittenArtifacts {
    pub job_file: PathBuf,
    pub workflow_file: PathBuf,
}

/// Sustituye los descriptores de archivo de una sección, en orden de
/// iteración del mapeo (== orden de declaración de la plantilla). Entradas
/// sin descriptor quedan intactas.
fn substitute_section(
    section: &Mapping,
    queue: &mut FileSlotQueue,
) -> Result<Mapping, ReconcileError> {
    let mut out = section.clone();
    let path_key = Value::String("path".to_string());
    for (key, value) in out.iter_mut() {
        if !is_file_descriptor(value) {
            continue;
        }
        let key_name = key.as_str().unwrap_or("<non-string key>");
        let resolved = queue.take_for(key_name)?;
        if let Value::Mapping(descriptor) = value {
            descriptor.insert(path_key.clone(), Value::String(resolved));
        }
    }
    Ok(out)
}

/// Reescribe ambas secciones contra sus colas. Cualquier underflow aborta
/// sin producir resultado parcial.
pub fn rewrite_template(
    template: &JobTemplate,
    mut input_slots: FileSlotQueue,
    mut output_slots: FileSlotQueue,
) -> Result<RewrittenJob, ReconcileError> {
    Ok(RewrittenJob {
        job: substitute_section(&template.job, &mut input_slots)?,
        outputs: substitute_section(&template.outputs, &mut output_slots)?,
    })
}

/// Copia la definición de workflow tal cual al destino. Falla acá == aborta
/// la reescritura completa.
pub fn copy_workflow(from: &Path, to: &Path) -> Result<(), ReconcileError> {
    fs::copy(from, to).map_err(|source| ReconcileError::WorkflowCopy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Serializa la sección `job` reescrita, preservando el orden de claves
/// original de la plantilla (sin reordenar).
pub fn write_job_section(job: &Mapping, dest: &Path) -> Result<(), ReconcileError> {
    let text = serde_yaml::to_string(job).map_err(ReconcileError::JobSerialize)?;
    fs::write(dest, text)
        .map_err(|source| ReconcileError::ArtifactWrite { path: dest.to_path_buf(), source })
}
