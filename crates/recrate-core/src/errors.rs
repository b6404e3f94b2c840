//! Errores de la reconciliación.
//! Sólo los puntos fatales de una corrida aparecen aquí; las fallas de lectura
//! no fatales degradan a estructuras vacías y se registran como warnings.

use std::path::PathBuf;

use thiserror::Error;

use crate::rewrite::TemplateSection;
use crate::scan::EntryRole;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("archive not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),
    #[error("{} is not an extracted RO-Crate directory", .0.display())]
    UnsupportedContainer(PathBuf),
    #[error("missing {0} in extracted tree")]
    MissingEntry(EntryRole),
    #[error("ambiguous {role}: {count} candidates in archive")]
    AmbiguousEntry { role: EntryRole, count: usize },
    #[error("job template {}: {source}", path.display())]
    TemplateRead { path: PathBuf, source: std::io::Error },
    #[error("job template {}: {source}", path.display())]
    TemplateParse { path: PathBuf, source: serde_yaml::Error },
    #[error("job template {}: {detail}", path.display())]
    TemplateShape { path: PathBuf, detail: String },
    #[error("no resolved {section} dataset left for file slot `{key}`")]
    SlotUnderflow { section: TemplateSection, key: String },
    #[error("workflow copy {} -> {}: {source}", from.display(), to.display())]
    WorkflowCopy { from: PathBuf, to: PathBuf, source: std::io::Error },
    #[error("write {}: {source}", path.display())]
    ArtifactWrite { path: PathBuf, source: std::io::Error },
    #[error("serialize rewritten job: {0}")]
    JobSerialize(serde_yaml::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
