//! recrate-core: reconciliación de registros de invocación de RO-Crates.
//!
//! Toma el árbol extraído de un RO-Crate producido por un motor de workflows
//! (Galaxy), reconstruye "qué se ejecutó realmente" a partir de sus fuentes
//! semi-estructuradas y produce una especificación de job re-ejecutable:
//! - lectura tipada del registro de invocación, del manifiesto de datasets y
//!   de la plantilla de job (`reader`),
//! - join por identificador opaco entre invocación y manifiesto (`join`),
//! - normalización de parámetros por step (`params`),
//! - reescritura posicional de la plantilla de job (`rewrite`).
//!
//! El flujo completo de una corrida vive en `run`; todo es síncrono y local
//! a la corrida (sin estado compartido entre corridas).
pub mod config;
pub mod constants;
pub mod errors;
pub mod join;
pub mod literal;
pub mod model;
pub mod params;
pub mod reader;
pub mod report;
pub mod rewrite;
pub mod run;
pub mod scan;
pub mod unpack;

pub use config::{AmbiguityPolicy, RunConfig};
pub use errors::ReconcileError;
pub use model::{
    CrateMetadata, DatasetManifest, DatasetManifestEntry, DatasetRef, DatasetRole,
    FormalParameter, InputParameterEntry, InvocationRecord, InvocationStatus, JobTemplate,
    ResolvedDatasetSet, StepState,
};
pub use params::NormalizedParameterMap;
pub use rewrite::{FileSlotQueue, RewrittenArtifacts, TemplateSection};
pub use run::{reconcile_tree, Reconciliation};
pub use scan::{CrateLayout, EntryRole};
pub use unpack::{DirectoryUnpacker, Unpacker};
