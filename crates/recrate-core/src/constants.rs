//! Constantes del layout de un RO-Crate extraído y de la normalización.

/// Sufijo del archivo de definición de workflow (Galaxy `.ga`).
pub const WORKFLOW_SUFFIX: &str = ".ga";
/// Sufijo de la plantilla de job (YAML).
pub const JOB_TEMPLATE_SUFFIX: &str = ".yml";
/// Registro de invocación dentro del árbol extraído.
pub const INVOCATION_ATTRS_NAME: &str = "invocation_attrs.txt";
/// Manifiesto de datasets dentro del árbol extraído.
pub const DATASETS_ATTRS_NAME: &str = "datasets_attrs.txt";
/// Metadata JSON-LD del crate (opcional, sólo informa el reporte).
pub const CRATE_METADATA_NAME: &str = "ro-crate-metadata.json";

/// Nombre del job reescrito que se emite como artefacto.
pub const REWRITTEN_JOB_FILENAME: &str = "workflow_input_params.yml";
/// Nombre de la copia de la definición de workflow que se emite.
pub const REWRITTEN_WORKFLOW_FILENAME: &str = "workflow.ga";
/// Nombre del reporte markdown de la corrida.
pub const REPORT_FILENAME: &str = "workflow_rerun_info.md";

/// Prefijo de parámetros internos del motor; nunca entran al mapa normalizado.
pub const PARAM_PRIVATE_PREFIX: &str = "__";
/// Nombres de parámetro reservados por el motor; también se excluyen.
pub const RESERVED_PARAM_NAMES: [&str; 2] = ["chromInfo", "dbkey"];

/// Discriminador de las entradas de `input_parameters` que describen
/// parámetros del request de workflow.
pub const WORKFLOW_REQUEST_PARAM_CLASS: &str = "WorkflowRequestInputParameter";

/// Marcador de clase de un descriptor de archivo en la plantilla de job.
pub const FILE_CLASS: &str = "File";
