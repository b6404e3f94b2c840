//! Metadata descriptiva extraída de `ro-crate-metadata.json`.
//! Sólo alimenta el reporte; su ausencia no afecta la reconciliación.

use serde::{Deserialize, Serialize};

/// Parámetro formal declarado en el grafo del crate (FormalParameter).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormalParameter {
    pub name: Option<String>,
    pub additional_type: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrateMetadata {
    pub workflow_name: Option<String>,
    pub formal_inputs: Vec<FormalParameter>,
    pub formal_outputs: Vec<FormalParameter>,
}
