//! Manifiesto de datasets: identificador opaco -> nombre de archivo físico.

use serde::{Deserialize, Serialize};

/// Una fila del manifiesto. `encoded_id` debería ser único dentro del
/// manifiesto; si no lo es, gana la primera coincidencia en orden de
/// iteración (no se rechaza activamente).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetManifestEntry {
    pub encoded_id: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct DatasetManifest {
    entries: Vec<DatasetManifestEntry>,
}

impl DatasetManifest {
    pub fn new(entries: Vec<DatasetManifestEntry>) -> Self {
        Self { entries }
    }

    /// Primera coincidencia exacta por identificador, en orden del manifiesto.
    pub fn lookup(&self, encoded_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.encoded_id == encoded_id)
            .map(|e| e.file_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
