//! Reader del manifiesto de datasets (`datasets_attrs.txt`).

use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;

use crate::model::{DatasetManifest, DatasetManifestEntry};

#[derive(Debug, Deserialize)]
struct RawDatasetRow {
    #[serde(default)]
    encoded_id: Option<String>,
    #[serde(default)]
    file_name: Option<String>,
}

/// Lee el manifiesto. Degrada a manifiesto vacío ante archivo ausente o JSON
/// inválido; filas sin `encoded_id` o sin `file_name` se saltan.
pub fn read_manifest(path: &Path, warnings: &mut Vec<String>) -> DatasetManifest {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            warn!("dataset manifest {}: {e}", path.display());
            warnings.push(format!("dataset manifest {}: {e}", path.display()));
            return DatasetManifest::default();
        }
    };
    let rows: Vec<RawDatasetRow> = match serde_json::from_str(&text) {
        Ok(r) => r,
        Err(e) => {
            warn!("dataset manifest {}: invalid JSON: {e}", path.display());
            warnings.push(format!("dataset manifest {}: invalid JSON: {e}", path.display()));
            return DatasetManifest::default();
        }
    };

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        match (row.encoded_id, row.file_name) {
            (Some(encoded_id), Some(file_name)) => {
                entries.push(DatasetManifestEntry { encoded_id, file_name })
            }
            (id, _) => debug!(
                "dataset manifest {}: row without encoded_id/file_name skipped ({id:?})",
                path.display()
            ),
        }
    }
    DatasetManifest::new(entries)
}
