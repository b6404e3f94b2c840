//! Materialización del contenedor: colaborador externo del pipeline.
//!
//! El core sólo necesita un árbol de archivos sobre el cual escanear; cómo
//! se obtiene ese árbol (zip, directorio, descarga previa) queda detrás del
//! trait `Unpacker`. Acá se provee la implementación para la forma
//! directorio de un RO-Crate; otros formatos de contenedor se implementan
//! fuera del core contra este mismo seam.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::ReconcileError;

pub trait Unpacker {
    /// Materializa el contenido de `archive` dentro de `dest` y devuelve la
    /// raíz del árbol resultante.
    fn unpack(&self, archive: &Path, dest: &Path) -> Result<PathBuf, ReconcileError>;
}

/// Refleja un RO-Crate ya extraído (forma directorio) dentro del destino,
/// preservando rutas relativas.
#[derive(Debug, Default)]
pub struct DirectoryUnpacker;

impl Unpacker for DirectoryUnpacker {
    fn unpack(&self, archive: &Path, dest: &Path) -> Result<PathBuf, ReconcileError> {
        if !archive.exists() {
            return Err(ReconcileError::ArchiveNotFound(archive.to_path_buf()));
        }
        if !archive.is_dir() {
            return Err(ReconcileError::UnsupportedContainer(archive.to_path_buf()));
        }
        fs::create_dir_all(dest)?;
        for entry in WalkDir::new(archive).into_iter().filter_map(|e| e.ok()) {
            let Ok(rel) = entry.path().strip_prefix(archive) else {
                continue;
            };
            if rel.as_os_str().is_empty() {
                continue;
            }
            let target = dest.join(rel);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else if entry.file_type().is_file() {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &target)?;
            }
        }
        Ok(dest.to_path_buf())
    }
}
