//! Acceso a archivos estáticos bajo la raíz del servidor.

use crate::error::HttpError;
use crate::http::date;
use std::fs::{self, File};
use std::io::{Seek, SeekFrom};
use std::path::Path;

/// Archivo abierto y listo para enviarse
#[derive(Debug)]
pub struct StaticFile {
    pub file: File,

    /// Tamaño en bytes
    pub len: u64,

    /// mtime en formato HTTP
    pub last_modified: String,
}

/// Comprueba que `path` existe (sin mirar permisos de ejecución)
pub fn ensure_exists(path: &str) -> Result<(), HttpError> {
    let path = Path::new(path);
    fs::metadata(path)
        .map(|_| ())
        .map_err(|e| HttpError::from_io(path, e))
}

/// `stat` + `open` + tamaño
///
/// - No existe (o es un directorio) → 404
/// - Cualquier otro fallo de `stat` → 500
/// - Fallo de `open` → 404
pub fn open(path: &str) -> Result<StaticFile, HttpError> {
    let path = Path::new(path);

    let metadata = fs::metadata(path).map_err(|e| HttpError::from_io(path, e))?;
    if metadata.is_dir() {
        return Err(HttpError::NotFound(format!("{} is a directory", path.display())));
    }

    let modified = metadata
        .modified()
        .map_err(|e| HttpError::Internal(format!("{}: no mtime: {}", path.display(), e)))?;

    let mut file = File::open(path)
        .map_err(|e| HttpError::NotFound(format!("{}: {}", path.display(), e)))?;

    let internal = |e: std::io::Error| HttpError::Internal(format!("{}: {}", path.display(), e));
    let len = file.seek(SeekFrom::End(0)).map_err(internal)?;
    file.seek(SeekFrom::Start(0)).map_err(internal)?;

    Ok(StaticFile {
        file,
        len,
        last_modified: date::from_system_time(modified),
    })
}
