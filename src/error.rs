//! # Errores HTTP
//! src/error.rs
//!
//! Clasificación de todo lo que puede fallar al atender una petición.
//! Cada variante corresponde a una de las páginas de error predefinidas.

use crate::cgi::ScriptError;
use crate::http::{ParseError, StatusCode};
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    /// 400: request line o separador mal formados
    #[error("bad request: {0}")]
    BadRequest(#[from] ParseError),

    /// 403: path traversal o extensión no permitida
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// 404: el archivo pedido no existe
    #[error("not found: {0}")]
    NotFound(String),

    /// 500: fallo de E/S, de fechas o de ejecución del script
    #[error("internal error: {0}")]
    Internal(String),

    /// 501: método fuera de la tabla
    #[error("method not implemented: {0}")]
    NotImplemented(String),
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::BadRequest(_) => StatusCode::BadRequest,
            HttpError::Forbidden(_) => StatusCode::Forbidden,
            HttpError::NotFound(_) => StatusCode::NotFound,
            HttpError::Internal(_) => StatusCode::InternalServerError,
            HttpError::NotImplemented(_) => StatusCode::NotImplemented,
        }
    }

    /// Clasifica un error de `stat`/`open`: inexistente → 404, el resto → 500
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => HttpError::NotFound(path.display().to_string()),
            _ => HttpError::Internal(format!("{}: {}", path.display(), err)),
        }
    }
}

impl From<ScriptError> for HttpError {
    fn from(err: ScriptError) -> Self {
        HttpError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            HttpError::BadRequest(ParseError::MissingTerminator).status(),
            StatusCode::BadRequest
        );
        assert_eq!(HttpError::Forbidden("..".into()).status(), StatusCode::Forbidden);
        assert_eq!(HttpError::NotFound("x".into()).status(), StatusCode::NotFound);
        assert_eq!(
            HttpError::Internal("x".into()).status(),
            StatusCode::InternalServerError
        );
        assert_eq!(
            HttpError::NotImplemented("DELETE".into()).status(),
            StatusCode::NotImplemented
        );
    }

    #[test]
    fn test_from_io_classifies_not_found() {
        let path = Path::new("/nope/missing.html");

        let err = HttpError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, HttpError::NotFound(_)));

        let err = HttpError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, HttpError::Internal(_)));
    }
}
