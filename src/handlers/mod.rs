//! # Handlers por Método
//!
//! Este módulo contiene la tabla de métodos HTTP y la lógica de cada uno.
//!
//! Cada handler recibe un [`RequestContext`] ya resuelto por el router y
//! retorna la [`Response`] completa o un [`HttpError`]. Ningún handler
//! escribe en el socket: así una respuesta de error y una de éxito nunca
//! se mezclan en la misma conexión.

pub mod methods;
pub mod static_file;

pub use methods::{get_handler, head_handler, options_handler, post_handler};

use crate::config::ServerConfig;
use crate::error::HttpError;
use crate::http::{date, Response, StatusCode};
use crate::router::{ExtensionEntry, ResolvedTarget};

/// Tipo de función handler
pub type Handler = fn(&RequestContext<'_>) -> Result<Response, HttpError>;

/// Tabla de métodos soportados, en orden de búsqueda
pub static METHODS: &[(&str, Handler)] = &[
    ("GET", get_handler),
    ("POST", post_handler),
    ("OPTIONS", options_handler),
    ("HEAD", head_handler),
];

/// Busca el handler de `method` (coincidencia exacta)
pub fn lookup_method(method: &str) -> Option<Handler> {
    METHODS
        .iter()
        .find(|(name, _)| *name == method)
        .map(|(_, handler)| *handler)
}

/// Todo lo que un handler necesita saber de la petición
#[derive(Debug)]
pub struct RequestContext<'a> {
    pub config: &'a ServerConfig,
    pub target: ResolvedTarget,
    pub body: &'a [u8],
    pub minor_version: u32,

    /// Fecha de la respuesta, calculada una sola vez
    pub date: String,
}

impl<'a> RequestContext<'a> {
    pub fn new(
        config: &'a ServerConfig,
        target: ResolvedTarget,
        body: &'a [u8],
        minor_version: u32,
    ) -> Self {
        Self {
            config,
            target,
            body,
            minor_version,
            date: date::now(),
        }
    }

    /// Extensión del target. El router solo la deja vacía para OPTIONS.
    fn extension(&self) -> Result<&'static ExtensionEntry, HttpError> {
        self.target.extension.ok_or_else(|| {
            HttpError::Forbidden(format!(
                "{}: extension not permitted",
                self.target.absolute_path
            ))
        })
    }

    /// Respuesta 200 con las cabeceras comunes en su orden habitual:
    /// `Server`, `Content-Length`, `Connection`, `Content-Type`, `Date`
    fn ok_response(&self, content_type: &str) -> Response {
        Response::new(StatusCode::Ok, self.minor_version)
            .with_header("Server", &self.config.server_name)
            .with_content_length(0)
            .with_header("Connection", "close")
            .with_header("Content-Type", content_type)
            .with_header("Date", &self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_table() {
        assert!(lookup_method("GET").is_some());
        assert!(lookup_method("POST").is_some());
        assert!(lookup_method("OPTIONS").is_some());
        assert!(lookup_method("HEAD").is_some());
    }

    #[test]
    fn test_unknown_methods() {
        assert!(lookup_method("DELETE").is_none());
        assert!(lookup_method("PUT").is_none());
        assert!(lookup_method("get").is_none());
        assert!(lookup_method("GETX").is_none());
        assert!(lookup_method("").is_none());
    }
}
