//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo traduce el path de la petición a un archivo bajo la raíz del
//! servidor y elige el handler del método.
//!
//! ## Arquitectura
//!
//! ```text
//! ParsedRequest → Router → resolver path → comprobar ".." → extensión → método → Handler
//! ```
//!
//! Cualquier comprobación que falle corta la cadena con su [`HttpError`].

pub mod extension;

pub use extension::ExtensionEntry;

use crate::config::ServerConfig;
use crate::error::HttpError;
use crate::handlers::{self, RequestContext};
use crate::http::{ParsedRequest, Response};
use std::sync::Arc;
use tracing::info;

/// Path pedido ya unido a la raíz
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Ruta en disco, sin la query string
    pub absolute_path: String,

    /// Lo que sigue al primer `?` (vacío si no hay)
    pub query_string: String,

    /// `None` si la extensión no está permitida
    pub extension: Option<&'static ExtensionEntry>,
}

impl ResolvedTarget {
    /// Separa `full_path` en ruta + query y busca la extensión
    pub fn new(full_path: String) -> Self {
        let extension = extension::lookup(&full_path);
        let (absolute_path, query_string) = match full_path.split_once('?') {
            Some((path, query)) => (path.to_string(), query.to_string()),
            None => (full_path, String::new()),
        };

        Self {
            absolute_path,
            query_string,
            extension,
        }
    }
}

/// Router que resuelve paths y despacha a los handlers de método
pub struct Router {
    config: Arc<ServerConfig>,
}

impl Router {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Une el path pedido a la raíz del servidor
    ///
    /// `/` y el path vacío se reescriben a `/index.html`, y no se duplica la
    /// barra si la raíz termina en `/`.
    ///
    /// # Ejemplo
    /// ```
    /// use cgi_server::config::ServerConfig;
    /// use cgi_server::router::Router;
    /// use std::sync::Arc;
    ///
    /// let router = Router::new(Arc::new(ServerConfig::default()));
    /// assert_eq!(router.resolve("/"), "httpfiles/index.html");
    /// assert_eq!(router.resolve("/img/a.png"), "httpfiles/img/a.png");
    /// ```
    pub fn resolve(&self, path: &str) -> String {
        let path = if path.is_empty() || path == "/" {
            "/index.html"
        } else {
            path
        };

        let root = &self.config.root_dir;
        let path = if root.ends_with('/') {
            path.strip_prefix('/').unwrap_or(path)
        } else {
            path
        };

        format!("{}{}", root, path)
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// Orden de comprobaciones:
    /// 1. `..` en cualquier punto de la ruta resuelta → 403
    /// 2. Extensión no permitida (salvo OPTIONS) → 403
    /// 3. Método fuera de la tabla → 501
    pub fn route(&self, request: &ParsedRequest<'_>) -> Result<Response, HttpError> {
        let full_path = self.resolve(request.path);

        if full_path.contains("..") {
            return Err(HttpError::Forbidden(format!(
                "path traversal attempt: {}",
                full_path
            )));
        }

        let target = ResolvedTarget::new(full_path);

        if target.extension.is_none() && request.method != "OPTIONS" {
            return Err(HttpError::Forbidden(format!(
                "extension not permitted: {}",
                target.absolute_path
            )));
        }

        let handler = handlers::lookup_method(request.method)
            .ok_or_else(|| HttpError::NotImplemented(request.method.to_string()))?;

        info!(
            "HTTP/1.{} {} {} (ext: {})",
            request.minor_version,
            request.method,
            target.absolute_path,
            target.extension.map(|e| e.ext).unwrap_or("-")
        );

        let ctx = RequestContext::new(&self.config, target, request.body, request.minor_version);
        handler(&ctx)
    }
}
