//! # CGI Server
//! src/lib.rs
//!
//! Servidor HTTP/1.x concurrente que sirve archivos estáticos y ejecuta
//! scripts `.py`/`.php` mediante un intérprete externo, devolviendo su
//! salida envuelta en HTML.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Lectura/parsing de requests, responses, páginas de error y fechas
//! - `router`: Resolución de paths, tabla de extensiones y despacho por método
//! - `handlers`: Lógica de GET, POST, HEAD y OPTIONS
//! - `cgi`: Ejecución de scripts a través de pipes
//! - `server`: Bucle de accept, un thread por conexión y límite de clientes
//! - `config`: Configuración (server.conf + CLI + entorno)
//! - `error`: Clasificación de errores en 400/403/404/500/501
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use cgi_server::config::ServerConfig;
//! use cgi_server::server::Server;
//!
//! let config = ServerConfig::default();
//! let mut server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod cgi;
pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod router;
pub mod server;
