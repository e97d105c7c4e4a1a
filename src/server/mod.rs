//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes (como mucho `max_clients` a la vez)
//! 3. Lee y parsea cada request en su propio thread
//! 4. Envía la respuesta y cierra la conexión

pub mod limiter;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use limiter::{ConnectionLimiter, Permit};
pub use tcp::Server;
