//! # Módulo HTTP
//!
//! Implementa la parte de protocolo HTTP/1.x que necesita el servidor:
//!
//! - Lectura acotada y parsing de la request line
//! - Construcción de responses y páginas de error predefinidas
//! - Códigos de estado
//! - Fechas en formato HTTP
//!
//! ### Formato de Request
//!
//! ```text
//! METHOD SP PATH SP HTTP/1.MINOR\r\n
//! Header-Name: Header-Value\r\n      (ignorados)
//! \r\n
//! body
//! ```

pub mod date;
pub mod request;
pub mod response;
pub mod status;

pub use request::{read_request, ParseError, ParsedRequest, MAX_REQUEST_SIZE};
pub use response::{Body, Response};
pub use status::StatusCode;
