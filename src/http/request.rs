//! # Parsing de Requests HTTP/1.x
//! src/http/request.rs
//!
//! Convierte el buffer crudo leído del socket en un [`ParsedRequest`].
//!
//! ## Formato esperado
//!
//! ```text
//! POST /script.py?x=1 HTTP/1.1\r\n
//! Host: localhost:8888\r\n
//! \r\n
//! cuerpo...
//! ```
//!
//! Solo se interpreta la request line y el separador `\r\n\r\n`. Las
//! cabeceras (Host, Content-Length, Content-Type...) se ignoran, y el body
//! es todo lo que sigue al separador dentro del buffer.

use std::io::Read;
use thiserror::Error;

/// Tamaño máximo de un request (request line + cabeceras + body leído)
pub const MAX_REQUEST_SIZE: usize = 8192;

/// Separador entre cabeceras y body
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Prefijo literal de la versión
const VERSION_PREFIX: &str = "HTTP/1.";

/// Request parseado. Todos los campos apuntan al buffer original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedRequest<'a> {
    /// Método tal cual llegó (ej: "GET")
    pub method: &'a str,

    /// Path con la query string incluida (ej: "/hello.py?name=world")
    pub path: &'a str,

    /// Versión menor de HTTP/1.x
    pub minor_version: u32,

    /// Bytes posteriores a `\r\n\r\n`
    pub body: &'a [u8],
}

/// Errores que pueden ocurrir durante la lectura o el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// El peer cerró sin mandar nada
    #[error("Empty request")]
    EmptyRequest,

    /// La request line no es UTF-8 o le faltan método/path
    #[error("Invalid request line format")]
    InvalidRequestLine,

    /// No aparece `HTTP/1.<minor>` tras el path
    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    /// No aparece `\r\n\r\n` en el buffer
    #[error("Missing header terminator")]
    MissingTerminator,

    /// Se llenó el buffer sin encontrar el separador
    #[error("Request exceeds {0} bytes")]
    RequestTooLarge(usize),

    /// Fallo de lectura del socket
    #[error("Read error: {0}")]
    Io(String),
}

impl<'a> ParsedRequest<'a> {
    /// Parsea un request desde bytes
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use cgi_server::http::ParsedRequest;
    ///
    /// let raw = b"POST /echo.py?a=1 HTTP/1.1\r\nHost: x\r\n\r\nhola";
    /// let request = ParsedRequest::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method, "POST");
    /// assert_eq!(request.path, "/echo.py?a=1");
    /// assert_eq!(request.minor_version, 1);
    /// assert_eq!(request.body, b"hola");
    /// ```
    pub fn parse(buffer: &'a [u8]) -> Result<Self, ParseError> {
        if buffer.is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        // La request line termina en el primer \r\n (o en el separador si no hay cabeceras)
        let line_end = find(buffer, b"\r\n").unwrap_or(buffer.len());
        let line = std::str::from_utf8(&buffer[..line_end])
            .map_err(|_| ParseError::InvalidRequestLine)?;

        let (method, rest) = line.split_once(' ').ok_or(ParseError::InvalidRequestLine)?;
        let (path, version) = rest.split_once(' ').ok_or(ParseError::InvalidRequestLine)?;

        if method.is_empty() || path.is_empty() {
            return Err(ParseError::InvalidRequestLine);
        }

        let minor_version = Self::parse_minor_version(version)?;

        let body_start = find(buffer, HEADER_TERMINATOR)
            .ok_or(ParseError::MissingTerminator)?
            + HEADER_TERMINATOR.len();

        Ok(ParsedRequest {
            method,
            path,
            minor_version,
            body: &buffer[body_start..],
        })
    }

    /// Extrae la versión menor de `HTTP/1.<digitos>`
    fn parse_minor_version(version: &str) -> Result<u32, ParseError> {
        let invalid = || ParseError::InvalidHttpVersion(version.to_string());

        let digits = version.strip_prefix(VERSION_PREFIX).ok_or_else(invalid)?;
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());

        digits[..end].parse::<u32>().map_err(|_| invalid())
    }

    /// Body como texto (para pasarlo a los scripts)
    pub fn body_lossy(&self) -> String {
        String::from_utf8_lossy(self.body).into_owned()
    }
}

/// Lee del stream hasta ver `\r\n\r\n`, EOF o llegar a [`MAX_REQUEST_SIZE`]
///
/// Si el buffer se llena sin encontrar el separador se falla con
/// [`ParseError::RequestTooLarge`] en lugar de truncar.
pub fn read_request<R: Read>(reader: &mut R) -> Result<Vec<u8>, ParseError> {
    let mut buffer = vec![0u8; MAX_REQUEST_SIZE];
    let mut filled = 0;

    loop {
        let n = match reader.read(&mut buffer[filled..]) {
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ParseError::Io(e.to_string())),
        };

        if n == 0 {
            break;
        }

        // Solo hace falta buscar en la zona nueva (más 3 bytes de solape)
        let search_from = filled.saturating_sub(HEADER_TERMINATOR.len() - 1);
        filled += n;

        if find(&buffer[search_from..filled], HEADER_TERMINATOR).is_some() {
            break;
        }

        if filled == MAX_REQUEST_SIZE {
            return Err(ParseError::RequestTooLarge(MAX_REQUEST_SIZE));
        }
    }

    if filled == 0 {
        return Err(ParseError::EmptyRequest);
    }

    buffer.truncate(filled);
    Ok(buffer)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
