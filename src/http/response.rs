//! # Construcción de Respuestas HTTP
//!
//! Este módulo proporciona una API para construir respuestas HTTP/1.x
//! y escribirlas en el socket.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Server: Redes2Server\r\n
//! Content-Length: 20\r\n
//! Connection: close\r\n
//! Content-Type: text/html\r\n
//! Date: Sat, 17 Oct 2026 10:04:05 GMT\r\n
//! \r\n
//! <html>...</html>
//! ```
//!
//! El body puede ser un buffer en memoria, un archivo que se envía por
//! trozos, o nada (HEAD). `Content-Length` se guarda aparte del body para
//! que HEAD pueda declarar el tamaño sin enviarlo.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use cgi_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok, 1)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("Hello");
//!
//! let mut out = Vec::new();
//! response.write_to(&mut out).unwrap();
//! assert!(out.ends_with(b"\r\n\r\nHello"));
//! ```

use super::StatusCode;
use std::fs::File;
use std::io::{self, Read, Write};

/// Tamaño de los trozos al volcar archivos al socket
pub const CHUNK_SIZE: usize = 4096;

/// Cuerpo de la respuesta
#[derive(Debug)]
pub enum Body {
    /// Sin body (HEAD, OPTIONS)
    Empty,

    /// Body ya generado en memoria
    Bytes(Vec<u8>),

    /// Archivo abierto que se copia por trozos
    File(File),
}

/// Respuesta HTTP lista para escribirse en el socket
#[derive(Debug)]
pub struct Response {
    status: StatusCode,

    /// Versión menor con la que contestar (`HTTP/1.<minor>`)
    minor_version: u32,

    /// Headers en orden de inserción
    headers: Vec<(String, String)>,

    body: Body,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    pub fn new(status: StatusCode, minor_version: u32) -> Self {
        Self {
            status,
            minor_version,
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Agrega un header. Si ya existía, se reemplaza en su posición.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de [`Response::with_header`]
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some((_, existing_value)) => *existing_value = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Declara `Content-Length` sin tocar el body (HEAD)
    pub fn with_content_length(self, len: u64) -> Self {
        self.with_header("Content-Length", &len.to_string())
    }

    /// Establece el body desde un string y calcula `Content-Length`
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el body desde bytes y calcula `Content-Length`
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self = self.with_content_length(body.len() as u64);
        self.body = Body::Bytes(body);
        self
    }

    /// Usa un archivo abierto como body. `len` es su tamaño en bytes.
    pub fn with_file(mut self, file: File, len: u64) -> Self {
        self = self.with_content_length(len);
        self.body = Body::File(file);
        self
    }

    /// Página de error predefinida para `status`
    ///
    /// Los bodies son fijos, byte a byte, y su longitud está precalculada.
    /// Cualquier código que no sea de error usa la página 500.
    pub fn error(status: StatusCode) -> Self {
        let (status, length, body) = error_page(status);
        Self {
            status,
            minor_version: 1,
            headers: vec![
                ("Content-Length".to_string(), length.to_string()),
                ("Connection".to_string(), "close".to_string()),
                ("Content-Type".to_string(), "text/html".to_string()),
            ],
            body: Body::Bytes(body.as_bytes().to_vec()),
        }
    }

    /// Status line y headers, terminados en la línea vacía
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.{} {}\r\n", self.minor_version, self.status);

        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }

        head.push_str("\r\n");
        head.into_bytes()
    }

    /// Escribe la respuesta completa y consume el body
    pub fn write_to<W: Write>(self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.head_bytes())?;

        match self.body {
            Body::Empty => {}
            Body::Bytes(bytes) => writer.write_all(&bytes)?,
            Body::File(mut file) => {
                let mut chunk = [0u8; CHUNK_SIZE];
                loop {
                    let n = match file.read(&mut chunk) {
                        Ok(0) => break,
                        Ok(n) => n,
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => return Err(e),
                    };
                    writer.write_all(&chunk[..n])?;
                }
            }
        }

        writer.flush()
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Busca un header (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Headers en orden
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }
}

const BAD_REQUEST_PAGE: &str = "<html><head>\n<title>400 Bad Request</title>\n</head><body>\n<h1>Bad Request</h1>\nThe requested URL was not well formed.\n</body></html>\n";
const FORBIDDEN_PAGE: &str = "<html><head>\n<title>403 Forbidden</title>\n</head><body>\n<h1>Forbidden</h1>\nThe requested URL, file type or operation is not allowed on this webserver.\n</body></html>\n";
const NOT_FOUND_PAGE: &str = "<html><head>\n<title>404 Not Found</title>\n</head><body>\n<h1>Not Found</h1>\nThe requested URL was not found on this server.\n</body></html>\n";
const INTERNAL_ERROR_PAGE: &str = "<html><head>\n<title>500 Internal Server Error</title>\n</head><body>\n<h1>Server Error</h1>\nThere was an error while processing the request\n</body></html>\n";
const NOT_IMPLEMENTED_PAGE: &str = "<html><head>\n<title>501 Method Not Implemented</title>\n</head><body>\n<h1>Method Not Implemented</h1>\nThe requested method is not implemented\n</body></html>\n";

fn error_page(status: StatusCode) -> (StatusCode, usize, &'static str) {
    match status {
        StatusCode::BadRequest => (status, 133, BAD_REQUEST_PAGE),
        StatusCode::Forbidden => (status, 166, FORBIDDEN_PAGE),
        StatusCode::NotFound => (status, 138, NOT_FOUND_PAGE),
        StatusCode::NotImplemented => (status, 156, NOT_IMPLEMENTED_PAGE),
        StatusCode::InternalServerError | StatusCode::Ok => {
            (StatusCode::InternalServerError, 153, INTERNAL_ERROR_PAGE)
        }
    }
}
