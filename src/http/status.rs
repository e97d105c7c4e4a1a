//! # Códigos de Estado HTTP
//!
//! Este módulo define los códigos de estado que emite el servidor.
//! Solo hay un código de éxito; el resto corresponde a las cinco
//! páginas de error predefinidas:
//!
//! - **2xx**: Éxito (200 OK)
//! - **4xx**: Error del cliente (400, 403, 404)
//! - **5xx**: Error del servidor (500, 501)

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 400 Bad Request - Petición mal formada
    BadRequest = 400,

    /// 403 Forbidden - Ruta, tipo de archivo u operación no permitidos
    Forbidden = 403,

    /// 404 Not Found - Recurso no encontrado
    NotFound = 404,

    /// 500 Internal Server Error - Error interno del servidor
    InternalServerError = 500,

    /// 501 Not Implemented - Método HTTP no soportado
    NotImplemented = 501,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use cgi_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use cgi_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotImplemented.reason_phrase(), "Not Implemented");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }

    /// Verifica si el código indica éxito (2xx)
    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }

    /// Verifica si el código indica error del cliente (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del servidor (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_values() {
        assert_eq!(StatusCode::Ok.as_u16(), 200);
        assert_eq!(StatusCode::BadRequest.as_u16(), 400);
        assert_eq!(StatusCode::Forbidden.as_u16(), 403);
        assert_eq!(StatusCode::NotFound.as_u16(), 404);
        assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
        assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
    }

    #[test]
    fn test_is_client_error() {
        assert!(!StatusCode::Ok.is_client_error());
        assert!(StatusCode::BadRequest.is_client_error());
        assert!(StatusCode::Forbidden.is_client_error());
        assert!(!StatusCode::NotImplemented.is_client_error());
    }

    #[test]
    fn test_is_server_error() {
        assert!(!StatusCode::NotFound.is_server_error());
        assert!(StatusCode::InternalServerError.is_server_error());
        assert!(StatusCode::NotImplemented.is_server_error());
        assert!(StatusCode::Ok.is_success());
    }

    #[test]
    fn test_display() {
        assert_eq!(StatusCode::Ok.to_string(), "200 OK");
        assert_eq!(StatusCode::Forbidden.to_string(), "403 Forbidden");
        assert_eq!(StatusCode::NotImplemented.to_string(), "501 Not Implemented");
    }
}
