//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Códigos de estado que el servidor y sus handlers pueden emitir. El
//! dispatcher solo necesita 200 y 404; el resto queda disponible para los
//! handlers de usuario.

/// Representa los códigos de estado HTTP que soporta el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 201 Created - Recurso creado
    Created = 201,

    /// 204 No Content - Petición exitosa sin contenido en el body
    NoContent = 204,

    /// 400 Bad Request - Parámetros inválidos o malformados
    BadRequest = 400,

    /// 404 Not Found - Ruta o recurso no encontrado
    NotFound = 404,

    /// 405 Method Not Allowed - Método no soportado para la ruta
    MethodNotAllowed = 405,

    /// 500 Internal Server Error - Error interno del servidor
    InternalServerError = 500,

    /// 503 Service Unavailable - Servidor sobrecargado
    ServiceUnavailable = 503,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use monohttp::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use monohttp::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// Verifica si el código indica éxito (2xx)
    ///
    /// # Ejemplo
    /// ```
    /// use monohttp::http::StatusCode;
    /// assert!(StatusCode::Ok.is_success());
    /// assert!(!StatusCode::NotFound.is_success());
    /// ```
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.as_u16())
    }
}

impl std::fmt::Display for StatusCode {
    /// Formatea el código como texto de status line
    ///
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
