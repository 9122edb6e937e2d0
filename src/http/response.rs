//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Este módulo proporciona la respuesta mutable que los handlers construyen
//! de forma incremental, y su serialización a bytes para enviar al cliente.
//!
//! ## Formato de una respuesta
//!
//! La serialización emite exactamente tres headers y nada más (sin `Date`,
//! sin `Server`, sin `Connection`): es una restricción de minimalismo
//! deliberada del protocolo del servidor.
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 15\r\n
//! \r\n
//! <h1>Hello!</h1>
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use monohttp::http::{Response, StatusCode};
//!
//! let mut response = Response::new(StatusCode::Ok);
//! response.set_content_type("text/plain");
//! response.write("Hello");
//! response.write(", World!");
//!
//! let bytes = response.to_bytes();
//! // Ahora puedes enviar `bytes` por el socket
//! ```

use super::{StatusCode, CRLF, DOUBLE_CRLF};

/// Representa una respuesta HTTP/1.1 completa
///
/// Mutable: el handler la recibe con los valores por defecto del dispatcher
/// y puede sobreescribir status, content type y contenido.
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado (200 OK, 404 Not Found, etc.)
    status: StatusCode,

    /// Valor del header Content-Type
    content_type: String,

    /// Contenido acumulado del body
    content: String,
}

impl Response {
    /// Crea una nueva respuesta con el código de estado especificado
    ///
    /// Por defecto el content type es `text/html` y el contenido está vacío.
    ///
    /// # Ejemplo
    /// ```
    /// use monohttp::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok);
    /// assert_eq!(response.content_type(), "text/html");
    /// assert_eq!(response.content(), "");
    /// ```
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: "text/html".to_string(),
            content: String::new(),
        }
    }

    /// Agrega texto al final del contenido acumulado
    ///
    /// # Ejemplo
    /// ```
    /// use monohttp::http::{Response, StatusCode};
    ///
    /// let mut response = Response::new(StatusCode::Ok);
    /// response.write("hola");
    /// response.write(" mundo");
    /// assert_eq!(response.content(), "hola mundo");
    /// ```
    pub fn write(&mut self, text: &str) {
        self.content.push_str(text);
    }

    /// Reemplaza el código de estado
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Reemplaza el content type
    pub fn set_content_type(&mut self, content_type: &str) {
        self.content_type = content_type.to_string();
    }

    /// Reemplaza el contenido completo, descartando lo acumulado
    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene el content type actual
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Obtiene el contenido acumulado
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// El `Content-Length` se calcula aquí, en el momento de serializar,
    /// a partir del largo en bytes del contenido actual.
    ///
    /// # Ejemplo
    /// ```
    /// use monohttp::http::{Response, StatusCode};
    ///
    /// let mut response = Response::new(StatusCode::Ok);
    /// response.set_content("Test");
    ///
    /// let bytes = response.to_bytes();
    /// let text = String::from_utf8(bytes).unwrap();
    /// assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    /// assert!(text.contains("Content-Length: 4\r\n"));
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        format!(
            "HTTP/1.1 {}{}Content-Type: {}{}Content-Length: {}{}{}",
            self.status,
            CRLF,
            self.content_type,
            CRLF,
            self.content.len(),
            DOUBLE_CRLF,
            self.content,
        )
        .into_bytes()
    }
}
