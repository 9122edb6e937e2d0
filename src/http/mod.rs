//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Este módulo implementa el subconjunto del protocolo HTTP/1.1 que usa el
//! servidor, sin librerías de alto nivel. Incluye:
//!
//! - Parsing de requests
//! - Construcción y serialización de responses
//! - Manejo de status codes
//! - Normalización de paths
//!
//! El servidor soporta exactamente un intercambio request-response por
//! conexión: sin keep-alive, sin chunked transfer encoding, sin streaming.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! Another-Header: Value\r\n
//! \r\n
//! [body]
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! \r\n
//! <h1>Hello!</h1>
//! ```

pub mod method;    // Tokens de métodos HTTP
pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
// Esto permite usar `http::Request` en vez de `http::request::Request`
pub use method::Method;
pub use request::{normalize_path, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;

/// Separador de líneas del protocolo
pub const CRLF: &str = "\r\n";

/// Separador entre headers y body
pub const DOUBLE_CRLF: &str = "\r\n\r\n";
