//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Este módulo implementa el parser de requests desde cero.
//!
//! ## Formato de un Request HTTP/1.1
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! User-Agent: curl/7.68.0\r\n
//! \r\n
//! [body]
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path HTTP/1.1`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: opcional, texto después de la línea en blanco
//!
//! El buffer de lectura es de tamaño fijo, así que el parser primero
//! descarta el padding de bytes nulos que queda al final.

use super::{CRLF, DOUBLE_CRLF};
use std::collections::HashMap;

/// Normaliza un path: recorta `/` de ambos extremos y antepone exactamente uno
///
/// La operación es idempotente: normalizar un path ya normalizado lo deja
/// igual.
///
/// # Ejemplo
/// ```
/// use monohttp::http::normalize_path;
///
/// assert_eq!(normalize_path(""), "/");
/// assert_eq!(normalize_path("foo/"), "/foo");
/// assert_eq!(normalize_path("//foo/"), "/foo");
/// ```
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}

/// Representa un request HTTP/1.1 parseado
///
/// Inmutable una vez construido: solo expone accessors.
#[derive(Debug, Clone)]
pub struct Request {
    /// Token del método (ej: "GET")
    ///
    /// Se conserva como string crudo: un método desconocido no es un error
    /// de parseo, simplemente no va a coincidir con ninguna ruta.
    method: String,

    /// Path normalizado de la petición (ej: "/hello")
    path: String,

    /// Versión HTTP: los dígitos después de "HTTP/" (ej: "1.1")
    version: String,

    /// Headers HTTP (ej: {"Host": "localhost:8080"})
    ///
    /// Con claves duplicadas gana la última; el orden no se conserva.
    headers: HashMap<String, String>,

    /// Body del request, vacío si no hay
    body: String,
}

/// Errores que pueden ocurrir durante el parsing
///
/// Cada variante conserva la línea o token ofensivo para diagnóstico.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request line sin exactamente 3 tokens separados por espacio
    InvalidRequestLine(String),

    /// Token de versión sin el formato `HTTP/<versión>`
    InvalidVersion(String),

    /// Línea de header sin exactamente un separador `": "`
    InvalidHeader(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidRequestLine(line) => write!(f, "Invalid request line: '{}'", line),
            ParseError::InvalidVersion(token) => write!(f, "Invalid HTTP version: '{}'", token),
            ParseError::InvalidHeader(line) => write!(f, "Invalid header: '{}'", line),
        }
    }
}

impl std::error::Error for ParseError {}

impl Request {
    /// Parsea un request HTTP/1.1 desde bytes
    ///
    /// # Argumentos
    ///
    /// * `buffer` - Buffer de lectura completo, incluido el padding de nulos
    ///
    /// # Retorna
    ///
    /// * `Ok(Request)` - Request parseado exitosamente
    /// * `Err(ParseError)` - Error durante el parsing
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use monohttp::http::Request;
    ///
    /// let raw = b"GET /hello HTTP/1.1\r\nHost: x\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.path(), "/hello");
    /// assert_eq!(request.version(), "1.1");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        // Decodificación tolerante: el wire es ASCII en la práctica, y el
        // request line rechaza igualmente cualquier basura binaria
        let text = String::from_utf8_lossy(buffer);

        // Descartar el padding de nulos del buffer de tamaño fijo
        let text = text.trim_matches('\0');

        // Separar por \r\n para obtener líneas
        let lines: Vec<&str> = text.split(CRLF).collect();

        // 1. Parsear la request line (primera línea)
        let (method, path, version) = Self::parse_request_line(lines[0])?;

        // 2. Parsear headers (resto de líneas hasta la línea vacía)
        let headers = Self::parse_headers(&lines[1..])?;

        // 3. Extraer el body
        let body = Self::parse_body(text);

        Ok(Request {
            method,
            path,
            version,
            headers,
            body,
        })
    }

    /// Parsea la request line (primera línea del request)
    ///
    /// Formato: `GET /path HTTP/1.1`
    fn parse_request_line(line: &str) -> Result<(String, String, String), ParseError> {
        let tokens: Vec<&str> = line.split(' ').collect();

        // Debe tener exactamente 3 partes: METHOD PATH VERSION
        if tokens.len() != 3 {
            return Err(ParseError::InvalidRequestLine(line.to_string()));
        }

        let method = tokens[0].to_string();
        let path = normalize_path(tokens[1]);

        // El token de versión se separa en "HTTP" y los dígitos
        let version_tokens: Vec<&str> = tokens[2].split('/').collect();

        if version_tokens.len() != 2 {
            return Err(ParseError::InvalidVersion(tokens[2].to_string()));
        }

        Ok((method, path, version_tokens[1].to_string()))
    }

    /// Parsea los headers HTTP
    ///
    /// Cada header tiene formato `Name: Value`, con el separador `": "`
    /// literal: un `:` sin espacio es un header malformado. Es una decisión
    /// de estrictez conocida, no un descuido.
    fn parse_headers(lines: &[&str]) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            // La línea vacía marca el fin de los headers
            if line.is_empty() {
                break;
            }

            let parts: Vec<&str> = line.split(": ").collect();

            if parts.len() != 2 {
                return Err(ParseError::InvalidHeader(line.to_string()));
            }

            // Claves duplicadas: gana la última
            headers.insert(parts[0].to_string(), parts[1].to_string());
        }

        Ok(headers)
    }

    /// Extrae el body del request
    ///
    /// El re-split sobre el doble CRLF es la fuente autoritativa del body,
    /// independiente del loop de headers: contenido anterior a la primera
    /// línea en blanco nunca se considera body.
    fn parse_body(text: &str) -> String {
        match text.trim().split(DOUBLE_CRLF).nth(1) {
            Some(section) => section.trim().to_string(),
            None => String::new(),
        }
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el token del método HTTP
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Obtiene el path normalizado del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la versión HTTP (ej: "1.1")
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico
    ///
    /// # Ejemplo
    /// ```
    /// use monohttp::http::Request;
    ///
    /// let raw = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.header("Host"), Some("localhost"));
    /// assert_eq!(request.header("Missing"), None);
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene el body del request, vacío si no hay
    pub fn body(&self) -> &str {
        &self.body
    }
}
