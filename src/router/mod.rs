//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa la tabla de rutas que mapea pares
//! (path normalizado, método) a handlers.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router::resolve → Handler → muta la Response
//! ```
//!
//! La búsqueda es por igualdad exacta y case-sensitive: sin wildcards, sin
//! prefijos, sin parámetros de ruta. Aparte del mapa hay un único handler
//! de fallback opcional para paths sin ruta registrada.
//!
//! La tabla se llena durante la configuración del servidor, antes de `run`,
//! y durante el servicio solo se lee: los lookups concurrentes no necesitan
//! locks.

use crate::http::{normalize_path, Method, Request, Response};
use std::collections::HashMap;

/// Tipo de función handler
///
/// Un handler recibe el Request parseado y muta la Response que el
/// dispatcher ya inicializó con sus valores por defecto. Puede ser una
/// función simple o un closure.
pub type Handler = Box<dyn Fn(&Request, &mut Response) + Send + Sync>;

/// Clave compuesta de búsqueda: (path normalizado, método)
///
/// La igualdad y el hash derivan de ambos campos. El path se normaliza al
/// construir la clave, así que dos registros equivalentes ("/foo" y
/// "//foo/") siempre producen la misma clave.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    path: String,
    method: String,
}

impl RouteKey {
    /// Construye una clave normalizando el path
    pub fn new(path: &str, method: &str) -> Self {
        Self {
            path: normalize_path(path),
            method: method.to_string(),
        }
    }
}

/// Router que mapea (path, método) a handlers
pub struct Router {
    /// Mapa de clave compuesta → handler
    routes: HashMap<RouteKey, Handler>,

    /// Handler de fallback para rutas no registradas
    not_found: Option<Handler>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            not_found: None,
        }
    }

    /// Registra una ruta con su handler
    ///
    /// El path se normaliza igual que en el parser. Registrar dos veces la
    /// misma clave sobreescribe en silencio: gana el último registro.
    ///
    /// # Ejemplo
    /// ```
    /// use monohttp::http::{Method, Request, Response};
    /// use monohttp::router::Router;
    ///
    /// let mut router = Router::new();
    /// router.register(Method::GET, "/hello", |_req: &Request, res: &mut Response| {
    ///     res.set_content("<h1>Hola</h1>");
    /// });
    /// ```
    pub fn register<F>(&mut self, method: Method, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.routes
            .insert(RouteKey::new(path, method.as_str()), Box::new(handler));
    }

    /// Define el handler de fallback, reemplazando el anterior si había
    pub fn set_not_found_handler<F>(&mut self, handler: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.not_found = Some(Box::new(handler));
    }

    /// Busca el handler registrado para (path, método)
    ///
    /// Lookup exacto. El path del caller ya viene normalizado (el parser
    /// normaliza al construir el Request); volver a normalizar aquí es
    /// idempotente.
    pub fn resolve(&self, path: &str, method: &str) -> Option<&Handler> {
        self.routes.get(&RouteKey::new(path, method))
    }

    /// Obtiene el handler de fallback, si fue definido
    pub fn not_found_handler(&self) -> Option<&Handler> {
        self.not_found.as_ref()
    }

    /// Cantidad de rutas registradas (sin contar el fallback)
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Verifica si no hay rutas registradas
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StatusCode;

    fn dummy_request(raw: &[u8]) -> Request {
        Request::parse(raw).unwrap()
    }

    fn invoke(router: &Router, path: &str, method: &str, raw: &[u8]) -> Response {
        let request = dummy_request(raw);
        let mut response = Response::new(StatusCode::Ok);
        let handler = router.resolve(path, method).expect("route should exist");
        handler(&request, &mut response);
        response
    }

    #[test]
    fn test_router_starts_empty() {
        let router = Router::new();
        assert!(router.is_empty());
        assert!(router.not_found_handler().is_none());
    }

    #[test]
    fn test_register_and_resolve() {
        let mut router = Router::new();
        router.register(Method::GET, "/test", |_req, res: &mut Response| {
            res.set_content("ok");
        });

        assert_eq!(router.len(), 1);
        assert!(router.resolve("/test", "GET").is_some());
    }

    #[test]
    fn test_resolve_missing_route() {
        let router = Router::new();
        assert!(router.resolve("/nonexistent", "GET").is_none());
    }

    #[test]
    fn test_resolve_distinguishes_methods() {
        let mut router = Router::new();
        router.register(Method::GET, "/resource", |_req, res: &mut Response| {
            res.set_content("get");
        });
        router.register(Method::POST, "/resource", |_req, res: &mut Response| {
            res.set_content("post");
        });

        let raw = b"GET /resource HTTP/1.1\r\n\r\n";
        let get = invoke(&router, "/resource", "GET", raw);
        let post = invoke(&router, "/resource", "POST", raw);

        assert_eq!(get.content(), "get");
        assert_eq!(post.content(), "post");
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let mut router = Router::new();
        router.register(Method::GET, "/Foo", |_req, _res: &mut Response| {});

        assert!(router.resolve("/Foo", "GET").is_some());
        assert!(router.resolve("/foo", "GET").is_none());
    }

    #[test]
    fn test_register_normalizes_path() {
        // Registrar "//foo/" y resolver "/foo" debe encontrar el handler
        let mut router = Router::new();
        router.register(Method::GET, "//foo/", |_req, res: &mut Response| {
            res.set_content("normalizado");
        });

        let raw = b"GET /foo HTTP/1.1\r\n\r\n";
        let response = invoke(&router, "/foo", "GET", raw);
        assert_eq!(response.content(), "normalizado");
    }

    #[test]
    fn test_duplicate_registration_last_wins() {
        let mut router = Router::new();
        router.register(Method::GET, "/foo", |_req, res: &mut Response| {
            res.set_content("first");
        });
        router.register(Method::GET, "/foo", |_req, res: &mut Response| {
            res.set_content("second");
        });

        assert_eq!(router.len(), 1);

        let raw = b"GET /foo HTTP/1.1\r\n\r\n";
        let response = invoke(&router, "/foo", "GET", raw);
        assert_eq!(response.content(), "second");
    }

    #[test]
    fn test_unknown_method_token_resolves_none() {
        let mut router = Router::new();
        router.register(Method::GET, "/foo", |_req, _res: &mut Response| {});

        // Un método que nadie registró nunca matchea
        assert!(router.resolve("/foo", "BREW").is_none());
    }

    #[test]
    fn test_not_found_handler_replaceable() {
        let mut router = Router::new();
        router.set_not_found_handler(|_req, res: &mut Response| {
            res.set_content("first");
        });
        router.set_not_found_handler(|_req, res: &mut Response| {
            res.set_content("second");
        });

        let request = dummy_request(b"GET /missing HTTP/1.1\r\n\r\n");
        let mut response = Response::new(StatusCode::Ok);
        let handler = router.not_found_handler().expect("fallback should exist");
        handler(&request, &mut response);

        assert_eq!(response.content(), "second");
    }

    #[test]
    fn test_route_key_equivalence() {
        assert_eq!(RouteKey::new("//foo/", "GET"), RouteKey::new("/foo", "GET"));
        assert_ne!(RouteKey::new("/foo", "GET"), RouteKey::new("/foo", "POST"));
        assert_ne!(RouteKey::new("/foo", "GET"), RouteKey::new("/bar", "GET"));
    }
}
