//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP que maneja múltiples conexiones
//! simultáneas usando threads. Cada conexión se procesa en su propio thread
//! y soporta exactamente un intercambio request-response.
//!
//! ## Ciclo de vida de una conexión
//!
//! ```text
//! accept → read → parse → resolve → handler → serialize → write → close
//! ```
//!
//! Un fallo manejando una conexión nunca afecta a las demás ni al loop de
//! accept.

use crate::config::Config;
use crate::http::{Method, Request, Response, StatusCode};
use crate::router::Router;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Tamaño fijo del buffer de lectura por conexión
///
/// Hay una única lectura por conexión: un request más largo que el buffer
/// queda truncado en silencio. Es un límite de capacidad conocido.
pub const READ_BUFFER_SIZE: usize = 2048;

/// Servidor HTTP/1.1 concurrente
///
/// Las rutas se registran antes de llamar a `run`; después el router es de
/// solo lectura y se comparte entre threads sin locks.
pub struct Server {
    config: Config,
    router: Router,
}

impl Server {
    /// Crea un servidor sin rutas registradas
    pub fn new(config: Config) -> Self {
        Self {
            config,
            router: Router::new(),
        }
    }

    /// Registra una ruta para un método arbitrario
    ///
    /// El último registro para una misma (ruta, método) gana en silencio.
    pub fn register<F>(&mut self, method: Method, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.router.register(method, path, handler);
    }

    /// Registra una ruta GET
    pub fn get<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.register(Method::GET, path, handler);
    }

    /// Registra una ruta POST
    pub fn post<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.register(Method::POST, path, handler);
    }

    /// Registra una ruta PUT
    pub fn put<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.register(Method::PUT, path, handler);
    }

    /// Registra una ruta DELETE
    pub fn delete<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.register(Method::DELETE, path, handler);
    }

    /// Registra una ruta CONNECT
    pub fn connect<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.register(Method::CONNECT, path, handler);
    }

    /// Registra una ruta OPTIONS
    pub fn options<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.register(Method::OPTIONS, path, handler);
    }

    /// Registra una ruta TRACE
    pub fn trace<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.register(Method::TRACE, path, handler);
    }

    /// Registra una ruta PATCH
    pub fn patch<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.register(Method::PATCH, path, handler);
    }

    /// Define el handler de fallback para rutas no registradas
    pub fn set_not_found_handler<F>(&mut self, handler: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.router.set_not_found_handler(handler);
    }

    /// Inicia el servidor y atiende conexiones para siempre
    ///
    /// Consume el servidor: después de `run` ya no se pueden registrar
    /// rutas, lo que garantiza que el router es inmutable durante el
    /// servicio.
    ///
    /// # Errores
    ///
    /// Un fallo de bind es fatal y se retorna de inmediato: el servidor
    /// nunca llega a aceptar conexiones.
    pub fn run(self) -> std::io::Result<()> {
        let address = self.config.address();
        println!("[*] Iniciando servidor en {}", address);

        let listener = TcpListener::bind(&address)?;
        println!("[+] Servidor escuchando en {}", address);
        println!("[*] Rutas registradas: {}", self.router.len());
        println!("[*] Modo concurrente: un thread por conexión\n");

        let router = Arc::new(self.router);

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&router);

                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection(stream, router) {
                            eprintln!("   ❌ Error en la conexión: {}", e);
                        }
                    });
                }
                Err(e) => {
                    eprintln!("   ❌ Error al aceptar conexión: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Maneja una conexión: un request, una response, cerrar
    fn handle_connection(mut stream: TcpStream, router: Arc<Router>) -> std::io::Result<()> {
        let start = Instant::now();

        let peer_addr = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Lectura única sobre el buffer fijo
        let mut buffer = [0u8; READ_BUFFER_SIZE];
        let bytes_read = stream.read(&mut buffer)?;

        if bytes_read == 0 {
            // El peer cerró sin enviar nada
            return Ok(());
        }

        // Política base ante un request malformado: abandonar la conexión
        // sin escribir respuesta
        let request = match Request::parse(&buffer) {
            Ok(request) => request,
            Err(e) => {
                println!("   ❌ Request inválido desde {}: {}", peer_addr, e);
                return Ok(());
            }
        };

        let response = match router.resolve(request.path(), request.method()) {
            Some(handler) => {
                // Ruta encontrada: el status arranca en 200 OK y el handler
                // puede sobreescribir status, content type y contenido
                let mut response = Response::new(StatusCode::Ok);
                handler(&request, &mut response);
                response
            }
            None => match router.not_found_handler() {
                Some(handler) => {
                    // El fallback corre con el mismo default de 200 OK y
                    // acceso completo a la response
                    let mut response = Response::new(StatusCode::Ok);
                    handler(&request, &mut response);
                    response
                }
                None => Response::new(StatusCode::NotFound),
            },
        };

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        let latency = start.elapsed();
        let marker = if response.status().is_success() { "✅" } else { "❌" };
        println!(
            "   {} {} {} -> {} ({:.2}ms) [{}]",
            marker,
            request.method(),
            request.path(),
            response.status(),
            latency.as_secs_f64() * 1000.0,
            peer_addr
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{TcpListener, TcpStream};
    use std::time::Duration;

    fn ephemeral_listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").expect("bind")
    }

    /// Helper: atiende una conexión con el router dado y retorna lo que el
    /// cliente recibió (vacío si el servidor cortó sin responder)
    fn exchange(router: Router, raw: &[u8]) -> String {
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();
        let router = Arc::new(router);

        let t = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            Server::handle_connection(stream, router).unwrap();
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        client.write_all(raw).unwrap();
        client.shutdown(std::net::Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();

        t.join().unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_handle_connection_found_route() {
        let mut router = Router::new();
        router.register(Method::GET, "/hola", |_req, res: &mut Response| {
            res.set_content_type("text/plain");
            res.write("hola");
        });

        let text = exchange(router, b"GET /hola HTTP/1.1\r\nHost: x\r\n\r\n");

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.contains("Content-Length: 4\r\n"));
        assert!(text.ends_with("\r\n\r\nhola"));
    }

    #[test]
    fn test_handle_connection_handler_overrides_defaults() {
        let mut router = Router::new();
        router.register(Method::POST, "/create", |_req, res: &mut Response| {
            res.set_status(StatusCode::Created);
            res.set_content_type("application/json");
            res.set_content(r#"{"created": true}"#);
        });

        let text = exchange(router, b"POST /create HTTP/1.1\r\n\r\n");

        assert!(text.starts_with("HTTP/1.1 201 Created\r\n"));
        assert!(text.contains("Content-Type: application/json\r\n"));
        assert!(text.contains(r#"{"created": true}"#));
    }

    #[test]
    fn test_handle_connection_default_not_found() {
        // Sin ruta y sin fallback: 404 fijo con content type text/html y
        // contenido vacío
        let router = Router::new();

        let text = exchange(router, b"GET /missing HTTP/1.1\r\n\r\n");

        assert_eq!(
            text,
            "HTTP/1.1 404 Not Found\r\nContent-Type: text/html\r\nContent-Length: 0\r\n\r\n"
        );
    }

    #[test]
    fn test_handle_connection_fallback_defaults_to_ok() {
        // El fallback corre con el default de 200 OK, igual que una ruta
        // encontrada
        let mut router = Router::new();
        router.set_not_found_handler(|_req, res: &mut Response| {
            res.write("fallback");
        });

        let text = exchange(router, b"GET /missing HTTP/1.1\r\n\r\n");

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("fallback"));
    }

    #[test]
    fn test_handle_connection_fallback_can_override_status() {
        let mut router = Router::new();
        router.set_not_found_handler(|req, res: &mut Response| {
            res.set_status(StatusCode::NotFound);
            res.write("no existe: ");
            res.write(req.path());
        });

        let text = exchange(router, b"GET /missing HTTP/1.1\r\n\r\n");

        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.ends_with("no existe: /missing"));
    }

    #[test]
    fn test_handle_connection_parse_error_drops_connection() {
        // Request malformado: la conexión se corta sin escribir nada
        let router = Router::new();

        let text = exchange(router, b"BADLINE\r\n\r\n");

        assert_eq!(text, "");
    }

    #[test]
    fn test_handle_connection_normalization_equivalence() {
        // Ruta registrada con slashes de sobra, request con path limpio
        let mut router = Router::new();
        router.register(Method::GET, "//foo/", |_req, res: &mut Response| {
            res.set_content("ok");
        });

        let text = exchange(router, b"GET /foo HTTP/1.1\r\n\r\n");
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));

        // Y al revés: request con slashes de sobra también matchea
        let mut router = Router::new();
        router.register(Method::GET, "/foo", |_req, res: &mut Response| {
            res.set_content("ok");
        });

        let text = exchange(router, b"GET //foo/ HTTP/1.1\r\n\r\n");
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    }

    #[test]
    fn test_handle_connection_echoes_request_data() {
        let mut router = Router::new();
        router.register(Method::POST, "/echo", |req, res: &mut Response| {
            res.set_content_type("text/plain");
            res.write(req.method());
            res.write(" ");
            res.write(req.path());
            res.write(" ");
            res.write(req.body());
        });

        let text = exchange(router, b"POST /echo/ HTTP/1.1\r\n\r\nhi there");

        assert!(text.ends_with("POST /echo hi there"));
    }

    #[test]
    fn test_handle_connection_peer_closed_immediately() {
        // Cubre la rama bytes_read == 0
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();
        let router = Arc::new(Router::new());

        let t = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            // El peer no envía nada: el read retorna 0 y la función debe
            // terminar Ok(()) sin escribir respuesta
            Server::handle_connection(stream, router).unwrap();
        });

        let client = TcpStream::connect(addr).unwrap();
        client.shutdown(std::net::Shutdown::Write).unwrap();

        t.join().unwrap();
    }

    #[test]
    fn test_server_registration_api() {
        let mut server = Server::new(Config::default());
        server.get("/a", |_req, _res: &mut Response| {});
        server.post("/a", |_req, _res: &mut Response| {});
        server.put("/a", |_req, _res: &mut Response| {});
        server.delete("/a", |_req, _res: &mut Response| {});
        server.connect("/a", |_req, _res: &mut Response| {});
        server.options("/a", |_req, _res: &mut Response| {});
        server.trace("/a", |_req, _res: &mut Response| {});
        server.patch("/a", |_req, _res: &mut Response| {});

        assert_eq!(server.router.len(), 8);
        assert!(server.router.resolve("/a", "GET").is_some());
        assert!(server.router.resolve("/a", "PATCH").is_some());
        assert!(server.router.resolve("/b", "GET").is_none());
    }
}
