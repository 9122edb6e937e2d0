//! # monohttp
//! src/lib.rs
//!
//! Servidor HTTP/1.1 minimalista implementado desde cero: acepta conexiones
//! TCP, parsea exactamente un request por conexión, lo despacha a un handler
//! registrado por (método, path) y escribe la respuesta serializada antes de
//! cerrar la conexión.
//!
//! ## Arquitectura
//!
//! El crate está dividido en módulos especializados:
//! - `http`: Parsing de requests y serialización de responses HTTP/1.1
//! - `router`: Tabla de rutas (path normalizado, método) → handler
//! - `server`: Listener TCP y manejo concurrente de conexiones
//! - `config`: Configuración vía CLI y variables de entorno
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use monohttp::config::Config;
//! use monohttp::http::{Request, Response};
//! use monohttp::server::Server;
//!
//! let mut server = Server::new(Config::default());
//!
//! server.get("/hello", |_req: &Request, res: &mut Response| {
//!     res.set_content("<h1>Hello!</h1>");
//! });
//!
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod http;
pub mod router;
pub mod server;
