//! # monohttp - Entry Point
//! src/main.rs
//!
//! Punto de entrada del binario demo: registra un puñado de handlers de
//! ejemplo y arranca el servidor. Toda la lógica vive en la librería.

use monohttp::config::Config;
use monohttp::http::{Request, Response, StatusCode};
use monohttp::server::Server;
use serde::Serialize;

/// Payload del endpoint /status
#[derive(Serialize)]
struct ServerStatus {
    status: &'static str,
    version: &'static str,
    server: &'static str,
}

fn hello_handler(_req: &Request, res: &mut Response) {
    res.set_content("<h1>Hello!</h1>");
}

fn status_handler(_req: &Request, res: &mut Response) {
    let status = ServerStatus {
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        server: "monohttp",
    };

    match serde_json::to_string_pretty(&status) {
        Ok(body) => {
            res.set_content_type("application/json");
            res.set_content(&body);
        }
        Err(_) => {
            res.set_status(StatusCode::InternalServerError);
        }
    }
}

fn echo_handler(req: &Request, res: &mut Response) {
    res.set_content_type("text/plain");
    res.write(req.method());
    res.write(" ");
    res.write(req.path());
    res.write("\n");
    res.write(req.body());
}

fn not_found_handler(req: &Request, res: &mut Response) {
    res.set_status(StatusCode::NotFound);
    res.write("<h1>404 - No existe la ruta ");
    res.write(req.path());
    res.write("</h1>");
}

fn main() {
    println!("=================================");
    println!("  monohttp - Servidor HTTP/1.1");
    println!("=================================\n");

    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    let mut server = Server::new(config);

    server.get("/hello", hello_handler);
    server.get("/status", status_handler);
    server.post("/echo", echo_handler);
    server.set_not_found_handler(not_found_handler);

    // Iniciar el servidor (esto bloquea el thread para siempre)
    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
