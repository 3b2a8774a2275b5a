// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use vino::api::ApiClient;
use vino::config::Config;
use vino::models::{Session, User};
use vino::store::DataStore;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path including the query string.
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn route(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

type Handler = dyn Fn(&str, &str) -> (u16, String) + Send + Sync;

pub struct Backend {
    pub url: String,
    pub requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Backend {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, route: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.route() == route)
            .count()
    }

    pub fn writes(&self) -> Vec<Recorded> {
        self.requests().into_iter().filter(|r| r.method != "GET").collect()
    }
}

/// Serves every connection with `handler(method, route)`; one request per
/// connection.
pub fn serve<F>(handler: F) -> Backend
where
    F: Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    let handler: Arc<Handler> = Arc::new(handler);
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            let log = Arc::clone(&log);
            let handler = Arc::clone(&handler);
            thread::spawn(move || handle(stream, &log, handler.as_ref()));
        }
    });
    Backend { url, requests }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        409 => "Conflict",
        _ => "Internal Server Error",
    }
}

fn handle(mut stream: TcpStream, log: &Mutex<Vec<Recorded>>, handler: &Handler) {
    stream.set_read_timeout(Some(Duration::from_secs(5))).ok();
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut first = lines.next().unwrap_or_default().split_whitespace();
    let method = first.next().unwrap_or_default().to_string();
    let path = first.next().unwrap_or_default().to_string();
    let mut content_length = 0usize;
    let mut authorization = None;
    for line in lines {
        if let Some((k, v)) = line.split_once(':') {
            match k.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = v.trim().parse().unwrap_or(0),
                "authorization" => authorization = Some(v.trim().to_string()),
                _ => {}
            }
        }
    }
    while buf.len() < header_end + content_length {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    let route = path.split('?').next().unwrap_or_default().to_string();
    log.lock().unwrap().push(Recorded {
        method: method.clone(),
        path,
        authorization,
        body,
    });

    let (status, payload) = handler(&method, &route);
    let resp = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        payload.len(),
        payload
    );
    stream.write_all(resp.as_bytes()).ok();
    stream.flush().ok();
}

pub const CATEGORIAS: &str = r##"[
    {"id": 1, "nombre": "Comida", "icon": "🍔", "color": "#ef4444"},
    {"id": 2, "nombre": "Transporte"}
]"##;

pub const SUBCATEGORIAS: &str = r#"[
    {"id": 10, "categoria_id": 1, "nombre": "Super"},
    {"id": 11, "categoria_id": 1, "nombre": "Restaurantes"},
    {"id": 20, "categoria_id": 2, "nombre": "Nafta"}
]"#;

pub const COMERCIOS: &str = r#"[
    {"id": "m1", "name": "Coto", "defaultCategoryId": 1, "defaultSubcategoryId": 10}
]"#;

pub const REGLAS: &str = r#"[
    {"id": "r1", "comercio": "coto", "categoria_id": 1, "subcategoria_id": 10},
    {"id": "r2", "comercio": "YPF Centro", "categoria_id": 2, "subcategoria_id": 20}
]"#;

pub const PRESUPUESTOS: &str = r#"[
    {"id": "b1", "mes_anio": "2/2026", "categoria_id": 1, "subcategoria_id": "", "monto": "1,000.00"},
    {"id": "b2", "mes_anio": "2026-2", "categoria_id": 1, "subcategoria_id": 10, "monto": "400"}
]"#;

pub const MOVIMIENTOS: &str = r#"{
    "items": [
        {"id": "t1", "fecha": "2026-02-10", "tipo": "Gasto", "monto": 300, "comercio": "Coto", "categoria": "comida", "subcategoria": "super"},
        {"id": "t2", "fecha": "2026-02-12", "tipo": "Gasto", "monto": 150, "comercio": "", "descripcion": "Cena", "categoria": "Comida", "subcategoria": "Restaurantes"},
        {"id": "t3", "fecha": "2026-01-05", "tipo": "Gasto", "monto": 80, "comercio": "Coto", "categoria": "Comida", "subcategoria": "Super"},
        {"id": "t4", "fecha": "2026-02-01", "tipo": "Ingreso", "monto": 5000, "comercio": "", "descripcion": "Sueldo", "categoria": "Otros", "subcategoria": ""},
        {"id": "t5", "fecha": "2026-02-15", "tipo": "Gasto", "monto": 60, "comercio": "YPF Centro", "categoria": "Transporte", "subcategoria": "Nafta"}
    ],
    "page": 1,
    "limit": 5000,
    "total": 5
}"#;

/// Collections every refresh reads; `None` for anything else.
pub fn fixture(method: &str, route: &str) -> Option<(u16, String)> {
    if method != "GET" {
        return None;
    }
    let body = match route {
        "/categorias" => CATEGORIAS,
        "/subcategorias" => SUBCATEGORIAS,
        "/comercios" => COMERCIOS,
        "/reglas" => REGLAS,
        "/presupuestos" => PRESUPUESTOS,
        "/movimientos" => MOVIMIENTOS,
        _ => return None,
    };
    Some((200, body.to_string()))
}

/// Fixture collections; every write succeeds with an empty object.
pub fn fixture_backend() -> Backend {
    serve(|method, route| fixture(method, route).unwrap_or((200, "{}".to_string())))
}

pub fn session() -> Session {
    Session {
        token: "tok-123".to_string(),
        user: User {
            id: "7".to_string(),
            name: "Ana Paz".to_string(),
            email: "ana@example.com".to_string(),
        },
    }
}

/// Signed-in store against `backend`, already refreshed.
pub fn store_for(backend: &Backend) -> DataStore {
    let api = ApiClient::new(&backend.url).unwrap();
    let mut store = DataStore::new(api, Config::default());
    store.set_session(session());
    store.refresh();
    store
}
