//! HTTP-поверхность (tiny_http).
//!
//! Раскладка:
//! - mod.rs      — контекст, bind/run, рендер ответов
//! - handlers.rs — обработчики /pfs/<path>, /commit, /branch, /ping, /metrics
//! - params.rs   — разбор query-строки и percent-декодирование
//!
//! Каждый принятый запрос обслуживается отдельным потоком. Ядро между
//! запросами ничего не синхронизирует; перекрёстные гарантии даёт только
//! атомарность отдельных операций примитива (plus опциональные branch locks).
//!
//! Ошибки ядра логируются здесь один раз — в точке обнаружения — и уходят
//! клиенту тем же текстом со статусом из StoreError::http_status().

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;

use log::{debug, error};
use tiny_http::{Header, Response, Server, StatusCode};

use crate::errors::{Result, StoreError};
use crate::metrics;
use crate::repo::Repository;
use crate::stream::ChunkStream;

mod handlers;
mod params;

/// Per-process server context, built once at startup and shared across
/// request threads behind an Arc.
pub struct ServerCtx {
    pub repo: Repository,
}

/// Handler outcome; rendering happens in one place (`handle`).
enum Reply {
    /// 200 with a small text body.
    Text(String),
    /// 200 with a streamed body of unknown length.
    Stream(ChunkStream),
    /// 200 Prometheus text exposition.
    Metrics(String),
    /// Unknown endpoint.
    NoRoute,
}

pub struct HttpServer {
    inner: Server,
    ctx: Arc<ServerCtx>,
}

impl HttpServer {
    pub fn bind(addr: &str, ctx: ServerCtx) -> Result<Self> {
        let inner = Server::http(addr).map_err(|e| {
            StoreError::io(
                format!("bind http at {}", addr),
                io::Error::new(io::ErrorKind::AddrInUse, e.to_string()),
            )
        })?;
        Ok(HttpServer {
            inner,
            ctx: Arc::new(ctx),
        })
    }

    /// Bound socket address (useful when binding port 0).
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.inner.server_addr().to_ip()
    }

    /// Accept loop: one spawned thread per request. Never returns normally.
    pub fn run(self) -> Result<()> {
        loop {
            let rq = match self.inner.recv() {
                Ok(rq) => rq,
                Err(e) => {
                    error!("http recv error: {}", e);
                    continue;
                }
            };
            let ctx = Arc::clone(&self.ctx);
            thread::spawn(move || handle(&ctx, rq));
        }
    }
}

fn handle(ctx: &ServerCtx, mut rq: tiny_http::Request) {
    metrics::record_request();
    let method = rq.method().as_str().to_string();
    let url = rq.url().to_string();
    debug!("{} {}", method, url);

    match handlers::route(ctx, &mut rq, &method, &url) {
        Ok(Reply::Text(body)) => {
            let _ = rq.respond(Response::from_string(body));
        }
        Ok(Reply::Stream(body)) => {
            let _ = rq.respond(Response::new(StatusCode(200), Vec::new(), body, None, None));
        }
        Ok(Reply::Metrics(body)) => {
            let mut resp = Response::from_string(body);
            if let Ok(ct) = Header::from_bytes(b"Content-Type", b"text/plain; version=0.0.4") {
                resp.add_header(ct);
            }
            let _ = rq.respond(resp);
        }
        Ok(Reply::NoRoute) => {
            let _ = rq.respond(Response::from_string("not found\n").with_status_code(404));
        }
        Err(e) => {
            metrics::record_request_failed();
            error!("{} {}: {}", method, url, e);
            let resp =
                Response::from_string(format!("{}\n", e)).with_status_code(e.http_status());
            let _ = rq.respond(resp);
        }
    }
}
