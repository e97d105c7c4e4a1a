//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP que maneja múltiples conexiones
//! simultáneas usando threads. Cada conexión se procesa en su propio
//! thread, que nunca se espera (join) desde el bucle de accept.
//!
//! El número de threads vivos está acotado por `max_clients`: cuando se
//! alcanza, el bucle de accept espera a que termine alguno. Cada socket
//! lleva un timeout de lectura, así un cliente que no envía nada acaba
//! recibiendo un 400 y libera su hueco.

use super::limiter::ConnectionLimiter;
use crate::config::ServerConfig;
use crate::error::HttpError;
use crate::http::{read_request, ParsedRequest, Response};
use crate::router::Router;
use std::io::{self, Read};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, info_span, warn};

/// Tiempo máximo esperando a que el cliente cierre tras la respuesta
const LINGER_TIMEOUT: Duration = Duration::from_millis(500);

/// Bytes que se descartan como mucho al cerrar
const LINGER_MAX_BYTES: usize = 64 * 1024;

/// Servidor HTTP/1.x concurrente
pub struct Server {
    config: Arc<ServerConfig>,
    router: Arc<Router>,
    limiter: ConnectionLimiter,
    listener: Option<TcpListener>,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        let config = Arc::new(config);
        let limiter = ConnectionLimiter::new(config.max_clients);

        Self {
            router: Arc::new(Router::new(Arc::clone(&config))),
            config,
            limiter,
            listener: None,
        }
    }

    /// Abre el socket de escucha (si no estaba abierto) y retorna su dirección
    pub fn bind(&mut self) -> io::Result<SocketAddr> {
        if let Some(listener) = &self.listener {
            return listener.local_addr();
        }

        let address = self.config.address();
        let listener = TcpListener::bind(&address)?;
        let local = listener.local_addr()?;
        info!("servidor escuchando en {}", local);

        self.listener = Some(listener);
        Ok(local)
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Workers vivos en este momento
    pub fn active_connections(&self) -> usize {
        self.limiter.active()
    }

    /// Bucle de accept. Solo retorna si falla el bind.
    pub fn run(&mut self) -> io::Result<()> {
        self.bind()?;
        let Some(listener) = &self.listener else {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "listener not bound",
            ));
        };

        info!(
            "modo concurrente: un thread por conexión, máximo {}",
            self.limiter.max()
        );

        let mut connection_id: u64 = 0;

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    error!("error al aceptar conexión: {}", e);
                    continue;
                }
            };

            // Bloquea si ya hay max_clients workers vivos
            let permit = self.limiter.acquire();
            connection_id += 1;

            let peer = stream
                .peer_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|_| "unknown".to_string());
            debug!(%peer, id = connection_id, "nueva conexión");

            let router = Arc::clone(&self.router);
            let spawned = thread::Builder::new()
                .name(format!("conn-{}", connection_id))
                .spawn(move || {
                    let _permit = permit;
                    let span = info_span!("conn", %peer);
                    let _enter = span.enter();

                    if let Err(e) = Self::handle_connection(stream, &router) {
                        warn!("error en la conexión: {}", e);
                    }
                });

            if let Err(e) = spawned {
                error!("no se pudo crear el thread: {}", e);
            }
        }

        Ok(())
    }

    /// Atiende una conexión completa: leer → parsear → enrutar → responder → cerrar
    pub fn handle_connection(mut stream: TcpStream, router: &Router) -> io::Result<()> {
        stream.set_read_timeout(Some(router.config().read_timeout()))?;

        let result = read_request(&mut stream)
            .map_err(HttpError::from)
            .and_then(|buffer| {
                let request = ParsedRequest::parse(&buffer)?;
                router.route(&request)
            });

        match result {
            Ok(response) => {
                debug!("{}", response.status());
                response.write_to(&mut stream)?;
            }
            Err(err) => Self::send_error(&mut stream, &err)?,
        }

        Self::close(stream);
        Ok(())
    }

    /// Registra el error y escribe su página predefinida
    fn send_error(stream: &mut TcpStream, err: &HttpError) -> io::Result<()> {
        let status = err.status();
        if status.is_server_error() {
            error!("{} → {}", err, status);
        } else {
            warn!("{} → {}", err, status);
        }

        Response::error(status).write_to(stream)
    }

    /// Cierra la escritura y descarta lo que quede por leer
    ///
    /// Cerrar con datos sin leer en el buffer de recepción provoca un RST
    /// que puede hacer que el cliente pierda la respuesta.
    fn close(mut stream: TcpStream) {
        let _ = stream.shutdown(Shutdown::Write);
        let _ = stream.set_read_timeout(Some(LINGER_TIMEOUT));

        let mut scratch = [0u8; 4096];
        let mut drained = 0;
        while drained < LINGER_MAX_BYTES {
            match stream.read(&mut scratch) {
                Ok(0) | Err(_) => break,
                Ok(n) => drained += n,
            }
        }
    }
}
