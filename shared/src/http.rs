use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::server::conn::auto::Builder;
use std::sync::Arc;
use tokio::net::TcpListener;

pub async fn run_http_service<S, E>(host: &str, port: u16, service: S) -> Result<(), E>
where
    S: Service<Request<Incoming>, Response = Response<BoxBody<Bytes, E>>, Error = E>
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
    E: From<std::io::Error> + std::error::Error + Send + Sync + 'static,
{
    let listener = TcpListener::bind(format!("{host}:{port}")).await?;
    let service_arc = Arc::new(service);

    tracing::info!(host, port, "Listening");

    loop {
        let (stream, _peer_addr) = listener.accept().await?;
        let _ = stream.set_nodelay(true);
        let io = TokioIo::new(stream);
        let svc = service_arc.clone();

        // Hand the connection to hyper; auto-detect h1/h2 on this socket
        tokio::spawn(async move {
            if let Err(e) = Builder::new(TokioExecutor::new())
                .serve_connection(io, svc)
                .await
            {
                tracing::debug!(error = %e, "Connection closed with error");
            }
        });
    }
}

/// Wraps a complete in-memory body.
pub fn full_body<E, B>(body: B) -> BoxBody<Bytes, E>
where
    E: 'static,
    B: Into<Bytes>,
{
    Full::new(body.into()).map_err(|e| match e {}).boxed()
}

/// A plain text response with the given status and message.
pub fn make_text_response<E: 'static>(
    status: StatusCode,
    message: impl Into<String>,
) -> Response<BoxBody<Bytes, E>> {
    let mut message = message.into();
    message.push('\n');

    let mut response = Response::new(full_body(message));
    *response.status_mut() = status;
    response
}

/// A plain text response carrying the status' canonical reason.
pub fn make_boxed_error_response<E: 'static>(status: StatusCode) -> Response<BoxBody<Bytes, E>> {
    make_text_response(status, status.canonical_reason().unwrap_or("error"))
}
