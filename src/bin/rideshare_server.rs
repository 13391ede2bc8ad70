use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Stand-in rideshare backend: answers the vehicle routes the load generator hits.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("rideshare_server=debug,info")
        .init();

    let port: u16 = std::env::args()
        .nth(1)
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Rideshare server listening on port {}", port);

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                continue;
            }
        };
        tokio::spawn(async move {
            if let Err(e) = http1::Builder::new()
                .serve_connection(TokioIo::new(socket), service_fn(route))
                .await
            {
                error!("Error serving {}: {}", peer, e);
            }
        });
    }
}

async fn route(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    debug!("{} {}", req.method(), req.uri().path());

    let (status, body) = match (req.method(), req.uri().path()) {
        (&Method::GET, "/") => (StatusCode::OK, "<h1>rideshare</h1>"),
        (&Method::GET, "/bike") => (StatusCode::OK, "<h1>Bike ordered</h1>"),
        (&Method::GET, "/scooter") => (StatusCode::OK, "<h1>Scooter ordered</h1>"),
        (&Method::GET, "/car") => (StatusCode::OK, "<h1>Car ordered</h1>"),
        (&Method::GET, _) => (StatusCode::NOT_FOUND, "not found"),
        _ => (StatusCode::METHOD_NOT_ALLOWED, "method not allowed"),
    };

    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    Ok(response)
}
