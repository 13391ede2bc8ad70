use bytes::Bytes;
use http::{Method, Request, StatusCode};
use http_body_util::{BodyExt, Empty};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;
use tokio::time;
use tracing::debug;

use crate::target::Target;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every way a single request can fail. The loop treats all of them alike.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("request to {url} returned {status}")]
    BadStatus { url: String, status: StatusCode },
}

impl RequestError {
    /// The error followed by every underlying cause, so a refused connection
    /// reads differently from a failed DNS lookup.
    pub fn describe(&self) -> String {
        let mut message = self.to_string();
        // Display already shows the first cause
        let mut cause = self.source().and_then(|e| e.source());
        while let Some(e) = cause {
            message.push_str(": ");
            message.push_str(&e.to_string());
            cause = e.source();
        }
        message
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub body: String,
}

/// Issues the GET for one target.
pub trait Transport {
    fn get(
        &self,
        target: &Target,
    ) -> impl std::future::Future<Output = Result<Response, RequestError>> + Send;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpConnector, Empty<Bytes>>,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self { client, timeout }
    }

    async fn send(&self, target: &Target) -> Result<Response, RequestError> {
        let url = target.to_string();
        let uri = target.uri().map_err(|e| RequestError::Network {
            url: url.clone(),
            source: Box::new(e),
        })?;

        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Empty::<Bytes>::new())
            .map_err(|e| RequestError::Network {
                url: url.clone(),
                source: Box::new(e),
            })?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| RequestError::Network {
                url: url.clone(),
                source: Box::new(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::BadStatus { url, status });
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| RequestError::Network {
                url: url.clone(),
                source: Box::new(e),
            })?
            .to_bytes();

        debug!("Read {} body bytes from {}", body.len(), url);

        Ok(Response {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, target: &Target) -> Result<Response, RequestError> {
        // bounds connect, headers and body together
        match time::timeout(self.timeout, self.send(target)).await {
            Ok(result) => result,
            Err(_) => Err(RequestError::Timeout {
                url: target.to_string(),
                after: self.timeout,
            }),
        }
    }
}
