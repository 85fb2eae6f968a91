//! HTTP transport
//!
//! The client speaks to the controller through [`Transport`]; the
//! production implementation is a blocking `reqwest` client.

use crate::error::TransportError;
use crate::{Error, Result};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

/// One HTTP exchange, fully described.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// Status and raw body of an answered request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a single request. No retries at this level.
///
/// `Err` means the exchange did not complete; any answered request, whatever
/// its status, is `Ok`.
pub trait Transport: Send + Sync {
    fn send(&self, request: &Request) -> std::result::Result<Response, TransportError>;
}

/// Blocking reqwest transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| Error::ClientSetup(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> std::result::Result<Response, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Put => self.client.put(&request.url),
        };
        builder = builder.timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(classify)?;
        Ok(Response { status, body })
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_builder() {
        TransportError::Request(error.to_string())
    } else if error.is_timeout() {
        TransportError::Timeout(error.to_string())
    } else if error.is_body() || error.is_decode() {
        TransportError::Body(error.to_string())
    } else {
        // Refused connections and resets mid-exchange
        TransportError::Connect(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_covers_the_2xx_range() {
        let ok = Response {
            status: 204,
            body: String::new(),
        };
        let rejected = Response {
            status: 409,
            body: "conflict".into(),
        };
        assert!(ok.is_success());
        assert!(!rejected.is_success());
    }

    #[test]
    fn refused_connection_is_a_connect_fault() {
        // Bind then drop to get a port nobody listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        let request = Request {
            method: Method::Get,
            url: format!("http://127.0.0.1:{port}/status"),
            headers: Vec::new(),
            body: None,
            timeout: Duration::from_secs(2),
        };
        let err = transport.send(&request).unwrap_err();
        assert!(matches!(err, TransportError::Connect(_)), "got: {err:?}");
    }

    #[test]
    fn malformed_header_is_a_request_fault() {
        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        let request = Request {
            method: Method::Get,
            url: "http://127.0.0.1:9/status".into(),
            headers: vec![("X-Auth-Token", "tok\nen".into())],
            body: None,
            timeout: Duration::from_secs(2),
        };
        let err = transport.send(&request).unwrap_err();
        assert!(matches!(err, TransportError::Request(_)), "got: {err:?}");
    }
}
